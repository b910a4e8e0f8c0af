pub mod html;
pub mod text;

pub use html::{HtmlPresenter, IdeaCard};
pub use text::TextPresenter;
