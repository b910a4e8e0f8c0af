// src/ports/html.rs
use crate::application::board::{Notice, NoticeKind};
use crate::application::CommentThread;
use crate::domain::{Idea, MediaType, Notification};
use crate::ports::text::{format_timestamp, relative_time};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;
use tracing::instrument;

pub const EMPTY_BOARD_MESSAGE: &str = "No ideas found. Be the first to share an idea!";

/// One idea as shown on the board, with its client-side decorations.
#[derive(Debug, Clone, Copy)]
pub struct IdeaCard<'a> {
    pub idea: &'a Idea,
    pub liked: bool,
    /// Present once the thread has been expanded or its count seeded.
    pub thread: Option<&'a CommentThread>,
}

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    fn render_media(&self, idea: &Idea) -> String {
        let Some(media) = idea.media() else {
            return String::new();
        };
        let url = encode_double_quoted_attribute(media.url);
        match media.kind {
            MediaType::Image => format!(
                r#"<div class="media"><img src="{url}" alt="Image for {title}"></div>"#,
                title = encode_double_quoted_attribute(&idea.title),
            ),
            MediaType::Video => format!(
                r#"<div class="media"><video controls><source src="{url}" type="video/mp4">Your browser does not support the video tag.</video></div>"#
            ),
            MediaType::Other => String::new(),
        }
    }

    fn render_thread(&self, thread: &CommentThread) -> String {
        let mut html = format!(
            r#"<div class="comments"><div class="comment-count">Comments ({})</div>"#,
            thread.count()
        );
        if thread.is_expanded() {
            if let Some(placeholder) = thread.placeholder() {
                let _ = write!(html, r#"<p class="placeholder">{placeholder}</p>"#);
            }
            for comment in thread.comments() {
                let _ = write!(
                    html,
                    r#"<div class="comment" data-id="{id}"><strong>{author}</strong> <span class="date">{date}</span><p>{content}</p></div>"#,
                    id = encode_double_quoted_attribute(&comment.id),
                    author = encode_text(&comment.author),
                    date = format_timestamp(&comment.created_at),
                    content = encode_text(&comment.content),
                );
            }
        }
        html.push_str("</div>");
        html
    }

    pub fn render_card(&self, card: &IdeaCard<'_>) -> String {
        let idea = card.idea;
        let (like_class, like_label) = if card.liked {
            ("like-btn liked", "Unlike")
        } else {
            ("like-btn", "Like")
        };
        format!(
            r#"<div class="card" data-id="{id}">
    <div class="card-header"><span class="card-title">{title}</span></div>
    <div class="card-body">
        <p class="card-text">{description}</p>
        {media}
        <p class="date">Posted on {date}</p>
        <div class="{like_class}">{like_label} <span class="likes">{likes}</span></div>
        {thread}
    </div>
</div>"#,
            id = encode_double_quoted_attribute(&idea.id),
            title = encode_text(&idea.title),
            description = encode_text(&idea.description),
            media = self.render_media(idea),
            date = format_timestamp(&idea.created_at),
            likes = idea.likes_count,
            thread = card.thread.map(|t| self.render_thread(t)).unwrap_or_default(),
        )
    }

    fn render_notice(&self, notice: &Notice) -> String {
        let class = match notice.kind {
            NoticeKind::Success => "notice success",
            NoticeKind::Error => "notice error",
        };
        format!(r#"<div class="{class}">{}</div>"#, encode_text(&notice.text))
    }

    #[instrument(level = "debug", skip_all, fields(cards = cards.len()))]
    pub fn render_board(&self, cards: &[IdeaCard<'_>], notice: Option<&Notice>) -> String {
        let mut body = notice.map(|n| self.render_notice(n)).unwrap_or_default();
        if cards.is_empty() {
            let _ = write!(
                body,
                r#"<div class="empty-state"><h4>No Ideas Found</h4><p>{EMPTY_BOARD_MESSAGE}</p></div>"#
            );
        } else {
            body.push_str(r#"<div class="grid">"#);
            for card in cards {
                body.push_str(&self.render_card(card));
            }
            body.push_str("</div>");
        }
        page("Skill Sharing Ideas", &body)
    }

    #[instrument(level = "debug", skip_all, fields(count = notifications.len()))]
    pub fn render_notifications(&self, notifications: &[Notification], now: DateTime<Utc>) -> String {
        let unread = notifications.iter().filter(|n| !n.read).count();
        let mut body = format!(r#"<h2>Notifications <span class="badge">{unread}</span></h2>"#);
        if notifications.is_empty() {
            body.push_str(r#"<p class="placeholder">No notifications</p>"#);
        }
        for n in notifications {
            let _ = write!(
                body,
                r#"<div class="notification {color}{read}"><i class="{icon}"></i> <strong>{title}</strong><p>{message}</p><span class="date">{when}</span></div>"#,
                read = if n.read { " read" } else { "" },
                color = n.kind.color(),
                icon = n.kind.icon(),
                title = encode_text(&n.title),
                message = encode_text(&n.message),
                when = relative_time(&n.created_at, now),
            );
        }
        page("Notifications", &body)
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 1100px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .grid {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
            gap: 1rem;
        }}
        .card, .notification {{
            background: white;
            border-radius: 8px;
            padding: 1rem;
            margin-bottom: 1rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .card-title {{ font-size: 1.2em; font-weight: bold; }}
        .media img, .media video {{ max-width: 100%; max-height: 200px; border-radius: 4px; }}
        .date {{ font-size: 0.85em; color: #666; }}
        .like-btn {{ color: #666; }}
        .like-btn.liked {{ color: #d63384; font-weight: bold; }}
        .comments {{ margin-top: 0.5rem; padding-top: 0.5rem; border-top: 1px solid #eee; }}
        .placeholder {{ color: #999; font-style: italic; }}
        .notification {{ border-left: 4px solid #6c757d; }}
        .notification.primary {{ border-left-color: #0d6efd; }}
        .notification.success {{ border-left-color: #198754; }}
        .notification.info {{ border-left-color: #0dcaf0; }}
        .notification.warning {{ border-left-color: #ffc107; }}
        .notification.read {{ opacity: 0.6; }}
        .notice {{ padding: 0.75rem; border-radius: 4px; margin-bottom: 1rem; }}
        .notice.success {{ background: #d1e7dd; }}
        .notice.error {{ background: #f8d7da; }}
        .empty-state {{ text-align: center; color: #666; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {body}
</body>
</html>"#,
        title = encode_text(title),
    )
}
