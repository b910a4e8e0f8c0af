// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{
    BoardEvent, IdeaBoard, KeyValueStore, LikeMarks, NotificationCenter, ProfileEditor, Session,
    SkillCatalog, SortKey,
};
use crate::cli::args::{
    Args, Command, CommentsCommand, IdeasCommand, ListOptions, NotificationsCommand,
    ProfileCommand, SkillsCommand,
};
use crate::domain::{IdeaDraft, NewSkill, ProfileChanges};
use crate::infrastructure::{ApiClient, Config, FileStore, PageRenderer};
use crate::ports::{HtmlPresenter, IdeaCard, TextPresenter};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting skillboard with arguments");

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.server.base_url = base_url;
    }
    let mut store = FileStore::open(config.storage_path()?)?;
    debug!(path = %store.path().display(), "Opened local storage");

    let (token, username) = {
        let session = Session::new(&mut store);
        (session.token()?, session.username()?)
    };
    let client = ApiClient::new(&config.server.base_url, config.timeout())?.with_token(token);

    match args.command {
        Command::Login { username, password } => {
            let credentials = client
                .login(&username, &password)
                .await
                .context("Login failed")?;
            Session::new(&mut store).login(&credentials.token, &credentials.username)?;
            info!(username = %credentials.username, "Logged in");
            println!("Logged in as {}", credentials.username);
        }
        Command::Logout => {
            Session::new(&mut store).logout()?;
            println!("Logged out");
        }
        Command::Ideas(command) => {
            let marks = LikeMarks::new(store, username.as_deref());
            run_ideas(IdeaBoard::new(client, marks), &config, command).await?;
        }
        Command::Comments(command) => {
            let marks = LikeMarks::new(store, username.as_deref());
            run_comments(IdeaBoard::new(client, marks), command).await?;
        }
        Command::Notifications(command) => run_notifications(client, &config, command).await?,
        Command::Skills(command) => run_skills(SkillCatalog::new(client), command).await?,
        Command::Profile(command) => run_profile(ProfileEditor::new(client), command).await?,
    }

    Ok(())
}

fn cards<'a, S: KeyValueStore>(
    board: &'a IdeaBoard<ApiClient, S>,
    term: &str,
    key: SortKey,
) -> Vec<IdeaCard<'a>> {
    board
        .view(term, key)
        .into_iter()
        .map(|idea| IdeaCard {
            idea,
            liked: board.is_liked(&idea.id),
            thread: board.state().thread(&idea.id),
        })
        .collect()
}

fn poll_period(interval: Option<u64>, config: &Config) -> Duration {
    interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.poll_interval())
}

async fn run_ideas<S: KeyValueStore>(
    mut board: IdeaBoard<ApiClient, S>,
    config: &Config,
    command: IdeasCommand,
) -> Result<()> {
    match command {
        IdeasCommand::List {
            options,
            json,
            html,
        } => {
            board.fetch().await.context("Failed to fetch ideas")?;
            let key = SortKey::lenient(&options.sort);
            if json {
                let ideas = board.view(&options.search, key);
                println!("{}", serde_json::to_string_pretty(&ideas)?);
            } else if html {
                let cards = cards(&board, &options.search, key);
                let page = HtmlPresenter::new().render_board(&cards, board.state().notice.as_ref());
                let path = PageRenderer::new().show("board.html", &page)?;
                info!(path = %path.display(), "Opened board in browser");
            } else {
                let cards = cards(&board, &options.search, key);
                print!("{}", TextPresenter::new().idea_list(&cards));
            }
        }
        IdeasCommand::Show { id } => {
            board.fetch().await.context("Failed to fetch ideas")?;
            board
                .expand_thread(&id)
                .await
                .with_context(|| format!("Failed to load comments for idea {id}"))?;
            let idea = board
                .state()
                .ideas
                .get(&id)
                .with_context(|| format!("Idea {id} not found"))?;
            print!(
                "{}",
                TextPresenter::new().idea_detail(idea, board.is_liked(&id), board.state().thread(&id))
            );
        }
        IdeasCommand::Create {
            title,
            description,
            media,
        } => {
            let draft = IdeaDraft::new(title, description, media)?;
            let idea = board.create(&draft).await.context("Failed to share idea")?;
            println!("Your idea has been shared! ({})", idea.id);
        }
        IdeasCommand::Update {
            id,
            title,
            description,
            media,
        } => {
            let draft = IdeaDraft::new(title, description, media)?;
            board
                .update(&id, &draft)
                .await
                .with_context(|| format!("Failed to update idea {id}"))?;
            println!("Your idea has been updated!");
        }
        IdeasCommand::Delete { id } => {
            board
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete idea {id}"))?;
            println!("Idea deleted");
        }
        IdeasCommand::Like { id } => {
            let outcome = board
                .toggle_like(&id)
                .await
                .with_context(|| format!("Failed to toggle like on idea {id}"))?;
            let verb = if outcome.liked { "Liked" } else { "Unliked" };
            println!("{verb} idea {id} ({} likes)", outcome.likes_count);
        }
        IdeasCommand::Watch { options, interval } => {
            watch_board(&mut board, poll_period(interval, config), &options).await?;
        }
    }
    Ok(())
}

async fn watch_board<S: KeyValueStore>(
    board: &mut IdeaBoard<ApiClient, S>,
    period: Duration,
    options: &ListOptions,
) -> Result<()> {
    info!(?period, "Watching ideas");
    let key = SortKey::lenient(&options.sort);
    let (handle, mut lists) =
        application::watch_ideas(Arc::new(board.repository().clone()), period);

    loop {
        tokio::select! {
            changed = lists.changed() => {
                if changed.is_err() {
                    warn!("Ideas poller stopped");
                    break;
                }
                let ideas = lists.borrow_and_update().clone();
                board.dispatch(BoardEvent::IdeasFetched(ideas));
                print!("{}", TextPresenter::new().idea_list(&cards(board, &options.search, key)));
                println!();
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for interrupt")?;
                break;
            }
        }
    }

    handle.cancel();
    Ok(())
}

async fn run_comments<S: KeyValueStore>(
    mut board: IdeaBoard<ApiClient, S>,
    command: CommentsCommand,
) -> Result<()> {
    match command {
        CommentsCommand::List { idea_id } => {
            let thread = board
                .expand_thread(&idea_id)
                .await
                .with_context(|| format!("Failed to load comments for idea {idea_id}"))?;
            if let Some(placeholder) = thread.placeholder() {
                println!("{placeholder}");
            }
            for comment in thread.comments() {
                println!("{}\t{}\t{}", comment.id, comment.author, comment.content);
            }
        }
        CommentsCommand::Add {
            idea_id,
            content,
            author,
        } => {
            let comment = board
                .add_comment(&idea_id, &content, author.as_deref())
                .await
                .context("Failed to add comment")?;
            println!("Comment added ({})", comment.id);
        }
        CommentsCommand::Delete {
            idea_id,
            comment_id,
        } => {
            board
                .delete_comment(&idea_id, &comment_id)
                .await
                .with_context(|| format!("Failed to delete comment {comment_id}"))?;
            println!("Comment deleted");
        }
    }
    Ok(())
}

async fn run_notifications(
    client: ApiClient,
    config: &Config,
    command: NotificationsCommand,
) -> Result<()> {
    let mut center = NotificationCenter::new(client.clone());
    match command {
        NotificationsCommand::List { html } => {
            center
                .refresh()
                .await
                .context("Failed to fetch notifications")?;
            let now = chrono::Utc::now();
            if html {
                let page = HtmlPresenter::new().render_notifications(center.notifications(), now);
                PageRenderer::new().show("notifications.html", &page)?;
            } else {
                print!(
                    "{}",
                    TextPresenter::new().notifications(center.notifications(), now)
                );
            }
        }
        NotificationsCommand::Unread => {
            let count = center
                .unread_count()
                .await
                .context("Failed to fetch unread count")?;
            println!("{count}");
        }
        NotificationsCommand::Read { id } => {
            center
                .mark_read(&id)
                .await
                .with_context(|| format!("Failed to mark notification {id} as read"))?;
            println!("{} unread", center.unread());
        }
        NotificationsCommand::ReadAll => {
            center
                .mark_all_read()
                .await
                .context("Failed to mark all notifications as read")?;
            println!("All notifications marked as read");
        }
        NotificationsCommand::Watch { interval } => {
            watch_notifications(client, poll_period(interval, config)).await?;
        }
    }
    Ok(())
}

async fn watch_notifications(client: ApiClient, period: Duration) -> Result<()> {
    info!(?period, "Watching unread notifications");
    let (handle, mut counts) = application::watch_unread_count(Arc::new(client), period);

    loop {
        tokio::select! {
            changed = counts.changed() => {
                if changed.is_err() {
                    warn!("Unread count poller stopped");
                    break;
                }
                println!("{} unread", *counts.borrow_and_update());
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for interrupt")?;
                break;
            }
        }
    }

    handle.cancel();
    Ok(())
}

async fn run_skills(mut catalog: SkillCatalog<ApiClient>, command: SkillsCommand) -> Result<()> {
    match command {
        SkillsCommand::List { options } => {
            catalog.refresh().await.context("Failed to fetch skills")?;
            let skills = catalog
                .skills()
                .view(&options.search, SortKey::lenient(&options.sort));
            print!("{}", TextPresenter::new().skills(&skills));
        }
        SkillsCommand::Add {
            title,
            description,
            category,
            level,
        } => {
            let skill = NewSkill::new(&title, &description, &category, level)?;
            let created = catalog.add(&skill).await.context("Failed to add skill")?;
            println!("Skill added ({})", created.id);
        }
    }
    Ok(())
}

async fn run_profile(mut editor: ProfileEditor<ApiClient>, command: ProfileCommand) -> Result<()> {
    let profile = match command {
        ProfileCommand::Show => editor.load().await.context("Failed to load profile")?,
        ProfileCommand::Update {
            full_name,
            email,
            bio,
            picture,
        } => {
            editor.load().await.context("Failed to load profile")?;
            let changes = ProfileChanges {
                full_name,
                email,
                bio,
                profile_picture: picture,
            };
            editor
                .save(changes)
                .await
                .context("Failed to update profile")?
        }
    };
    print!("{}", TextPresenter::new().profile(profile));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
