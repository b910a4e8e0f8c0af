mod helpers;

use anyhow::Result;
use helpers::TestStorage;
use skillboard::application::board::NoticeKind;
use skillboard::application::comment_thread::NO_COMMENTS_PLACEHOLDER;
use skillboard::application::{
    BoardError, BoardEvent, IdeaBoard, KeyValueStore, LikeMarks, Session, SortKey,
};
use skillboard::domain::{DomainError, IdeaDraft};
use skillboard::infrastructure::{FileStore, MemoryStore};
use skillboard::util::testing::{comment, idea, MockApi};
use std::time::Duration;
use tokio::time::timeout;

fn board_with(api: MockApi) -> IdeaBoard<MockApi, MemoryStore> {
    IdeaBoard::new(api, LikeMarks::new(MemoryStore::new(), None))
}

fn three_ideas() -> MockApi {
    MockApi::builder()
        .with_idea(idea("1", "Knitting circle", "Weekly meetup", 0, 2))
        .with_idea(idea("2", "bread baking", "Sourdough swap", 10, 7))
        .with_idea(idea("3", "Guitar basics", "Chords for beginners", 20, 2))
        .build()
}

#[tokio::test]
async fn given_loaded_board_when_fetch_fails_then_keeps_previous_snapshot() -> Result<()> {
    // Arrange
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().fail("list_ideas");

    // Act
    let result = board.fetch().await;

    // Assert
    assert!(result.is_err());
    assert_eq!(board.state().ideas.len(), 3);
    assert_eq!(
        board.state().ideas.last_error(),
        Some("Error loading ideas. Please try again later.")
    );
    assert_eq!(
        board.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
    Ok(())
}

#[tokio::test]
async fn given_first_load_when_fetch_fails_then_board_is_empty() {
    let mut board = board_with(MockApi::builder().failing("list_ideas").build());

    let _ = board.fetch().await;

    assert!(board.state().ideas.is_empty());
    assert!(board.state().ideas.last_error().is_some());
}

#[tokio::test]
async fn given_loaded_board_when_viewing_then_filters_and_sorts_without_refetch() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;

    let all: Vec<&str> = board.view("", SortKey::Newest).iter().map(|i| i.id.as_str()).collect();
    let az: Vec<&str> = board.view("  ", SortKey::TitleAz).iter().map(|i| i.id.as_str()).collect();
    let za: Vec<&str> = board.view("", SortKey::TitleZa).iter().map(|i| i.id.as_str()).collect();
    let liked: Vec<&str> = board.view("", SortKey::MostLiked).iter().map(|i| i.id.as_str()).collect();
    let matched: Vec<&str> = board.view("SOURDOUGH", SortKey::Newest).iter().map(|i| i.id.as_str()).collect();

    assert_eq!(all, vec!["3", "2", "1"]);
    assert_eq!(az, vec!["2", "3", "1"]);
    assert_eq!(za, az.iter().rev().copied().collect::<Vec<_>>());
    assert_eq!(liked, vec!["2", "1", "3"]);
    assert_eq!(matched, vec!["2"]);
    assert!(board.view("pottery", SortKey::Newest).is_empty());
    assert_eq!(board.repository().calls(), vec!["list_ideas"]);
    Ok(())
}

#[tokio::test]
async fn given_new_idea_when_liking_then_unliking_then_mark_and_count_round_trip() -> Result<()> {
    // Arrange
    let storage = TestStorage::new()?;
    let marks = LikeMarks::new(storage.open()?, Some("ana"));
    let mut board = IdeaBoard::new(MockApi::builder().build(), marks);

    // Act: create and fetch
    let created = board.create(&IdeaDraft::new("Test", "Desc", None)?).await?;
    let fetched = board.state().ideas.get(&created.id).cloned();

    // Assert
    assert_eq!(fetched.map(|i| i.likes_count), Some(0));
    assert!(!board.is_liked(&created.id));

    // Act: like
    let liked = board.toggle_like(&created.id).await?;

    assert!(liked.liked);
    assert_eq!(liked.likes_count, 1);
    assert!(board.is_liked(&created.id));
    assert_eq!(board.state().ideas.get(&created.id).map(|i| i.likes_count), Some(1));

    // Mark survives a reopen of the store
    let reopened = LikeMarks::new(storage.open()?, Some("ana"));
    assert!(reopened.is_liked(&created.id)?);

    // Act: unlike
    let unliked = board.toggle_like(&created.id).await?;

    assert!(!unliked.liked);
    assert_eq!(unliked.likes_count, 0);
    assert!(!board.is_liked(&created.id));
    assert_eq!(board.state().ideas.get(&created.id).map(|i| i.likes_count), Some(0));
    assert!(storage.open()?.get(&format!("liked:ana:{}", created.id))?.is_none());
    Ok(())
}

#[tokio::test]
async fn given_other_users_likes_when_toggling_then_count_comes_from_server() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().set_likes("1", 41);

    let outcome = board.toggle_like("1").await?;

    assert_eq!(outcome.likes_count, 42);
    assert_eq!(board.state().ideas.get("1").map(|i| i.likes_count), Some(42));
    Ok(())
}

#[tokio::test]
async fn given_failing_like_when_toggling_then_mark_stays_unchanged() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().fail("like_idea");

    let result = board.toggle_like("1").await;

    assert!(matches!(result, Err(BoardError::Domain(_))));
    assert!(!board.is_liked("1"));
    assert_eq!(board.state().ideas.get("1").map(|i| i.likes_count), Some(2));
    assert!(board.state().likes_in_flight.is_empty());
    Ok(())
}

#[tokio::test]
async fn given_pending_like_when_toggling_again_then_rejects_without_request() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.dispatch(BoardEvent::LikeStarted("1".to_string()));

    let result = board.toggle_like("1").await;

    assert!(matches!(result, Err(BoardError::LikeInFlight(id)) if id == "1"));
    assert!(!board.repository().calls().contains(&"like_idea".to_string()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn given_cancelled_toggle_when_toggling_again_then_request_is_sent() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().stall("like_idea");

    let cancelled = timeout(Duration::from_millis(200), board.toggle_like("1")).await;
    assert!(cancelled.is_err());
    assert!(board.state().likes_in_flight.is_empty());
    board.repository().recover("like_idea");

    let outcome = board.toggle_like("1").await?;

    assert!(outcome.liked);
    assert_eq!(outcome.likes_count, 3);
    let like_calls = board
        .repository()
        .calls()
        .iter()
        .filter(|op| op.as_str() == "like_idea")
        .count();
    assert_eq!(like_calls, 2);
    Ok(())
}

#[tokio::test]
async fn given_created_idea_when_reload_fails_then_create_still_succeeds() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().fail("list_ideas");

    let created = board.create(&IdeaDraft::new("Pottery", "Wheel basics", None)?).await?;

    assert_eq!(created.title, "Pottery");
    assert_eq!(board.repository().ideas().len(), 4);
    assert_eq!(board.state().ideas.len(), 3);
    assert_eq!(
        board.state().ideas.last_error(),
        Some("Error loading ideas. Please try again later.")
    );
    Ok(())
}

#[tokio::test]
async fn given_updated_idea_when_reload_fails_then_update_still_succeeds() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().fail("list_ideas");

    let updated = board
        .update("2", &IdeaDraft::new("Bread baking", "Rye this week", None)?)
        .await?;

    assert_eq!(updated.description, "Rye this week");
    assert_eq!(
        board.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::Error)
    );
    Ok(())
}

#[tokio::test]
async fn given_confirmed_delete_when_deleting_idea_then_removed_locally() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;

    board.delete("2").await?;

    assert_eq!(board.state().ideas.len(), 2);
    assert!(board.state().ideas.get("2").is_none());
    Ok(())
}

#[tokio::test]
async fn given_failed_delete_when_deleting_idea_then_keeps_it() -> Result<()> {
    let mut board = board_with(three_ideas());
    board.fetch().await?;
    board.repository().fail("delete_idea");

    assert!(board.delete("2").await.is_err());

    assert_eq!(board.state().ideas.len(), 3);
    assert_eq!(
        board.state().notice.as_ref().map(|n| n.text.as_str()),
        Some("Failed to delete idea. Please try again.")
    );
    Ok(())
}

#[tokio::test]
async fn given_thread_when_expanding_twice_then_fetches_once() -> Result<()> {
    let api = MockApi::builder()
        .with_idea(idea("1", "Knitting", "Weekly", 0, 0))
        .with_comment(comment("c1", "1", "Nice", 1))
        .build();
    let mut board = board_with(api);

    board.expand_thread("1").await?;
    board.collapse_thread("1");
    let thread = board.expand_thread("1").await?;

    assert_eq!(thread.count(), 1);
    assert_eq!(
        board
            .repository()
            .calls()
            .iter()
            .filter(|c| *c == "list_comments")
            .count(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn given_comments_when_deleting_each_then_count_drops_to_placeholder() -> Result<()> {
    let api = MockApi::builder()
        .with_idea(idea("1", "Knitting", "Weekly", 0, 0))
        .with_comment(comment("c1", "1", "First", 1))
        .with_comment(comment("c2", "1", "Second", 2))
        .build();
    let mut board = board_with(api);
    board.expand_thread("1").await?;

    board.delete_comment("1", "c1").await?;
    let thread = board.state().thread("1").expect("thread loaded");
    assert_eq!(thread.count(), 1);
    assert_eq!(thread.placeholder(), None);

    board.delete_comment("1", "c2").await?;
    let thread = board.state().thread("1").expect("thread loaded");
    assert_eq!(thread.count(), 0);
    assert_eq!(thread.placeholder(), Some(NO_COMMENTS_PLACEHOLDER));
    Ok(())
}

#[tokio::test]
async fn given_failed_comment_delete_when_deleting_then_count_unchanged() -> Result<()> {
    let api = MockApi::builder()
        .with_comment(comment("c1", "1", "First", 1))
        .failing("delete_comment")
        .build();
    let mut board = board_with(api);
    board.expand_thread("1").await?;

    assert!(board.delete_comment("1", "c1").await.is_err());

    assert_eq!(board.state().thread("1").map(|t| t.count()), Some(1));
    Ok(())
}

#[tokio::test]
async fn given_blank_comment_when_adding_then_rejects_before_request() {
    let mut board = board_with(MockApi::builder().build());

    let result = board.add_comment("1", "   ", None).await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    assert!(board.repository().calls().is_empty());
}

#[tokio::test]
async fn given_expanded_thread_when_adding_comment_then_prepends_it() -> Result<()> {
    let api = MockApi::builder()
        .with_comment(comment("c1", "1", "Older", 1))
        .build();
    let mut board = board_with(api);
    board.expand_thread("1").await?;

    let created = board.add_comment("1", "Newer", Some("  ")).await?;

    let thread = board.state().thread("1").expect("thread loaded");
    assert_eq!(created.author, "Anonymous");
    assert_eq!(thread.comments()[0].content, "Newer");
    assert_eq!(thread.count(), 2);
    Ok(())
}

#[tokio::test]
async fn given_collapsed_thread_when_loading_count_then_seeds_displayed_count() -> Result<()> {
    let api = MockApi::builder()
        .with_comment(comment("c1", "1", "a", 1))
        .with_comment(comment("c2", "1", "b", 2))
        .build();
    let mut board = board_with(api);

    let count = board.load_comment_count("1").await?;

    assert_eq!(count, 2);
    let thread = board.state().thread("1").expect("thread seeded");
    assert!(!thread.is_loaded());
    assert_eq!(thread.count(), 2);
    Ok(())
}

#[tokio::test]
async fn given_session_and_marks_in_one_file_when_logging_out_then_marks_survive() -> Result<()> {
    let storage = TestStorage::new()?;
    let mut store: FileStore = storage.open()?;
    Session::new(&mut store).login("jwt", "ana")?;
    LikeMarks::new(&mut store, Some("ana")).set("1", true)?;

    Session::new(&mut store).logout()?;

    let mut reopened = storage.open()?;
    assert!(!Session::new(&mut reopened).is_authenticated());
    assert!(LikeMarks::new(&mut reopened, Some("ana")).is_liked("1")?);
    Ok(())
}
