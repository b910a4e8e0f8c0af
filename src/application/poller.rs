// src/application/poller.rs
use crate::application::{IdeaRepository, NotificationRepository};
use crate::domain::{DomainError, Idea};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Running fixed-period poll. Cancelling or dropping the handle stops the timer.
///
/// A request that is already in flight when the handle is cancelled is
/// abandoned together with the task.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `tick` immediately and then once per `period`.
///
/// A failed tick is logged and the poller waits for the next interval.
/// There is no backoff and no jitter.
pub fn spawn_poller<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> PollerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), DomainError>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            debug!(poller = name, "Poll tick");
            if let Err(e) = tick().await {
                warn!(poller = name, error = %e, "Poll failed, waiting for next interval");
            }
        }
    });
    PollerHandle { task }
}

/// Poll the server's unread-notification count and publish every successful read.
pub fn watch_unread_count<R>(repository: Arc<R>, period: Duration) -> (PollerHandle, watch::Receiver<u64>)
where
    R: NotificationRepository + 'static,
{
    let (sender, receiver) = watch::channel(0);
    let sender = Arc::new(sender);
    let handle = spawn_poller("unread-count", period, move || {
        let repository = Arc::clone(&repository);
        let sender = Arc::clone(&sender);
        async move {
            let count = repository.unread_count().await?;
            sender.send_replace(count);
            Ok(())
        }
    });
    (handle, receiver)
}

/// Re-fetch the ideas list every `period` and publish each successful fetch.
///
/// A failed fetch publishes nothing, so receivers keep the last good list.
pub fn watch_ideas<R>(repository: Arc<R>, period: Duration) -> (PollerHandle, watch::Receiver<Vec<Idea>>)
where
    R: IdeaRepository + 'static,
{
    let (sender, receiver) = watch::channel(Vec::new());
    let sender = Arc::new(sender);
    let handle = spawn_poller("ideas", period, move || {
        let repository = Arc::clone(&repository);
        let sender = Arc::clone(&sender);
        async move {
            let ideas = repository.list_ideas().await?;
            sender.send_replace(ideas);
            Ok(())
        }
    });
    (handle, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{idea, notification, MockApi};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn given_period_when_time_passes_then_ticks_immediately_and_every_interval() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _handle = spawn_poller("test", Duration::from_secs(30), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        time::sleep(Duration::from_secs(65)).await;

        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn given_failing_tick_when_polling_then_keeps_going() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _handle = spawn_poller("test", Duration::from_secs(30), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::Transport("offline".to_string()))
            }
        });

        time::sleep(Duration::from_secs(95)).await;

        assert_eq!(ticks.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn given_cancelled_handle_when_time_passes_then_no_more_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let handle = spawn_poller("test", Duration::from_secs(30), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        handle.cancel();
        time::sleep(Duration::from_secs(120)).await;

        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn given_unread_notifications_when_watching_then_publishes_server_count() {
        let api = Arc::new(
            MockApi::builder()
                .with_notification(notification("n1", false))
                .with_notification(notification("n2", false))
                .with_notification(notification("n3", true))
                .build(),
        );
        let (_handle, mut counts) = watch_unread_count(Arc::clone(&api), Duration::from_secs(30));

        counts.changed().await.unwrap();
        assert_eq!(*counts.borrow_and_update(), 2);

        api.mark_read_locally("n1");
        time::sleep(Duration::from_secs(31)).await;

        assert_eq!(*counts.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn given_failing_fetch_when_watching_ideas_then_keeps_last_published_list() {
        let api = Arc::new(
            MockApi::builder()
                .with_idea(idea("1", "Knitting", "Weekly", 0, 2))
                .build(),
        );
        let (_handle, mut lists) = watch_ideas(Arc::clone(&api), Duration::from_secs(30));

        lists.changed().await.unwrap();
        assert_eq!(lists.borrow_and_update().len(), 1);

        api.fail("list_ideas");
        time::sleep(Duration::from_secs(31)).await;
        assert!(!lists.has_changed().unwrap());

        api.recover("list_ideas");
        api.set_likes("1", 9);
        time::sleep(Duration::from_secs(30)).await;

        let ideas = lists.borrow_and_update().clone();
        assert_eq!(ideas.first().map(|i| i.likes_count), Some(9));
    }
}
