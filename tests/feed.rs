use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use skyline_runner::feed::service::FALLBACK_TRANSMISSIONS;
use skyline_runner::feed::{AmbientFeed, FeedError, FeedSettings, OfflineCollaborator, TextCollaborator};
use skyline_runner::game::{ControlIntent, NpcTuning, Session, VehicleTuning, WorldSnapshot};

struct Sequence {
    lines: parking_lot::Mutex<Vec<Result<String, ()>>>,
}

#[async_trait]
impl TextCollaborator for Sequence {
    async fn transmission(&self) -> Result<String, FeedError> {
        match self.lines.lock().pop() {
            Some(Ok(text)) => Ok(text),
            _ => Err(FeedError::Empty),
        }
    }
}

fn settings(capacity: usize) -> FeedSettings {
    FeedSettings {
        period: Duration::from_secs(8),
        timeout: Duration::from_millis(200),
        capacity,
    }
}

#[test]
fn offline_feed_fills_with_fallbacks() {
    let feed = AmbientFeed::new(Arc::new(OfflineCollaborator), settings(3));
    for _ in 0..5 {
        tokio_test::block_on(feed.poll_once());
    }
    let messages = feed.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages
        .iter()
        .all(|m| FALLBACK_TRANSMISSIONS.contains(&m.text.as_str())));
}

#[test]
fn failures_are_interleaved_with_real_text() {
    let collaborator = Sequence {
        lines: parking_lot::Mutex::new(vec![Ok("Curfew sirens at midnight.".to_string()), Err(())]),
    };
    let feed = AmbientFeed::new(Arc::new(collaborator), settings(6));

    let first = tokio_test::block_on(feed.poll_once());
    let second = tokio_test::block_on(feed.poll_once());

    assert!(FALLBACK_TRANSMISSIONS.contains(&first.text.as_str()));
    assert_eq!(second.text, "Curfew sirens at midnight.");
    assert_eq!(feed.messages().len(), 2);
}

#[tokio::test]
async fn stalled_feed_does_not_hold_up_ticks() {
    struct Never;

    #[async_trait]
    impl TextCollaborator for Never {
        async fn transmission(&self) -> Result<String, FeedError> {
            std::future::pending().await
        }
    }

    let feed = AmbientFeed::new(
        Arc::new(Never),
        FeedSettings {
            period: Duration::from_millis(5),
            timeout: Duration::from_secs(30),
            capacity: 4,
        },
    );
    let feed_task = tokio::spawn(feed.clone().run());

    let mut session = Session::new(WorldSnapshot::default(), VehicleTuning::default(), NpcTuning::default());
    for _ in 0..240 {
        session.tick(1.0 / 60.0, &ControlIntent::forward());
        tokio::task::yield_now().await;
    }

    assert_eq!(session.stats().ticks, 240);
    assert!(feed.messages().is_empty());
    feed_task.abort();
}
