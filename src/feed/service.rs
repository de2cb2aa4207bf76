//! Timer-driven ambient transmission feed

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, warn};

use super::client::{FeedError, TextCollaborator};
use super::log::{FeedMessage, MessageLog};

/// In-universe lines shown when the collaborator fails
pub const FALLBACK_TRANSMISSIONS: &[&str] = &[
    "Signal lost. Stay off the main grid.",
    "Static on all channels. Keep moving.",
    "Patrol drones rerouted. Sector unverified.",
    "Relay tower down. Switching to backup band.",
    "...no response from central. Repeat, no response.",
];

/// Sender tags attached to each transmission
pub const CALLSIGNS: &[&str] = &["DISPATCH", "GRID-7", "NIGHTWATCH", "UNKNOWN", "RELAY-3"];

/// Feed timing
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    /// Time between requests
    pub period: Duration,
    /// Per-request deadline
    pub timeout: Duration,
    /// Messages retained
    pub capacity: usize,
}

/// Requests one transmission per period and appends it to a shared log.
/// Requests run as independent tasks and never touch simulation state.
#[derive(Clone)]
pub struct AmbientFeed {
    collaborator: Arc<dyn TextCollaborator>,
    log: Arc<Mutex<MessageLog>>,
    settings: FeedSettings,
}

impl AmbientFeed {
    pub fn new(collaborator: Arc<dyn TextCollaborator>, settings: FeedSettings) -> Self {
        Self {
            collaborator,
            log: Arc::new(Mutex::new(MessageLog::new(settings.capacity))),
            settings,
        }
    }

    /// Snapshot of the log, oldest first
    pub fn messages(&self) -> Vec<FeedMessage> {
        self.log.lock().iter().cloned().collect()
    }

    /// Fetch one transmission, falling back on any failure, and append it
    pub async fn poll_once(&self) -> FeedMessage {
        let text = match self.request().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Ambient transmission failed, using fallback");
                fallback_transmission()
            }
        };

        let message = FeedMessage {
            sender: random_callsign(),
            text,
            received_at: Utc::now(),
        };
        debug!(sender = %message.sender, text = %message.text, "Transmission received");

        self.log.lock().push(message.clone());
        message
    }

    async fn request(&self) -> Result<String, FeedError> {
        timeout(self.settings.timeout, self.collaborator.transmission())
            .await
            .map_err(|_| FeedError::Timeout)?
    }

    /// Spawn a request every period until the task is dropped
    pub async fn run(self) {
        let mut ticker = interval(self.settings.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let feed = self.clone();
            tokio::spawn(async move {
                feed.poll_once().await;
            });
        }
    }
}

fn fallback_transmission() -> String {
    let mut rng = rand::thread_rng();
    FALLBACK_TRANSMISSIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or("Signal lost.")
        .to_string()
}

fn random_callsign() -> String {
    let mut rng = rand::thread_rng();
    CALLSIGNS.choose(&mut rng).copied().unwrap_or("UNKNOWN").to_string()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::feed::client::OfflineCollaborator;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextCollaborator for Fixed {
        async fn transmission(&self) -> Result<String, FeedError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextCollaborator for Stalled {
        async fn transmission(&self) -> Result<String, FeedError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn settings(capacity: usize) -> FeedSettings {
        FeedSettings {
            period: Duration::from_millis(10),
            timeout: Duration::from_millis(20),
            capacity,
        }
    }

    #[tokio::test]
    async fn success_is_logged_with_callsign() {
        let feed = AmbientFeed::new(Arc::new(Fixed("Checkpoint closed.")), settings(4));
        let message = feed.poll_once().await;
        assert_eq!(message.text, "Checkpoint closed.");
        assert!(CALLSIGNS.contains(&message.sender.as_str()));
        assert_eq!(feed.messages(), vec![message]);
    }

    #[tokio::test]
    async fn failure_uses_fallback() {
        let feed = AmbientFeed::new(Arc::new(OfflineCollaborator), settings(4));
        let message = feed.poll_once().await;
        assert!(FALLBACK_TRANSMISSIONS.contains(&message.text.as_str()));
    }

    #[tokio::test]
    async fn slow_collaborator_times_out_to_fallback() {
        let feed = AmbientFeed::new(Arc::new(Stalled), settings(4));
        let message = feed.poll_once().await;
        assert!(FALLBACK_TRANSMISSIONS.contains(&message.text.as_str()));
    }

    #[tokio::test]
    async fn log_is_bounded() {
        let feed = AmbientFeed::new(Arc::new(Fixed("x")), settings(2));
        for _ in 0..5 {
            feed.poll_once().await;
        }
        assert_eq!(feed.messages().len(), 2);
    }

    #[tokio::test]
    async fn run_appends_on_its_own_timer() {
        let feed = AmbientFeed::new(Arc::new(Fixed("tick")), settings(8));
        let task = tokio::spawn(feed.clone().run());
        tokio::time::sleep(Duration::from_millis(60)).await;
        task.abort();
        assert!(!feed.messages().is_empty());
    }
}
