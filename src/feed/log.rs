//! Bounded transmission log

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// One displayed transmission
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMessage {
    pub sender: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl FeedMessage {
    /// `[HH:MM:SS] SENDER: text`
    pub fn display(&self) -> String {
        format!("[{}] {}: {}", self.received_at.format("%H:%M:%S"), self.sender, self.text)
    }
}

/// Keeps the most recent `capacity` messages, oldest first
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<FeedMessage>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: FeedMessage) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&FeedMessage> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedMessage> {
        self.entries.iter()
    }
}
