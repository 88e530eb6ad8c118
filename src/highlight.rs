use std::collections::HashSet;
use std::time::{Duration, Instant};

pub const HIGHLIGHT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Node ids flagged as new by the latest merge. The set only shrinks to empty
/// on expiry or reset; it is never widened after it was flagged.
#[derive(Debug, Default)]
pub struct HighlightSet {
    ids: HashSet<String>,
    expires_at: Option<Instant>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag<I>(&mut self, ids: I, now: Instant)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids = ids.into_iter().collect();
        self.expires_at = if self.ids.is_empty() {
            None
        } else {
            Some(now + HIGHLIGHT_TIMEOUT)
        };
    }

    /// Clears the set once its deadline has passed. Returns true when it did.
    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.expires_at = None;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
