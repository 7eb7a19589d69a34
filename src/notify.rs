use chrono::{DateTime, Duration, Utc};

use crate::model::Achievement;

pub const DEFAULT_NOTIFICATION_SECS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub achievement: Achievement,
    pub raised_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Holds at most one unlock notification. Display state only: clearing it
/// never touches the persisted achievements.
pub struct NotificationCenter {
    ttl: Duration,
    current: Option<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Shows `achievement`, replacing whatever was showing and restarting the
    /// dismiss timer. A deadline past the end of the calendar never expires.
    pub fn raise(&mut self, achievement: Achievement, now: DateTime<Utc>) -> &Notification {
        if let Some(replaced) = &self.current {
            tracing::debug!(
                replaced = replaced.achievement.id,
                achievement = achievement.id,
                "replacing notification"
            );
        }
        self.current.insert(Notification {
            achievement,
            raised_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&Notification> {
        if self
            .current
            .as_ref()
            .is_some_and(|notification| now >= notification.expires_at)
        {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_NOTIFICATION_SECS as i64))
    }
}
