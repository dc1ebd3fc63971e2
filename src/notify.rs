use crate::clock::format_hhmm;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::info;

pub const REMINDER_TITLE: &str = "💧 Time to drink water!";
pub const REMINDER_BODY: &str = "Log your next glass. Stay hydrated!";
pub const REMINDER_ICON: &str = "icons/icon-192.png";

const FEED_CAPACITY: usize = 50;

/// What the browser reported when asked for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn from_browser(value: &str) -> Self {
        match value.trim() {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }
}

/// How the page should surface a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Notification,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub fired_at: String,
    pub display: Display,
}

/// Recently fired reminders, waiting for the page to pick them up.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    permission: Permission,
    feed: VecDeque<Notification>,
    last_id: u64,
}

impl NotificationCenter {
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission,
            ..Self::default()
        }
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    pub fn fire_reminder(&mut self, fired_at: NaiveDateTime) -> &Notification {
        let display = match self.permission {
            Permission::Granted => Display::Notification,
            Permission::Default | Permission::Denied => Display::Alert,
        };
        self.last_id += 1;
        let notification = Notification {
            id: self.last_id,
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            icon: REMINDER_ICON.to_string(),
            fired_at: format_hhmm(Some(fired_at)),
            display,
        };
        info!(id = notification.id, kind = ?notification.display, "reminder fired at {}", notification.fired_at);

        if self.feed.len() == FEED_CAPACITY {
            self.feed.pop_front();
        }
        self.feed.push_back(notification);
        &self.feed[self.feed.len() - 1]
    }

    pub fn since(&self, after: u64) -> Vec<Notification> {
        self.feed
            .iter()
            .filter(|notification| notification.id > after)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::at;

    #[test]
    fn display_follows_permission() {
        let mut center = NotificationCenter::default();
        let now = at((2026, 2, 3), 14, 5);
        assert_eq!(center.fire_reminder(now).display, Display::Alert);

        center.set_permission(Permission::from_browser("granted"));
        let shown = center.fire_reminder(now);
        assert_eq!(shown.display, Display::Notification);
        assert_eq!(shown.title, REMINDER_TITLE);
        assert_eq!(shown.fired_at, "14:05");

        center.set_permission(Permission::from_browser("denied"));
        assert_eq!(center.fire_reminder(now).display, Display::Alert);
    }

    #[test]
    fn stored_permission_seeds_the_center() {
        let now = at((2026, 2, 3), 8, 30);
        let mut center = NotificationCenter::with_permission(Permission::from_browser("granted"));
        assert_eq!(center.fire_reminder(now).display, Display::Notification);

        for value in ["default", "granted", "denied"] {
            assert_eq!(Permission::from_browser(value).as_str(), value);
        }
        assert_eq!(Permission::from_browser("bogus"), Permission::Default);
    }

    #[test]
    fn feed_is_bounded_and_read_by_cursor() {
        let mut center = NotificationCenter::default();
        let now = at((2026, 2, 3), 9, 0);
        for _ in 0..(FEED_CAPACITY + 5) {
            center.fire_reminder(now);
        }

        let all = center.since(0);
        assert_eq!(all.len(), FEED_CAPACITY);
        assert_eq!(all[0].id, 6);

        let newest = center.since(53);
        assert_eq!(newest.iter().map(|n| n.id).collect::<Vec<_>>(), vec![54, 55]);
    }
}
