use chrono::NaiveDateTime;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    MidnightReset,
    Reminder(usize),
    Countdown,
}

impl TimerKey {
    pub fn is_reminder(self) -> bool {
        matches!(self, Self::Reminder(_) | Self::Countdown)
    }
}

struct Armed {
    deadline: Option<NaiveDateTime>,
    handle: JoinHandle<()>,
}

/// Spawned tasks keyed by purpose. At most one task lives under each key:
/// arming a key aborts whatever was there before.
#[derive(Default)]
pub struct TimerRegistry {
    armed: Mutex<HashMap<TimerKey, Armed>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` once `delay` has elapsed. `deadline` is the wall-clock
    /// instant the delay was computed for.
    pub fn arm<F>(&self, key: TimerKey, delay: Duration, deadline: NaiveDateTime, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.insert(key, Some(deadline), handle);
    }

    /// Runs `task` immediately, for loops that manage their own sleeping.
    pub fn spawn<F>(&self, key: TimerKey, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.insert(key, None, handle);
    }

    pub fn cancel(&self, key: TimerKey) -> bool {
        match self.lock().remove(&key) {
            Some(armed) => {
                armed.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every reminder and countdown task. Returns how many were still
    /// pending.
    pub fn cancel_reminders(&self) -> usize {
        let mut armed = self.lock();
        let keys: Vec<TimerKey> = armed.keys().copied().filter(|key| key.is_reminder()).collect();
        let mut pending = 0;
        for key in keys {
            if let Some(entry) = armed.remove(&key) {
                if !entry.handle.is_finished() {
                    pending += 1;
                }
                entry.handle.abort();
            }
        }
        pending
    }

    pub fn pending_reminders(&self) -> usize {
        self.lock()
            .iter()
            .filter(|(key, armed)| key.is_reminder() && !armed.handle.is_finished())
            .count()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.lock()
            .get(&key)
            .is_some_and(|armed| !armed.handle.is_finished())
    }

    /// Earliest reminder deadline still ahead of `now`.
    pub fn next_deadline(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.lock()
            .iter()
            .filter(|(key, armed)| key.is_reminder() && !armed.handle.is_finished())
            .filter_map(|(_, armed)| armed.deadline)
            .filter(|deadline| *deadline > now)
            .min()
    }

    fn insert(&self, key: TimerKey, deadline: Option<NaiveDateTime>, handle: JoinHandle<()>) {
        let previous = self.lock().insert(key, Armed { deadline, handle });
        if let Some(previous) = previous {
            debug!(?key, "replacing armed timer");
            previous.handle.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TimerKey, Armed>> {
        self.armed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
