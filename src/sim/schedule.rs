//! Deferred one-shot actions
//!
//! Announcements and the boss arrival are scheduled as data, not closures. Each
//! entry remembers the session generation it was scheduled under; the session
//! ignores any action whose generation is no longer current, so a cancelled or
//! torn-down phase can never be mutated by a late callback.

use serde::{Deserialize, Serialize};

/// Narrative lines shown by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Announcement {
    /// Tutorial hint number (0-based)
    TutorialHint(u8),
    TutorialComplete,
    WaveIncoming(usize),
    Frenzy,
    BossIncoming,
    BossEnraged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    Announce(Announcement),
    BeginBossFight,
}

/// Handle returned by [`Scheduler::schedule`], used to cancel the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelHandle(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    handle: CancelHandle,
    remaining_ms: u32,
    generation: u32,
    action: ScheduledAction,
}

/// An action whose delay ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueAction {
    pub generation: u32,
    pub action: ScheduledAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn schedule(&mut self, delay_ms: u32, generation: u32, action: ScheduledAction) -> CancelHandle {
        let handle = CancelHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            remaining_ms: delay_ms,
            generation,
            action,
        });
        handle
    }

    /// Returns false if the entry already fired or was cancelled
    pub fn cancel(&mut self, handle: CancelHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cancelling {} scheduled actions", self.entries.len());
        }
        self.entries.clear();
    }

    /// Count down every entry and return the ones that came due, in scheduling order
    pub fn advance(&mut self, delta_ms: u32) -> Vec<DueAction> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining_ms = entry.remaining_ms.saturating_sub(delta_ms);
            if entry.remaining_ms == 0 {
                due.push(DueAction {
                    generation: entry.generation,
                    action: entry.action,
                });
                false
            } else {
                true
            }
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut s = Scheduler::new();
        s.schedule(100, 0, ScheduledAction::BeginBossFight);
        assert!(s.advance(99).is_empty());
        let due = s.advance(1);
        assert_eq!(
            due,
            vec![DueAction {
                generation: 0,
                action: ScheduledAction::BeginBossFight
            }]
        );
        assert!(s.advance(1000).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut s = Scheduler::new();
        s.schedule(0, 3, ScheduledAction::Announce(Announcement::BossIncoming));
        let due = s.advance(16);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].generation, 3);
    }

    #[test]
    fn test_due_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule(50, 1, ScheduledAction::Announce(Announcement::TutorialHint(1)));
        s.schedule(10, 1, ScheduledAction::Announce(Announcement::TutorialHint(0)));
        let due: Vec<_> = s.advance(60).into_iter().map(|d| d.action).collect();
        assert_eq!(
            due,
            vec![
                ScheduledAction::Announce(Announcement::TutorialHint(1)),
                ScheduledAction::Announce(Announcement::TutorialHint(0)),
            ]
        );
    }

    #[test]
    fn test_cancel_handle() {
        let mut s = Scheduler::new();
        let a = s.schedule(10, 0, ScheduledAction::BeginBossFight);
        let b = s.schedule(10, 0, ScheduledAction::Announce(Announcement::BossIncoming));
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        let due = s.advance(10);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].action, ScheduledAction::Announce(Announcement::BossIncoming));
        assert!(!s.cancel(b));
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        for i in 0..5 {
            s.schedule(i * 10, 0, ScheduledAction::BeginBossFight);
        }
        s.cancel_all();
        assert!(s.advance(1000).is_empty());
    }
}
