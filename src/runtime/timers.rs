use std::time::Instant;

use crate::domain::TabId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Delayed contact check after a click, once the page has re-rendered.
    ContactCheck(TabId),
    /// Initial (or re-sync) language query with the remaining retry budget.
    InitLanguage { tab: TabId, retries_left: u32 },
}

/// Deadline-ordered timers; equal deadlines fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<(Instant, u64, Timer)>,
    seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, at: Instant, timer: Timer) {
        self.seq += 1;
        self.entries.push((at, self.seq, timer));
    }

    pub fn pop_due(&mut self, now: Instant) -> Vec<Timer> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|(at, _, _)| *at <= now);
        self.entries = waiting;
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, timer)| timer).collect()
    }

    /// Drops every timer belonging to `tab`.
    pub fn cancel_tab(&mut self, tab: TabId) {
        self.entries.retain(|(_, _, timer)| match timer {
            Timer::ContactCheck(t) | Timer::InitLanguage { tab: t, .. } => *t != tab,
        });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(at, _, _)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
