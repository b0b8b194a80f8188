//! Single-threaded timer queue with cancellable handles

use super::{SharedClock, Timestamp};

/// Identifies one scheduled timer; never reused within a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due
#[derive(Debug, Clone)]
pub struct Fired<E> {
    pub handle: TimerHandle,
    /// When the timer was due (may be earlier than `now` if polled late)
    pub due: Timestamp,
    pub event: E,
}

#[derive(Debug)]
struct PendingTimer<E> {
    handle: TimerHandle,
    due: Timestamp,
    period_ms: Option<u64>,
    event: E,
}

/// Cooperative scheduler for delayed and periodic events
///
/// Nothing runs on its own: the owner calls [`Scheduler::pop_due`] and
/// feeds each event into its own transition function. A cancelled timer is
/// removed immediately and can never be returned afterwards.
pub struct Scheduler<E> {
    clock: SharedClock,
    pending: Vec<PendingTimer<E>>,
    next_id: u64,
}

impl<E: Clone> Scheduler<E> {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Current time of the underlying clock
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        self.push(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first firing one period from now
    pub fn every(&mut self, period_ms: u64, event: E) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.push(period_ms, Some(period_ms), event)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            due: self.clock.now().plus(delay_ms),
            period_ms,
            event,
        });
        handle
    }

    /// Cancel a timer. Returns `true` if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending timer(s)", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending timers
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.iter().map(|t| t.due).min()
    }

    /// Take the earliest timer that is due at the current time
    ///
    /// Ties are broken by scheduling order. Periodic timers are re-armed one
    /// period after their previous deadline before being returned, so
    /// cancelling the handle while handling the event stops the series.
    pub fn pop_due(&mut self) -> Option<Fired<E>> {
        let now = self.clock.now();
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)?;

        match self.pending[index].period_ms {
            Some(period) => {
                let timer = &mut self.pending[index];
                let fired = Fired {
                    handle: timer.handle,
                    due: timer.due,
                    event: timer.event.clone(),
                };
                timer.due = timer.due.plus(period);
                Some(fired)
            }
            None => {
                let timer = self.pending.swap_remove(index);
                Some(Fired {
                    handle: timer.handle,
                    due: timer.due,
                    event: timer.event,
                })
            }
        }
    }
}
