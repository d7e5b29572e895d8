//! Scheduler - Cooperative interval timers
//!
//! Recurring timers for cursor blink and similar periodic work. The whole
//! widget system is single-threaded and cooperative, so timers do not run on
//! their own threads: the host pumps [`Scheduler::advance`] from its frame
//! loop (or a test pumps it directly), and due callbacks fire there, each
//! running to completion before the next.
//!
//! # Pattern
//!
//! - A widget starts a timer when it needs one (blink starts on focus gain)
//! - The widget cancels it on the matching teardown (blur, destroy)
//! - Cancelled timers never fire again, even if already due
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Duration;
//! use canvas_widgets::schedule::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let id = scheduler.set_interval(Duration::from_millis(500), Rc::new(|| {
//!     println!("tick");
//! }));
//!
//! scheduler.advance(Duration::from_secs(2)); // fires 4 times
//! scheduler.cancel(id);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

// =============================================================================
// TYPES
// =============================================================================

/// Handle identifying a scheduled interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

struct Entry {
    id: u64,
    period: Duration,
    deadline: Duration,
    callback: Rc<dyn Fn()>,
}

struct Inner {
    now: Duration,
    timers: Vec<Entry>,
    next_id: u64,
}

// =============================================================================
// SCHEDULER
// =============================================================================

/// Cloneable handle to a shared timer table.
///
/// Clones share the same clock and timers, so a widget can hold one clone
/// while the host pumps another.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<Inner>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                now: Duration::ZERO,
                timers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a recurring callback firing every `period`.
    ///
    /// A zero period would fire unboundedly inside one `advance`; it is
    /// registered but never fires (same guard as a 0 FPS blink).
    pub fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now + period;
        inner.timers.push(Entry { id, period, deadline, callback });
        TimerId(id)
    }

    /// Cancel a timer. Safe to call with an already-cancelled id.
    pub fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|t| t.id != id.0);
    }

    /// Whether a timer is still registered.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.iter().any(|t| t.id == id.0)
    }

    /// Number of registered timers.
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Current virtual clock reading.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Move the clock forward by `dt`, firing every due callback in deadline
    /// order. Each firing is atomic; a callback may cancel or register
    /// timers, and cancellation takes effect immediately.
    pub fn advance(&self, dt: Duration) {
        let target = self.inner.borrow().now + dt;

        loop {
            // Pick the earliest due timer without holding the borrow across
            // the callback.
            let due = {
                let mut guard = self.inner.borrow_mut();
                let inner = &mut *guard;
                let next = inner
                    .timers
                    .iter_mut()
                    .filter(|t| t.period > Duration::ZERO && t.deadline <= target)
                    .min_by_key(|t| t.deadline);
                match next {
                    Some(entry) => {
                        let fire_at = entry.deadline;
                        entry.deadline += entry.period;
                        inner.now = fire_at;
                        Some(Rc::clone(&entry.callback))
                    }
                    None => None,
                }
            };

            match due {
                Some(callback) => callback(),
                None => break,
            }
        }

        self.inner.borrow_mut().now = target;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Rc<dyn Fn()>) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, Rc::new(move || count_clone.set(count_clone.get() + 1)))
    }

    #[test]
    fn test_interval_fires_once_per_period() {
        let scheduler = Scheduler::new();
        let (count, callback) = counter();
        scheduler.set_interval(Duration::from_millis(500), callback);

        scheduler.advance(Duration::from_millis(499));
        assert_eq!(count.get(), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);

        // Crossing several periods in one advance fires once per period
        scheduler.advance(Duration::from_millis(1500));
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let scheduler = Scheduler::new();
        let (count, callback) = counter();
        let id = scheduler.set_interval(Duration::from_millis(100), callback);

        scheduler.cancel(id);
        assert!(!scheduler.is_active(id));

        scheduler.advance(Duration::from_secs(10));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_cancel_after_firing() {
        let scheduler = Scheduler::new();
        let (count, callback) = counter();
        let id = scheduler.set_interval(Duration::from_millis(100), callback);

        scheduler.advance(Duration::from_millis(250));
        assert_eq!(count.get(), 2);

        scheduler.cancel(id);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_two_intervals_fire_independently() {
        let scheduler = Scheduler::new();
        let (fast_count, fast) = counter();
        let (slow_count, slow) = counter();
        scheduler.set_interval(Duration::from_millis(100), fast);
        scheduler.set_interval(Duration::from_millis(300), slow);

        scheduler.advance(Duration::from_millis(600));
        assert_eq!(fast_count.get(), 6);
        assert_eq!(slow_count.get(), 2);
    }

    #[test]
    fn test_callback_sees_fire_time() {
        let scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let scheduler_clone = scheduler.clone();
        scheduler.set_interval(
            Duration::from_millis(200),
            Rc::new(move || seen_clone.borrow_mut().push(scheduler_clone.now())),
        );

        scheduler.advance(Duration::from_millis(500));
        assert_eq!(
            *seen.borrow(),
            vec![Duration::from_millis(200), Duration::from_millis(400)]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(500));
    }

    #[test]
    fn test_callback_can_cancel_itself() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

        let count_clone = count.clone();
        let slot_clone = slot.clone();
        let scheduler_clone = scheduler.clone();
        let id = scheduler.set_interval(
            Duration::from_millis(100),
            Rc::new(move || {
                count_clone.set(count_clone.get() + 1);
                if let Some(id) = slot_clone.get() {
                    scheduler_clone.cancel(id);
                }
            }),
        );
        slot.set(Some(id));

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_zero_period_is_inert() {
        let scheduler = Scheduler::new();
        let (count, callback) = counter();
        scheduler.set_interval(Duration::ZERO, callback);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.get(), 0);
    }
}
