//! Named, validated, observable value cells
//!
//! A [`Channel`] stores one value of a copyable type. Every write passes
//! through the optional validator first, commits the (possibly adjusted)
//! value, and only then notifies observers in registration order. Observers
//! therefore always see a value that already satisfies the channel's
//! validator, and the stored value is always post-validation.
//!
//! Writes that do not change the value still notify. Downstream stages rely
//! on this to re-emit actuator commands on repeated identical input.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Handle returned by [`Channel::subscribe`], used to remove the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Validator<T> = Box<dyn Fn(T) -> T + Send + Sync>;
type Observer<T> = Arc<dyn Fn(T, T) + Send + Sync>;

/// A named, observable value cell with an optional validation rule.
///
/// Channels are shared via `Arc` and written from the ingestion thread only;
/// any thread may read the latest committed value with [`Channel::get`].
pub struct Channel<T> {
    name: String,
    value: Mutex<T>,
    validator: Option<Validator<T>>,
    observers: RwLock<Vec<(SubscriptionId, Observer<T>)>>,
    next_id: AtomicU64,
}

impl<T: Copy + Send + 'static> Channel<T> {
    /// Creates a channel with no validation rule.
    pub fn new(name: impl Into<String>, initial: T) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            value: Mutex::new(initial),
            validator: None,
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Creates a channel whose writes are first passed through `validator`.
    ///
    /// The initial value is validated too, so the stored value satisfies the
    /// rule from the start.
    pub fn with_validator(
        name: impl Into<String>,
        initial: T,
        validator: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            value: Mutex::new(validator(initial)),
            validator: Some(Box::new(validator)),
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest committed (post-validation) value.
    pub fn get(&self) -> T {
        *self.value.lock()
    }

    /// Validates, commits, then notifies observers in registration order.
    ///
    /// Notification happens outside the value lock, so an observer may write
    /// this or any other channel; nested writes run their own fan-out to
    /// completion before the outer call returns.
    pub fn write(&self, new: T) {
        let committed = match &self.validator {
            Some(validate) => validate(new),
            None => new,
        };
        let old = {
            let mut value = self.value.lock();
            std::mem::replace(&mut *value, committed)
        };
        trace!("channel '{}' committed new value", self.name);

        // Snapshot so observers registered or removed during fan-out do not
        // shift this notification pass.
        let observers: Vec<Observer<T>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(old, committed);
        }
    }

    /// Registers an observer called as `(old, new)` after every commit.
    pub fn subscribe(&self, observer: impl Fn(T, T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, Arc::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

/// Clamp to the normalized command range [-1, 1].
///
/// Total over the real line; used as the validator on every command channel.
pub fn clamp_symmetric(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn clamp_symmetric_bounds_and_identity() {
        assert_eq!(clamp_symmetric(2.5), 1.0);
        assert_eq!(clamp_symmetric(-7.0), -1.0);
        assert_eq!(clamp_symmetric(0.4), 0.4);
        assert_eq!(clamp_symmetric(-1.0), -1.0);
        assert_eq!(clamp_symmetric(1.0), 1.0);
    }

    #[test]
    fn write_stores_post_validation_value() {
        let ch = Channel::with_validator("steering", 0.0, clamp_symmetric);
        ch.write(3.0);
        assert_eq!(ch.get(), 1.0);
        ch.write(-0.25);
        assert_eq!(ch.get(), -0.25);
    }

    #[test]
    fn observers_run_in_registration_order_after_commit() {
        let ch = Channel::new("x", 0i32);
        let seen: Arc<Mutex<Vec<(&'static str, i32)>>> = Arc::new(Mutex::new(Vec::new()));

        let ch_ref = Arc::clone(&ch);
        let log = Arc::clone(&seen);
        // Reading the channel from inside the observer must show the value
        // already committed.
        ch.subscribe(move |_, _| log.lock().push(("first", ch_ref.get())));
        let log = Arc::clone(&seen);
        ch.subscribe(move |_, new| log.lock().push(("second", new)));

        ch.write(7);
        let seen = seen.lock();
        assert_eq!(*seen, vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn idempotent_writes_still_notify() {
        let ch = Channel::new("y", 0.5f32);
        let fired = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&fired);
        ch.subscribe(move |_, _| *counter.lock() += 1);

        ch.write(0.5);
        ch.write(0.5);
        assert_eq!(*fired.lock(), 2);
    }

    #[test]
    fn observer_may_write_another_channel_reentrantly() {
        let upstream = Channel::new("y", 0.0f32);
        let derived = Channel::new("throttle", 0.0f32);

        let dest = Arc::clone(&derived);
        upstream.subscribe(move |_, new| dest.write(-new));

        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&order);
        derived.subscribe(move |_, _| log.lock().push("derived"));
        let log = Arc::clone(&order);
        upstream.subscribe(move |_, _| log.lock().push("upstream-late"));

        upstream.write(0.4);
        assert_eq!(derived.get(), -0.4);
        // Nested fan-out completed before the later upstream observer ran.
        assert_eq!(*order.lock(), vec!["derived", "upstream-late"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let ch = Channel::new("z", 0i32);
        let fired = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&fired);
        let id = ch.subscribe(move |_, _| *counter.lock() += 1);

        ch.write(1);
        assert!(ch.unsubscribe(id));
        ch.write(2);
        assert_eq!(*fired.lock(), 1);
        assert!(!ch.unsubscribe(id));
    }

    #[test]
    fn observers_receive_old_and_new() {
        let ch = Channel::with_validator("steering", 0.0, clamp_symmetric);
        let pairs: Arc<Mutex<Vec<(f32, f32)>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&pairs);
        ch.subscribe(move |old, new| log.lock().push((old, new)));

        ch.write(0.9);
        ch.write(5.0);
        assert_eq!(*pairs.lock(), vec![(0.0, 0.9), (0.9, 1.0)]);
    }
}
