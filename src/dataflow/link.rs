//! Live one-directional bindings between channels

use crate::dataflow::channel::{Channel, SubscriptionId};
use std::sync::Arc;
use tracing::debug;

/// A continuously-active binding from one channel to another.
///
/// Binding registers an observer on the source whose body is a write to the
/// destination; every source write produces exactly one destination write.
/// The destination's own validator is the only stage that may adjust the
/// transported value further. The source does not fire at bind time, so the
/// destination keeps its value until the source next changes.
///
/// Binding the same (source, dest) pair twice doubles propagation; callers
/// wire each pair once.
pub struct Link<T> {
    source: Arc<Channel<T>>,
    subscription: SubscriptionId,
}

impl<T: Copy + Send + Sync + 'static> Link<T> {
    /// Binds `source` to `dest` with identity transport.
    pub fn bind(source: &Arc<Channel<T>>, dest: &Arc<Channel<T>>) -> Self {
        Self::bind_with(source, dest, |value| value)
    }

    /// Binds `source` to `dest` through `transform`.
    pub fn bind_with(
        source: &Arc<Channel<T>>,
        dest: &Arc<Channel<T>>,
        transform: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> Self {
        debug!("linking '{}' -> '{}'", source.name(), dest.name());
        let target = Arc::clone(dest);
        let subscription = source.subscribe(move |_, new| target.write(transform(new)));
        Self {
            source: Arc::clone(source),
            subscription,
        }
    }

    /// Tears the binding down; subsequent source writes no longer propagate.
    pub fn unbind(self) {
        debug!("unlinking observer on '{}'", self.source.name());
        self.source.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::channel::clamp_symmetric;

    #[test]
    fn source_writes_reach_destination() {
        let pad = Channel::new("pad.steering", 0.0f32);
        let car = Channel::with_validator("car.steering", 0.0, clamp_symmetric);
        let _link = Link::bind(&pad, &car);

        pad.write(0.9);
        assert_eq!(car.get(), 0.9);
    }

    #[test]
    fn destination_validator_clamps_transported_value() {
        let pad = Channel::new("pad.steering", 0.0f32);
        let car = Channel::with_validator("car.steering", 0.0, clamp_symmetric);
        let _link = Link::bind(&pad, &car);

        pad.write(4.2);
        assert_eq!(pad.get(), 4.2);
        assert_eq!(car.get(), 1.0);
    }

    #[test]
    fn no_sync_at_bind_time() {
        let pad = Channel::new("pad.throttle", 0.7f32);
        let car = Channel::new("car.throttle", 0.0f32);
        let _link = Link::bind(&pad, &car);

        assert_eq!(car.get(), 0.0);
    }

    #[test]
    fn unbind_stops_propagation() {
        let pad = Channel::new("pad.throttle", 0.0f32);
        let car = Channel::new("car.throttle", 0.0f32);
        let link = Link::bind(&pad, &car);

        pad.write(0.3);
        assert_eq!(car.get(), 0.3);

        link.unbind();
        pad.write(0.8);
        assert_eq!(car.get(), 0.3);
    }

    #[test]
    fn transform_applies_before_destination_write() {
        let y = Channel::new("y", 0.0f32);
        let throttle = Channel::new("throttle", 0.0f32);
        let _link = Link::bind_with(&y, &throttle, |v| -v);

        y.write(0.4);
        assert_eq!(throttle.get(), -0.4);
    }
}
