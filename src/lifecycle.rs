//! Tracking and disposal of constructed instances.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ioc_core::value::Instance;

/// Tracks every instance constructed by a container.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    tracked: Mutex<Tracked>,
}

#[derive(Debug, Default)]
struct Tracked {
    instances: Vec<Instance>,
    addrs: HashSet<usize>,
}

impl Lifecycle {
    fn tracked(&self) -> MutexGuard<'_, Tracked> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a constructed instance. An instance that is already tracked is not recorded again.
    pub(crate) fn track(&self, instance: &Instance) {
        let mut tracked = self.tracked();
        if !tracked.addrs.insert(instance.addr()) {
            return;
        }

        trace!("type" = instance.type_name(), "track");
        tracked.instances.push(instance.clone());
    }

    /// Returns how many instances are currently tracked.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tracked().instances.len()
    }

    /// Disposes every tracked instance that offers a disposal hook, in tracking order, and stops
    /// tracking all of them. Returns the number of disposed instances.
    pub(crate) fn dispose_all(&self) -> usize {
        // Hooks run without holding the lock.
        let Tracked { instances, .. } = std::mem::take(&mut *self.tracked());

        let mut disposed = 0;
        for instance in &instances {
            if let Some(hook) = instance.as_dispose() {
                hook.dispose();
                disposed += 1;
            }
        }

        debug!(tracked = instances.len(), disposed, "dispose all");
        disposed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ioc_core::value::{Component, Dispose};

    use super::*;

    #[derive(Debug, Default)]
    struct Connection {
        closed: AtomicUsize,
    }

    impl Component for Connection {
        fn as_dispose(&self) -> Option<&dyn Dispose> {
            Some(self)
        }
    }

    impl Dispose for Connection {
        fn dispose(&self) {
            self.closed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[derive(Debug)]
    struct Plain;

    impl Component for Plain {}

    #[test]
    fn test_dispose_once() {
        let lifecycle = Lifecycle::default();
        let connection = Instance::new(Connection::default());
        lifecycle.track(&connection);
        lifecycle.track(&connection.clone());
        lifecycle.track(&Instance::new(Plain));
        assert_eq!(lifecycle.len(), 2);

        assert_eq!(lifecycle.dispose_all(), 1);
        assert_eq!(lifecycle.len(), 0);
        assert_eq!(lifecycle.dispose_all(), 0);

        let closed = &connection.downcast_ref::<Connection>().unwrap().closed;
        assert_eq!(closed.load(Ordering::Relaxed), 1);

        lifecycle.track(&connection);
        assert_eq!(lifecycle.dispose_all(), 1);
        assert_eq!(closed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_track_many() {
        let lifecycle = Lifecycle::default();
        let instances: Vec<_> = (0..1000).map(|_| Instance::new(Connection::default())).collect();
        for instance in instances.iter().chain(&instances) {
            lifecycle.track(instance);
        }
        assert_eq!(lifecycle.len(), 1000);
        assert_eq!(lifecycle.dispose_all(), 1000);
    }
}
