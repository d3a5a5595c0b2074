//! Listener registry for contract notifications and view-state changes.
//!
//! Single-threaded (`Rc`/`RefCell`): everything runs on the browser event loop.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub type Listener<T> = Box<dyn FnMut(&T)>;

type SharedListener<T> = Rc<RefCell<Listener<T>>>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, SharedListener<T>)>,
}

pub struct EventRegistry<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for EventRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventRegistry<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> EventRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .push((id, Rc::new(RefCell::new(listener))));
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().listeners.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Calls every registered listener, in registration order. Returns how many ran.
    pub fn emit(&self, event: &T) -> usize {
        let snapshot: Vec<(u64, SharedListener<T>)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut called = 0;
        for (id, listener) in snapshot {
            // a listener may have been removed by an earlier one in this pass
            if !self.is_registered(id) {
                continue;
            }
            // re-entrant emit from inside the same listener is skipped
            if let Ok(mut callback) = listener.try_borrow_mut() {
                callback(event);
                called += 1;
            }
        }
        called
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }

    fn is_registered(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|(entry, _)| *entry == id)
    }
}

/// Registration guard. Dropping it (or calling [`Subscription::off`]) removes the listener.
#[must_use = "dropping a Subscription deregisters its listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn off(mut self) {
        self.release();
    }

    /// Keeps the listener registered for as long as its registry lives.
    pub fn forget(mut self) {
        self.unsubscribe = None;
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Listener<u32> {
        let log = Rc::clone(log);
        Box::new(move |value: &u32| log.borrow_mut().push(format!("{tag}:{value}")))
    }

    #[test]
    fn emits_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = EventRegistry::new();
        let _a = registry.on(recorder(&log, "a"));
        let _b = registry.on(recorder(&log, "b"));

        assert_eq!(registry.emit(&7), 2);
        assert_eq!(*log.borrow(), vec!["a:7", "b:7"]);
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = EventRegistry::new();
        let sub = registry.on(recorder(&log, "a"));
        registry.emit(&1);

        drop(sub);
        assert!(registry.is_empty());
        assert_eq!(registry.emit(&2), 0);
        assert_eq!(*log.borrow(), vec!["a:1"]);
    }

    #[test]
    fn off_is_explicit_drop() {
        let registry = EventRegistry::<u32>::new();
        let sub = registry.on(Box::new(|_: &u32| {}));
        assert_eq!(registry.listener_count(), 1);
        sub.off();
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn listener_removed_mid_emit_is_not_called() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = EventRegistry::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let killer = Rc::clone(&victim);
        let _first = registry.on(Box::new(move |_: &u32| {
            killer.borrow_mut().take();
        }));
        *victim.borrow_mut() = Some(registry.on(recorder(&log, "victim")));

        assert_eq!(registry.emit(&3), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn forgotten_subscription_stays_registered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = EventRegistry::new();
        registry.on(recorder(&log, "kept")).forget();

        assert_eq!(registry.emit(&5), 1);
        assert_eq!(*log.borrow(), vec!["kept:5"]);
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let registry = EventRegistry::<u32>::new();
        let sub = registry.on(Box::new(|_: &u32| {}));
        drop(registry);
        drop(sub);
    }
}
