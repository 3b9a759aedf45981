//! Generic single-threaded event delegate.
//!
//! All dispatch is synchronous and runs on the caller's thread; handlers run
//! to completion before the next event is processed. Handlers may subscribe
//! or unsubscribe (themselves or others) while an event is being dispatched.

use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Opaque owner token for bulk unsubscription.
///
/// Components that register several handlers pass the same owner so that
/// teardown is a single [`Delegate::unsubscribe_all`] call, without tracking
/// individual subscription handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Create a new unique owner token.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Owner({})", &self.0.to_string()[..8])
    }
}

/// Subscription handle for unsubscribing a single handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type Handler<T> = Rc<dyn Fn(&T)>;

struct Listener<T> {
    id: SubscriptionId,
    owner: Option<OwnerId>,
    single_shot: bool,
    handler: Handler<T>,
}

/// A list of subscribers that can be fired as one event stream.
///
/// Delivery is in subscription order. [`Delegate::fire`] dispatches to a
/// snapshot of the current subscribers, so a handler that unsubscribes
/// itself or others mid-dispatch neither corrupts iteration nor causes
/// re-entrant double delivery. Single-shot handlers are removed before the
/// snapshot is dispatched and therefore fire exactly once even if they
/// resubscribe themselves from inside their own callback.
pub struct Delegate<T> {
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T> Delegate<T> {
    /// Create a delegate with no subscribers.
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler with no owner token.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.subscribe_with(handler, None, false)
    }

    /// Subscribe a handler, optionally tied to an owner and/or single-shot.
    ///
    /// A single-shot handler is removed from the list the first time the
    /// delegate fires after its registration.
    pub fn subscribe_with<F>(
        &self,
        handler: F,
        owner: Option<OwnerId>,
        single_shot: bool,
    ) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId::new();
        self.listeners.borrow_mut().push(Listener {
            id,
            owner,
            single_shot,
            handler: Rc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Remove a single subscription.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Remove every handler registered with the given owner token.
    ///
    /// Returns the number of handlers removed.
    pub fn unsubscribe_all(&self, owner: OwnerId) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.owner != Some(owner));
        let removed = before - listeners.len();
        if removed > 0 {
            tracing::debug!("{} subscriptions removed for {}", removed, owner);
        }
        removed
    }

    /// Fire the delegate, delivering the event to every current subscriber.
    pub fn fire(&self, param: &T) {
        let snapshot: Vec<Handler<T>> = {
            let mut listeners = self.listeners.borrow_mut();
            let snapshot = listeners.iter().map(|l| l.handler.clone()).collect();
            listeners.retain(|l| !l.single_shot);
            snapshot
        };
        for handler in snapshot {
            handler(param);
        }
    }

    /// Whether any subscriber is currently registered.
    pub fn has_listeners(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }

    /// Number of current subscribers.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<T> Default for Delegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Delegate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let delegate: Delegate<i32> = Delegate::new();

        let id = delegate.subscribe(|_| {});
        assert_eq!(delegate.listener_count(), 1);

        assert!(delegate.unsubscribe(id));
        assert_eq!(delegate.listener_count(), 0);

        // Double unsubscribe should return false
        assert!(!delegate.unsubscribe(id));
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let delegate: Delegate<()> = Delegate::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            delegate.subscribe(move |_| order.borrow_mut().push(i));
        }

        delegate.fire(&());
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_shot_fires_exactly_once() {
        let delegate: Delegate<i32> = Delegate::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        delegate.subscribe_with(move |_| c.set(c.get() + 1), None, true);

        delegate.fire(&1);
        delegate.fire(&2);
        assert_eq!(count.get(), 1);
        assert_eq!(delegate.listener_count(), 0);
    }

    #[test]
    fn test_single_shot_resubscribing_itself_fires_once_per_registration() {
        let delegate = Rc::new(Delegate::<i32>::new());
        let count = Rc::new(Cell::new(0));

        let d = delegate.clone();
        let c = count.clone();
        delegate.subscribe_with(
            move |_| {
                c.set(c.get() + 1);
                let c2 = c.clone();
                // Re-register from inside the callback. The original
                // registration was removed before dispatch, so this fire
                // still counts once.
                d.subscribe_with(move |_| c2.set(c2.get() + 1), None, true);
            },
            None,
            true,
        );

        delegate.fire(&1);
        assert_eq!(count.get(), 1);

        // The resubscribed single-shot fires on the next event only.
        delegate.fire(&2);
        assert_eq!(count.get(), 2);
        delegate.fire(&3);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_still_delivers_snapshot() {
        let delegate = Rc::new(Delegate::<()>::new());
        let second_ran = Rc::new(Cell::new(false));

        let ids: Rc<RefCell<Vec<SubscriptionId>>> = Rc::new(RefCell::new(Vec::new()));

        let d = delegate.clone();
        let ids_for_first = ids.clone();
        let first = delegate.subscribe(move |_| {
            // Remove the second handler mid-dispatch; the snapshot already
            // holds it, so it is still delivered this round.
            for id in ids_for_first.borrow().iter() {
                d.unsubscribe(*id);
            }
        });
        let _ = first;

        let flag = second_ran.clone();
        let second = delegate.subscribe(move |_| flag.set(true));
        ids.borrow_mut().push(second);

        delegate.fire(&());
        assert!(second_ran.get());
        assert_eq!(delegate.listener_count(), 1);
    }

    #[test]
    fn test_unsubscribe_all_removes_only_that_owner() {
        let delegate: Delegate<()> = Delegate::new();
        let owner_a = OwnerId::new();
        let owner_b = OwnerId::new();

        delegate.subscribe_with(|_| {}, Some(owner_a), false);
        delegate.subscribe_with(|_| {}, Some(owner_a), false);
        delegate.subscribe_with(|_| {}, Some(owner_b), false);
        delegate.subscribe(|_| {});

        assert_eq!(delegate.unsubscribe_all(owner_a), 2);
        assert_eq!(delegate.listener_count(), 2);
        assert_eq!(delegate.unsubscribe_all(owner_a), 0);
    }

    #[test]
    fn test_clear() {
        let delegate: Delegate<()> = Delegate::new();
        delegate.subscribe(|_| {});
        delegate.subscribe(|_| {});
        assert!(delegate.has_listeners());

        delegate.clear();
        assert!(!delegate.has_listeners());
    }
}
