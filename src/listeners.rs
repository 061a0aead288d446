//! Window-level keyboard listeners with scoped registrations.
//!
//! A view subscribes its shortcut handlers when it is mounted and keeps the
//! returned [`Subscription`]s. Dropping a subscription removes the listener, so
//! a torn-down view can never fire twice after a reload.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use roimark_overlay::KeyEvent;

/// A keyboard listener. Returns true if it handled the event.
pub type Listener = Rc<RefCell<dyn FnMut(&KeyEvent) -> bool>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fans key events out to every subscribed listener.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    registry: Rc<RefCell<Registry>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the subscription is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl FnMut(&KeyEvent) -> bool + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        log::debug!("KeyboardHub: subscribed listener {}", id);

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver an event to all listeners in subscription order.
    ///
    /// Returns true if any listener handled it. Listeners may subscribe or
    /// unsubscribe while the event is delivered; such changes apply to the next event.
    pub fn dispatch(&self, event: &KeyEvent) -> bool {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        let mut handled = false;
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => handled |= (*listener)(event),
                Err(_) => log::warn!("KeyboardHub: listener re-entered by {}", event.key.name()),
            }
        }
        log::trace!("KeyboardHub: {} handled={}", event.key.name(), handled);
        handled
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Keeps a listener registered. Dropping it unregisters the listener.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        registry
            .borrow_mut()
            .listeners
            .retain(|(id, _)| *id != self.id);
        log::debug!("KeyboardHub: unsubscribed listener {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roimark_overlay::Key;

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let hub = KeyboardHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let record = Rc::clone(&seen);
        let _sub = hub.subscribe(move |event| {
            record.borrow_mut().push(event.key);
            event.key == Key::Delete
        });

        assert!(hub.dispatch(&KeyEvent::overlay(Key::Delete)));
        assert!(!hub.dispatch(&KeyEvent::overlay(Key::Enter)));
        assert_eq!(*seen.borrow(), vec![Key::Delete, Key::Enter]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = KeyboardHub::new();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let sub = hub.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            true
        });
        assert_eq!(hub.listener_count(), 1);
        hub.dispatch(&KeyEvent::overlay(Key::Escape));

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        assert!(!hub.dispatch(&KeyEvent::overlay(Key::Escape)));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = KeyboardHub::new();
        let sub = hub.subscribe(|_| false);
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_remount_does_not_duplicate() {
        let hub = KeyboardHub::new();
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let counter = Rc::clone(&count);
            let sub = hub.subscribe(move |_| {
                *counter.borrow_mut() += 1;
                true
            });
            drop(sub);
        }
        let counter = Rc::clone(&count);
        let _live = hub.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            true
        });

        hub.dispatch(&KeyEvent::overlay(Key::ArrowRight));
        assert_eq!(*count.borrow(), 1);
    }
}
