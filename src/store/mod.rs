//! Reactive state stores
//!
//! [`Store`] holds a single value, [`ListStore`] an ordered list. Mutations
//! notify subscribers synchronously, in registration order, with a
//! [`Notification`] whose `seq` is strictly increasing per store.
//!
//! Updates are never suppressed: writing a value equal to the current one
//! still notifies, so subscribers must tolerate redundant events.
//!
//! A subscriber returning `Err` is logged and skipped; delivery continues with
//! the next subscriber. Stores are mutated through `&mut self` and subscribers
//! only see the event, so a subscriber cannot mutate the store it listens to
//! from inside its own callback.

use crate::error::StoreError;
use serde::Serialize;
use std::fmt;

/// Event kind used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Update,
    Append,
    Change,
    Deletion,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Update => "update",
            EventKind::Append => "append",
            EventKind::Change => "change",
            EventKind::Deletion => "deletion",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "update" => Some(EventKind::Update),
            "append" => Some(EventKind::Append),
            "change" => Some(EventKind::Change),
            "deletion" => Some(EventKind::Deletion),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store event; each variant carries only what its kind needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoreEvent<T> {
    /// Whole value replaced
    Update { value: T },
    /// Item added at `index` (the prior length)
    Append { index: usize, item: T },
    /// Item at `index` replaced in place
    Change { index: usize, item: T },
    /// Item removed from `index`; later items shifted down
    Deletion { index: usize, item: T },
}

impl<T> StoreEvent<T> {
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::Update { .. } => EventKind::Update,
            StoreEvent::Append { .. } => EventKind::Append,
            StoreEvent::Change { .. } => EventKind::Change,
            StoreEvent::Deletion { .. } => EventKind::Deletion,
        }
    }

    /// Index carried by list events
    pub fn index(&self) -> Option<usize> {
        match self {
            StoreEvent::Update { .. } => None,
            StoreEvent::Append { index, .. }
            | StoreEvent::Change { index, .. }
            | StoreEvent::Deletion { index, .. } => Some(*index),
        }
    }
}

/// Event as delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification<T> {
    pub seq: u64,
    pub event: StoreEvent<T>,
}

/// Handle returned by `on`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Callback<T> = Box<dyn FnMut(&Notification<T>) -> Result<(), String>>;

struct Subscriber<T> {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback<T>,
}

/// Subscriber lists and sequence counter shared by both store kinds
pub struct Subscribers<T> {
    name: String,
    subscribers: Vec<Subscriber<T>>,
    next_id: u64,
    seq: u64,
}

impl<T> Subscribers<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: Vec::new(),
            next_id: 0,
            seq: 0,
        }
    }

    pub fn on(&mut self, kind: EventKind, callback: Callback<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, kind, callback });
        id
    }

    /// Remove a subscriber; returns false if it was not registered
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Sequence number of the last emitted event (0 before any)
    pub fn last_seq(&self) -> u64 {
        self.seq
    }

    fn emit(&mut self, event: StoreEvent<T>) {
        self.seq += 1;
        let kind = event.kind();
        let notification = Notification { seq: self.seq, event };

        for subscriber in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            if let Err(e) = (subscriber.callback)(&notification) {
                log::warn!(
                    "store '{}': {} subscriber failed (seq {}): {}",
                    self.name,
                    kind,
                    notification.seq,
                    e
                );
            }
        }
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("name", &self.name)
            .field("count", &self.subscribers.len())
            .field("seq", &self.seq)
            .finish()
    }
}

/// Observable single value
#[derive(Debug)]
pub struct Store<T> {
    value: T,
    subscribers: Subscribers<T>,
}

impl<T: Clone> Store<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            value,
            subscribers: Subscribers::new(name),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify `update` subscribers
    pub fn update(&mut self, value: T) {
        self.value = value;
        self.subscribers.emit(StoreEvent::Update {
            value: self.value.clone(),
        });
    }

    /// Update from the current value
    pub fn modify(&mut self, f: impl FnOnce(&T) -> T) {
        let value = f(&self.value);
        self.update(value);
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&Notification<T>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.subscribers.on(kind, Box::new(callback))
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.off(id)
    }

    pub fn last_seq(&self) -> u64 {
        self.subscribers.last_seq()
    }
}

/// Observable ordered list
#[derive(Debug)]
pub struct ListStore<T> {
    items: Vec<T>,
    subscribers: Subscribers<T>,
}

impl<T: Clone> ListStore<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            items,
            subscribers: Subscribers::new(name),
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item; returns its index
    pub fn push(&mut self, item: T) -> usize {
        let index = self.items.len();
        self.items.push(item.clone());
        self.subscribers.emit(StoreEvent::Append { index, item });
        index
    }

    /// Replace the item at `index` in place
    pub fn set(&mut self, index: usize, item: T) -> Result<(), StoreError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfBounds { index, len })?;
        *slot = item.clone();
        self.subscribers.emit(StoreEvent::Change { index, item });
        Ok(())
    }

    /// Remove the item at `index`; later indices shift down by one
    pub fn remove(&mut self, index: usize) -> Result<T, StoreError> {
        if index >= self.items.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        self.subscribers.emit(StoreEvent::Deletion {
            index,
            item: item.clone(),
        });
        Ok(item)
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&Notification<T>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.subscribers.on(kind, Box::new(callback))
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.off(id)
    }

    pub fn last_seq(&self) -> u64 {
        self.subscribers.last_seq()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (
        Rc<RefCell<Vec<Notification<T>>>>,
        impl FnMut(&Notification<T>) -> Result<(), String> + Clone,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |n: &Notification<T>| {
            sink.borrow_mut().push(n.clone());
            Ok(())
        })
    }

    #[test]
    fn test_update_notifies_even_when_equal() {
        let mut store = Store::new("flag", false);
        let (log, cb) = recorder::<bool>();
        store.on(EventKind::Update, cb);

        store.update(true);
        store.update(true);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].event, StoreEvent::Update { value: true });
        assert!(log[0].seq < log[1].seq);
    }

    #[test]
    fn test_list_events_in_order() {
        let mut store = ListStore::new("items", Vec::new());
        let (log, cb) = recorder::<&str>();
        store.on(EventKind::Append, cb.clone());
        store.on(EventKind::Deletion, cb.clone());
        store.on(EventKind::Change, cb);

        store.push("a");
        store.push("b");
        store.push("c");
        store.remove(1).unwrap();
        store.set(1, "x").unwrap();

        let events: Vec<_> = log.borrow().iter().map(|n| n.event.clone()).collect();
        assert_eq!(
            events,
            vec![
                StoreEvent::Append { index: 0, item: "a" },
                StoreEvent::Append { index: 1, item: "b" },
                StoreEvent::Append { index: 2, item: "c" },
                StoreEvent::Deletion { index: 1, item: "b" },
                StoreEvent::Change { index: 1, item: "x" },
            ]
        );
        // Index 1 now addresses what was originally index 2
        assert_eq!(store.items(), &["a", "x"]);
    }

    #[test]
    fn test_failing_subscriber_is_isolated() {
        let mut store = Store::new("text", String::new());
        store.on(EventKind::Update, |_| Err("view exploded".to_string()));
        let (log, cb) = recorder::<String>();
        store.on(EventKind::Update, cb);

        store.update("hi".to_string());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new("n", 0);
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            store.on(EventKind::Update, move |_| {
                order.borrow_mut().push(tag);
                Ok(())
            });
        }
        store.update(1);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_off_stops_delivery() {
        let mut store = Store::new("n", 0);
        let (log, cb) = recorder::<i32>();
        let id = store.on(EventKind::Update, cb);

        store.update(1);
        assert!(store.off(id));
        assert!(!store.off(id));
        store.update(2);

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(store.last_seq(), 2);
    }

    #[test]
    fn test_out_of_bounds_does_not_emit() {
        let mut store = ListStore::new("items", vec![1]);
        let (log, cb) = recorder::<i32>();
        store.on(EventKind::Change, cb.clone());
        store.on(EventKind::Deletion, cb);

        assert_eq!(
            store.set(3, 9),
            Err(StoreError::IndexOutOfBounds { index: 3, len: 1 })
        );
        assert!(store.remove(1).is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(store.last_seq(), 0);
    }

    #[test]
    fn test_event_kind_names() {
        for kind in [EventKind::Update, EventKind::Append, EventKind::Change, EventKind::Deletion] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("click"), None);
    }
}
