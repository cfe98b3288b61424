//! Change notification primitives
//!
//! Every mutable attribute of the view is held in an [`Observable`], which
//! hands `(old, new)` pairs to its subscribers whenever the value actually
//! changes. Discrete occurrences that are not property changes (a scrubber
//! "value changed" control event fires even when the value is unchanged)
//! go through a [`Signal`].
//!
//! Both types are single-threaded: observers run synchronously on the thread
//! that owns the component, which is the UI thread.

use std::fmt;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type ChangeObserver<T> = Box<dyn FnMut(&T, &T)>;
type EventObserver<E> = Box<dyn FnMut(&E)>;

/// An observable property cell
pub struct Observable<T> {
    value: T,
    observers: Vec<(Subscription, ChangeObserver<T>)>,
    next_id: u64,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a new value, notifying observers if it differs from the old one.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }

        let old = std::mem::replace(&mut self.value, value);
        for (_, observer) in self.observers.iter_mut() {
            observer(&old, &self.value);
        }
        true
    }

    /// Register an observer receiving `(old, new)` on every change
    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&T, &T) + 'static,
    {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered here.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl<T: Clone + PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A discrete event emitter
pub struct Signal<E> {
    observers: Vec<(Subscription, EventObserver<E>)>,
    next_id: u64,
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Deliver an event to every observer
    pub fn emit(&mut self, event: &E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observers.len())
            .finish()
    }
}
