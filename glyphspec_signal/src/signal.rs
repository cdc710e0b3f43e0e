// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit observer lists.

use alloc::boxed::Box;
use core::fmt;
use smallvec::SmallVec;

/// Most properties have zero to two observers.
const INLINE_OBSERVERS: usize = 2;

type Observer<A> = Box<dyn FnMut(&A)>;

/// Handle returned by [`Signal::connect`], used to disconnect that one
/// registration again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u32);

impl ConnectionId {
    /// Returns the raw registration number.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// An ordered list of observers notified with a `&A` event.
///
/// Each [`connect`](Self::connect) adds one registration, even for an
/// observer that is already connected, and [`emit`](Self::emit) calls every
/// registration exactly once in connection order.
///
/// ```rust
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use glyphspec_signal::Signal;
///
/// let calls = Rc::new(Cell::new(0));
/// let mut signal: Signal<()> = Signal::new();
/// for _ in 0..2 {
///     let calls = calls.clone();
///     signal.connect(move |_| calls.set(calls.get() + 1));
/// }
///
/// signal.emit(&());
/// assert_eq!(calls.get(), 2);
/// ```
pub struct Signal<A> {
    observers: SmallVec<[(ConnectionId, Observer<A>); INLINE_OBSERVERS]>,
    next_id: u32,
}

impl<A> Signal<A> {
    /// Creates a signal with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: SmallVec::new(),
            next_id: 0,
        }
    }

    /// Registers an observer and returns its connection handle.
    pub fn connect<F>(&mut self, observer: F) -> ConnectionId
    where
        F: FnMut(&A) + 'static,
    {
        let id = ConnectionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes the registration with the given handle.
    ///
    /// Returns `true` if a registration was removed.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        match self.observers.iter().position(|(cid, _)| *cid == id) {
            Some(idx) => {
                self.observers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every observer.
    pub fn disconnect_all(&mut self) {
        self.observers.clear();
    }

    /// Calls every observer once with `event`.
    pub fn emit(&mut self, event: &A) {
        tracing::trace!(observers = self.observers.len(), "emitting signal");
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    /// Number of registrations.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if nothing is connected.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    #[test]
    fn emit_reaches_each_observer_once() {
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let mut signal: Signal<i32> = Signal::new();

        let a2 = a.clone();
        signal.connect(move |v| a2.set(a2.get() + v));
        let b2 = b.clone();
        signal.connect(move |v| b2.set(b2.get() + v));

        signal.emit(&3);
        assert_eq!(a.get(), 3);
        assert_eq!(b.get(), 3);
    }

    #[test]
    fn same_observer_twice_fires_twice() {
        let calls = Rc::new(Cell::new(0));
        let mut signal: Signal<()> = Signal::new();
        let observer = {
            let calls = calls.clone();
            move |_: &()| calls.set(calls.get() + 1)
        };
        signal.connect(observer.clone());
        signal.connect(observer);

        signal.emit(&());
        assert_eq!(calls.get(), 2);
        assert_eq!(signal.len(), 2);
    }

    #[test]
    fn disconnect_removes_only_that_registration() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<()> = Signal::new();

        let first = {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push(1))
        };
        {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push(2));
        }

        assert!(signal.disconnect(first));
        assert!(!signal.disconnect(first));

        signal.emit(&());
        assert_eq!(*order.borrow(), [2]);
    }

    #[test]
    fn emission_follows_connection_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u8> = Signal::new();
        for tag in 0..4_u8 {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push(tag));
        }
        signal.emit(&0);
        assert_eq!(*order.borrow(), [0, 1, 2, 3]);
    }

    #[test]
    fn disconnect_all_and_debug() {
        let mut signal: Signal<()> = Signal::default();
        signal.connect(|_| {});
        assert!(!signal.is_empty());
        assert!(format!("{signal:?}").contains("observers: 1"));

        signal.disconnect_all();
        assert!(signal.is_empty());
    }
}
