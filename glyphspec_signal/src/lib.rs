// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphspec Signal: change propagation primitives for property objects.
//!
//! Two small building blocks live here:
//!
//! - **Signals** ([`Signal`], [`ConnectionId`]): an explicit, ordered list of
//!   observer callbacks. Emitting calls every connected observer exactly once.
//!   There is no deduplication: connecting the same observer twice yields two
//!   calls per emission.
//! - **Channels** ([`Channel`], [`ChannelSet`]): compact bitsets naming the
//!   domains of cached state (visuals, data, geometry, ...) that a change
//!   invalidates.
//!
//! ## Quick Start
//!
//! ```rust
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use glyphspec_signal::{Channel, ChannelSet, Signal};
//!
//! const VISUALS: Channel = Channel::new(0);
//!
//! let hits = Rc::new(Cell::new(0));
//! let mut changed: Signal<ChannelSet> = Signal::new();
//!
//! let counter = hits.clone();
//! let id = changed.connect(move |channels: &ChannelSet| {
//!     if channels.contains(VISUALS) {
//!         counter.set(counter.get() + 1);
//!     }
//! });
//!
//! changed.emit(&VISUALS.into_set());
//! assert_eq!(hits.get(), 1);
//!
//! assert!(changed.disconnect(id));
//! changed.emit(&VISUALS.into_set());
//! assert_eq!(hits.get(), 1);
//! ```
//!
//! ## Reentrancy
//!
//! Observers receive the event by shared reference and never the emitter.
//! Mutating the emitting object from inside an observer is not supported.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod channel;
mod signal;

pub use channel::{Channel, ChannelSet, ChannelSetIter};
pub use signal::{ConnectionId, Signal};
