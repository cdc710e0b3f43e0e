// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identification.

use core::fmt;

/// Index of a property within its class [`Schema`](crate::Schema).
///
/// A `u16` keeps per-instance slots compact while allowing up to 65,535
/// properties per class.
///
/// ```rust
/// use glyphspec_property::PropertyId;
///
/// let id = PropertyId::new(7);
/// assert_eq!(id.index(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a property ID from a schema index.
    ///
    /// Normally assigned by [`SchemaBuilder`](crate::SchemaBuilder).
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Schema index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn ordering_follows_index() {
        assert!(PropertyId::new(1) < PropertyId::new(2));
        assert_eq!(PropertyId::new(3), PropertyId::new(3));
    }

    #[test]
    fn formatting() {
        let id = PropertyId::new(42);
        assert_eq!(format!("{id:?}"), "PropertyId(42)");
        assert_eq!(format!("{id}"), "#42");
    }

    #[test]
    fn compact() {
        assert_eq!(size_of::<PropertyId>(), 2);
    }
}
