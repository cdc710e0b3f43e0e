// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty channels: which cached state a property change invalidates.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// One invalidation domain, such as the visual properties of a glyph or the
/// data columns it reads.
///
/// Channels are indices into a 64-bit [`ChannelSet`]; define them as
/// constants next to the schema that uses them.
///
/// ```
/// use glyphspec_signal::Channel;
///
/// const VISUALS: Channel = Channel::new(0);
/// const DATA: Channel = Channel::new(1);
/// assert_ne!(VISUALS, DATA);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Channel(u8);

impl Channel {
    /// Creates the channel with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 64`.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!(index < 64, "Channel index must be less than 64");
        Self(index)
    }

    /// Returns the index of this channel.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns a set containing only this channel.
    #[must_use]
    pub const fn into_set(self) -> ChannelSet {
        ChannelSet(1_u64 << self.0)
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Channel").field(&self.0).finish()
    }
}

/// A set of up to 64 [`Channel`]s.
///
/// Property objects accumulate the channels touched by assignments into a
/// `ChannelSet` until a consumer takes them, so each invalidated domain is
/// reported once no matter how many properties in it changed.
///
/// ```
/// use glyphspec_signal::{Channel, ChannelSet};
///
/// const VISUALS: Channel = Channel::new(0);
/// const DATA: Channel = Channel::new(1);
///
/// let mut dirty = ChannelSet::empty();
/// dirty |= VISUALS.into_set();
/// dirty |= VISUALS.into_set();
/// assert_eq!(dirty.len(), 1);
/// assert!(!dirty.contains(DATA));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChannelSet(u64);

impl ChannelSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every channel.
    pub const ALL: Self = Self(u64::MAX);

    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Returns `true` if no channel is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `channel` is in the set.
    #[must_use]
    pub const fn contains(self, channel: Channel) -> bool {
        self.0 & (1_u64 << channel.0) != 0
    }

    /// Returns `true` if the two sets share at least one channel.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Adds a channel.
    pub fn insert(&mut self, channel: Channel) {
        self.0 |= 1_u64 << channel.0;
    }

    /// Removes a channel.
    pub fn remove(&mut self, channel: Channel) {
        self.0 &= !(1_u64 << channel.0);
    }

    /// Returns the current set and leaves this one empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Number of channels in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the channels in ascending index order.
    #[must_use]
    pub const fn iter(self) -> ChannelSetIter {
        ChannelSetIter { bits: self.0 }
    }
}

impl fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitOr for ChannelSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChannelSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Channel> for ChannelSet {
    fn from(channel: Channel) -> Self {
        channel.into_set()
    }
}

impl IntoIterator for ChannelSet {
    type Item = Channel;
    type IntoIter = ChannelSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the channels of a [`ChannelSet`].
#[derive(Clone, Debug)]
pub struct ChannelSetIter {
    bits: u64,
}

impl Iterator for ChannelSetIter {
    type Item = Channel;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation, reason = "trailing_zeros <= 63")]
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Channel(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for ChannelSetIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    const VISUALS: Channel = Channel::new(0);
    const DATA: Channel = Channel::new(1);
    const GEOMETRY: Channel = Channel::new(5);

    #[test]
    #[should_panic(expected = "Channel index must be less than 64")]
    fn channel_index_out_of_range() {
        let _ = Channel::new(64);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = ChannelSet::empty();
        set.insert(VISUALS);
        set.insert(VISUALS);
        assert_eq!(set.len(), 1);
        assert!(set.contains(VISUALS));

        set.remove(VISUALS);
        assert!(set.is_empty());
    }

    #[test]
    fn take_clears() {
        let mut set = VISUALS.into_set() | DATA.into_set();
        let taken = set.take();
        assert!(set.is_empty());
        assert!(taken.contains(VISUALS));
        assert!(taken.contains(DATA));
        assert!(taken.intersects(DATA.into_set()));
        assert!(!taken.intersects(GEOMETRY.into_set()));
    }

    #[test]
    fn iter_ascending() {
        let set = GEOMETRY.into_set() | VISUALS.into_set();
        let channels: Vec<_> = set.iter().collect();
        assert_eq!(channels, [VISUALS, GEOMETRY]);
        assert_eq!(set.iter().len(), 2);
    }

    #[test]
    fn debug_lists_channels() {
        let set = DATA.into_set();
        assert_eq!(format!("{set:?}"), "{Channel(1)}");
    }
}
