//! Lane occupancy bookkeeping.

use lucidac_common::Lane;

/// A set of lanes, one bit per lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LaneSet(u32);

impl LaneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lane, returning `false` if it was already present.
    pub fn insert(&mut self, lane: Lane) -> bool {
        let bit = 1u32 << lane.index();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(&self, lane: Lane) -> bool {
        self.0 & (1u32 << lane.index()) != 0
    }

    /// The lowest lane not in the set.
    pub fn lowest_free(&self) -> Option<Lane> {
        Lane::new(self.0.trailing_ones() as usize)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl FromIterator<Lane> for LaneSet {
    fn from_iter<I: IntoIterator<Item = Lane>>(iter: I) -> Self {
        let mut set = LaneSet::new();
        for lane in iter {
            set.insert(lane);
        }
        set
    }
}
