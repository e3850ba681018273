// SPDX-License-Identifier: MIT

//! Reachability tracker for chain walks.
//!
//! Tracks which allocation units have already been claimed by a chain,
//! so cross-linked or looping chains can be reported.

use alloc::vec;
use alloc::vec::Vec;

use crate::core::utils::bitmap::BitmapOps;

/// Tracks unit reachability during chain walks, one bit per unit.
#[derive(Debug, Clone)]
pub struct ReachabilityTracker {
    bitmap: Vec<u8>,
    count: usize,
}

impl ReachabilityTracker {
    /// Creates a tracker for units `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            bitmap: vec![0u8; count.div_ceil(8)],
            count,
        }
    }

    /// Marks a unit as reached. Returns `false` if it was already marked.
    ///
    /// Out-of-range units are ignored and reported as newly marked.
    #[inline]
    pub fn mark(&mut self, unit: usize) -> bool {
        if unit >= self.count {
            return true;
        }
        let fresh = !self.bitmap.get_bit(unit);
        self.bitmap.set_bit(unit, true);
        fresh
    }

    #[inline]
    pub fn is_marked(&self, unit: usize) -> bool {
        self.bitmap.get_bit(unit)
    }

    /// Number of marked units.
    pub fn marked_count(&self) -> usize {
        self.bitmap.count_ones()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_mark_reports_revisit() {
        let mut tracker = ReachabilityTracker::new(20);
        assert!(tracker.mark(3));
        assert!(tracker.mark(17));
        assert!(!tracker.mark(3));
        assert!(tracker.is_marked(17));
        assert!(!tracker.is_marked(4));
        assert_eq!(tracker.marked_count(), 2);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut tracker = ReachabilityTracker::new(8);
        assert!(tracker.mark(8));
        assert!(tracker.mark(8));
        assert_eq!(tracker.marked_count(), 0);
    }
}
