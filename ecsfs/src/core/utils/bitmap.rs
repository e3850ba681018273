// SPDX-License-Identifier: MIT

//! Bitmap operations on byte slices.
//!
//! Used for reachability tracking in the checker and for dirty-block
//! tracking of the in-memory FAT.

/// Extension trait for bitmap operations on byte slices.
///
/// Bit ordering within bytes is little-endian:
/// bit 0 is the LSB of byte 0, bit 8 the LSB of byte 1.
pub trait BitmapOps {
    /// Sets or clears a bit. Does nothing if `bit` is out of bounds.
    fn set_bit(&mut self, bit: usize, value: bool);

    /// Returns `false` if `bit` is out of bounds.
    fn get_bit(&self, bit: usize) -> bool;

    /// Finds the first set bit at or after `start`.
    fn find_next_one(&self, start: usize) -> Option<usize>;

    /// Counts the set bits of the whole bitmap.
    fn count_ones(&self) -> usize;

    /// Clears every bit.
    fn clear_all(&mut self);
}

impl BitmapOps for [u8] {
    #[inline]
    fn set_bit(&mut self, bit: usize, value: bool) {
        if let Some(byte) = self.get_mut(bit / 8) {
            let mask = 1u8 << (bit % 8);
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.get(bit / 8)
            .is_some_and(|b| (b & (1 << (bit % 8))) != 0)
    }

    fn find_next_one(&self, start: usize) -> Option<usize> {
        let start_byte = start / 8;
        for (byte_idx, &byte) in self.iter().enumerate().skip(start_byte) {
            // Mask off the bits below `start` in its own byte
            let masked = if byte_idx == start_byte {
                byte & (0xFFu8 << (start % 8))
            } else {
                byte
            };
            if masked != 0 {
                return Some(byte_idx * 8 + masked.trailing_zeros() as usize);
            }
        }
        None
    }

    fn count_ones(&self) -> usize {
        self.iter().map(|b| b.count_ones() as usize).sum()
    }

    fn clear_all(&mut self) {
        self.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_bit() {
        let mut bitmap = [0u8; 4];

        bitmap.set_bit(0, true);
        assert!(bitmap.get_bit(0));
        assert_eq!(bitmap[0], 0b00000001);

        bitmap.set_bit(7, true);
        assert_eq!(bitmap[0], 0b10000001);

        // First bit of the second byte
        bitmap.set_bit(8, true);
        assert_eq!(bitmap[1], 0b00000001);

        bitmap.set_bit(0, false);
        assert!(!bitmap.get_bit(0));
        assert_eq!(bitmap[0], 0b10000000);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bitmap = [0u8; 2];
        bitmap.set_bit(100, true);
        assert_eq!(bitmap, [0, 0]);
        assert!(!bitmap.get_bit(100));
    }

    #[test]
    fn test_count_and_clear() {
        let mut bitmap = [0b10101010u8, 0b11110000, 0b00001111];
        assert_eq!(bitmap.count_ones(), 12);
        bitmap.clear_all();
        assert_eq!(bitmap.count_ones(), 0);
    }

    #[test]
    fn test_find_next_one() {
        let bitmap = [0b00000000u8, 0b00010010, 0b00000000, 0b10000000];

        assert_eq!(bitmap.find_next_one(0), Some(9));
        assert_eq!(bitmap.find_next_one(9), Some(9));
        assert_eq!(bitmap.find_next_one(10), Some(12));
        assert_eq!(bitmap.find_next_one(13), Some(31));
        assert_eq!(bitmap.find_next_one(32), None);
        assert_eq!([0u8; 3].find_next_one(0), None);
    }
}
