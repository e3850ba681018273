// SPDX-License-Identifier: MIT

//! Little-endian field codecs for on-disk structures.
//!
//! Structures are (de)serialized field by field at fixed byte offsets
//! so the on-disk format never depends on host layout or endianness.

crate::le_impl_primitive_rw!(u16, u32);

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_le_roundtrip_at_offset() {
        let mut buf = [0u8; 16];
        write_u16_le(&mut buf, 3, 0xBEEF);
        write_u32_le(&mut buf, 8, 0x0102_0304);

        assert_eq!(&buf[3..5], &[0xEF, 0xBE]);
        assert_eq!(&buf[8..12], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(read_u16_le(&buf, 3), 0xBEEF);
        assert_eq!(read_u32_le(&buf, 8), 0x0102_0304);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_field_panics() {
        let buf = [0u8; 4];
        let _ = read_u32_le(&buf, 1);
    }
}
