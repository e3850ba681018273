/// Automatically implements little-endian field accessors for primitive types
/// over byte buffers (`read_<ty>_le` / `write_<ty>_le`).
#[macro_export]
macro_rules! le_impl_primitive_rw {
    ($($ty:ty),+ $(,)?) => {
        $(
            paste::paste! {
                /// Decodes a little-endian value at byte `offset` of `buf`.
                ///
                /// Panics if the field does not fit inside `buf`.
                #[inline(always)]
                pub fn [<read_ $ty _le>](buf: &[u8], offset: usize) -> $ty {
                    const N: usize = core::mem::size_of::<$ty>();
                    let mut raw = [0u8; N];
                    raw.copy_from_slice(&buf[offset..offset + N]);
                    <$ty>::from_le_bytes(raw)
                }

                /// Encodes `value` little-endian at byte `offset` of `buf`.
                ///
                /// Panics if the field does not fit inside `buf`.
                #[inline(always)]
                pub fn [<write_ $ty _le>](buf: &mut [u8], offset: usize, value: $ty) {
                    const N: usize = core::mem::size_of::<$ty>();
                    buf[offset..offset + N].copy_from_slice(&value.to_le_bytes());
                }
            }
        )+
    };
}
