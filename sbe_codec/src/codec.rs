/* Primitive get/put, bulk transfer, choice bits and position checks */

use crate::buffer::DirectBuffer;
use crate::error::{CodecError, CodecResult};

/// Byte order of a multi-byte primitive on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

/* Widest primitive handled by the codec */
const MAX_PRIMITIVE_SIZE: usize = 8;

/// A fixed-width value the codec can read and write.
pub trait Primitive: Copy {
    const SIZE: usize;

    fn decode(bytes: &[u8], order: ByteOrder) -> Self;

    fn encode(self, order: ByteOrder, dst: &mut [u8]);
}

macro_rules! impl_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn decode(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    match order {
                        ByteOrder::LittleEndian => <$t>::from_le_bytes(raw),
                        ByteOrder::BigEndian => <$t>::from_be_bytes(raw),
                    }
                }

                fn encode(self, order: ByteOrder, dst: &mut [u8]) {
                    let raw = match order {
                        ByteOrder::LittleEndian => self.to_le_bytes(),
                        ByteOrder::BigEndian => self.to_be_bytes(),
                    };
                    dst.copy_from_slice(&raw);
                }
            }
        )*
    };
}

impl_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Unsigned primitives usable as a bit-set.
pub trait ChoiceBits: Primitive {
    fn test_bit(self, bit: u32) -> bool;

    fn with_bit(self, bit: u32, value: bool) -> Self;
}

macro_rules! impl_choice_bits {
    ($($t:ty),* $(,)?) => {
        $(
            impl ChoiceBits for $t {
                fn test_bit(self, bit: u32) -> bool {
                    self & (1 << bit) != 0
                }

                fn with_bit(self, bit: u32, value: bool) -> Self {
                    if value {
                        self | (1 << bit)
                    } else {
                        self & !(1 << bit)
                    }
                }
            }
        )*
    };
}

impl_choice_bits!(u8, u16, u32, u64);

pub fn get<T: Primitive>(buffer: DirectBuffer<'_>, offset: usize, order: ByteOrder) -> CodecResult<T> {
    let mut raw = [0u8; MAX_PRIMITIVE_SIZE];
    let bytes = &mut raw[..T::SIZE];
    buffer.get_bytes(offset, bytes)?;
    Ok(T::decode(bytes, order))
}

pub fn put<T: Primitive>(
    buffer: DirectBuffer<'_>,
    offset: usize,
    value: T,
    order: ByteOrder,
) -> CodecResult<()> {
    let mut raw = [0u8; MAX_PRIMITIVE_SIZE];
    let bytes = &mut raw[..T::SIZE];
    value.encode(order, bytes);
    buffer.put_bytes(offset, bytes)
}

/* Byte width of `count` elements, checked against the buffer before any copy */
fn checked_span<T: Primitive>(buffer: DirectBuffer<'_>, offset: usize, count: usize) -> CodecResult<()> {
    let size = count.checked_mul(T::SIZE).ok_or(CodecError::BufferOverflow {
        offset,
        size: usize::MAX,
        capacity: buffer.capacity(),
    })?;
    buffer.check_range(offset, size)
}

/// Reads `dst.len()` consecutive elements starting at `offset`.
pub fn get_array<T: Primitive>(
    buffer: DirectBuffer<'_>,
    offset: usize,
    dst: &mut [T],
    order: ByteOrder,
) -> CodecResult<()> {
    checked_span::<T>(buffer, offset, dst.len())?;
    for (index, slot) in dst.iter_mut().enumerate() {
        *slot = get(buffer, offset + index * T::SIZE, order)?;
    }
    Ok(())
}

/// Writes every element of `src` consecutively starting at `offset`. Nothing
/// is written when the whole run does not fit.
pub fn put_array<T: Primitive>(
    buffer: DirectBuffer<'_>,
    offset: usize,
    src: &[T],
    order: ByteOrder,
) -> CodecResult<()> {
    checked_span::<T>(buffer, offset, src.len())?;
    for (index, value) in src.iter().enumerate() {
        put(buffer, offset + index * T::SIZE, *value, order)?;
    }
    Ok(())
}

pub fn get_choice<T: ChoiceBits>(
    buffer: DirectBuffer<'_>,
    offset: usize,
    bit: u32,
    order: ByteOrder,
) -> CodecResult<bool> {
    Ok(get::<T>(buffer, offset, order)?.test_bit(bit))
}

pub fn put_choice<T: ChoiceBits>(
    buffer: DirectBuffer<'_>,
    offset: usize,
    bit: u32,
    value: bool,
    order: ByteOrder,
) -> CodecResult<()> {
    let bits = get::<T>(buffer, offset, order)?;
    put(buffer, offset, bits.with_bit(bit, value), order)
}

/// Validates a message position relative to its base `offset`: the position
/// may reach, but not pass, the end of the buffer.
pub fn check_position(position: usize, offset: usize, capacity: usize) -> CodecResult<()> {
    let limit = capacity.saturating_sub(offset);
    if position > limit {
        return Err(CodecError::PositionOutOfRange { position, limit });
    }
    Ok(())
}
