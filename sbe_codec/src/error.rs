use thiserror::Error;

/// Result alias used by the codec and by generated flyweights.
pub type CodecResult<T> = Result<T, CodecError>;

/// Runtime errors raised by generated accessors. None of them are retried or
/// clamped: each one is a programming or data error reported to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Indexed array access outside `0..length`.
    #[error("index out of range: index={index}, length={length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// Bulk transfer starting offset outside `0..length`.
    #[error("offset out of range: offset={offset}, length={length}")]
    OffsetOutOfRange { offset: usize, length: usize },

    /// Bulk transfer or variable data length above what the field can hold.
    #[error("length out of range: length={length}, max={max}")]
    LengthOutOfRange { length: usize, max: usize },

    /// Message position past the end of the bound buffer.
    #[error("position out of range: position={position}, limit={limit}")]
    PositionOutOfRange { position: usize, limit: usize },

    /// Raw access past the buffer capacity.
    #[error("access of {size} bytes at offset {offset} exceeds capacity {capacity}")]
    BufferOverflow {
        offset: usize,
        size: usize,
        capacity: usize,
    },

    /// A raw code that matches no variant of the enum.
    #[error("unknown value {value} for enum {enum_name}")]
    UnknownEnumValue { enum_name: &'static str, value: i128 },
}
