//! Runtime codec for generated SBE flyweights.
//!
//! Generated code calls into this crate for every buffer access: primitive
//! get/put keyed by type and byte order, bulk array transfer, single-bit
//! choice access and message position checks. All accesses are bounds
//! checked and allocation free.

pub mod buffer;
pub mod codec;
pub mod error;

pub use buffer::DirectBuffer;
pub use codec::{
    check_position, get, get_array, get_choice, put, put_array, put_choice, ByteOrder, ChoiceBits,
    Primitive,
};
pub use error::{CodecError, CodecResult};
