//! Flyweights generated at build time from `schema/car.yaml`.
//!
//! The crate exists so the generated source is compiled and exercised like
//! any downstream user would: see `tests/` for the runtime behaviour.

pub mod baseline {
    include!(concat!(env!("OUT_DIR"), "/car.rs"));
}

pub use sbe_codec::{ByteOrder, CodecError, CodecResult, DirectBuffer};
