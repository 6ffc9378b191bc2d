//! Telegram API types, functions and enums used by the client core.
//!
//! The schema code generator is an external tool; this crate carries the
//! hand-curated slice of the schema the session and dispatcher exercise,
//! written in the exact shape generated code takes.
//!
//! # Overview
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`types`]     | Concrete constructors (bare types) as `struct`s            |
//! | [`functions`] | RPC functions as `struct`s implementing [`RemoteCall`]     |
//! | [`enums`]     | Boxed types as `enum`s implementing [`Deserializable`]     |
//!
//! # Raw usage
//!
//! ```rust
//! use tgcore_tl::{functions, Serializable};
//!
//! let req = functions::updates::GetState {};
//! let bytes = req.to_bytes();
//! // Send `bytes` as an encrypted message body…
//! ```

#![deny(unsafe_code)]
#![allow(clippy::large_enum_variant)]

pub mod deserialize;
pub mod enums;
pub mod functions;
pub mod serialize;
pub mod types;

pub use deserialize::{Cursor, Deserializable};
pub use serialize::Serializable;

/// The API layer the hand-curated schema slice corresponds to.
pub const LAYER: i32 = 23;

/// Bare `vector` — as opposed to the boxed `Vector`.
///
/// Used in the rare places where a length-prefixed list appears without
/// the usual `0x1cb5c415` constructor ID header.
#[derive(Clone, Debug, PartialEq)]
pub struct RawVec<T>(pub Vec<T>);

/// Opaque blob of bytes passed through without interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

// ─── Core traits ─────────────────────────────────────────────────────────────

/// Every constructor has a unique 32-bit identifier.
pub trait Identifiable {
    /// The constructor ID as specified in the schema.
    const CONSTRUCTOR_ID: u32;
}

/// Marks a function type that can be sent as an RPC call.
///
/// `Return` is the type the server will respond with.
pub trait RemoteCall: Serializable {
    /// The deserialized response type.
    type Return: Deserializable;
}
