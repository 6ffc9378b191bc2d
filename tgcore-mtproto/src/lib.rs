//! MTProto v1 session, key negotiation and transport abstractions.
//!
//! This crate handles:
//! * Message framing (message IDs, sequence numbers, the plaintext and
//!   encrypted envelopes)
//! * Sans-IO auth key negotiation (the three-round DH handshake)
//! * Transport frame codecs (abridged, intermediate)
//!
//! It is intentionally transport-agnostic: bring your own TCP.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod authentication;
pub mod message;
pub mod session;
pub mod transport;

pub use message::{Message, MsgId};
pub use session::{DecryptedMessage, EncryptedSession, Session};
