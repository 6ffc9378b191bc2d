//! # tgcore — Telegram MTProto client core
//!
//! A modular client core for the MTProto v1 protocol, wired together here
//! for convenience:
//!
//! | Sub-crate        | Role                                                    |
//! |------------------|---------------------------------------------------------|
//! | `tgcore-crypto`  | AES-IGE, SHA macros, PQ factoring, RSA, the v1 envelope |
//! | `tgcore-tl`      | Serialization traits and the curated constructor subset |
//! | `tgcore-mtproto` | Session counters, key negotiation, transport framing    |
//! | `tgcore-client`  | Multi-DC dispatcher, updates, file jobs, session resume |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tgcore::client::{Config, Dispatcher, Event};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config { api_id: 12345, api_hash: "hash".into(), ..Config::default() };
//! let (dispatcher, mut events) = Dispatcher::connect(config).await?;
//!
//! let code_hash = dispatcher.send_code("+15551234567").await?;
//! // … obtain the code from the user …
//! dispatcher.sign_in("+15551234567", &code_hash, "12345").await?;
//!
//! tokio::spawn({
//!     let dispatcher = dispatcher.clone();
//!     async move { dispatcher.run().await }
//! });
//! while let Some(event) = events.next().await {
//!     if let Event::NewMessage { message, .. } = event {
//!         println!("{}", message.message);
//!     }
//! }
//! # Ok(()) }
//! ```

#![deny(unsafe_code)]

/// Re-export of the dispatcher layer.
pub use tgcore_client as client;

/// Re-export of the cryptographic primitives.
pub use tgcore_crypto as crypto;

/// Re-export of the session/negotiation layer.
pub use tgcore_mtproto as mtproto;

/// Re-export of the TL type layer.
pub use tgcore_tl as tl;

// ─── Convenience re-exports ──────────────────────────────────────────────────

pub use tgcore_client::{
    Config, ConnectionState, Dispatcher, Event, EventStream, InvocationError, SessionBlob,
};
pub use tgcore_mtproto::authentication::{self, Finished, Negotiator};
pub use tgcore_mtproto::{EncryptedSession, Session};
pub use tgcore_tl::{Deserializable, Identifiable, RemoteCall, Serializable, LAYER};
