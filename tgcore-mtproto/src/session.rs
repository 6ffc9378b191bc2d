//! Plain and encrypted session state.
//!
//! A session owns one DC's counters: message IDs tied to the corrected
//! clock, the parity-split sequence numbers, the current server salt and
//! the random session ID. The plain variant frames handshake messages;
//! the encrypted variant wraps bodies in the v1 envelope.

use std::time::{SystemTime, UNIX_EPOCH};

use tgcore_crypto::{decrypt_data, encrypt_data, AuthKey, DequeBuffer, DecryptError as CryptoError, Side};
use tgcore_tl::{RemoteCall, Serializable};

use crate::message::{now_ms, Message, MsgId};

fn random_u32() -> u32 {
    let mut b = [0u8; 4];
    getrandom::getrandom(&mut b).expect("getrandom failed");
    u32::from_le_bytes(b)
}

/// Shared msg-id/seqno bookkeeping.
#[derive(Debug, Default)]
struct Counters {
    last_msg_id: i64,
    sequence: u32,
}

impl Counters {
    /// Allocate the next message ID, strictly greater than every ID handed
    /// out before and with the two low bits clear.
    fn next_msg_id(&mut self, delta_time: i32) -> MsgId {
        let mut id = MsgId::from_parts(now_ms(), delta_time, random_u32()).0;
        if id <= self.last_msg_id {
            id = self.last_msg_id + 4;
        }
        self.last_msg_id = id;
        MsgId(id)
    }

    /// Content-related messages get odd numbers and advance the counter.
    fn next_seq_no(&mut self, content_related: bool) -> i32 {
        if content_related {
            let seq = self.sequence * 2 + 1;
            self.sequence += 1;
            seq as i32
        } else {
            (self.sequence * 2) as i32
        }
    }
}

// ─── Plain session ───────────────────────────────────────────────────────────

/// Session state used before an auth key exists. Only the handshake
/// messages travel this way.
#[derive(Debug, Default)]
pub struct Session {
    counters: Counters,
    delta_time: i32,
}

impl Session {
    /// Create a fresh session with no known clock offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a clock offset inherited from another session, so the
    /// handshake's message IDs land inside the server's window.
    pub fn with_delta_time(delta_time: i32) -> Self {
        Self { counters: Counters::default(), delta_time }
    }

    /// Allocate a new message ID.
    pub fn next_msg_id(&mut self) -> MsgId {
        self.counters.next_msg_id(self.delta_time)
    }

    /// Frame a serialized body as a plaintext [`Message`].
    pub fn pack_body(&mut self, body: Vec<u8>) -> Message {
        let id = self.next_msg_id();
        let seq_no = self.counters.next_seq_no(true);
        Message::plaintext(id, seq_no, body)
    }

    /// Serialize an RPC function into a plaintext [`Message`].
    pub fn pack<R: RemoteCall>(&mut self, call: &R) -> Message {
        self.pack_body(call.to_bytes())
    }
}

// ─── Encrypted session ───────────────────────────────────────────────────────

/// Errors when decrypting an incoming server frame.
#[derive(Debug)]
pub enum DecryptError {
    /// The crypto layer rejected the message.
    Crypto(CryptoError),
    /// The decrypted inner message was too short to contain a header.
    FrameTooShort,
    /// Session-ID mismatch (possible replay or wrong connection).
    SessionMismatch,
}

impl std::fmt::Display for DecryptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crypto(e) => write!(f, "crypto: {e}"),
            Self::FrameTooShort => write!(f, "inner plaintext too short"),
            Self::SessionMismatch => write!(f, "session_id mismatch"),
        }
    }
}
impl std::error::Error for DecryptError {}

/// The inner payload extracted from a decrypted server frame.
pub struct DecryptedMessage {
    /// `salt` the server expects us to echo.
    pub salt: i64,
    /// The `session_id` of the frame.
    pub session_id: i64,
    /// The server-assigned `msg_id` of the inner message.
    pub msg_id: i64,
    /// `seq_no` of the inner message.
    pub seq_no: i32,
    /// Serialized body of the inner message.
    pub body: Vec<u8>,
}

/// Encrypted session state for one authorized connection.
pub struct EncryptedSession {
    auth_key: AuthKey,
    session_id: i64,
    counters: Counters,
    /// Current server salt echoed in every outgoing message.
    pub salt: i64,
    /// Signed clock offset in seconds relative to the server.
    pub delta_time: i32,
}

impl EncryptedSession {
    /// Create a session from handshake output. The session ID is random
    /// and never zero.
    pub fn new(auth_key: [u8; 256], first_salt: i64, delta_time: i32) -> Self {
        let session_id = loop {
            let mut rnd = [0u8; 8];
            getrandom::getrandom(&mut rnd).expect("getrandom failed");
            let id = i64::from_le_bytes(rnd);
            if id != 0 {
                break id;
            }
        };
        Self::with_session_id(auth_key, first_salt, delta_time, session_id)
    }

    /// Create with an explicit session ID (deterministic tests).
    pub fn with_session_id(
        auth_key: [u8; 256],
        first_salt: i64,
        delta_time: i32,
        session_id: i64,
    ) -> Self {
        Self {
            auth_key: AuthKey::from_bytes(auth_key),
            session_id,
            counters: Counters::default(),
            salt: first_salt,
            delta_time,
        }
    }

    /// The session ID chosen at construction.
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// The raw auth key bytes (for persistence and auth export).
    pub fn auth_key_bytes(&self) -> [u8; 256] {
        self.auth_key.to_bytes()
    }

    /// The 64-bit key identifier.
    pub fn auth_id(&self) -> u64 {
        self.auth_key.auth_id()
    }

    /// Allocate the next message ID.
    pub fn next_msg_id(&mut self) -> MsgId {
        self.counters.next_msg_id(self.delta_time)
    }

    /// Re-learn the clock offset from a server-assigned message ID.
    /// Called for the clock-skew `bad_msg_notification` codes.
    pub fn sync_time_from(&mut self, server_msg_id: i64) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.delta_time = ((server_msg_id >> 32) - now) as i32;
    }

    /// Encrypt a serialized body into a wire-ready frame. Returns the
    /// frame and the message ID it was assigned.
    ///
    /// Inner envelope layout:
    /// ```text
    /// salt:       i64
    /// session_id: i64
    /// msg_id:     i64
    /// seq_no:     i32
    /// len:        i32
    /// body:       [u8; len]
    /// ```
    pub fn pack_body(&mut self, body: &[u8], content_related: bool) -> (Vec<u8>, i64) {
        let msg_id = self.next_msg_id().0;
        let seq_no = self.counters.next_seq_no(content_related);

        let inner_len = 8 + 8 + 8 + 4 + 4 + body.len();
        let mut buf = DequeBuffer::with_capacity(inner_len, 24);
        buf.extend(self.salt.to_le_bytes());
        buf.extend(self.session_id.to_le_bytes());
        buf.extend(msg_id.to_le_bytes());
        buf.extend(seq_no.to_le_bytes());
        buf.extend((body.len() as u32).to_le_bytes());
        buf.extend(body.iter().copied());

        encrypt_data(&mut buf, &self.auth_key, Side::Client);
        (buf.as_ref().to_vec(), msg_id)
    }

    /// Serialize and encrypt an RPC function.
    pub fn pack<R: RemoteCall>(&mut self, call: &R) -> (Vec<u8>, i64) {
        self.pack_body(&call.to_bytes(), true)
    }

    /// Decrypt an incoming server frame and split off the inner header.
    pub fn unpack(&self, frame: &mut [u8]) -> Result<DecryptedMessage, DecryptError> {
        let plaintext = decrypt_data(frame, &self.auth_key, Side::Server)
            .map_err(DecryptError::Crypto)?;
        if plaintext.len() < 32 {
            return Err(DecryptError::FrameTooShort);
        }

        let salt = i64::from_le_bytes(plaintext[..8].try_into().unwrap());
        let session_id = i64::from_le_bytes(plaintext[8..16].try_into().unwrap());
        let msg_id = i64::from_le_bytes(plaintext[16..24].try_into().unwrap());
        let seq_no = i32::from_le_bytes(plaintext[24..28].try_into().unwrap());
        let body_len = u32::from_le_bytes(plaintext[28..32].try_into().unwrap()) as usize;

        if session_id != self.session_id {
            return Err(DecryptError::SessionMismatch);
        }

        let body = plaintext[32..32 + body_len].to_vec();
        Ok(DecryptedMessage { salt, session_id, msg_id, seq_no, body })
    }
}
