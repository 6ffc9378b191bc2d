//! Message identifiers and the plaintext envelope.

use std::time::{SystemTime, UNIX_EPOCH};

/// A 64-bit message identifier.
///
/// Derived from the server-corrected clock: the upper 32 bits carry the
/// corrected Unix second, bits 22–31 the millisecond within that second,
/// and bits 2–21 random jitter. The two lowest bits are always zero for
/// client-originated messages.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MsgId(pub i64);

impl MsgId {
    /// Build an ID from an explicit clock reading; the session layer is
    /// responsible for monotonicity.
    pub(crate) fn from_parts(now_ms: i64, delta_time: i32, rand: u32) -> Self {
        let corrected_secs = (now_ms + i64::from(delta_time) * 1000) / 1000;
        let id = (corrected_secs << 32)
            | ((now_ms % 1000) << 22)
            | (i64::from(rand & 0xF_FFFF) << 2);
        Self(id)
    }

    /// The Unix second encoded in the upper half of the ID.
    pub fn unix_time(&self) -> i64 {
        self.0 >> 32
    }
}

/// Milliseconds since the Unix epoch from the system clock.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// A framed message ready to be sent before key exchange.
#[derive(Debug)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: MsgId,
    /// Session-scoped sequence number.
    pub seq_no: i32,
    /// The serialized body (constructor ID + fields).
    pub body: Vec<u8>,
}

impl Message {
    /// Construct a new plaintext message (used before key exchange).
    pub fn plaintext(id: MsgId, seq_no: i32, body: Vec<u8>) -> Self {
        Self { id, seq_no, body }
    }

    /// Serialize into the plaintext wire format:
    ///
    /// ```text
    /// auth_key_id:long  (0 for plaintext)
    /// message_id:long
    /// message_data_length:int
    /// message_data:bytes
    /// ```
    pub fn to_plaintext_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + 8 + 4 + self.body.len());
        buf.extend(0i64.to_le_bytes());
        buf.extend(self.id.0.to_le_bytes());
        buf.extend((self.body.len() as u32).to_le_bytes());
        buf.extend(&self.body);
        buf
    }
}

/// Split a plaintext frame back into `(msg_id, body)`.
///
/// Returns `None` if the frame is malformed or its `auth_key_id` is not
/// zero (i.e. it is actually encrypted).
pub fn parse_plaintext_frame(frame: &[u8]) -> Option<(MsgId, &[u8])> {
    if frame.len() < 20 {
        return None;
    }
    if u64::from_le_bytes(frame[..8].try_into().unwrap()) != 0 {
        return None;
    }
    let msg_id = i64::from_le_bytes(frame[8..16].try_into().unwrap());
    let len = u32::from_le_bytes(frame[16..20].try_into().unwrap()) as usize;
    if 20 + len > frame.len() {
        return None;
    }
    Some((MsgId(msg_id), &frame[20..20 + len]))
}
