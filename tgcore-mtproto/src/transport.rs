//! Transport framing.
//!
//! The session layer deals in whole packets of opaque bytes; a [`Framing`]
//! turns packets into stream bytes and back so any byte-stream transport
//! (plain TCP, a proxy tunnel) can carry them. Two codecs are provided:
//! abridged (1-byte init, compact length) and intermediate (4-byte init,
//! plain 4-byte length).

use std::fmt;

/// Upper bound on a single frame. Anything larger is a corrupt stream.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Errors surfaced while de-framing the byte stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramingError {
    /// The stream announced a frame larger than [`MAX_FRAME_LEN`].
    FrameTooLarge {
        /// The announced length in bytes.
        len: usize,
    },
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameTooLarge { len } => write!(f, "announced frame of {len} bytes"),
        }
    }
}

impl std::error::Error for FramingError {}

/// A frame codec. Stateful: the first packed frame may carry an init
/// preamble identifying the framing to the server.
pub trait Framing: Send {
    /// Frame `payload` into `out` (appending).
    fn pack(&mut self, payload: &[u8], out: &mut Vec<u8>);

    /// Try to extract one complete frame from the front of `input`.
    ///
    /// Returns `Ok(Some((consumed, frame)))` when a whole frame is
    /// available, `Ok(None)` when more bytes are needed.
    fn unpack(&mut self, input: &[u8]) -> Result<Option<(usize, Vec<u8>)>, FramingError>;
}

// ─── Abridged ────────────────────────────────────────────────────────────────

/// Abridged framing: init byte `0xef`, then each frame is
/// `[len/4 as 1 byte]` or `[0x7f][len/4 as 3 LE bytes]` followed by the
/// payload. Payload lengths are a multiple of 4.
#[derive(Debug, Default)]
pub struct Abridged {
    init_sent: bool,
}

impl Abridged {
    /// A codec that has not yet sent its init byte.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Framing for Abridged {
    fn pack(&mut self, payload: &[u8], out: &mut Vec<u8>) {
        if !self.init_sent {
            out.push(0xef);
            self.init_sent = true;
        }
        let words = payload.len() / 4;
        if words < 0x7f {
            out.push(words as u8);
        } else {
            out.push(0x7f);
            out.push((words & 0xff) as u8);
            out.push(((words >> 8) & 0xff) as u8);
            out.push(((words >> 16) & 0xff) as u8);
        }
        out.extend_from_slice(payload);
    }

    fn unpack(&mut self, input: &[u8]) -> Result<Option<(usize, Vec<u8>)>, FramingError> {
        let Some(&first) = input.first() else {
            return Ok(None);
        };
        let (header, words) = if first < 0x7f {
            (1, first as usize)
        } else {
            if input.len() < 4 {
                return Ok(None);
            }
            (4, input[1] as usize | (input[2] as usize) << 8 | (input[3] as usize) << 16)
        };
        let len = words * 4;
        if len > MAX_FRAME_LEN {
            return Err(FramingError::FrameTooLarge { len });
        }
        if input.len() < header + len {
            return Ok(None);
        }
        Ok(Some((header + len, input[header..header + len].to_vec())))
    }
}

// ─── Intermediate ────────────────────────────────────────────────────────────

/// Intermediate framing: init bytes `0xeeeeeeee`, then each frame is
/// `[len as 4 LE bytes][payload]`.
#[derive(Debug, Default)]
pub struct Intermediate {
    init_sent: bool,
}

impl Intermediate {
    /// A codec that has not yet sent its init bytes.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Framing for Intermediate {
    fn pack(&mut self, payload: &[u8], out: &mut Vec<u8>) {
        if !self.init_sent {
            out.extend_from_slice(&[0xee, 0xee, 0xee, 0xee]);
            self.init_sent = true;
        }
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
    }

    fn unpack(&mut self, input: &[u8]) -> Result<Option<(usize, Vec<u8>)>, FramingError> {
        if input.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_le_bytes(input[..4].try_into().unwrap()) as usize;
        if len > MAX_FRAME_LEN {
            return Err(FramingError::FrameTooLarge { len });
        }
        if input.len() < 4 + len {
            return Ok(None);
        }
        Ok(Some((4 + len, input[4..4 + len].to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abridged_init_byte_sent_once() {
        let mut codec = Abridged::new();
        let mut out = Vec::new();
        codec.pack(&[0u8; 4], &mut out);
        assert_eq!(out[0], 0xef);
        let first_len = out.len();
        codec.pack(&[0u8; 4], &mut out);
        assert_ne!(out[first_len], 0xef);
    }

    #[test]
    fn abridged_roundtrip_small_and_large() {
        let mut tx = Abridged::new();
        let mut rx = Abridged::new();
        for len in [4usize, 64, 0x7f * 4, 0x80 * 4, 1 << 16] {
            let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut wire = Vec::new();
            tx.pack(&payload, &mut wire);
            let stream = if wire.first() == Some(&0xef) { &wire[1..] } else { &wire[..] };
            let (consumed, frame) = rx.unpack(stream).unwrap().unwrap();
            assert_eq!(consumed, stream.len());
            assert_eq!(frame, payload);
        }
    }

    #[test]
    fn intermediate_roundtrip() {
        let mut tx = Intermediate::new();
        let mut rx = Intermediate::new();
        let payload = vec![7u8; 100];
        let mut wire = Vec::new();
        tx.pack(&payload, &mut wire);
        assert_eq!(&wire[..4], &[0xee; 4]);
        let (consumed, frame) = rx.unpack(&wire[4..]).unwrap().unwrap();
        assert_eq!(consumed, wire.len() - 4);
        assert_eq!(frame, payload);
    }

    #[test]
    fn partial_input_yields_none() {
        let mut rx = Intermediate::new();
        assert_eq!(rx.unpack(&[10, 0, 0]), Ok(None));
        assert_eq!(rx.unpack(&[10, 0, 0, 0, 1, 2]), Ok(None));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut rx = Intermediate::new();
        let wire = (u32::MAX).to_le_bytes();
        assert!(matches!(
            rx.unpack(&wire),
            Err(FramingError::FrameTooLarge { .. })
        ));
    }
}
