//! The session-resume blob.
//!
//! A self-framed byte sequence that lets a host application reconnect
//! without re-running the key handshake. Writers always emit the current
//! format; readers accept every older format and default the fields it
//! lacks.

use std::fmt;

use tgcore_tl::{types, Cursor, Deserializable, Identifiable, Serializable};

use crate::DcAddress;

/// The format written by [`SessionBlob::to_bytes`].
pub const FORMAT_VERSION: u32 = 3;

/// Errors reading a persisted blob.
#[derive(Clone, Debug, PartialEq)]
pub enum BlobError {
    /// The format version is newer than this library understands.
    UnsupportedVersion(u32),
    /// The stored auth key is not 256 bytes.
    BadKeyLength(usize),
    /// The byte stream ended early or a field failed to decode.
    Decode(tgcore_tl::deserialize::Error),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion(v) => write!(f, "unknown blob format version {v}"),
            Self::BadKeyLength(len) => write!(f, "auth key of {len} bytes (expected 256)"),
            Self::Decode(e) => write!(f, "blob decode error: {e}"),
        }
    }
}

impl std::error::Error for BlobError {}

impl From<tgcore_tl::deserialize::Error> for BlobError {
    fn from(e: tgcore_tl::deserialize::Error) -> Self {
        Self::Decode(e)
    }
}

/// Everything needed to resume a session without a fresh handshake.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionBlob {
    /// Clock offset learned from the server.
    pub delta_time: i32,
    /// The home DC the key belongs to.
    pub dc: DcAddress,
    /// The negotiated 256-byte authorization key.
    pub auth_key: [u8; 256],
    /// The key's 64-bit identifier.
    pub auth_id: u64,
    /// The last known server salt.
    pub server_salt: u64,
    /// Update-state counters at save time.
    pub pts: u32,
    /// Secondary update counter.
    pub qts: u32,
    /// Date of the last applied update.
    pub date: u32,
    /// Known group-chat IDs.
    pub chat_ids: Vec<u32>,
}

impl SessionBlob {
    /// Serialize in the current format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        FORMAT_VERSION.serialize(&mut buf);
        self.delta_time.serialize(&mut buf);
        types::DcOption::CONSTRUCTOR_ID.serialize(&mut buf);
        types::DcOption {
            id: i32::from(self.dc.id),
            hostname: String::new(),
            ip_address: self.dc.host.clone(),
            port: i32::from(self.dc.port),
        }
        .serialize(&mut buf);
        self.auth_key.to_vec().serialize(&mut buf);
        self.auth_id.serialize(&mut buf);
        self.server_salt.serialize(&mut buf);
        self.pts.serialize(&mut buf);
        self.qts.serialize(&mut buf);
        self.date.serialize(&mut buf);
        self.chat_ids.serialize(&mut buf);
        buf
    }

    /// Parse any supported format. Fields a version lacks take their
    /// fresh-connection defaults.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlobError> {
        let mut cur = Cursor::from_slice(bytes);

        let format = u32::deserialize(&mut cur)?;
        if format > FORMAT_VERSION {
            return Err(BlobError::UnsupportedVersion(format));
        }

        let delta_time = i32::deserialize(&mut cur)?;
        let dc_id = u32::deserialize(&mut cur)?;
        if dc_id != types::DcOption::CONSTRUCTOR_ID {
            return Err(cur.unexpected_id(dc_id).into());
        }
        let dc = types::DcOption::deserialize(&mut cur)?;

        if format < 3 {
            // Obsolete formats stored the account phone here.
            let _legacy_self_phone = String::deserialize(&mut cur)?;
        }

        let auth_key_bytes = Vec::<u8>::deserialize(&mut cur)?;
        let auth_key: [u8; 256] = auth_key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| BlobError::BadKeyLength(auth_key_bytes.len()))?;

        let auth_id = u64::deserialize(&mut cur)?;
        let server_salt = u64::deserialize(&mut cur)?;

        let (mut pts, mut qts, mut date) = (1, 1, 1);
        if format >= 1 {
            pts = u32::deserialize(&mut cur)?;
            qts = u32::deserialize(&mut cur)?;
            date = u32::deserialize(&mut cur)?;
        }

        let chat_ids = if format >= 2 {
            Vec::<u32>::deserialize(&mut cur)?
        } else {
            Vec::new()
        };

        Ok(Self {
            delta_time,
            dc: DcAddress {
                id: dc.id as u16,
                host: dc.ip_address,
                port: dc.port as u16,
            },
            auth_key,
            auth_id,
            server_salt,
            pts,
            qts,
            date,
            chat_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionBlob {
        SessionBlob {
            delta_time: -2,
            dc: DcAddress { id: 2, host: "149.154.167.51".into(), port: 443 },
            auth_key: [0xAA; 256],
            auth_id: 0x1234_5678_9ABC_DEF0,
            server_salt: 0xCAFE_F00D_DEAD_BEEF,
            pts: 42,
            qts: 1,
            date: 1_500_000_000,
            chat_ids: vec![7, 11],
        }
    }

    /// Serialize a blob as an older writer would have.
    fn encode_with_version(blob: &SessionBlob, version: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        version.serialize(&mut buf);
        blob.delta_time.serialize(&mut buf);
        types::DcOption::CONSTRUCTOR_ID.serialize(&mut buf);
        types::DcOption {
            id: i32::from(blob.dc.id),
            hostname: String::new(),
            ip_address: blob.dc.host.clone(),
            port: i32::from(blob.dc.port),
        }
        .serialize(&mut buf);
        if version < 3 {
            "+15551234".to_string().serialize(&mut buf);
        }
        blob.auth_key.to_vec().serialize(&mut buf);
        blob.auth_id.serialize(&mut buf);
        blob.server_salt.serialize(&mut buf);
        if version >= 1 {
            blob.pts.serialize(&mut buf);
            blob.qts.serialize(&mut buf);
            blob.date.serialize(&mut buf);
        }
        if version >= 2 {
            blob.chat_ids.serialize(&mut buf);
        }
        buf
    }

    #[test]
    fn current_format_roundtrips_to_identical_bytes() {
        let blob = sample();
        let bytes = blob.to_bytes();
        let decoded = SessionBlob::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, blob);
        assert_eq!(decoded.to_bytes(), bytes, "re-encoding must be byte-identical");
    }

    #[test]
    fn version_2_reads_with_legacy_phone_skipped() {
        let blob = sample();
        let decoded = SessionBlob::from_bytes(&encode_with_version(&blob, 2)).unwrap();
        assert_eq!(decoded, blob);
    }

    #[test]
    fn version_1_defaults_chat_ids() {
        let blob = sample();
        let decoded = SessionBlob::from_bytes(&encode_with_version(&blob, 1)).unwrap();
        assert_eq!(decoded.pts, blob.pts);
        assert!(decoded.chat_ids.is_empty());
    }

    #[test]
    fn version_0_defaults_update_state() {
        let blob = sample();
        let decoded = SessionBlob::from_bytes(&encode_with_version(&blob, 0)).unwrap();
        assert_eq!((decoded.pts, decoded.qts, decoded.date), (1, 1, 1));
        assert_eq!(decoded.auth_key, blob.auth_key);
    }

    #[test]
    fn future_version_is_rejected() {
        let mut bytes = sample().to_bytes();
        bytes[0] = 9;
        assert_eq!(
            SessionBlob::from_bytes(&bytes),
            Err(BlobError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let bytes = sample().to_bytes();
        assert!(matches!(
            SessionBlob::from_bytes(&bytes[..40]),
            Err(BlobError::Decode(_))
        ));
    }
}
