//! Error types for the client layer.

use std::{fmt, io};

// ─── RpcError ─────────────────────────────────────────────────────────────────

/// An error returned by the server in response to an RPC call.
///
/// Numeric suffixes are stripped from the name and placed in
/// [`RpcError::value`]: `PHONE_MIGRATE_4` becomes
/// `RpcError { code: 303, name: "PHONE_MIGRATE", value: Some(4) }`.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// HTTP-like status code.
    pub code: i32,
    /// Error name in SCREAMING_SNAKE_CASE with digits removed.
    pub name: String,
    /// Numeric suffix extracted from the name, if any.
    pub value: Option<u32>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC {}: {}", self.code, self.name)?;
        if let Some(v) = self.value {
            write!(f, " (value: {v})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

/// Which subject the server wants moved to another DC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrateKind {
    /// `PHONE_MIGRATE_X` — the phone number lives on DC X.
    Phone,
    /// `NETWORK_MIGRATE_X` — this network should talk to DC X.
    Network,
    /// `USER_MIGRATE_X` — the signed-in user lives on DC X.
    User,
}

/// Why the server considers the session unauthorized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnauthorizedKind {
    /// The session expired and a fresh sign-in is required.
    SessionExpired,
    /// The session was revoked from another device.
    SessionRevoked,
    /// Two-step verification is enabled; a password is required.
    PasswordNeeded,
    /// The auth key is not bound to any authorization.
    KeyUnregistered,
}

impl RpcError {
    /// Parse a raw error message like `"FLOOD_WAIT_30"`.
    pub fn from_telegram(code: i32, message: &str) -> Self {
        if let Some(idx) = message.rfind('_') {
            let suffix = &message[idx + 1..];
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(v) = suffix.parse::<u32>() {
                    return Self { code, name: message[..idx].to_string(), value: Some(v) };
                }
            }
        }
        Self { code, name: message.to_string(), value: None }
    }

    /// Match on the error name, with optional wildcard prefix/suffix `'*'`.
    pub fn is(&self, pattern: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('*') {
            self.name.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.name.ends_with(suffix)
        } else {
            self.name == pattern
        }
    }

    /// If this is a migration error, the kind and target DC.
    pub fn migrate(&self) -> Option<(MigrateKind, u16)> {
        let kind = match self.name.as_str() {
            "PHONE_MIGRATE" => MigrateKind::Phone,
            "NETWORK_MIGRATE" => MigrateKind::Network,
            "USER_MIGRATE" => MigrateKind::User,
            _ => return None,
        };
        self.value.map(|dc| (kind, dc as u16))
    }

    /// If this is an authorization failure, its precise kind.
    pub fn unauthorized(&self) -> Option<UnauthorizedKind> {
        match self.name.as_str() {
            "SESSION_EXPIRED" => Some(UnauthorizedKind::SessionExpired),
            "SESSION_REVOKED" => Some(UnauthorizedKind::SessionRevoked),
            "SESSION_PASSWORD_NEEDED" => Some(UnauthorizedKind::PasswordNeeded),
            "AUTH_KEY_UNREGISTERED" => Some(UnauthorizedKind::KeyUnregistered),
            _ => None,
        }
    }
}

// ─── InvocationError ──────────────────────────────────────────────────────────

/// The error type returned from anything that talks to the server.
#[derive(Debug)]
pub enum InvocationError {
    /// The server rejected the request.
    Rpc(RpcError),
    /// Network / I/O failure.
    Io(io::Error),
    /// A response failed to decode.
    Decode(tgcore_tl::deserialize::Error),
    /// An incoming frame failed decryption or integrity checks.
    Crypto(tgcore_mtproto::session::DecryptError),
    /// The auth key handshake aborted.
    Handshake(tgcore_mtproto::authentication::Error),
    /// The byte stream could not be de-framed.
    Framing(tgcore_mtproto::transport::FramingError),
    /// The server redirected us to another DC.
    Migrate(MigrateKind, u16),
    /// The session is not (or no longer) authorized.
    Unauthorized(UnauthorizedKind),
    /// The connection this request was riding on went away.
    Dropped,
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpc(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Crypto(e) => write!(f, "decrypt error: {e}"),
            Self::Handshake(e) => write!(f, "handshake error: {e}"),
            Self::Framing(e) => write!(f, "framing error: {e}"),
            Self::Migrate(kind, dc) => write!(f, "migrate ({kind:?}) to DC{dc}"),
            Self::Unauthorized(kind) => write!(f, "unauthorized: {kind:?}"),
            Self::Dropped => write!(f, "request dropped"),
        }
    }
}

impl std::error::Error for InvocationError {}

impl From<io::Error> for InvocationError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<tgcore_tl::deserialize::Error> for InvocationError {
    fn from(e: tgcore_tl::deserialize::Error) -> Self {
        Self::Decode(e)
    }
}

impl From<tgcore_mtproto::session::DecryptError> for InvocationError {
    fn from(e: tgcore_mtproto::session::DecryptError) -> Self {
        Self::Crypto(e)
    }
}

impl From<tgcore_mtproto::authentication::Error> for InvocationError {
    fn from(e: tgcore_mtproto::authentication::Error) -> Self {
        Self::Handshake(e)
    }
}

impl From<tgcore_mtproto::transport::FramingError> for InvocationError {
    fn from(e: tgcore_mtproto::transport::FramingError) -> Self {
        Self::Framing(e)
    }
}

impl InvocationError {
    /// Returns `true` if this is the named RPC error (supports `'*'`).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Rpc(e) => e.is(pattern),
            _ => false,
        }
    }

    /// Promote an RPC-level migration/authorization error to its typed
    /// form; leave everything else untouched.
    pub(crate) fn classify(self) -> Self {
        match self {
            Self::Rpc(e) => {
                if let Some((kind, dc)) = e.migrate() {
                    Self::Migrate(kind, dc)
                } else if let Some(kind) = e.unauthorized() {
                    Self::Unauthorized(kind)
                } else {
                    Self::Rpc(e)
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_suffix() {
        let e = RpcError::from_telegram(303, "PHONE_MIGRATE_4");
        assert_eq!(e.name, "PHONE_MIGRATE");
        assert_eq!(e.value, Some(4));
        assert_eq!(e.migrate(), Some((MigrateKind::Phone, 4)));
    }

    #[test]
    fn wildcard_matching() {
        let e = RpcError::from_telegram(400, "PHONE_CODE_INVALID");
        assert!(e.is("PHONE_CODE_*"));
        assert!(e.is("*_INVALID"));
        assert!(!e.is("PHONE_CODE"));
    }

    #[test]
    fn unauthorized_kinds() {
        for (name, kind) in [
            ("SESSION_EXPIRED", UnauthorizedKind::SessionExpired),
            ("SESSION_REVOKED", UnauthorizedKind::SessionRevoked),
            ("SESSION_PASSWORD_NEEDED", UnauthorizedKind::PasswordNeeded),
            ("AUTH_KEY_UNREGISTERED", UnauthorizedKind::KeyUnregistered),
        ] {
            assert_eq!(RpcError::from_telegram(401, name).unauthorized(), Some(kind));
        }
        assert_eq!(RpcError::from_telegram(400, "FLOOD_WAIT").unauthorized(), None);
    }

    #[test]
    fn classification_promotes_migrations() {
        let err = InvocationError::Rpc(RpcError::from_telegram(303, "USER_MIGRATE_5")).classify();
        assert!(matches!(err, InvocationError::Migrate(MigrateKind::User, 5)));
    }
}
