//! Cryptographic primitives for MTProto v1.
//!
//! Provides:
//! - AES-256-IGE encryption/decryption
//! - SHA-1 / SHA-256 hash macros
//! - Pollard-rho PQ factorization
//! - RSA encryption of the handshake inner payload
//! - `AuthKey` — 256-byte session key
//! - The v1 message envelope (SHA-1 key derivation, `msg_key` checks)
//! - DH nonce→key derivation for the handshake's temporary cipher

#![deny(unsafe_code)]

pub mod aes;
mod auth_key;
mod deque_buffer;
mod factorize;
pub mod rsa;
mod sha;

pub use auth_key::AuthKey;
pub use deque_buffer::DequeBuffer;
pub use factorize::{factorize, FactorizeError};

// ─── v1 message envelope ─────────────────────────────────────────────────────

/// Errors from [`decrypt_data`].
#[derive(Clone, Debug, PartialEq)]
pub enum DecryptError {
    /// Ciphertext too short, not block-aligned, or inner length out of range.
    InvalidBuffer,
    /// The `auth_key_id` in the ciphertext does not match our key.
    AuthKeyMismatch,
    /// The `msg_key` in the ciphertext does not match our computed value.
    MessageKeyMismatch,
}

impl std::fmt::Display for DecryptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBuffer => write!(f, "invalid ciphertext buffer"),
            Self::AuthKeyMismatch => write!(f, "auth_key_id mismatch"),
            Self::MessageKeyMismatch => write!(f, "msg_key mismatch"),
        }
    }
}
impl std::error::Error for DecryptError {}

/// Which party produced a message. The key schedule differs per sender so
/// request and response streams never share cipher state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Message authored by the client.
    Client,
    /// Message authored by the server.
    Server,
}

impl Side {
    fn x(&self) -> usize {
        match self {
            Side::Client => 0,
            Side::Server => 8,
        }
    }
}

/// The v1 key schedule: four SHA-1 digests over `msg_key` interleaved with
/// fixed 32-byte windows of the auth key, sliced into an AES key and IV.
fn calc_key(auth_key: &AuthKey, msg_key: &[u8; 16], side: Side) -> ([u8; 32], [u8; 32]) {
    let x = side.x();
    let k = &auth_key.data;

    let a = sha1!(msg_key, &k[x..x + 32]);
    let b = sha1!(&k[32 + x..48 + x], msg_key, &k[48 + x..64 + x]);
    let c = sha1!(&k[64 + x..96 + x], msg_key);
    let d = sha1!(msg_key, &k[96 + x..128 + x]);

    let mut aes_key = [0u8; 32];
    aes_key[..8].copy_from_slice(&a[..8]);
    aes_key[8..20].copy_from_slice(&b[8..20]);
    aes_key[20..].copy_from_slice(&c[4..16]);

    let mut aes_iv = [0u8; 32];
    aes_iv[..12].copy_from_slice(&a[8..20]);
    aes_iv[12..20].copy_from_slice(&b[..8]);
    aes_iv[20..24].copy_from_slice(&c[16..]);
    aes_iv[24..].copy_from_slice(&d[..8]);

    (aes_key, aes_iv)
}

fn padding_len(len: usize) -> usize {
    (16 - len % 16) % 16
}

/// Encrypt `buffer` (in place, with prepended header) as `side`.
///
/// `buffer` must hold the full inner envelope
/// `salt ‖ session_id ‖ msg_id ‖ seq_no ‖ len ‖ body`. After this call it
/// contains `auth_id ‖ msg_key ‖ ciphertext`.
pub fn encrypt_data(buffer: &mut DequeBuffer, auth_key: &AuthKey, side: Side) {
    let mut rnd = [0u8; 16];
    getrandom::getrandom(&mut rnd).expect("getrandom failed");
    do_encrypt_data(buffer, auth_key, side, &rnd);
}

pub(crate) fn do_encrypt_data(
    buffer: &mut DequeBuffer,
    auth_key: &AuthKey,
    side: Side,
    rnd: &[u8; 16],
) {
    // msg_key covers the plaintext *before* padding.
    let sha = sha1!(buffer.as_ref());
    let mut msg_key = [0u8; 16];
    msg_key.copy_from_slice(&sha[4..]);

    let pad = padding_len(buffer.len());
    buffer.extend(rnd.iter().take(pad).copied());

    let (key, iv) = calc_key(auth_key, &msg_key, side);
    aes::ige_encrypt(buffer.as_mut(), &key, &iv);

    buffer.extend_front(&msg_key);
    buffer.extend_front(&auth_key.key_id);
}

/// Decrypt a v1 ciphertext produced by `side`.
///
/// `buffer` must start with `auth_id ‖ msg_key ‖ ciphertext`. The inner
/// length field is used to recompute `msg_key` over the unpadded envelope;
/// a mismatch rejects the message. On success returns the plaintext slice
/// (header and body, without padding trimmed — the caller reads the length
/// field it already trusts).
pub fn decrypt_data<'a>(
    buffer: &'a mut [u8],
    auth_key: &AuthKey,
    side: Side,
) -> Result<&'a mut [u8], DecryptError> {
    if buffer.len() < 24 + 32 || (buffer.len() - 24) % 16 != 0 {
        return Err(DecryptError::InvalidBuffer);
    }
    if auth_key.key_id != buffer[..8] {
        return Err(DecryptError::AuthKeyMismatch);
    }
    let mut msg_key = [0u8; 16];
    msg_key.copy_from_slice(&buffer[8..24]);

    let (key, iv) = calc_key(auth_key, &msg_key, side);
    aes::ige_decrypt(&mut buffer[24..], &key, &iv);
    let plaintext = &mut buffer[24..];

    // salt(8) + session_id(8) + msg_id(8) + seq_no(4) + len(4)
    let body_len = u32::from_le_bytes(plaintext[28..32].try_into().unwrap()) as usize;
    let total = 32 + body_len;
    if total > plaintext.len() {
        return Err(DecryptError::InvalidBuffer);
    }

    let our_key = sha1!(&plaintext[..total]);
    if msg_key != our_key[4..] {
        return Err(DecryptError::MessageKeyMismatch);
    }
    Ok(plaintext)
}

/// Derive `(key, iv)` for the handshake's `encrypted_answer` from the nonces.
pub fn generate_key_data_from_nonce(
    server_nonce: &[u8; 16],
    new_nonce: &[u8; 32],
) -> ([u8; 32], [u8; 32]) {
    let h1 = sha1!(new_nonce, server_nonce);
    let h2 = sha1!(server_nonce, new_nonce);
    let h3 = sha1!(new_nonce, new_nonce);

    let mut key = [0u8; 32];
    key[..20].copy_from_slice(&h1);
    key[20..].copy_from_slice(&h2[..12]);

    let mut iv = [0u8; 32];
    iv[..8].copy_from_slice(&h2[12..]);
    iv[8..28].copy_from_slice(&h3);
    iv[28..].copy_from_slice(&new_nonce[..4]);

    (key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &[u8]) -> DequeBuffer {
        let mut buf = DequeBuffer::with_capacity(32 + body.len(), 24);
        buf.extend(0x1111_2222_3333_4444u64.to_le_bytes()); // salt
        buf.extend(0x5555_6666_7777_8888u64.to_le_bytes()); // session_id
        buf.extend(0x0102_0304_0506_0700u64.to_le_bytes()); // msg_id
        buf.extend(1i32.to_le_bytes()); // seq_no
        buf.extend((body.len() as u32).to_le_bytes());
        buf.extend(body.iter().copied());
        buf
    }

    fn key() -> AuthKey {
        AuthKey::from_bytes(core::array::from_fn(|i| (i * 7) as u8))
    }

    #[test]
    fn envelope_roundtrip() {
        let body = b"abcdefgh".to_vec();
        let mut buf = envelope(&body);
        let plain_before = buf.as_ref().to_vec();

        do_encrypt_data(&mut buf, &key(), Side::Server, &[0x55; 16]);
        let mut wire = buf.as_ref().to_vec();
        assert_eq!(&wire[..8], &key().key_id);

        let plain = decrypt_data(&mut wire, &key(), Side::Server).unwrap();
        assert_eq!(&plain[..plain_before.len()], &plain_before[..]);
    }

    #[test]
    fn sides_derive_distinct_keys() {
        let msg_key = [9u8; 16];
        let (kc, ivc) = calc_key(&key(), &msg_key, Side::Client);
        let (ks, ivs) = calc_key(&key(), &msg_key, Side::Server);
        assert_ne!(kc, ks);
        assert_ne!(ivc, ivs);
    }

    #[test]
    fn tampered_msg_key_is_rejected() {
        let mut buf = envelope(b"payload!");
        do_encrypt_data(&mut buf, &key(), Side::Server, &[0; 16]);
        let mut wire = buf.as_ref().to_vec();
        wire[10] ^= 0x01;
        assert_eq!(
            decrypt_data(&mut wire, &key(), Side::Server),
            Err(DecryptError::MessageKeyMismatch)
        );
    }

    #[test]
    fn wrong_auth_key_is_rejected() {
        let mut buf = envelope(b"payload!");
        do_encrypt_data(&mut buf, &key(), Side::Server, &[0; 16]);
        let mut wire = buf.as_ref().to_vec();
        let other = AuthKey::from_bytes([0xEE; 256]);
        assert_eq!(
            decrypt_data(&mut wire, &other, Side::Server),
            Err(DecryptError::AuthKeyMismatch)
        );
    }

    #[test]
    fn nonce_key_material_shape() {
        let (key, iv) = generate_key_data_from_nonce(&[1; 16], &[2; 32]);
        let h2 = sha1!(&[1u8; 16], &[2u8; 32]);
        assert_eq!(&key[20..], &h2[..12]);
        assert_eq!(&iv[28..], &[2u8; 4]);
    }

    #[test]
    fn sha_macros_concatenate_their_inputs() {
        assert_eq!(sha1!(b"ab", b"cd"), sha1!(b"abcd"));
        assert_eq!(sha256!(b"ab", b"cd"), sha256!(b"abcd"));
        assert_ne!(sha1!(b"ab")[..], sha256!(b"ab")[..20]);
    }
}
