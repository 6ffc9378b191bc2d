//! RSA encryption of the key-exchange inner payload.
//!
//! MTProto v1 does not use a standard padding scheme: the plaintext is
//! prefixed with its own SHA-1 digest, padded with random bytes to 255
//! bytes and raised to the public exponent directly.

use num_bigint::BigUint;

use crate::sha1;

/// An RSA public key `(n, e)`.
pub struct Key {
    n: BigUint,
    e: BigUint,
}

impl Key {
    /// Parse decimal `n` and `e` strings.
    pub fn new(n: &str, e: &str) -> Option<Self> {
        Some(Self {
            n: BigUint::parse_bytes(n.as_bytes(), 10)?,
            e: BigUint::parse_bytes(e.as_bytes(), 10)?,
        })
    }

    /// The 64-bit fingerprint the server advertises for this key.
    ///
    /// Computed as the lower 8 bytes of SHA-1 over the serialized
    /// `rsa_public_key n:bytes e:bytes` pair, interpreted little-endian.
    pub fn fingerprint(&self) -> i64 {
        let mut buf = Vec::new();
        write_tl_bytes(&self.n.to_bytes_be(), &mut buf);
        write_tl_bytes(&self.e.to_bytes_be(), &mut buf);
        let sha = sha1!(&buf);
        i64::from_le_bytes(sha[12..20].try_into().unwrap())
    }
}

/// Length-prefixed, 4-byte-aligned byte string as the schema serializer
/// emits it. Local copy so this crate stays free of the codec crate.
fn write_tl_bytes(data: &[u8], buf: &mut Vec<u8>) {
    let len = data.len();
    let header = if len <= 253 {
        buf.push(len as u8);
        1
    } else {
        buf.push(0xfe);
        buf.push((len & 0xff) as u8);
        buf.push(((len >> 8) & 0xff) as u8);
        buf.push(((len >> 16) & 0xff) as u8);
        4
    };
    buf.extend_from_slice(data);
    let padding = (4 - (header + len) % 4) % 4;
    buf.extend(std::iter::repeat(0u8).take(padding));
}

/// Encrypt `data` with the SHA-1-prefixed scheme.
///
/// `random_bytes` supplies the tail padding; `data` must leave room for
/// the 20-byte digest within the 255-byte block.
pub fn encrypt_hashed(data: &[u8], key: &Key, random_bytes: &[u8; 256]) -> Vec<u8> {
    assert!(data.len() <= 255 - 20, "payload too large for one RSA block");

    let mut padded = Vec::with_capacity(255);
    padded.extend_from_slice(&sha1!(data));
    padded.extend_from_slice(data);
    let pad = 255 - padded.len();
    padded.extend_from_slice(&random_bytes[..pad]);

    let payload = BigUint::from_bytes_be(&padded);
    let encrypted = payload.modpow(&key.e, &key.n);
    let mut block = encrypted.to_bytes_be();
    while block.len() < 256 {
        block.insert(0, 0);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_key() -> Key {
        // 3233 = 61 × 53, e = 17: the classic toy RSA pair.
        Key::new("3233", "17").unwrap()
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = tiny_key().fingerprint();
        let b = tiny_key().fingerprint();
        assert_eq!(a, b);
        assert_ne!(a, 0);
    }

    #[test]
    fn fingerprint_depends_on_exponent() {
        let a = Key::new("3233", "17").unwrap().fingerprint();
        let b = Key::new("3233", "7").unwrap().fingerprint();
        assert_ne!(a, b);
    }

    #[test]
    fn encrypted_block_is_always_256_bytes() {
        let random = [0xAB; 256];
        let block = encrypt_hashed(b"hello", &tiny_key(), &random);
        assert_eq!(block.len(), 256);
    }
}
