//! AES-256 in IGE (Infinite Garble Extension) mode.
//!
//! IGE chains both the previous ciphertext and the previous plaintext
//! block into each encryption, so a single corrupted block garbles the
//! rest of the stream. The 32-byte IV holds the two chain seeds: the
//! first half seeds the ciphertext chain, the second the plaintext chain.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;

const BLOCK: usize = 16;

/// Encrypt `buffer` in place. The length must be a multiple of 16.
pub fn ige_encrypt(buffer: &mut [u8], key: &[u8; 32], iv: &[u8; 32]) {
    assert!(buffer.len() % BLOCK == 0, "IGE input must be block-aligned");
    let cipher = Aes256::new(GenericArray::from_slice(key));

    let mut cipher_chain: [u8; BLOCK] = iv[..BLOCK].try_into().unwrap();
    let mut plain_chain: [u8; BLOCK] = iv[BLOCK..].try_into().unwrap();

    for chunk in buffer.chunks_exact_mut(BLOCK) {
        let plain: [u8; BLOCK] = chunk.try_into().unwrap();
        for (b, c) in chunk.iter_mut().zip(&cipher_chain) {
            *b ^= c;
        }
        cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
        for (b, p) in chunk.iter_mut().zip(&plain_chain) {
            *b ^= p;
        }
        cipher_chain.copy_from_slice(chunk);
        plain_chain = plain;
    }
}

/// Decrypt `buffer` in place. The length must be a multiple of 16.
pub fn ige_decrypt(buffer: &mut [u8], key: &[u8; 32], iv: &[u8; 32]) {
    assert!(buffer.len() % BLOCK == 0, "IGE input must be block-aligned");
    let cipher = Aes256::new(GenericArray::from_slice(key));

    let mut cipher_chain: [u8; BLOCK] = iv[..BLOCK].try_into().unwrap();
    let mut plain_chain: [u8; BLOCK] = iv[BLOCK..].try_into().unwrap();

    for chunk in buffer.chunks_exact_mut(BLOCK) {
        let encrypted: [u8; BLOCK] = chunk.try_into().unwrap();
        for (b, p) in chunk.iter_mut().zip(&plain_chain) {
            *b ^= p;
        }
        cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
        for (b, c) in chunk.iter_mut().zip(&cipher_chain) {
            *b ^= c;
        }
        cipher_chain = encrypted;
        plain_chain.copy_from_slice(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; 32] {
        core::array::from_fn(|i| i as u8)
    }

    fn iv() -> [u8; 32] {
        core::array::from_fn(|i| (i * 3) as u8)
    }

    #[test]
    fn roundtrip() {
        let original: Vec<u8> = (0u8..64).collect();
        let mut buf = original.clone();
        ige_encrypt(&mut buf, &key(), &iv());
        assert_ne!(buf, original);
        ige_decrypt(&mut buf, &key(), &iv());
        assert_eq!(buf, original);
    }

    #[test]
    fn garble_propagates_forward() {
        let mut a: Vec<u8> = vec![0u8; 64];
        let mut b = a.clone();
        b[0] ^= 1; // flip one bit in the first plaintext block
        ige_encrypt(&mut a, &key(), &iv());
        ige_encrypt(&mut b, &key(), &iv());
        // Every subsequent ciphertext block must differ too.
        for (blk_a, blk_b) in a.chunks(16).zip(b.chunks(16)) {
            assert_ne!(blk_a, blk_b);
        }
    }

    #[test]
    fn iv_halves_are_independent() {
        let mut iv2 = iv();
        iv2[16] ^= 0xff;
        let mut a = vec![0u8; 32];
        let mut b = vec![0u8; 32];
        ige_encrypt(&mut a, &key(), &iv());
        ige_encrypt(&mut b, &key(), &iv2);
        assert_ne!(a, b);
    }
}
