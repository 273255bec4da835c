use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

use crate::constants::{CONTENT_KEY_LEN, IV_LEN, TAG_LEN};
use crate::error::{CseError, CseResult};

/// Output of the content-cipher stage: the GCM nonce plus the AEAD output
/// split into ciphertext and 128-bit tag.
pub(crate) struct SealedPayload {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Generate a fresh 256-bit content key from the OS CSPRNG.
///
/// Exactly one key per encryption call, wiped on drop. Must never be derived
/// from caller-supplied or otherwise predictable data.
pub(crate) fn generate_content_key() -> Zeroizing<[u8; CONTENT_KEY_LEN]> {
    use aes_gcm::aead::rand_core::RngCore;
    let mut key = Zeroizing::new([0u8; CONTENT_KEY_LEN]);
    OsRng.fill_bytes(key.as_mut_slice());
    key
}

/// AES-256-GCM encryption of the plaintext payload.
///
/// A fresh 96-bit IV is generated per call; together with the per-call
/// content key this makes key/IV reuse structurally impossible. The AAD is
/// the ASCII bytes of the base64url-encoded header, so the header is
/// authenticated but not encrypted. The AEAD emits ciphertext || tag; the
/// final 16 bytes are split off as the tag.
///
/// # Errors
///
/// Returns [`CseError::UnsupportedAlgorithm`] if the AEAD refuses the
/// operation (a capability failure, not a per-call condition).
pub(crate) fn seal_payload(
    content_key: &[u8; CONTENT_KEY_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> CseResult<SealedPayload> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(content_key));

    use aes_gcm::aead::rand_core::RngCore;
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut combined = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CseError::UnsupportedAlgorithm("AES-GCM with AAD rejected".into()))?;

    let tag_bytes = combined.split_off(combined.len() - TAG_LEN);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);

    Ok(SealedPayload {
        iv,
        ciphertext: combined,
        tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(sealed: &SealedPayload, key: &[u8; CONTENT_KEY_LEN], aad: &[u8]) -> Option<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        let mut combined = sealed.ciphertext.clone();
        combined.extend_from_slice(&sealed.tag);
        cipher
            .decrypt(
                Nonce::from_slice(&sealed.iv),
                Payload {
                    msg: &combined,
                    aad,
                },
            )
            .ok()
    }

    #[test]
    fn seal_open_round_trip() {
        let key = generate_content_key();
        let sealed = seal_payload(&key, b"{\"cvc\":\"737\"}", b"aad").unwrap();
        assert_eq!(sealed.ciphertext.len(), 13);
        assert_eq!(open(&sealed, &key, b"aad").unwrap(), b"{\"cvc\":\"737\"}");
    }

    #[test]
    fn tampered_aad_fails_authentication() {
        let key = generate_content_key();
        let sealed = seal_payload(&key, b"payload", b"header").unwrap();
        assert!(open(&sealed, &key, b"header").is_some());
        assert!(open(&sealed, &key, b"Header").is_none());
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let key = generate_content_key();
        let mut sealed = seal_payload(&key, b"payload", b"aad").unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        assert!(open(&sealed, &key, b"aad").is_none());
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let key = generate_content_key();
        let other = generate_content_key();
        let sealed = seal_payload(&key, b"payload", b"aad").unwrap();
        assert!(open(&sealed, &other, b"aad").is_none());
    }

    #[test]
    fn content_keys_and_ivs_are_unique_per_call() {
        let first_key = generate_content_key();
        let second_key = generate_content_key();
        assert_ne!(*first_key, *second_key);

        let first = seal_payload(&first_key, b"same input", b"aad").unwrap();
        let second = seal_payload(&first_key, b"same input", b"aad").unwrap();
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }
}
