use rsa::{RsaPublicKey, oaep, traits::RandomizedEncryptor};
use sha2::Sha256;

use crate::error::{CseError, CseResult};

/**
    RSA-OAEP-SHA256 wrapping of the content encryption key.

    Parameters (all protocol-mandated, not implementation choices):
      Hash: SHA-256
      MGF: MGF1-SHA-256
      Label: empty (default P-Source)

    Input: the raw 32-byte content key.
    Key: the merchant RSA public key, already validated by the key parser.
    Output: OAEP ciphertext, sized to the RSA modulus (256 bytes for a
            2048-bit key).
*/
pub(crate) fn wrap_content_key(
    public_key: &RsaPublicKey,
    content_key: &[u8],
) -> CseResult<Vec<u8>> {
    let encrypting_key = oaep::EncryptingKey::<Sha256>::new(public_key.clone());
    let mut rng = rsa::rand_core::OsRng;
    encrypting_key
        .encrypt_with_rng(&mut rng, content_key)
        .map_err(|e| CseError::KeyWrapFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use rsa::traits::Decryptor;
    use std::sync::OnceLock;

    fn test_private_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048).unwrap())
    }

    #[test]
    fn wrap_unwrap_round_trip() {
        let private_key = test_private_key();
        let content_key = [0xA5u8; 32];

        let wrapped = wrap_content_key(&private_key.to_public_key(), &content_key).unwrap();
        assert_eq!(wrapped.len(), 256);

        let decrypting_key = oaep::DecryptingKey::<Sha256>::new(private_key.clone());
        let unwrapped = decrypting_key.decrypt(&wrapped).unwrap();
        assert_eq!(unwrapped, content_key);
    }

    #[test]
    fn wrap_is_nondeterministic() {
        let public_key = test_private_key().to_public_key();
        let content_key = [0x11u8; 32];
        // OAEP seeds every encryption with fresh randomness.
        let first = wrap_content_key(&public_key, &content_key).unwrap();
        let second = wrap_content_key(&public_key, &content_key).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn undersized_modulus_fails_wrap() {
        // 512-bit modulus cannot carry a 32-byte key under OAEP-SHA-256.
        let small = RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 512).unwrap();
        let err = wrap_content_key(&small.to_public_key(), &[0u8; 32]).unwrap_err();
        assert!(matches!(err, CseError::KeyWrapFailure(_)));
    }
}
