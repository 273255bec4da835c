use data_encoding::BASE64URL_NOPAD;

use crate::constants::{IV_LEN, JWE_HEADER, TAG_LEN};

/// The binary JWE components produced by the key-wrap and content-cipher
/// stages. The fifth component, the protected header, is the compile-time
/// constant [`JWE_HEADER`].
pub(crate) struct JweParts {
    pub encrypted_key: Vec<u8>,
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl JweParts {
    /// Compact serialization: five unpadded base64url segments joined by
    /// `.`, in header / encryptedKey / iv / ciphertext / tag order.
    ///
    /// Deterministic given its inputs; all randomness originates upstream.
    pub fn to_compact(&self) -> String {
        [
            encoded_header(),
            BASE64URL_NOPAD.encode(&self.encrypted_key),
            BASE64URL_NOPAD.encode(&self.iv),
            BASE64URL_NOPAD.encode(&self.ciphertext),
            BASE64URL_NOPAD.encode(&self.tag),
        ]
        .join(".")
    }
}

/// base64url form of the protected header. Its ASCII bytes double as the
/// AAD for the content cipher.
pub(crate) fn encoded_header() -> String {
    BASE64URL_NOPAD.encode(JWE_HEADER)
}
