/**
    JWE protected header carried by every token this crate produces.

    Fixed by the payment backend: RSA-OAEP-256 key wrapping, AES-256-GCM
    content encryption, token format version 1. The base64url form of this
    exact byte sequence is the AAD of the content cipher, so it must never
    be re-serialized or reordered.
*/
pub(crate) const JWE_HEADER: &[u8] = br#"{"alg":"RSA-OAEP-256","enc":"A256GCM","version":"1"}"#;

/// Content encryption key length in bytes (AES-256).
pub(crate) const CONTENT_KEY_LEN: usize = 32;

/// Initialization vector length in bytes (96-bit GCM nonce).
pub(crate) const IV_LEN: usize = 12;

/// Authentication tag length in bytes (128-bit GCM tag).
pub(crate) const TAG_LEN: usize = 16;

/// Name of the timestamp field appended to every plaintext payload.
pub(crate) const GENERATION_TIME_FIELD: &str = "generationtime";

/// chrono format for `generationtime`: UTC at millisecond precision with a
/// trailing `Z` (the backend's `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`).
pub(crate) const GENERATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Field name used by [`encrypt_bin`](crate::encrypt_bin).
pub(crate) const BIN_VALUE_FIELD: &str = "binValue";

// Plaintext field names for card payloads, as the payment backend expects them.
pub(crate) const CARD_NUMBER_FIELD: &str = "number";
pub(crate) const EXPIRY_MONTH_FIELD: &str = "expiryMonth";
pub(crate) const EXPIRY_YEAR_FIELD: &str = "expiryYear";
pub(crate) const CVC_FIELD: &str = "cvc";
pub(crate) const HOLDER_NAME_FIELD: &str = "holderName";
