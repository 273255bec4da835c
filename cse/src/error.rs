use thiserror::Error;

/// Errors raised by the client-side encryption pipeline.
///
/// Every variant is terminal for the call that produced it. The engine keeps
/// no error state between calls; whether to re-fetch a key, surface an error
/// to the shopper, or abort is the caller's decision.
#[derive(Debug, Clone, Error)]
pub enum CseError {
    /// The merchant key string is not `"<modulus-hex>|<exponent-hex>"`, or
    /// the modulus/exponent pair was rejected by the RSA implementation.
    #[error("invalid public key format: {0}")]
    InvalidPublicKeyFormat(String),

    /// RSA-OAEP wrapping of the content key failed, e.g. the modulus is too
    /// small to carry a 256-bit key under OAEP with SHA-256.
    #[error("content key wrap failed: {0}")]
    KeyWrapFailure(String),

    /// The AEAD implementation refused the operation. A capability failure,
    /// not a per-call condition.
    #[error("AES-256-GCM unavailable: {0}")]
    UnsupportedAlgorithm(String),

    /// The plaintext payload could not be serialized to JSON. Payloads only
    /// ever hold scalars, so this is a programmer-error path.
    #[error("payload serialization failed: {0}")]
    SerializationFailure(String),

    /// Card expiry month and year must be both present or both absent.
    #[error("expiry month and year must be provided together")]
    InconsistentExpiry,
}

/// Type alias for results that may return a [`CseError`].
pub type CseResult<T> = std::result::Result<T, CseError>;
