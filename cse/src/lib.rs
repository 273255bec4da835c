//! Client-side encryption of payment fields.
//!
//! Sensitive card data is sealed on-device into a compact JWE token
//! (RSA-OAEP-256 key wrapping over a per-call AES-256-GCM content key), so
//! raw values never leave the client in the clear. Only the payment backend
//! holding the matching RSA private key can decrypt.

mod card;
mod constants;
mod crypto;
mod encrypt;
mod error;
mod jwe;
mod payload;
mod pubkey;

pub use self::card::{EncryptedCard, UnencryptedCard, UnencryptedCardBuilder};
pub use self::encrypt::{
    encrypt_bin, encrypt_card, encrypt_card_fields, encrypt_field, encrypt_fields,
};
pub use self::error::{CseError, CseResult};
pub use self::payload::FieldValue;
pub use self::pubkey::PublicKey;
