use chrono::Utc;

use crate::card::{EncryptedCard, UnencryptedCard};
use crate::constants::{
    BIN_VALUE_FIELD, CARD_NUMBER_FIELD, CVC_FIELD, EXPIRY_MONTH_FIELD, EXPIRY_YEAR_FIELD,
    HOLDER_NAME_FIELD,
};
use crate::crypto::{aes, rsa};
use crate::error::{CseError, CseResult};
use crate::jwe::{self, JweParts};
use crate::payload::{FieldValue, Payload};
use crate::pubkey::PublicKey;

/// Encrypt a single named field, plus `generationtime`, into one JWE string.
#[cfg_attr(not(test), tracing::instrument(err, skip_all))]
pub fn encrypt_field(
    name: &str,
    value: impl Into<FieldValue>,
    public_key: &str,
) -> CseResult<String> {
    let key = PublicKey::parse(public_key)?;
    let mut payload = Payload::new();
    payload.insert(name, value);
    encrypt_payload(&payload, &key)
}

/// Encrypt an ordered set of named fields, plus `generationtime`, into one
/// JWE string. The plaintext keeps the iteration order of `fields`.
///
/// This is the blob form used to encrypt an entire card payload at once.
#[cfg_attr(not(test), tracing::instrument(err, skip_all))]
pub fn encrypt_fields<'a, I>(public_key: &str, fields: I) -> CseResult<String>
where
    I: IntoIterator<Item = (&'a str, FieldValue)>,
{
    let key = PublicKey::parse(public_key)?;
    let mut payload = Payload::new();
    for (name, value) in fields {
        payload.insert(name, value);
    }
    encrypt_payload(&payload, &key)
}

/// Encrypt a BIN prefix as `{"binValue": ...}`.
///
/// The caller truncates the PAN to its first 11 digits before calling;
/// encryption never inspects, truncates, or redacts its input.
#[cfg_attr(not(test), tracing::instrument(err, skip_all))]
pub fn encrypt_bin(bin: &str, public_key: &str) -> CseResult<String> {
    let key = PublicKey::parse(public_key)?;
    encrypt_payload(&bin_payload(bin), &key)
}

/// Encrypt a whole card as a single JWE blob.
///
/// Present fields are serialized under their wire names (`number`,
/// `expiryMonth`, `expiryYear`, `cvc`, `holderName`); absent fields are
/// skipped.
///
/// # Errors
///
/// Returns [`CseError::InconsistentExpiry`] if exactly one of expiry
/// month/year is present. The check runs before any cryptographic work.
#[cfg_attr(not(test), tracing::instrument(err, skip_all))]
pub fn encrypt_card(card: &UnencryptedCard, public_key: &str) -> CseResult<String> {
    if card.has_inconsistent_expiry() {
        return Err(CseError::InconsistentExpiry);
    }
    let key = PublicKey::parse(public_key)?;
    encrypt_payload(&card_payload(card), &key)
}

/// Encrypt each present card field independently, so every datum is its own
/// JWE string with its own content key, IV and timestamp.
///
/// The holder name is not encrypted; the payment request carries it in the
/// clear.
///
/// # Errors
///
/// Returns [`CseError::InconsistentExpiry`] if exactly one of expiry
/// month/year is present. The check runs before any cryptographic work.
#[cfg_attr(not(test), tracing::instrument(err, skip_all))]
pub fn encrypt_card_fields(card: &UnencryptedCard, public_key: &str) -> CseResult<EncryptedCard> {
    if card.has_inconsistent_expiry() {
        return Err(CseError::InconsistentExpiry);
    }
    let key = PublicKey::parse(public_key)?;

    let mut encrypted = EncryptedCard::default();
    if let Some(number) = card.number.as_deref() {
        encrypted.encrypted_card_number = Some(encrypt_single(CARD_NUMBER_FIELD, number, &key)?);
    }
    if let Some(month) = card.expiry_month.as_deref() {
        encrypted.encrypted_expiry_month = Some(encrypt_single(EXPIRY_MONTH_FIELD, month, &key)?);
    }
    if let Some(year) = card.expiry_year.as_deref() {
        encrypted.encrypted_expiry_year = Some(encrypt_single(EXPIRY_YEAR_FIELD, year, &key)?);
    }
    if let Some(cvc) = card.cvc.as_deref() {
        encrypted.encrypted_security_code = Some(encrypt_single(CVC_FIELD, cvc, &key)?);
    }
    Ok(encrypted)
}

fn encrypt_single(name: &str, value: &str, key: &PublicKey) -> CseResult<String> {
    let mut payload = Payload::new();
    payload.insert(name, value);
    encrypt_payload(&payload, key)
}

/// The strict single-pass pipeline shared by every entry point: build the
/// plaintext, generate a content key, wrap it, encrypt the content,
/// serialize. The key was validated by the caller as stage 1; any stage
/// failing aborts the call with no partial output.
fn encrypt_payload(payload: &Payload, key: &PublicKey) -> CseResult<String> {
    let plaintext = payload.to_json(Utc::now())?;

    let content_key = aes::generate_content_key();
    let encrypted_key = rsa::wrap_content_key(key.rsa(), content_key.as_slice())?;

    let header = jwe::encoded_header();
    let sealed = aes::seal_payload(&content_key, plaintext.as_bytes(), header.as_bytes())?;

    Ok(JweParts {
        encrypted_key,
        iv: sealed.iv,
        ciphertext: sealed.ciphertext,
        tag: sealed.tag,
    }
    .to_compact())
}

/// Payload for [`encrypt_bin`], factored out so tests can inspect the exact
/// plaintext the cipher receives.
fn bin_payload(bin: &str) -> Payload {
    let mut payload = Payload::new();
    payload.insert(BIN_VALUE_FIELD, bin);
    payload
}

fn card_payload(card: &UnencryptedCard) -> Payload {
    let mut payload = Payload::new();
    payload.insert_opt(CARD_NUMBER_FIELD, card.number.as_deref());
    payload.insert_opt(EXPIRY_MONTH_FIELD, card.expiry_month.as_deref());
    payload.insert_opt(EXPIRY_YEAR_FIELD, card.expiry_year.as_deref());
    payload.insert_opt(CVC_FIELD, card.cvc.as_deref());
    payload.insert_opt(HOLDER_NAME_FIELD, card.holder_name.as_deref());
    payload
}
