use std::fmt;

use serde::Serialize;

/// Raw card fields captured from the shopper, prior to encryption.
///
/// Every field is optional; partial cards are normal (e.g. CVC-only
/// re-entry for a stored card). Expiry month and year must be provided
/// together; the encryption entry points reject a one-sided expiry before
/// doing any cryptographic work.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UnencryptedCard {
    pub number: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub cvc: Option<String>,
    pub holder_name: Option<String>,
}

impl UnencryptedCard {
    /// Start building a card from shopper input.
    pub fn builder() -> UnencryptedCardBuilder {
        UnencryptedCardBuilder::default()
    }

    /// True when exactly one of expiry month/year is present.
    pub(crate) fn has_inconsistent_expiry(&self) -> bool {
        self.expiry_month.is_some() != self.expiry_year.is_some()
    }
}

// PAN and CVC stay out of logs: the number is masked down to its last four
// digits and the CVC is omitted entirely.
impl fmt::Debug for UnencryptedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnencryptedCard")
            .field("number", &self.number.as_deref().map(mask_pan))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("holder_name", &self.holder_name)
            .finish_non_exhaustive()
    }
}

fn mask_pan(number: &str) -> String {
    // Too short to be a PAN: mask everything rather than guess.
    if number.len() < 14 {
        return "*".repeat(number.len());
    }
    let (masked, tail) = number.split_at(number.len() - 4);
    format!("{}{}", "*".repeat(masked.chars().count()), tail)
}

/// Builder that normalizes shopper input the way the checkout form does:
/// whitespace is stripped from number, CVC and expiry, and runs of
/// whitespace in the holder name collapse to a single space.
#[derive(Debug, Clone, Default)]
pub struct UnencryptedCardBuilder {
    card: UnencryptedCard,
}

impl UnencryptedCardBuilder {
    pub fn number(mut self, number: &str) -> Self {
        self.card.number = Some(strip_whitespace(number));
        self
    }

    pub fn expiry_month(mut self, month: &str) -> Self {
        self.card.expiry_month = Some(strip_whitespace(month));
        self
    }

    pub fn expiry_year(mut self, year: &str) -> Self {
        self.card.expiry_year = Some(strip_whitespace(year));
        self
    }

    /// Set month and year together, keeping the both-or-neither invariant.
    pub fn expiry(self, month: &str, year: &str) -> Self {
        self.expiry_month(month).expiry_year(year)
    }

    pub fn cvc(mut self, cvc: &str) -> Self {
        self.card.cvc = Some(strip_whitespace(cvc));
        self
    }

    pub fn holder_name(mut self, holder_name: &str) -> Self {
        self.card.holder_name = Some(normalize_name(holder_name));
        self
    }

    pub fn build(self) -> UnencryptedCard {
        self.card
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-field encrypted card. Each present field is an independent JWE
/// string; absent source fields stay absent. Serializes with the wire names
/// the payment request expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_expiry_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_expiry_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_security_code: Option<String>,
}
