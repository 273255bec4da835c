use std::fmt;
use std::str::FromStr;

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};

use crate::error::{CseError, CseResult};

/// A merchant RSA public key, parsed from the `"<modulus-hex>|<exponent-hex>"`
/// string served by the key endpoint.
///
/// Parsing is the first pipeline stage of every encryption call. The type is
/// public so a caller can validate a freshly fetched key up front:
///
/// ```
/// use cse::PublicKey;
///
/// assert!("deadbeef".parse::<PublicKey>().is_err());
/// ```
#[derive(Clone)]
pub struct PublicKey {
    key: RsaPublicKey,
}

impl PublicKey {
    /// Parse and validate a raw merchant key string.
    ///
    /// # Errors
    ///
    /// Returns [`CseError::InvalidPublicKeyFormat`] if the string does not
    /// contain exactly one `|`, if either half is empty or not hexadecimal,
    /// or if the RSA implementation rejects the modulus/exponent pair.
    pub fn parse(raw: &str) -> CseResult<Self> {
        let mut halves = raw.split('|');
        let (modulus, exponent) = match (halves.next(), halves.next(), halves.next()) {
            (Some(modulus), Some(exponent), None) => (modulus, exponent),
            _ => {
                return Err(CseError::InvalidPublicKeyFormat(
                    "expected exactly one '|' separator".into(),
                ));
            }
        };

        let modulus = parse_hex(modulus, "modulus")?;
        let exponent = parse_hex(exponent, "exponent")?;

        let key = RsaPublicKey::new(modulus, exponent)
            .map_err(|e| CseError::InvalidPublicKeyFormat(e.to_string()))?;

        Ok(PublicKey { key })
    }

    /// The underlying RSA key, consumed by the key-wrap stage.
    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.key
    }
}

impl FromStr for PublicKey {
    type Err = CseError;

    fn from_str(s: &str) -> CseResult<Self> {
        Self::parse(s)
    }
}

// Key material stays out of logs; only the modulus size is shown.
impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("modulus_bits", &(self.key.size() * 8))
            .finish_non_exhaustive()
    }
}

fn parse_hex(half: &str, component: &str) -> CseResult<BigUint> {
    if half.is_empty() {
        return Err(CseError::InvalidPublicKeyFormat(format!(
            "empty {component}"
        )));
    }
    BigUint::parse_bytes(half.as_bytes(), 16).ok_or_else(|| {
        CseError::InvalidPublicKeyFormat(format!("{component} is not valid hexadecimal"))
    })
}
