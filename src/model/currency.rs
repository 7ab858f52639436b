use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The currency used when displaying amounts. There is no conversion: amounts are always shown
/// as entered, with the selected currency's symbol.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Mur,
    Usd,
    Eur,
    Gbp,
    Inr,
}

serde_plain::derive_display_from_serialize!(Currency);

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Mur,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Inr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Mur => "Mauritian Rupee (MUR)",
            Currency::Usd => "US Dollar (USD)",
            Currency::Eur => "Euro (EUR)",
            Currency::Gbp => "British Pound (GBP)",
            Currency::Inr => "Indian Rupee (INR)",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Mur => "₨",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        serde_plain::from_str(&code).with_context(|| {
            format!(
                "Invalid currency code '{s}', expected one of: {}",
                Currency::ALL.map(|c| c.to_string()).join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from_str(&currency.to_string()).unwrap(), currency);
        }
    }

    #[test]
    fn test_parse_lowercase() {
        assert_eq!(Currency::from_str("gbp").unwrap(), Currency::Gbp);
    }

    #[test]
    fn test_parse_unknown_code() {
        let err = Currency::from_str("JPY").unwrap_err();
        assert!(err.to_string().contains("Invalid currency code 'JPY'"));
    }

    #[test]
    fn test_persisted_as_bare_string() {
        assert_eq!(serde_json::to_string(&Currency::Eur).unwrap(), "\"EUR\"");
    }

    #[test]
    fn test_default_is_mur() {
        assert_eq!(Currency::default(), Currency::Mur);
        assert_eq!(Currency::default().symbol(), "₨");
    }
}
