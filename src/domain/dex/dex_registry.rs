//! Venue kinds known to the engine's deployment tooling

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported venue implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    ConstantProduct,
    FixedRate,
    #[cfg(test)]
    #[serde(skip)]
    Scripted,
}

impl VenueKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueKind::ConstantProduct => "Constant Product AMM",
            VenueKind::FixedRate => "Fixed Rate Market Maker",
            #[cfg(test)]
            VenueKind::Scripted => "Scripted Test Venue",
        }
    }
}

impl FromStr for VenueKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "constant_product" | "amm" | "cpmm" => Ok(VenueKind::ConstantProduct),
            "fixed_rate" | "rfq" => Ok(VenueKind::FixedRate),
            _ => Err(anyhow::anyhow!("Unknown venue kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("AMM".parse::<VenueKind>().unwrap(), VenueKind::ConstantProduct);
        assert_eq!("fixed_rate".parse::<VenueKind>().unwrap(), VenueKind::FixedRate);
        assert!("orderbook".parse::<VenueKind>().is_err());
    }

    #[test]
    fn scripted_kind_is_not_configurable() {
        assert_eq!(VenueKind::Scripted.as_str(), "Scripted Test Venue");
        assert!("scripted".parse::<VenueKind>().is_err());
        assert!(serde_json::from_str::<VenueKind>("\"scripted\"").is_err());
    }
}
