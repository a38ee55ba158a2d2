//! Utility functions and helpers

use solana_sdk::pubkey::Pubkey;

/// Format amount with proper decimals
pub fn format_amount(amount: u64, decimals: u8) -> String {
    let value = amount as f64 / 10_f64.powi(decimals as i32);
    format!("{:.6}", value)
}

/// Shorten an address for log lines
pub fn short_address(address: &Pubkey) -> String {
    let s = address.to_string();
    if s.len() <= 16 {
        return s;
    }
    format!("{}...{}", &s[..8], &s[s.len() - 8..])
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serialize a `Pubkey` as its base58 string
pub mod pubkey_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_keeps_both_ends() {
        let key = Pubkey::new_unique();
        let full = key.to_string();
        let short = short_address(&key);
        assert!(short.starts_with(&full[..8]));
        assert!(short.ends_with(&full[full.len() - 8..]));
    }

    #[test]
    fn pubkey_serializes_as_base58() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "pubkey_serde")]
            key: Pubkey,
        }

        let key = Pubkey::new_unique();
        let json = serde_json::to_string(&Holder { key }).unwrap();
        assert_eq!(json, format!("{{\"key\":\"{}\"}}", key));
        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, key);
    }

    #[test]
    fn format_amount_scales_by_decimals() {
        assert_eq!(format_amount(1_500_000, 6), "1.500000");
    }
}
