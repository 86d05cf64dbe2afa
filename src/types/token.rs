//! Token-related types and unit conversion.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Snapshot of an ERC20 token as seen by the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Token contract address.
    pub address: Address,
    /// Token name (e.g., "USD Coin").
    pub name: String,
    /// Token symbol (e.g., "USDC").
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
    /// Total supply, human-readable.
    #[serde(rename = "supply")]
    pub total_supply: String,
    /// Balance of the connected account, human-readable.
    pub balance: String,
    /// Chain the token was read from.
    #[serde(rename = "chainId")]
    pub chain_id: u64,
}

/// Derived view of the project's own token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTokenSnapshot {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    /// Token standard string reported by the contract.
    pub standard: String,
    /// Contract owner.
    pub owner: Address,
    /// Total supply, human-readable.
    pub total_supply: String,
    /// Balance of the connected account, human-readable.
    pub balance: String,
    /// Number of registered holders.
    pub holder_count: u64,
}

/// Holder record kept by the native token for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolder {
    pub token_id: u64,
    pub from: Address,
    pub to: Address,
    /// Tokens received, human-readable.
    pub total_token: String,
    pub is_holder: bool,
}

/// Derived view of the token sale contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSaleSnapshot {
    /// Unit price in ether, human-readable.
    pub token_price: String,
    /// Number of tokens sold so far.
    pub tokens_sold: String,
    /// Tokens still held by the sale contract, human-readable.
    pub sale_balance: String,
}

/// Format a U256 value with decimals to a human-readable string.
///
/// Trailing fractional zeros are dropped, so `1_500_000` with 6 decimals
/// becomes `"1.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let scale = decimals as usize;

    if scale == 0 {
        return digits;
    }

    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (integer, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Parse a human-readable amount string to U256 with decimals.
///
/// Fractional digits beyond `decimals` are truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, String> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if amount.starts_with('-') {
        return Err("Amount cannot be negative".to_string());
    }

    let scale = decimals as usize;
    let (integer, fraction) = match amount.split_once('.') {
        Some((_, rest)) if rest.contains('.') => {
            return Err("Invalid amount format".to_string());
        }
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err("Invalid amount format".to_string());
    }

    let mut fraction = fraction.to_string();
    fraction.truncate(scale);
    fraction.push_str(&"0".repeat(scale - fraction.len()));

    let integer_value = if integer.is_empty() {
        U256::ZERO
    } else {
        integer.parse::<U256>().map_err(|e| format!("Invalid integer part: {e}"))?
    };
    let fraction_value = if fraction.is_empty() {
        U256::ZERO
    } else {
        fraction.parse::<U256>().map_err(|e| format!("Invalid fraction part: {e}"))?
    };

    let multiplier = U256::from(10u64).pow(U256::from(scale));
    integer_value
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| format!("Amount {amount} overflows 256 bits"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    // ============================================================================
    // TokenDescriptor Tests
    // ============================================================================

    #[test]
    fn test_token_descriptor_serialization_uses_persisted_names() {
        let token = TokenDescriptor {
            address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
            total_supply: "1000".to_string(),
            balance: "1.5".to_string(),
            chain_id: 1,
        };

        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"supply\":\"1000\""));
        assert!(json.contains("\"chainId\":1"));
        assert!(json.contains("\"decimals\":6"));

        let parsed: TokenDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }

    // ============================================================================
    // format_units Tests
    // ============================================================================

    #[test]
    fn test_format_units() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_units(one_eth, 18), "1");

        let half_eth = U256::from(500_000_000_000_000_000u64);
        assert_eq!(format_units(half_eth, 18), "0.5");

        let one_usdc = U256::from(1_000_000u64);
        assert_eq!(format_units(one_usdc, 6), "1");
    }

    #[test]
    fn test_format_units_zero() {
        assert_eq!(format_units(U256::ZERO, 18), "0");
        assert_eq!(format_units(U256::ZERO, 0), "0");
    }

    #[test]
    fn test_format_units_small_values() {
        assert_eq!(format_units(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::from(100u64), 18), "0.0000000000000001");
    }

    #[test]
    fn test_format_units_sale_payment() {
        // 100 tokens at 0.0001 ether
        let payment = U256::from(10_000_000_000_000_000u64);
        assert_eq!(format_units(payment, 18), "0.01");
    }

    #[test]
    fn test_format_units_large_values() {
        let supply = U256::from(500_000_000_000u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_units(supply, 18), "500000000000");
    }

    // ============================================================================
    // parse_units Tests
    // ============================================================================

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1", 18).unwrap(), U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(parse_units("0.5", 18).unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(
            parse_units("2000", 18).unwrap(),
            U256::from(2000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
    }

    #[test]
    fn test_parse_units_rejects_bad_input() {
        assert_eq!(parse_units("", 18).unwrap_err(), "Amount cannot be empty");
        assert_eq!(parse_units("-1", 18).unwrap_err(), "Amount cannot be negative");
        assert!(parse_units("1.2.3", 18).is_err());
        assert!(parse_units("1.5abc", 18).is_err());
        assert!(parse_units(".", 18).is_err());
    }

    #[test]
    fn test_parse_units_excess_decimals_truncated() {
        assert_eq!(parse_units("1.1234567", 6).unwrap(), U256::from(1_123_456u64));
    }

    #[test]
    fn test_parse_units_overflow() {
        let huge = "1".repeat(80);
        assert!(parse_units(&huge, 18).is_err());
    }

    // ============================================================================
    // Round-trip Tests
    // ============================================================================

    #[test]
    fn test_format_parse_roundtrip() {
        for (raw, decimals) in [
            (U256::from(1_234_567_890_123_456_789u64), 18u8),
            (U256::from(1_234_567u64), 6),
            (U256::from(42u64), 0),
            (U256::from(7u64), 8),
            (U256::MAX, 18),
        ] {
            let formatted = format_units(raw, decimals);
            assert_eq!(parse_units(&formatted, decimals).unwrap(), raw, "{formatted}");
        }
    }
}
