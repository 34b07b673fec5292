//! Shared data types for the Inferpay tools.
//!
//! This crate provides the types used across the Inferpay crates: monetary
//! amounts, the error-code taxonomy, and the static model catalog used for
//! smart routing. It contains no business logic, only type definitions with
//! serialization support.
//!
//! # Type Conventions
//!
//! - Derive `Debug`, `Clone`, `PartialEq` where appropriate
//! - Derive `Copy` for small types (enums, simple structs)
//! - Derive `Serialize`, `Deserialize` for wire format
//! - Use `#[repr(u16)]` for enums with defined wire values
//! - Use `#[non_exhaustive]` for enums to allow future extension

/// Crate version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod models;

// Re-export all public types at the crate root for convenience

pub use error::ErrorCode;
pub use models::{
    default_model, find_model, model_for_tier, ModelSpec, ModelTier, ASSUMED_CHAT_COST_USD,
    ASSUMED_IMAGE_COST_USD, DEFAULT_IMAGE_MODEL, MODEL_CATALOG,
};

/// Amount in micro-USD (10^-6 USD).
///
/// This is the standard type for all monetary values. One US dollar equals
/// 1,000,000 micro-USD, which also matches the atomic unit of the 6-decimal
/// settlement token.
pub type Amount = u64;

/// Micro-USD per US dollar (10^6).
pub const MICRO_PER_USD: u64 = 1_000_000;

/// Convert US dollars to micro-USD.
pub fn usd_to_micro(usd: f64) -> Amount {
    (usd * MICRO_PER_USD as f64).round() as Amount
}

/// Convert micro-USD to US dollars.
pub fn micro_to_usd(micro: Amount) -> f64 {
    micro as f64 / MICRO_PER_USD as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_conversion() {
        assert_eq!(usd_to_micro(1.0), 1_000_000);
        assert_eq!(usd_to_micro(0.5), 500_000);
        assert_eq!(usd_to_micro(0.002), 2_000);

        assert_eq!(micro_to_usd(1_000_000), 1.0);
        assert_eq!(micro_to_usd(500_000), 0.5);
        assert_eq!(micro_to_usd(2_000), 0.002);
    }

    #[test]
    fn test_usd_to_micro_rounds_instead_of_truncating() {
        // 0.0000015 USD = 1.5 micro, should round to 2 not truncate to 1
        assert_eq!(usd_to_micro(0.000_001_5), 2);
        // 0.0000014 USD = 1.4 micro, should round to 1
        assert_eq!(usd_to_micro(0.000_001_4), 1);
        // Verify existing conversions still work
        assert_eq!(usd_to_micro(1.0), 1_000_000);
    }

    #[test]
    fn test_conversion_roundtrip() {
        for usd in [0.0, 0.002, 0.05, 1.0, 12.5] {
            let micro = usd_to_micro(usd);
            assert!((micro_to_usd(micro) - usd).abs() < 1e-9);
        }
    }
}
