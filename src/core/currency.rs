//! Currency conversion into the USD reporting currency.
//!
//! Rates follow the currency table convention: `rate` is the number of units of a
//! currency that buy one US dollar, so converting native units to USD divides by the rate.
//! Lookups never fail. A missing or unusable rate converts at 1.0 and the caller is told
//! that the fallback fired.

use super::model::CurrencyRate;
use std::collections::HashMap;

/// The reporting currency.
pub const USD: &str = "USD";

/// Rate used when a currency has no usable entry.
pub const FALLBACK_RATE: f64 = 1.0;

/// Exchange rates keyed by upper-cased currency code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

/// Result of looking up a rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateLookup {
    /// Units of the currency per 1 USD
    pub rate: f64,
    /// `true` when [`FALLBACK_RATE`] was substituted
    pub fallback: bool,
}

/// Result of converting one amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conversion {
    /// Converted amount in USD
    pub usd: f64,
    /// `true` when the currency had no usable rate
    pub fallback_rate: bool,
}

impl RateTable {
    /// Creates an empty table. Only USD converts exactly; everything else falls back.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from currency rows. Inactive currencies are kept so historical
    /// payments in them still convert. Later rows for the same code win.
    #[must_use]
    pub fn from_rates(rates: &[CurrencyRate]) -> Self {
        let mut table = Self::new();
        for rate in rates {
            table.insert(&rate.code, rate.exchange_rate_to_usd);
        }
        table
    }

    /// Sets the rate for a currency.
    pub fn insert(&mut self, code: &str, rate: f64) {
        self.rates.insert(normalize_code(code), rate);
    }

    /// Number of currencies in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Looks up the rate for `code`. USD is always exactly 1.0.
    #[must_use]
    pub fn rate(&self, code: &str) -> RateLookup {
        let code = normalize_code(code);
        if code == USD {
            return RateLookup {
                rate: 1.0,
                fallback: false,
            };
        }

        match self.rates.get(&code) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => RateLookup {
                rate,
                fallback: false,
            },
            _ => RateLookup {
                rate: FALLBACK_RATE,
                fallback: true,
            },
        }
    }

    /// Converts `amount` of `code` into USD, reporting whether the fallback rate was used.
    #[must_use]
    pub fn convert(&self, amount: f64, code: &str) -> Conversion {
        if is_usd(code) {
            return Conversion {
                usd: amount,
                fallback_rate: false,
            };
        }

        let lookup = self.rate(code);
        Conversion {
            usd: amount / lookup.rate,
            fallback_rate: lookup.fallback,
        }
    }
}

/// Converts `amount` of `currency_code` into USD.
///
/// USD (any case) is returned unchanged. A missing, zero, negative or non-finite rate
/// is replaced by 1.0, so this never divides by zero.
#[must_use]
pub fn to_usd(amount: f64, currency_code: &str, rates: &RateTable) -> f64 {
    rates.convert(amount, currency_code).usd
}

/// Returns `true` if the code names the reporting currency.
#[must_use]
pub fn is_usd(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(USD)
}

/// Canonical form of a currency code: trimmed and upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Rounds to cents, half away from zero.
///
/// Only used when building summaries for presentation. Accumulation always runs on the
/// unrounded values.
#[must_use]
pub fn round2(value: f64) -> f64 {
    // adding +0.0 turns -0.0 into 0.0, so nothing renders as "-0.00"
    (value * 100.0).round() / 100.0 + 0.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    fn rates() -> RateTable {
        RateTable::from_rates(&[
            CurrencyRate {
                code: "CNY".to_string(),
                name: "Chinese Yuan".to_string(),
                symbol: "¥".to_string(),
                exchange_rate_to_usd: 7.2,
                is_active: true,
            },
            CurrencyRate {
                code: "eur".to_string(),
                name: "Euro".to_string(),
                symbol: "€".to_string(),
                exchange_rate_to_usd: 0.9,
                is_active: false,
            },
            CurrencyRate {
                code: "BAD".to_string(),
                name: "Broken".to_string(),
                symbol: "?".to_string(),
                exchange_rate_to_usd: 0.0,
                is_active: true,
            },
        ])
    }

    #[test]
    fn test_usd_is_unchanged() {
        assert_eq!(to_usd(123.45, "USD", &rates()), 123.45);
        assert_eq!(to_usd(123.45, "usd", &RateTable::new()), 123.45);
    }

    #[test]
    fn test_divides_by_rate() {
        let usd = to_usd(720.0, "CNY", &rates());
        assert!((usd - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = rates();
        assert_eq!(table.rate("EUR").rate, 0.9);
        assert_eq!(table.rate(" cny ").rate, 7.2);
    }

    #[test]
    fn test_fallback_for_missing_rate() {
        let usd = to_usd(100.0, "XYZ", &RateTable::new());
        assert_eq!(usd, 100.0);
        assert!(usd.is_finite());
        assert!(RateTable::new().convert(100.0, "XYZ").fallback_rate);
    }

    #[test]
    fn test_fallback_for_zero_rate() {
        let conversion = rates().convert(50.0, "BAD");
        assert_eq!(conversion.usd, 50.0);
        assert!(conversion.fallback_rate);
    }

    #[test]
    fn test_usd_round_trip() {
        let table = rates();
        let once = to_usd(1000.0, "CNY", &table);
        let back_in_native = once * table.rate("CNY").rate;
        assert_eq!(to_usd(once, "USD", &table), once);
        assert!((to_usd(back_in_native, "CNY", &table) - once).abs() < 1e-9);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(41.666_666), 41.67);
        assert_eq!(round2(558.333_333), 558.33);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
    }
}
