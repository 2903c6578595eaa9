// ==========================================
// GPL Cart - cell cleaning and coercion
// ==========================================
// TRIM / NULL normalisation / booleans / prices / multi-value cells
// Functions return None (or Err with the offending item) and leave the
// wording of the message to the caller.
// ==========================================

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use std::str::FromStr;

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 1/0, yes/no, y/n, true/false, on/off (case-insensitive)
    pub fn parse_bool(&self, value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "1" | "y" | "yes" | "true" | "on" => Some(true),
            "0" | "n" | "no" | "false" | "off" => Some(false),
            _ => None,
        }
    }

    pub fn parse_int(&self, value: &str) -> Option<i64> {
        value.trim().parse::<i64>().ok()
    }

    /// Decimal amount -> integer minor units (2 decimals, half-up)
    ///
    /// Negative amounts are rejected.
    pub fn parse_price(&self, value: &str) -> Option<i64> {
        let amount = Decimal::from_str(value.trim()).ok()?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return None;
        }
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        (rounded * Decimal::ONE_HUNDRED).to_i64()
    }

    /// Minor units -> "12.50"
    pub fn format_price(&self, minor: i64) -> String {
        Decimal::new(minor, 2).to_string()
    }

    /// ISO 4217 style code: exactly three ASCII letters
    pub fn parse_currency(&self, value: &str) -> Option<String> {
        let code = value.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(code.to_uppercase())
        } else {
            None
        }
    }

    /// "a|b|c" -> ["a", "b", "c"] (trimmed, empty items dropped)
    pub fn split_multiple(&self, value: &str, delimiter: &str) -> Vec<String> {
        value
            .split(delimiter)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// "color:red|size:XL" -> {"color": "red", "size": "XL"}
    ///
    /// # Errors
    /// - the first item without a key/value delimiter or with an empty key
    pub fn split_key_value(
        &self,
        value: &str,
        delimiter: &str,
        key_value_delimiter: &str,
    ) -> Result<Map<String, Value>, String> {
        let mut map = Map::new();
        for item in self.split_multiple(value, delimiter) {
            match item.split_once(key_value_delimiter) {
                Some((key, val)) if !key.trim().is_empty() => {
                    map.insert(key.trim().to_string(), Value::String(val.trim().to_string()));
                }
                _ => return Err(item),
            }
        }
        Ok(map)
    }

    /// Basic shape check: local@domain.tld, no whitespace
    pub fn is_valid_email(&self, value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                .unwrap_or(false)
    }

    /// "#rgb" or "#rrggbb"
    pub fn is_valid_color(&self, value: &str) -> bool {
        match value.strip_prefix('#') {
            Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => false,
        }
    }
}
