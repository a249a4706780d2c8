//! Locale-aware formatting for numbers placed into text elements.
//!
//! Every function accepts any [`NumericValue`]. Input that is not a finite
//! number is rendered with its plain display form instead of failing.

use itertools::Itertools;
use serde_json::Value;

/// Separators and currency suffix for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub thousands_separator: char,
    pub currency_suffix: &'static str,
}

impl NumberLocale {
    pub const GERMAN: NumberLocale = NumberLocale {
        decimal_separator: ',',
        thousands_separator: '.',
        currency_suffix: "€",
    };

    pub const ENGLISH: NumberLocale = NumberLocale {
        decimal_separator: '.',
        thousands_separator: ',',
        currency_suffix: "€",
    };

    /// Locale for a language code such as `de`, `de-AT` or `en`.
    /// Unknown languages use the German conventions.
    pub fn for_language(language: &str) -> NumberLocale {
        let primary = language.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => NumberLocale::ENGLISH,
            _ => NumberLocale::GERMAN,
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::GERMAN
    }
}

/// A value that may or may not be numeric.
pub trait NumericValue {
    fn to_f64(&self) -> Option<f64>;
    /// The text shown when the value is not a finite number.
    fn fallback_display(&self) -> String;
}

macro_rules! impl_numeric_primitive {
    ($($t:ty),*) => {
        $(
            impl NumericValue for $t {
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }

                fn fallback_display(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_numeric_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl NumericValue for str {
    fn to_f64(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }

    fn fallback_display(&self) -> String {
        self.to_string()
    }
}

impl NumericValue for String {
    fn to_f64(&self) -> Option<f64> {
        self.as_str().to_f64()
    }

    fn fallback_display(&self) -> String {
        self.clone()
    }
}

impl NumericValue for Value {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.to_f64(),
            _ => None,
        }
    }

    fn fallback_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl<T: NumericValue + ?Sized> NumericValue for &T {
    fn to_f64(&self) -> Option<f64> {
        (**self).to_f64()
    }

    fn fallback_display(&self) -> String {
        (**self).fallback_display()
    }
}

fn finite<V: NumericValue + ?Sized>(value: &V) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}

fn group_thousands(digits: &str, separator: char) -> String {
    let reversed: Vec<char> = digits.chars().rev().collect();
    reversed
        .chunks(3)
        .map(|chunk| chunk.iter().rev().collect::<String>())
        .rev()
        .join(&separator.to_string())
}

/// Formats a finite number with thousands grouping and a fixed number of
/// decimals.
fn format_finite(value: f64, decimals: usize, locale: &NumberLocale) -> String {
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    let mut out = String::with_capacity(rounded.len() + 4);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, locale.thousands_separator));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }
    out
}

pub fn format_number<V: NumericValue + ?Sized>(value: &V, decimals: usize, locale: &NumberLocale) -> String {
    match finite(value) {
        Some(v) => format_finite(v, decimals, locale),
        None => value.fallback_display(),
    }
}

/// `1234.5` -> `1.234,50 €` (German) / `1,234.50 €` (English).
pub fn format_currency<V: NumericValue + ?Sized>(value: &V, locale: &NumberLocale) -> String {
    match finite(value) {
        Some(v) => format!("{} {}", format_finite(v, 2, locale), locale.currency_suffix),
        None => value.fallback_display(),
    }
}

/// Percent values are given in percent units: `34.56` -> `34,6 %`.
pub fn format_percent<V: NumericValue + ?Sized>(value: &V, locale: &NumberLocale) -> String {
    match finite(value) {
        Some(v) => format!("{} %", format_finite(v, 1, locale)),
        None => value.fallback_display(),
    }
}

pub fn format_with_unit<V: NumericValue + ?Sized>(
    value: &V,
    decimals: usize,
    unit: &str,
    locale: &NumberLocale,
) -> String {
    match finite(value) {
        Some(v) => format!("{} {}", format_finite(v, decimals, locale), unit),
        None => value.fallback_display(),
    }
}

/// Energy quantities without decimals: `12345.6` -> `12.346 kWh`.
pub fn format_kwh<V: NumericValue + ?Sized>(value: &V, locale: &NumberLocale) -> String {
    format_with_unit(value, 0, "kWh", locale)
}
