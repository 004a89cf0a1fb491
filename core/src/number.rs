//! Phone number subject.
//!
//! Only international input is accepted; the country calling code is taken
//! from a small built-in table rather than full numbering-plan metadata.

use serde::Serialize;
use std::fmt;

use crate::error::{CoreError, Result};

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Calling code → primary region (ISO 3166 alpha-2)
const CALLING_CODES: &[(u16, &str)] = &[
    (1, "US"),
    (7, "RU"),
    (20, "EG"),
    (27, "ZA"),
    (30, "GR"),
    (31, "NL"),
    (32, "BE"),
    (33, "FR"),
    (34, "ES"),
    (36, "HU"),
    (39, "IT"),
    (40, "RO"),
    (41, "CH"),
    (43, "AT"),
    (44, "GB"),
    (45, "DK"),
    (46, "SE"),
    (47, "NO"),
    (48, "PL"),
    (49, "DE"),
    (51, "PE"),
    (52, "MX"),
    (54, "AR"),
    (55, "BR"),
    (56, "CL"),
    (57, "CO"),
    (58, "VE"),
    (60, "MY"),
    (61, "AU"),
    (62, "ID"),
    (63, "PH"),
    (64, "NZ"),
    (65, "SG"),
    (66, "TH"),
    (81, "JP"),
    (82, "KR"),
    (84, "VN"),
    (86, "CN"),
    (90, "TR"),
    (91, "IN"),
    (92, "PK"),
    (93, "AF"),
    (94, "LK"),
    (95, "MM"),
    (98, "IR"),
    (212, "MA"),
    (213, "DZ"),
    (216, "TN"),
    (221, "SN"),
    (225, "CI"),
    (233, "GH"),
    (234, "NG"),
    (237, "CM"),
    (254, "KE"),
    (255, "TZ"),
    (256, "UG"),
    (351, "PT"),
    (352, "LU"),
    (353, "IE"),
    (354, "IS"),
    (358, "FI"),
    (359, "BG"),
    (370, "LT"),
    (371, "LV"),
    (372, "EE"),
    (380, "UA"),
    (381, "RS"),
    (385, "HR"),
    (386, "SI"),
    (420, "CZ"),
    (421, "SK"),
    (852, "HK"),
    (886, "TW"),
    (961, "LB"),
    (962, "JO"),
    (966, "SA"),
    (971, "AE"),
    (972, "IL"),
    (974, "QA"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Number {
    /// National significant number, digits only
    pub raw_local: String,
    /// National number as dialled inside the country
    pub local: String,
    pub e164: String,
    /// E.164 digits without the leading `+`
    pub international: String,
    pub country_code: u16,
    pub country: String,
}

impl Number {
    pub fn parse(input: &str) -> Result<Self> {
        let compact: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let digits = if let Some(rest) = compact.strip_prefix('+') {
            rest
        } else if let Some(rest) = compact.strip_prefix("00") {
            rest
        } else {
            compact.as_str()
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidNumber(format!(
                "'{}' must contain only digits",
                input
            )));
        }
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(CoreError::InvalidNumber(format!(
                "'{}' must have between {} and {} digits",
                input, MIN_DIGITS, MAX_DIGITS
            )));
        }
        // calling codes never start with 0; a leading 0 is a national trunk prefix
        if digits.starts_with('0') {
            return Err(CoreError::InvalidNumber(format!(
                "'{}' is not in international format",
                input
            )));
        }

        let (country_code, country, prefix_len) = lookup_calling_code(digits).ok_or_else(|| {
            CoreError::InvalidNumber(format!("'{}' has an unknown country calling code", input))
        })?;

        let raw_local = digits[prefix_len..].to_string();
        // NANP numbers have no trunk prefix
        let local = if country_code == 1 {
            raw_local.clone()
        } else {
            format!("0{}", raw_local)
        };

        Ok(Self {
            local,
            e164: format!("+{}", digits),
            international: digits.to_string(),
            country_code,
            country: country.to_string(),
            raw_local,
        })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164)
    }
}

impl std::str::FromStr for Number {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Number::parse(s)
    }
}

fn lookup_calling_code(digits: &str) -> Option<(u16, &'static str, usize)> {
    (1..=3).rev().find_map(|len| {
        let code: u16 = digits.get(..len)?.parse().ok()?;
        CALLING_CODES
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(code, country)| (*code, *country, len))
    })
}
