//! Lexical validation of values against their inferred field type.
//!
//! Used after mapping, never during scoring. Types without a documented
//! format accept every value.

use std::sync::LazyLock;

use fieldmap_model::{FieldMapping, FieldType};
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("invalid email regex")
});

static DATE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^[0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{2,4}$").expect("invalid day-first date regex"),
        Regex::new(r"^[0-9]{4}[/.-][0-9]{1,2}[/.-][0-9]{1,2}$").expect("invalid year-first date regex"),
        Regex::new(r"(?i)^[0-9]{1,2}\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+[0-9]{4}$")
            .expect("invalid month-name date regex"),
    ]
});

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?[0-9,]+\.?[0-9]{0,2}$").expect("invalid currency regex"));

const PHONE_DIGIT_COUNTS: [usize; 3] = [10, 11, 12];

/// Returns true when `raw` has the lexical form expected for `field_type`.
pub fn validate(field_type: FieldType, raw: &str) -> bool {
    match field_type {
        FieldType::Email => EMAIL_RE.is_match(raw),
        FieldType::Phone => {
            let digits = raw.chars().filter(char::is_ascii_digit).count();
            PHONE_DIGIT_COUNTS.contains(&digits)
        }
        FieldType::Date => DATE_RES.iter().any(|re| re.is_match(raw)),
        FieldType::Number => raw.trim().replace(',', "").parse::<f64>().is_ok(),
        FieldType::Currency => CURRENCY_RE.is_match(&raw.replace(' ', "")),
        FieldType::Text
        | FieldType::Address
        | FieldType::Name
        | FieldType::Boolean
        | FieldType::Signature
        | FieldType::Unknown => true,
    }
}

/// Validates a JSON value.
///
/// Strings are checked as-is and numbers through their textual form. Other
/// values (null, booleans, arrays, objects) only pass types that impose no
/// format.
pub fn validate_value(field_type: FieldType, value: &Value) -> bool {
    match value {
        Value::String(text) => validate(field_type, text),
        Value::Number(number) => validate(field_type, &number.to_string()),
        _ => validate(field_type, "") && !has_format(field_type),
    }
}

/// Validates a value against the type inferred for a mapping.
pub fn validate_mapping(mapping: &FieldMapping, value: &Value) -> bool {
    validate_value(mapping.field_type, value)
}

fn has_format(field_type: FieldType) -> bool {
    matches!(
        field_type,
        FieldType::Email
            | FieldType::Phone
            | FieldType::Date
            | FieldType::Number
            | FieldType::Currency
    )
}
