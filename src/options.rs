//! Derivation of the formatter options from the Parameter Set.

use serde::{Serialize, Serializer};

use crate::params::ParamSet;

/// A numeric option converted with JavaScript `Number()` semantics.
///
/// Serializes as an integer when integral and as `null` when not finite,
/// the way `JSON.stringify` prints numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberOption(pub f64);

impl NumberOption {
    pub fn from_js_string(s: &str) -> Self {
        NumberOption(string_to_number(s))
    }
}

impl Serialize for NumberOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if !n.is_finite() {
            serializer.serialize_none()
        } else if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
            serializer.serialize_i64(n as i64)
        } else {
            serializer.serialize_f64(n)
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            // from_str_radix takes a sign; Number() does not after a prefix.
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return i64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // Rust accepts "inf" and "nan"; Number() does not.
    if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// The structured options handed to the formatter.
///
/// Unset fields are omitted when serialized; field order matches the order
/// in which the preview lists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour12: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fractional_second_digits: Option<NumberOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `dateStyle` or `timeStyle` is set; field options are ignored.
    Style,
    Field,
}

impl DerivedOptions {
    pub fn mode(&self) -> Mode {
        if self.date_style.is_some() || self.time_style.is_some() {
            Mode::Style
        } else {
            Mode::Field
        }
    }

    pub fn has_field_options(&self) -> bool {
        self.weekday.is_some()
            || self.era.is_some()
            || self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
            || self.fractional_second_digits.is_some()
            || self.time_zone_name.is_some()
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Compute the options for `params`. Pure; called on every render.
pub fn derive(params: &ParamSet) -> DerivedOptions {
    let text = |key: &str| params.get(key).map(str::to_string);
    let hour12 = params.get("hour12").map(|v| v == "true");

    let options = if params.get("dateStyle").is_some() || params.get("timeStyle").is_some() {
        DerivedOptions {
            date_style: text("dateStyle"),
            time_style: text("timeStyle"),
            time_zone: text("timeZone"),
            hour12,
            ..DerivedOptions::default()
        }
    } else {
        DerivedOptions {
            time_zone: text("timeZone"),
            hour12,
            weekday: text("weekday"),
            era: text("era"),
            year: text("year"),
            month: text("month"),
            day: text("day"),
            hour: text("hour"),
            minute: text("minute"),
            second: text("second"),
            fractional_second_digits: params
                .get("fractionalSecondDigits")
                .map(NumberOption::from_js_string),
            time_zone_name: text("timeZoneName"),
            ..DerivedOptions::default()
        }
    };
    tracing::trace!(
        mode = ?options.mode(),
        fields = options.has_field_options(),
        "derived options"
    );
    options
}
