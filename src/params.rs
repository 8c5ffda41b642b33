//! The Parameter Set: the flat, shareable key/value state of the playground.
//!
//! The set is held as an ordered list so that the query string it encodes to
//! is stable across edits. Keys are unique; an empty value reads as unset.

use std::fmt;

/// Key holding the selected date/time.
pub const DATE: &str = "date";

/// Values a recognized parameter may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choices {
    Fixed(&'static [&'static str]),
    /// Populated at runtime from the supported time-zone enumeration.
    TimeZones,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub choices: Choices,
}

const STYLES: &[&str] = &["full", "long", "medium", "short"];
const TEXT_WIDTHS: &[&str] = &["long", "short", "narrow"];
const NUMERIC: &[&str] = &["numeric", "2-digit"];

/// Recognized format parameters, in display order.
pub const PARAMETERS: &[Parameter] = &[
    Parameter { name: "dateStyle", choices: Choices::Fixed(STYLES) },
    Parameter { name: "timeStyle", choices: Choices::Fixed(STYLES) },
    Parameter { name: "hour12", choices: Choices::Fixed(&["true", "false"]) },
    Parameter { name: "timeZone", choices: Choices::TimeZones },
    Parameter { name: "weekday", choices: Choices::Fixed(TEXT_WIDTHS) },
    Parameter { name: "era", choices: Choices::Fixed(TEXT_WIDTHS) },
    Parameter { name: "year", choices: Choices::Fixed(NUMERIC) },
    Parameter {
        name: "month",
        choices: Choices::Fixed(&["numeric", "2-digit", "long", "short", "narrow"]),
    },
    Parameter { name: "day", choices: Choices::Fixed(NUMERIC) },
    Parameter { name: "hour", choices: Choices::Fixed(NUMERIC) },
    Parameter { name: "minute", choices: Choices::Fixed(NUMERIC) },
    Parameter { name: "second", choices: Choices::Fixed(NUMERIC) },
    Parameter { name: "fractionalSecondDigits", choices: Choices::Fixed(&["1", "2", "3"]) },
    Parameter {
        name: "timeZoneName",
        choices: Choices::Fixed(&[
            "long",
            "short",
            "shortOffset",
            "longOffset",
            "shortGeneric",
            "longGeneric",
        ]),
    },
];

pub fn parameter(name: &str) -> Option<&'static Parameter> {
    PARAMETERS.iter().find(|p| p.name == name)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    entries: Vec<(String, String)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string or a full URL. Only the query component is read;
    /// a repeated key keeps its last value.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input.split_once('#').map_or(input, |(before, _)| before);
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None if input.contains("://") => "",
            None => input,
        };

        let mut set = ParamSet::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            set.set(&decode_component(key), &decode_component(value));
        }
        set
    }

    /// Value of `key`, treating an empty string as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Set `key`, replacing the value in place when already present.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn insert_first(&mut self, key: &str, value: &str) {
        self.remove(key);
        self.entries.insert(0, (key.to_string(), value.to_string()));
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.remove(key);
        self.entries.push((key.to_string(), value.to_string()));
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_query(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParamSet::new();
        for (k, v) in iter {
            set.set(k.as_ref(), v.as_ref());
        }
        set
    }
}

// application/x-www-form-urlencoded, byte for byte the way URLSearchParams
// serializes.
fn is_form_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'*' | b'-' | b'.' | b'_')
}

fn encode_component(s: &str) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_form_unreserved(b) {
            out.push(b as char);
        } else if b == b' ' {
            out.push('+');
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// Malformed escapes are kept literally; invalid UTF-8 becomes U+FFFD.
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                match (
                    bytes.get(i + 1).copied().and_then(hex_val),
                    bytes.get(i + 2).copied().and_then(hex_val),
                ) {
                    (Some(h), Some(l)) => {
                        out.push((h << 4) | l);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
