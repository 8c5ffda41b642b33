//! Platform collaborators: default locale, host time zone, date parsing and
//! the supported time-zone enumeration.

use std::env;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use icu::locale::Locale as IcuLocale;

use crate::format::Zone;
use crate::format::zone::parse_offset;

pub const FALLBACK_LOCALE: &str = "en-US";

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    #[error("unknown time zone: {0}")]
    InvalidTimeZone(String),
}

#[derive(Debug, Clone)]
pub struct Host {
    locale: String,
    zone: Zone,
}

impl Host {
    pub fn new(locale: &str, zone: Zone) -> Self {
        Self {
            locale: locale.to_string(),
            zone,
        }
    }

    /// Resolve the environment. Overrides win over detection; an override
    /// that does not parse is an error.
    pub fn detect(
        locale_override: Option<&str>,
        zone_override: Option<&str>,
    ) -> Result<Self, HostError> {
        let locale = match locale_override {
            Some(tag) => canonicalize_locale(tag)
                .ok_or_else(|| HostError::InvalidLocale(tag.to_string()))?,
            None => default_locale(),
        };
        let zone = match zone_override {
            Some(id) => {
                Zone::parse(id).ok_or_else(|| HostError::InvalidTimeZone(id.to_string()))?
            }
            None => host_zone(),
        };
        tracing::debug!(%locale, zone = %zone.id(), "host resolved");
        Ok(Self::new(&locale, zone))
    }

    pub fn default_locale(&self) -> &str {
        &self.locale
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Parse a date-time string into an instant.
    ///
    /// Date-only forms are UTC, date-time forms without an offset are local
    /// to the host zone. The time may follow a `T` or a space, and `24:00`
    /// is midnight at the end of the day. `None` stands for an invalid date.
    pub fn parse_date(&self, input: &str) -> Option<DateTime<Utc>> {
        let s = input.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }

        let (body, offset) = split_offset(s)?;
        let naive = parse_local(body)?;
        match offset {
            Some(offset) => Zone::Offset(offset).to_utc(&naive),
            None => self.zone.to_utc(&naive),
        }
    }
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_local(body: &str) -> Option<NaiveDateTime> {
    if let Some(naive) = LOCAL_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(body, f).ok())
    {
        return Some(naive);
    }
    let (date, time) = body.split_once(['T', 't', ' '])?;
    let end_of_day = matches!(time, "24:00" | "24:00:00")
        || time
            .strip_prefix("24:00:00.")
            .is_some_and(|frac| !frac.is_empty() && frac.bytes().all(|b| b == b'0'));
    if !end_of_day {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    date.succ_opt()?.and_hms_opt(0, 0, 0)
}

/// Split a trailing `Z` or `±HH:MM` from the time part.
fn split_offset(s: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = s.strip_suffix(['Z', 'z']) {
        return Some((body, FixedOffset::east_opt(0)));
    }
    let time_start = s.find(['T', 't', ' ']).map_or(s.len(), |i| i + 1);
    match s[time_start..].rfind(['+', '-']) {
        Some(i) => {
            let (body, offset) = s.split_at(time_start + i);
            let (h, m) = parse_offset(offset)?;
            Some((body, Some(FixedOffset::east_opt(h * 3600 + m * 60)?)))
        }
        None => Some((s, None)),
    }
}

fn canonicalize_locale(tag: &str) -> Option<String> {
    tag.parse::<IcuLocale>().ok().map(|locale| locale.to_string())
}

/// Turn a POSIX locale ("en_US.UTF-8@euro") into a BCP 47 tag.
fn posix_to_bcp47(value: &str) -> Option<String> {
    let base = value.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    canonicalize_locale(&base.replace('_', "-"))
}

/// The user's default locale from `LC_ALL`, `LC_TIME` or `LANG`.
pub fn default_locale() -> String {
    ["LC_ALL", "LC_TIME", "LANG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find_map(|value| posix_to_bcp47(&value))
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

pub fn host_zone() -> Zone {
    match iana_time_zone::get_timezone() {
        Ok(id) => Zone::parse(&id).unwrap_or_else(|| {
            tracing::warn!(%id, "host time zone not in the zone table, using UTC");
            Zone::utc()
        }),
        Err(err) => {
            tracing::warn!(%err, "could not read host time zone, using UTC");
            Zone::utc()
        }
    }
}

/// Every time-zone identifier the formatter accepts, sorted.
pub fn supported_time_zones() -> Vec<&'static str> {
    let mut zones: Vec<&'static str> = chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name()).collect();
    zones.sort_unstable();
    zones
}
