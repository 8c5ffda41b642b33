//! Time zones: IANA names via `chrono-tz` and fixed UTC offsets.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::{TZ_VARIANTS, Tz};

/// Parse an offset time zone such as "+03", "+0300", "+03:00" or "-07:30".
/// Returns signed hours and minutes; hours in -23..=23, minutes in 0..=59.
pub(crate) fn parse_offset(tz: &str) -> Option<(i32, i32)> {
    let (sign, rest) = match tz.as_bytes().first()? {
        b'+' => (1i32, &tz[1..]),
        b'-' => (-1i32, &tz[1..]),
        _ => return None,
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (h, m): (i32, i32) = match rest.len() {
        2 => (rest.parse().ok()?, 0),
        4 if !rest.contains(':') => (rest[..2].parse().ok()?, rest[2..].parse().ok()?),
        5 if rest.as_bytes()[2] == b':' => (rest[..2].parse().ok()?, rest[3..].parse().ok()?),
        _ => return None,
    };
    if h > 23 || m > 59 {
        return None;
    }
    Some((sign * h, sign * m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Offset(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Named(Tz::UTC)
    }

    /// Resolve a zone identifier. IANA names match case-insensitively and
    /// resolve to their canonical spelling.
    pub fn parse(id: &str) -> Option<Self> {
        if let Some((h, m)) = parse_offset(id) {
            return FixedOffset::east_opt(h * 3600 + m * 60).map(Zone::Offset);
        }
        if let Ok(tz) = id.parse::<Tz>() {
            return Some(Zone::Named(tz));
        }
        TZ_VARIANTS
            .iter()
            .find(|tz| tz.name().eq_ignore_ascii_case(id))
            .map(|tz| Zone::Named(*tz))
    }

    /// Canonical identifier; offsets normalize to "+HH:MM".
    pub fn id(&self) -> String {
        match self {
            Zone::Named(tz) => tz.name().to_string(),
            Zone::Offset(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }

    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Zone::Offset(offset) => *offset,
        }
    }

    /// Wall-clock time of `instant` in this zone, `None` when it falls
    /// outside the representable range.
    pub fn local(&self, instant: &DateTime<Utc>) -> Option<NaiveDateTime> {
        instant.naive_utc().checked_add_offset(self.offset_at(instant))
    }

    /// Interpret a wall-clock time in this zone. Ambiguous times take the
    /// earlier instant; times in a gap use the offset in effect before it.
    pub fn to_utc(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Named(tz) => match tz.from_local_datetime(local) {
                LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
                LocalResult::None => {
                    let probe = local.checked_sub_signed(TimeDelta::days(1))?;
                    let before = tz.offset_from_utc_datetime(&probe).fix();
                    let utc = local
                        .checked_sub_signed(TimeDelta::seconds(before.local_minus_utc().into()))?;
                    Some(Utc.from_utc_datetime(&utc))
                }
            },
            Zone::Offset(offset) => offset
                .from_local_datetime(local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn abbreviation(&self, instant: &DateTime<Utc>) -> Option<String> {
        match self {
            Zone::Named(tz) => Some(instant.with_timezone(tz).format("%Z").to_string()),
            Zone::Offset(_) => None,
        }
    }

    /// Display name for the `timeZoneName` option (en-US names).
    pub fn display_name(&self, style: &str, instant: &DateTime<Utc>) -> String {
        let offset_secs = self.offset_at(instant).local_minus_utc();
        let (hours, minutes) = split_offset(offset_secs);

        if let Zone::Offset(_) = self {
            return if style.starts_with("long") {
                format_offset_long(hours, minutes)
            } else {
                format_offset_short(hours, minutes)
            };
        }
        match style {
            "longOffset" => return format_offset_long(hours, minutes),
            "shortOffset" => return format_offset_short(hours, minutes),
            _ => {}
        }

        let abbr = self.abbreviation(instant).unwrap_or_default();
        match style {
            "short" => match us_abbreviation(&abbr, offset_secs) {
                Some(abbr) => abbr.to_string(),
                None => format_offset_short(hours, minutes),
            },
            "shortGeneric" => match generic_name(&abbr, offset_secs) {
                Some((short, _)) => short.to_string(),
                None => format_offset_short(hours, minutes),
            },
            "longGeneric" => match generic_name(&abbr, offset_secs) {
                Some((_, long)) => long.to_string(),
                None => long_name(&abbr, offset_secs),
            },
            _ => long_name(&abbr, offset_secs),
        }
    }
}

fn split_offset(offset_secs: i32) -> (i32, i32) {
    let hours = offset_secs / 3600;
    let minutes = (offset_secs.abs() % 3600) / 60;
    (hours, if offset_secs < 0 { -minutes } else { minutes })
}

pub(crate) fn format_offset_short(hours: i32, minutes: i32) -> String {
    if hours == 0 && minutes == 0 {
        return "GMT".to_string();
    }
    let sign = if hours < 0 || minutes < 0 { "-" } else { "+" };
    let (ah, am) = (hours.abs(), minutes.abs());
    if am == 0 {
        format!("GMT{}{}", sign, ah)
    } else {
        format!("GMT{}{}:{:02}", sign, ah, am)
    }
}

pub(crate) fn format_offset_long(hours: i32, minutes: i32) -> String {
    if hours == 0 && minutes == 0 {
        return "GMT".to_string();
    }
    let sign = if hours < 0 || minutes < 0 { "-" } else { "+" };
    format!("GMT{}{:02}:{:02}", sign, hours.abs(), minutes.abs())
}

// en-US only spells out North American abbreviations and UTC.
fn us_abbreviation(abbr: &str, offset_secs: i32) -> Option<&str> {
    match abbr {
        "CST" if offset_secs != -6 * 3600 => None,
        "EST" | "EDT" | "CST" | "CDT" | "MST" | "MDT" | "PST" | "PDT" | "AKST" | "AKDT"
        | "HST" | "HDT" | "UTC" => Some(abbr),
        _ => None,
    }
}

fn generic_name(abbr: &str, offset_secs: i32) -> Option<(&'static str, &'static str)> {
    Some(match abbr {
        "EST" | "EDT" => ("ET", "Eastern Time"),
        "CST" | "CDT" if offset_secs <= -5 * 3600 => ("CT", "Central Time"),
        "MST" | "MDT" => ("MT", "Mountain Time"),
        "PST" | "PDT" => ("PT", "Pacific Time"),
        "AKST" | "AKDT" => ("AKT", "Alaska Time"),
        "HST" | "HDT" => ("HST", "Hawaii-Aleutian Time"),
        "CET" | "CEST" => ("GMT+1", "Central European Time"),
        "EET" | "EEST" => ("GMT+2", "Eastern European Time"),
        "WET" | "WEST" => ("GMT", "Western European Time"),
        "AEST" | "AEDT" => ("GMT+10", "Eastern Australia Time"),
        "NZST" | "NZDT" => ("GMT+12", "New Zealand Time"),
        "UTC" => ("UTC", "Coordinated Universal Time"),
        _ => return None,
    })
}

fn long_name(abbr: &str, offset_secs: i32) -> String {
    let name = match abbr {
        "EST" => "Eastern Standard Time",
        "EDT" => "Eastern Daylight Time",
        "CST" if offset_secs == 8 * 3600 => "China Standard Time",
        "CST" => "Central Standard Time",
        "CDT" => "Central Daylight Time",
        "MST" => "Mountain Standard Time",
        "MDT" => "Mountain Daylight Time",
        "PST" => "Pacific Standard Time",
        "PDT" => "Pacific Daylight Time",
        "AKST" => "Alaska Standard Time",
        "AKDT" => "Alaska Daylight Time",
        "HST" => "Hawaii-Aleutian Standard Time",
        "HDT" => "Hawaii-Aleutian Daylight Time",
        "UTC" => "Coordinated Universal Time",
        "GMT" => "Greenwich Mean Time",
        "BST" => "British Summer Time",
        "IST" if offset_secs == 19800 => "India Standard Time",
        "IST" => "Irish Standard Time",
        "CET" => "Central European Standard Time",
        "CEST" => "Central European Summer Time",
        "EET" => "Eastern European Standard Time",
        "EEST" => "Eastern European Summer Time",
        "WET" => "Western European Standard Time",
        "WEST" => "Western European Summer Time",
        "MSK" => "Moscow Standard Time",
        "JST" => "Japan Standard Time",
        "KST" => "Korean Standard Time",
        "AEST" => "Australian Eastern Standard Time",
        "AEDT" => "Australian Eastern Daylight Time",
        "ACST" => "Australian Central Standard Time",
        "ACDT" => "Australian Central Daylight Time",
        "AWST" => "Australian Western Standard Time",
        "NZST" => "New Zealand Standard Time",
        "NZDT" => "New Zealand Daylight Time",
        _ => {
            let (hours, minutes) = split_offset(offset_secs);
            return format_offset_long(hours, minutes);
        }
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn offset_forms() {
        assert_eq!(parse_offset("+03"), Some((3, 0)));
        assert_eq!(parse_offset("+0530"), Some((5, 30)));
        assert_eq!(parse_offset("-07:30"), Some((-7, -30)));
        assert_eq!(parse_offset("+24:00"), None);
        assert_eq!(parse_offset("+5"), None);
        assert_eq!(parse_offset("UTC"), None);
    }

    #[test]
    fn parse_names_case_insensitively() {
        assert_eq!(Zone::parse("America/New_York").map(|z| z.id()).as_deref(), Some("America/New_York"));
        assert_eq!(Zone::parse("america/new_york").map(|z| z.id()).as_deref(), Some("America/New_York"));
        assert_eq!(Zone::parse("-0000").map(|z| z.id()).as_deref(), Some("+00:00"));
        assert_eq!(Zone::parse("+05:30").map(|z| z.id()).as_deref(), Some("+05:30"));
        assert!(Zone::parse("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn dst_aware_names() {
        let ny = Zone::parse("America/New_York").unwrap();
        let winter = at("2024-01-15T15:30:00Z");
        let summer = at("2024-07-15T15:30:00Z");
        assert_eq!(ny.display_name("short", &winter), "EST");
        assert_eq!(ny.display_name("short", &summer), "EDT");
        assert_eq!(ny.display_name("long", &winter), "Eastern Standard Time");
        assert_eq!(ny.display_name("shortOffset", &winter), "GMT-5");
        assert_eq!(ny.display_name("longOffset", &summer), "GMT-04:00");
        assert_eq!(ny.display_name("longGeneric", &summer), "Eastern Time");
    }

    #[test]
    fn non_us_short_names_use_offsets() {
        let paris = Zone::parse("Europe/Paris").unwrap();
        let kolkata = Zone::parse("Asia/Kolkata").unwrap();
        let winter = at("2024-01-15T15:30:00Z");
        assert_eq!(paris.display_name("short", &winter), "GMT+1");
        assert_eq!(paris.display_name("long", &winter), "Central European Standard Time");
        assert_eq!(kolkata.display_name("short", &winter), "GMT+5:30");
        assert_eq!(kolkata.display_name("long", &winter), "India Standard Time");
    }

    #[test]
    fn utc_names() {
        let utc = Zone::utc();
        let t = at("2024-01-15T15:30:00Z");
        assert_eq!(utc.display_name("short", &t), "UTC");
        assert_eq!(utc.display_name("long", &t), "Coordinated Universal Time");
        assert_eq!(utc.display_name("shortOffset", &t), "GMT");
    }

    #[test]
    fn local_round_trip_and_gap() {
        let ny = Zone::parse("America/New_York").unwrap();
        let local = NaiveDateTime::parse_from_str("2024-01-15T10:30", "%Y-%m-%dT%H:%M").unwrap();
        let utc = ny.to_utc(&local).unwrap();
        assert_eq!(utc, at("2024-01-15T15:30:00Z"));
        assert_eq!(ny.local(&utc), Some(local));

        // 02:30 does not exist on 2024-03-10; EST (-5) applies.
        let gap = NaiveDateTime::parse_from_str("2024-03-10T02:30", "%Y-%m-%dT%H:%M").unwrap();
        assert_eq!(ny.to_utc(&gap), Some(at("2024-03-10T07:30:00Z")));
    }
}
