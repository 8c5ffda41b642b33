//! Locale-aware date/time formatting in the shape of `Intl.DateTimeFormat`.
//!
//! [`DateTimeFormat::try_new`] validates an options structure the way the
//! `Intl.DateTimeFormat` constructor does and [`DateTimeFormat::format`]
//! renders an instant with it. Output uses en-US patterns and names; the
//! locale selects the default hour cycle.

mod names;
pub mod zone;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::options::{DerivedOptions, NumberOption};
use names::{era_name, month_name, weekday_name};
pub use zone::Zone;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("RangeError: {0}")]
    Range(String),
    #[error("TypeError: {0}")]
    Type(String),
}

impl FormatError {
    pub fn invalid_time() -> Self {
        FormatError::Range("Invalid time value".to_string())
    }
}

const STYLES: &[&str] = &["full", "long", "medium", "short"];
const TEXT_WIDTHS: &[&str] = &["narrow", "short", "long"];
const NUMERIC: &[&str] = &["numeric", "2-digit"];
const MONTHS: &[&str] = &["numeric", "2-digit", "narrow", "short", "long"];
const TIME_ZONE_NAMES: &[&str] = &[
    "short",
    "long",
    "shortOffset",
    "longOffset",
    "shortGeneric",
    "longGeneric",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourCycle {
    H11,
    H12,
    H23,
}

impl HourCycle {
    fn uses_period(self) -> bool {
        matches!(self, HourCycle::H11 | HourCycle::H12)
    }

    /// Hour value shown for a 0-23 hour.
    fn display_hour(self, hour24: u32) -> u32 {
        match self {
            HourCycle::H12 if hour24 == 0 => 12,
            HourCycle::H12 if hour24 > 12 => hour24 - 12,
            HourCycle::H12 => hour24,
            HourCycle::H11 => hour24 % 12,
            HourCycle::H23 => hour24,
        }
    }

    fn format_hour(self, hour24: u32, two_digit: bool) -> String {
        let h = self.display_hour(hour24);
        // The 24-hour cycle always pads, as ICU patterns use "HH".
        if two_digit || !self.uses_period() {
            format_2digit(h)
        } else {
            h.to_string()
        }
    }
}

fn language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or("en")
}

fn locale_default_hour12(locale: &str) -> HourCycle {
    match language(locale) {
        "ja" => HourCycle::H11,
        _ => HourCycle::H12,
    }
}

fn locale_default_hour_cycle(locale: &str) -> HourCycle {
    match language(locale) {
        "en" | "ar" | "ko" | "hi" | "bn" => HourCycle::H12,
        "ja" | "zh" | "de" | "fr" | "it" | "es" | "pt" | "ru" | "nl" | "sv" | "da" | "nb"
        | "fi" | "pl" | "cs" | "hu" | "ro" | "tr" | "uk" | "hr" | "sk" | "sl" | "bg" | "el"
        | "he" | "th" | "vi" | "id" | "ms" => HourCycle::H23,
        _ => HourCycle::H12,
    }
}

fn format_2digit(n: u32) -> String {
    format!("{:02}", n % 100)
}

fn get_option(
    property: &str,
    value: Option<&String>,
    allowed: &[&'static str],
) -> Result<Option<&'static str>, FormatError> {
    let Some(value) = value else {
        return Ok(None);
    };
    allowed
        .iter()
        .copied()
        .find(|candidate| *candidate == value.as_str())
        .map(Some)
        .ok_or_else(|| {
            FormatError::Range(format!("Value {} is not allowed for option {}", value, property))
        })
}

fn get_number_option(
    property: &str,
    value: Option<NumberOption>,
    minimum: f64,
    maximum: f64,
) -> Result<Option<u32>, FormatError> {
    let Some(NumberOption(num)) = value else {
        return Ok(None);
    };
    if num.is_nan() || num < minimum || num > maximum {
        return Err(FormatError::Range(format!(
            "Value {} is outside of range [{}, {}] for option {}",
            num,
            minimum,
            maximum,
            property
        )));
    }
    Ok(Some(num.floor() as u32))
}

/// A validated formatter.
#[derive(Debug, Clone)]
pub struct DateTimeFormat {
    locale: String,
    time_zone: Zone,
    hour_cycle: HourCycle,
    weekday: Option<&'static str>,
    era: Option<&'static str>,
    year: Option<&'static str>,
    month: Option<&'static str>,
    day: Option<&'static str>,
    hour: Option<&'static str>,
    minute: Option<&'static str>,
    second: Option<&'static str>,
    fractional_second_digits: Option<u32>,
    time_zone_name: Option<&'static str>,
    date_style: Option<&'static str>,
    time_style: Option<&'static str>,
}

struct Components {
    year: i32,
    month: u32,
    day: u32,
    weekday: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
}

impl DateTimeFormat {
    /// Validate `options` for `locale`. `default_zone` applies when the
    /// options carry no `timeZone`.
    pub fn try_new(
        locale: &str,
        options: &DerivedOptions,
        default_zone: Zone,
    ) -> Result<Self, FormatError> {
        let time_zone = match options.time_zone.as_deref() {
            Some(tz) => Zone::parse(tz).ok_or_else(|| {
                FormatError::Range(format!("Invalid time zone specified: {}", tz))
            })?,
            None => default_zone,
        };

        let weekday = get_option("weekday", options.weekday.as_ref(), TEXT_WIDTHS)?;
        let era = get_option("era", options.era.as_ref(), TEXT_WIDTHS)?;
        let year = get_option("year", options.year.as_ref(), NUMERIC)?;
        let month = get_option("month", options.month.as_ref(), MONTHS)?;
        let day = get_option("day", options.day.as_ref(), NUMERIC)?;
        let hour = get_option("hour", options.hour.as_ref(), NUMERIC)?;
        let minute = get_option("minute", options.minute.as_ref(), NUMERIC)?;
        let second = get_option("second", options.second.as_ref(), NUMERIC)?;
        let fractional_second_digits = get_number_option(
            "fractionalSecondDigits",
            options.fractional_second_digits,
            1.0,
            3.0,
        )?;
        let time_zone_name =
            get_option("timeZoneName", options.time_zone_name.as_ref(), TIME_ZONE_NAMES)?;
        let date_style = get_option("dateStyle", options.date_style.as_ref(), STYLES)?;
        let time_style = get_option("timeStyle", options.time_style.as_ref(), STYLES)?;

        let has_style = date_style.is_some() || time_style.is_some();
        let has_date_time_component = weekday.is_some()
            || year.is_some()
            || month.is_some()
            || day.is_some()
            || hour.is_some()
            || minute.is_some()
            || second.is_some()
            || fractional_second_digits.is_some();
        let has_component =
            has_date_time_component || era.is_some() || time_zone_name.is_some();

        if has_style && has_component {
            return Err(FormatError::Type(
                "Can't set option when dateStyle or timeStyle is used".to_string(),
            ));
        }

        // No component and no style: default to a numeric date. A lone
        // timeZoneName or era does not suppress the default.
        let (year, month, day) = if !has_style && !has_date_time_component {
            (Some("numeric"), Some("numeric"), Some("numeric"))
        } else {
            (year, month, day)
        };

        let hour_cycle = match options.hour12 {
            Some(true) => locale_default_hour12(locale),
            Some(false) => HourCycle::H23,
            None => locale_default_hour_cycle(locale),
        };

        Ok(DateTimeFormat {
            locale: locale.to_string(),
            time_zone,
            hour_cycle,
            weekday,
            era,
            year,
            month,
            day,
            hour,
            minute,
            second,
            fractional_second_digits,
            time_zone_name,
            date_style,
            time_style,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn time_zone(&self) -> Zone {
        self.time_zone
    }

    pub fn hour_cycle(&self) -> HourCycle {
        self.hour_cycle
    }

    fn components(&self, instant: &DateTime<Utc>) -> Option<Components> {
        let local = self.time_zone.local(instant)?;
        Some(Components {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            weekday: local.weekday().num_days_from_sunday(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            millisecond: (local.nanosecond() / 1_000_000).min(999),
        })
    }

    /// Render `instant`. Fails when its wall-clock time in the formatter's
    /// zone is out of range.
    pub fn format(&self, instant: &DateTime<Utc>) -> Result<String, FormatError> {
        let c = self.components(instant).ok_or_else(FormatError::invalid_time)?;
        Ok(if self.date_style.is_some() || self.time_style.is_some() {
            self.format_styles(&c, instant)
        } else {
            self.format_fields(&c, instant)
        })
    }

    fn format_styles(&self, c: &Components, instant: &DateTime<Utc>) -> String {
        let date = self.date_style.map(|style| format_date_style(c, style));
        let time = self.time_style.map(|style| self.format_time_style(c, style, instant));
        match (date, time) {
            (Some(d), Some(t)) => match self.date_style {
                Some("full" | "long") => format!("{} at {}", d, t),
                _ => format!("{}, {}", d, t),
            },
            (Some(d), None) => d,
            (None, Some(t)) => t,
            (None, None) => String::new(),
        }
    }

    fn format_time_style(&self, c: &Components, style: &str, instant: &DateTime<Utc>) -> String {
        let hc = self.hour_cycle;
        let hour = hc.format_hour(c.hour, false);
        let mut out = match style {
            "short" => format!("{}:{:02}", hour, c.minute),
            _ => format!("{}:{:02}:{:02}", hour, c.minute, c.second),
        };
        if hc.uses_period() {
            out.push(' ');
            out.push_str(if c.hour < 12 { "AM" } else { "PM" });
        }
        match style {
            "full" => {
                out.push(' ');
                out.push_str(&self.time_zone.display_name("long", instant));
            }
            "long" => {
                out.push(' ');
                out.push_str(&self.time_zone.display_name("short", instant));
            }
            _ => {}
        }
        out
    }

    fn format_fields(&self, c: &Components, instant: &DateTime<Utc>) -> String {
        // Proleptic Gregorian: with an era, years count from 1 BC backwards.
        let display_year = if self.era.is_some() && c.year <= 0 {
            1 - c.year
        } else {
            c.year
        };
        let year_str = self.year.map(|y| match y {
            "2-digit" => format_2digit(display_year.unsigned_abs() % 100),
            _ => display_year.to_string(),
        });
        let month_str = self.month.map(|m| match m {
            "2-digit" => format_2digit(c.month),
            "numeric" => c.month.to_string(),
            width => month_name(c.month, width),
        });
        let day_str = self.day.map(|d| match d {
            "2-digit" => format_2digit(c.day),
            _ => c.day.to_string(),
        });
        let era_str = self.era.map(|width| era_name(c.year, width));

        let mut date = String::new();
        let has_date = year_str.is_some() || month_str.is_some() || day_str.is_some();
        if has_date {
            let month_is_text = self
                .month
                .is_some_and(|m| matches!(m, "long" | "short" | "narrow"));
            let mut parts: Vec<String> = Vec::new();
            if month_is_text {
                // "January 15, 2024"
                parts.extend(month_str);
                if let Some(d) = day_str {
                    parts.push(if year_str.is_some() { format!("{},", d) } else { d });
                }
                parts.extend(year_str);
            } else {
                // "1/15/2024"
                let numeric: Vec<String> =
                    [month_str, day_str, year_str].into_iter().flatten().collect();
                parts.push(numeric.join("/"));
            }
            parts.extend(era_str.map(str::to_string));
            date = parts.join(" ");
        } else if let Some(era) = era_str {
            date = era.to_string();
        }

        if let Some(width) = self.weekday {
            let name = weekday_name(c.weekday, width);
            date = if date.is_empty() {
                name
            } else {
                format!("{}, {}", name, date)
            };
        }

        let time = self.format_time_fields(c);

        let mut result = match (date.is_empty(), time.is_empty()) {
            (false, false) if has_date => format!("{}, {}", date, time),
            (false, false) => format!("{} {}", date, time),
            (false, true) => date,
            _ => time.clone(),
        };

        if let Some(style) = self.time_zone_name {
            if !result.is_empty() {
                result.push_str(if time.is_empty() { ", " } else { " " });
            }
            result.push_str(&self.time_zone.display_name(style, instant));
        }
        result
    }

    fn format_time_fields(&self, c: &Components) -> String {
        let hc = self.hour_cycle;
        let mut parts: Vec<String> = Vec::new();

        if let Some(h) = self.hour {
            parts.push(hc.format_hour(c.hour, h == "2-digit"));
        }
        if let Some(m) = self.minute {
            let pad = m == "2-digit" || self.hour.is_some() || self.second.is_some();
            parts.push(if pad { format_2digit(c.minute) } else { c.minute.to_string() });
        }
        if let Some(s) = self.second {
            let pad = s == "2-digit" || self.hour.is_some() || self.minute.is_some();
            parts.push(if pad { format_2digit(c.second) } else { c.second.to_string() });
        }

        if let Some(digits) = self.fractional_second_digits {
            let frac = match digits {
                1 => format!("{}", c.millisecond / 100),
                2 => format!("{:02}", c.millisecond / 10),
                _ => format!("{:03}", c.millisecond),
            };
            match parts.last_mut() {
                Some(last) if self.second.is_some() => {
                    last.push('.');
                    last.push_str(&frac);
                }
                _ => parts.push(frac),
            }
        }

        let mut time = parts.join(":");
        if hc.uses_period() && self.hour.is_some() {
            time.push(' ');
            time.push_str(if c.hour < 12 { "AM" } else { "PM" });
        }
        time
    }
}

fn format_date_style(c: &Components, style: &str) -> String {
    match style {
        "full" => format!(
            "{}, {} {}, {}",
            weekday_name(c.weekday, "long"),
            month_name(c.month, "long"),
            c.day,
            c.year
        ),
        "long" => format!("{} {}, {}", month_name(c.month, "long"), c.day, c.year),
        "medium" => format!("{} {}, {}", month_name(c.month, "short"), c.day, c.year),
        _ => format!(
            "{}/{}/{}",
            c.month,
            c.day,
            format_2digit(c.year.unsigned_abs() % 100)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ny() -> Zone {
        Zone::parse("America/New_York").unwrap()
    }

    /// 2024-01-15 10:30:00.123 in New York.
    fn instant() -> DateTime<Utc> {
        let local =
            NaiveDateTime::parse_from_str("2024-01-15T10:30:00.123", "%Y-%m-%dT%H:%M:%S%.f")
                .unwrap();
        ny().to_utc(&local).unwrap()
    }

    fn fmt(options: DerivedOptions) -> Result<String, FormatError> {
        DateTimeFormat::try_new("en-US", &options, ny())?.format(&instant())
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn default_is_numeric_date() {
        assert_eq!(fmt(DerivedOptions::default()).unwrap(), "1/15/2024");
    }

    #[test]
    fn date_styles() {
        let cases = [
            ("full", "Monday, January 15, 2024"),
            ("long", "January 15, 2024"),
            ("medium", "Jan 15, 2024"),
            ("short", "1/15/24"),
        ];
        for (style, expected) in cases {
            let options = DerivedOptions { date_style: s(style), ..Default::default() };
            assert_eq!(fmt(options).unwrap(), expected, "dateStyle {}", style);
        }
    }

    #[test]
    fn time_styles() {
        let cases = [
            ("full", "10:30:00 AM Eastern Standard Time"),
            ("long", "10:30:00 AM EST"),
            ("medium", "10:30:00 AM"),
            ("short", "10:30 AM"),
        ];
        for (style, expected) in cases {
            let options = DerivedOptions { time_style: s(style), ..Default::default() };
            assert_eq!(fmt(options).unwrap(), expected, "timeStyle {}", style);
        }
    }

    #[test]
    fn combined_styles() {
        let options = DerivedOptions {
            date_style: s("full"),
            time_style: s("short"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "Monday, January 15, 2024 at 10:30 AM");

        let options = DerivedOptions {
            date_style: s("medium"),
            time_style: s("short"),
            hour12: Some(false),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "Jan 15, 2024, 10:30");
    }

    #[test]
    fn style_time_zone_is_applied() {
        let options = DerivedOptions {
            time_style: s("short"),
            time_zone: s("Asia/Tokyo"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "12:30 AM");
    }

    #[test]
    fn year_and_short_month() {
        let options = DerivedOptions {
            year: s("numeric"),
            month: s("short"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "Jan 2024");
    }

    #[test]
    fn text_date_with_weekday_and_era() {
        let options = DerivedOptions {
            weekday: s("long"),
            era: s("short"),
            year: s("numeric"),
            month: s("long"),
            day: s("numeric"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "Monday, January 15, 2024 AD");
    }

    #[test]
    fn numeric_date_and_time() {
        let options = DerivedOptions {
            year: s("2-digit"),
            month: s("2-digit"),
            day: s("2-digit"),
            hour: s("numeric"),
            minute: s("numeric"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "01/15/24, 10:30 AM");
    }

    #[test]
    fn hour12_false_uses_24_hour_clock() {
        let options = DerivedOptions {
            hour: s("numeric"),
            minute: s("2-digit"),
            second: s("2-digit"),
            hour12: Some(false),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "10:30:00");
    }

    #[test]
    fn fractional_seconds() {
        let options = DerivedOptions {
            minute: s("numeric"),
            second: s("numeric"),
            fractional_second_digits: Some(NumberOption(2.0)),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "30:00.12");
    }

    #[test]
    fn time_zone_name_appended() {
        let options = DerivedOptions {
            hour: s("numeric"),
            time_zone_name: s("short"),
            ..Default::default()
        };
        assert_eq!(fmt(options).unwrap(), "10 AM EST");

        let options = DerivedOptions { time_zone_name: s("longOffset"), ..Default::default() };
        assert_eq!(fmt(options).unwrap(), "1/15/2024, GMT-05:00");
    }

    #[test]
    fn locale_picks_hour_cycle() {
        let options = DerivedOptions { time_style: s("short"), ..Default::default() };
        let de = DateTimeFormat::try_new("de-DE", &options, ny()).unwrap();
        assert_eq!(de.hour_cycle(), HourCycle::H23);
        assert_eq!(de.format(&instant()).unwrap(), "10:30");

        let options = DerivedOptions {
            time_style: s("short"),
            hour12: Some(true),
            ..Default::default()
        };
        let ja = DateTimeFormat::try_new("ja-JP", &options, ny()).unwrap();
        assert_eq!(ja.hour_cycle(), HourCycle::H11);
    }

    #[test]
    fn style_with_fields_is_a_type_error() {
        let options = DerivedOptions {
            date_style: s("full"),
            weekday: s("long"),
            ..Default::default()
        };
        assert!(matches!(fmt(options), Err(FormatError::Type(_))));
    }

    #[test]
    fn invalid_values_are_range_errors() {
        let options = DerivedOptions { month: s("longest"), ..Default::default() };
        assert_eq!(
            fmt(options),
            Err(FormatError::Range("Value longest is not allowed for option month".into()))
        );

        let options = DerivedOptions { time_zone: s("Mars/Base"), ..Default::default() };
        assert!(matches!(fmt(options), Err(FormatError::Range(_))));

        let options = DerivedOptions {
            fractional_second_digits: Some(NumberOption(f64::NAN)),
            ..Default::default()
        };
        assert!(matches!(fmt(options), Err(FormatError::Range(_))));

        let options = DerivedOptions {
            fractional_second_digits: Some(NumberOption(4.0)),
            ..Default::default()
        };
        assert!(matches!(fmt(options), Err(FormatError::Range(_))));
    }

    #[test]
    fn out_of_range_wall_clock_is_invalid_time() {
        let last = chrono::NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap().and_utc();
        let plus14 = Zone::parse("+14:00").unwrap();
        let formatter =
            DateTimeFormat::try_new("en-US", &DerivedOptions::default(), plus14).unwrap();
        assert_eq!(formatter.format(&last), Err(FormatError::invalid_time()));

        let formatter =
            DateTimeFormat::try_new("en-US", &DerivedOptions::default(), Zone::utc()).unwrap();
        assert!(formatter.format(&last).is_ok());
    }
}
