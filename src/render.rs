//! The display component: controls, call preview and formatted output.

use std::cell::OnceCell;
use std::fmt::Write;

use crate::controller::UNSET;
use crate::format::{DateTimeFormat, FormatError};
use crate::host::{Host, supported_time_zones};
use crate::options::{DerivedOptions, derive};
use crate::params::{Choices, DATE, PARAMETERS, ParamSet, Parameter};

pub const TITLE: &str = "Intl.DateTimeFormat() Playground";
pub const DOCS_URL: &str = "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Intl/DateTimeFormat/DateTimeFormat#parameters";

/// One selector: a recognized parameter, its choices and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control<'a> {
    pub name: &'static str,
    pub choices: &'a [&'static str],
    pub current: Option<&'a str>,
}

pub struct Playground {
    host: Host,
    /// Resolved once; later changes to the host are not picked up.
    locale: String,
    time_zones: OnceCell<Vec<&'static str>>,
}

impl Playground {
    pub fn new(host: Host) -> Self {
        let locale = host.default_locale().to_string();
        Self {
            host,
            locale,
            time_zones: OnceCell::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The supported zones, enumerated on first use.
    pub fn time_zones(&self) -> &[&'static str] {
        self.time_zones.get_or_init(|| {
            let zones = supported_time_zones();
            tracing::debug!(count = zones.len(), "enumerated time zones");
            zones
        })
    }

    fn choices(&self, parameter: &Parameter) -> &[&'static str] {
        match parameter.choices {
            Choices::Fixed(values) => values,
            Choices::TimeZones => self.time_zones(),
        }
    }

    pub fn controls<'a>(&'a self, params: &'a ParamSet) -> Vec<Control<'a>> {
        PARAMETERS
            .iter()
            .map(|parameter| Control {
                name: parameter.name,
                choices: self.choices(parameter),
                current: params.get(parameter.name),
            })
            .collect()
    }

    pub fn try_format(
        &self,
        params: &ParamSet,
        options: &DerivedOptions,
    ) -> Result<String, FormatError> {
        let date = params.get(DATE).unwrap_or_default();
        let instant = self.host.parse_date(date).ok_or_else(FormatError::invalid_time)?;
        let formatter = DateTimeFormat::try_new(self.locale(), options, self.host.zone())?;
        tracing::trace!(
            locale = formatter.locale(),
            zone = %formatter.time_zone().id(),
            hour_cycle = ?formatter.hour_cycle(),
            "formatter ready"
        );
        formatter.format(&instant)
    }

    /// The formatted string, or empty when the formatter rejects the input.
    pub fn formatted(&self, params: &ParamSet) -> String {
        self.output(params, &derive(params))
    }

    fn output(&self, params: &ParamSet, options: &DerivedOptions) -> String {
        self.try_format(params, options).unwrap_or_else(|err| {
            tracing::debug!(%err, "formatting failed");
            String::new()
        })
    }

    /// The equivalent JavaScript call.
    pub fn preview(&self, options: &DerivedOptions) -> String {
        format!(
            "new Intl.DateTimeFormat(\"{}\", {}).format(date)",
            self.locale(),
            options.to_pretty_json()
        )
    }

    pub fn render(&self, params: &ParamSet) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\u{1F4C5}\u{231A} {}", TITLE);
        let _ = writeln!(out, "Read the docs: {}", DOCS_URL);
        let _ = writeln!(out);

        let Some(date) = params.get(DATE) else {
            let _ = writeln!(out, "Date: {}", UNSET);
            return out;
        };
        let _ = writeln!(out, "Date: {}", date);
        let _ = writeln!(out);

        for control in self.controls(params) {
            let _ = writeln!(out, "{}", render_control(&control));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "[Reset]");
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", self.preview(&derive(params)));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.formatted(params));
        out
    }
}

fn mark(value: &str, selected: bool) -> String {
    if selected {
        format!("[{}]", value)
    } else {
        value.to_string()
    }
}

// Long lists (time zones) show only the current value and a count.
const MAX_INLINE_CHOICES: usize = 8;

fn render_control(control: &Control<'_>) -> String {
    let mut line = format!("{:<24}{}", control.name, mark(UNSET, control.current.is_none()));
    if control.choices.len() > MAX_INLINE_CHOICES {
        if let Some(current) = control.current {
            let _ = write!(line, " {}", mark(current, true));
        }
        let _ = write!(line, " ({} choices, see `zones`)", control.choices.len());
        return line;
    }
    for choice in control.choices {
        let selected = control.current.is_some_and(|current| current == *choice);
        let _ = write!(line, " {}", mark(choice, selected));
    }
    // A value outside the list is still shown so the URL state stays visible.
    if let Some(current) = control.current {
        if !control.choices.iter().any(|choice| *choice == current) {
            let _ = write!(line, " {}", mark(current, true));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Zone;
    use crate::options::NumberOption;

    fn playground() -> Playground {
        Playground::new(Host::new("en-US", Zone::parse("America/New_York").unwrap()))
    }

    #[test]
    fn no_date_renders_only_the_date_control() {
        let out = playground().render(&ParamSet::parse("month=long"));
        assert!(out.contains("Date: --"));
        assert!(!out.contains("new Intl.DateTimeFormat"));
        assert!(!out.contains("[Reset]"));
        assert!(!out.contains("month"));
    }

    #[test]
    fn style_mode_end_to_end() {
        let pg = playground();
        let params =
            ParamSet::parse("date=2024-01-15T10%3A30&dateStyle=full&hour12=true&weekday=long");
        let out = pg.render(&params);
        assert!(out.contains(
            "new Intl.DateTimeFormat(\"en-US\", {\n  \"dateStyle\": \"full\",\n  \"hour12\": true\n}).format(date)"
        ));
        assert_eq!(pg.formatted(&params), "Monday, January 15, 2024");
        assert!(out.ends_with("Monday, January 15, 2024\n"));
    }

    #[test]
    fn field_mode_end_to_end() {
        let pg = playground();
        let params = ParamSet::parse("date=2024-01-15T10%3A30&year=numeric&month=short");
        assert_eq!(pg.formatted(&params), "Jan 2024");
    }

    #[test]
    fn invalid_combination_yields_empty_output() {
        let pg = playground();
        let params = ParamSet::parse("date=2024-01-15T10%3A30");
        let options = DerivedOptions {
            date_style: Some("full".into()),
            weekday: Some("long".into()),
            ..DerivedOptions::default()
        };
        assert!(matches!(pg.try_format(&params, &options), Err(FormatError::Type(_))));
        assert_eq!(pg.output(&params, &options), "");

        let bad_zone = ParamSet::parse("date=2024-01-15T10%3A30&timeZone=Mars%2FBase");
        assert_eq!(pg.formatted(&bad_zone), "");
        let bad_digits = ParamSet::parse("date=2024-01-15T10%3A30&fractionalSecondDigits=9");
        assert_eq!(pg.formatted(&bad_digits), "");
    }

    #[test]
    fn far_future_date_in_offset_zone_yields_empty_output() {
        let pg = Playground::new(Host::new("en-US", Zone::utc()));
        let params = ParamSet::parse("date=%2B262142-12-31T23%3A00Z&timeZone=%2B14%3A00");
        assert_eq!(pg.formatted(&params), "");
        assert!(pg.render(&params).ends_with("}).format(date)\n\n\n"));
    }

    #[test]
    fn invalid_date_yields_empty_output_but_keeps_controls() {
        let pg = playground();
        let params = ParamSet::parse("date=not-a-date&month=long");
        assert_eq!(pg.formatted(&params), "");
        let out = pg.render(&params);
        assert!(out.contains("[Reset]"));
        assert!(out.contains("\"month\": \"long\""));
    }

    #[test]
    fn controls_reflect_current_values() {
        let pg = playground();
        let params = ParamSet::parse("date=2024-01-15T10%3A30&month=short&timeZone=Asia%2FTokyo");
        let controls = pg.controls(&params);
        assert_eq!(controls.len(), PARAMETERS.len());
        let month = controls.iter().find(|c| c.name == "month").unwrap();
        assert_eq!(month.current, Some("short"));
        assert_eq!(
            render_control(month),
            format!("{:<24}-- numeric 2-digit long [short] narrow", "month")
        );
        let zone = controls.iter().find(|c| c.name == "timeZone").unwrap();
        assert!(zone.choices.contains(&"Asia/Tokyo"));
        assert!(render_control(zone).contains("[Asia/Tokyo]"));
        let year = controls.iter().find(|c| c.name == "year").unwrap();
        assert!(render_control(year).starts_with(&format!("{:<24}[--]", "year")));
    }

    #[test]
    fn time_zones_are_enumerated_once() {
        let pg = playground();
        let first = pg.time_zones().as_ptr();
        let second = pg.time_zones().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn locale_is_captured_at_construction() {
        let pg = Playground::new(Host::new("de-DE", Zone::utc()));
        assert_eq!(pg.locale(), "de-DE");
        let options = DerivedOptions {
            fractional_second_digits: Some(NumberOption(1.0)),
            ..DerivedOptions::default()
        };
        assert!(pg.preview(&options).starts_with("new Intl.DateTimeFormat(\"de-DE\", {"));
    }
}
