// English display names for calendar fields.

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// `month` is 1-based.
pub(crate) fn month_name(month: u32, width: &str) -> String {
    let long = MONTHS_LONG[(month.clamp(1, 12) - 1) as usize];
    match width {
        "short" => long[..3].to_string(),
        "narrow" => long[..1].to_string(),
        _ => long.to_string(),
    }
}

/// `weekday` counts from Sunday = 0.
pub(crate) fn weekday_name(weekday: u32, width: &str) -> String {
    let long = WEEKDAYS_LONG[(weekday % 7) as usize];
    match width {
        "short" => long[..3].to_string(),
        "narrow" => long[..1].to_string(),
        _ => long.to_string(),
    }
}

/// Proleptic Gregorian: year 0 is 1 BC.
pub(crate) fn era_name(year: i32, width: &str) -> &'static str {
    match (year > 0, width) {
        (true, "long") => "Anno Domini",
        (true, "narrow") => "A",
        (true, _) => "AD",
        (false, "long") => "Before Christ",
        (false, "narrow") => "B",
        (false, _) => "BC",
    }
}
