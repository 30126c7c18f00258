use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Weekday};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// An instant as the calendar delivered it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    /// Date and time with a known UTC offset
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock date and time without an offset
    Floating(NaiveDateTime),
    /// All-day date
    Date(NaiveDate),
}

impl Instant {
    /// Parse RFC 3339, naive ISO datetime, or ISO date text
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Instant::Zoned(dt));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Instant::Floating(dt));
            }
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(Instant::Date)
    }

    /// Stable text form used in canonical events
    pub fn canonical(&self) -> String {
        match self {
            Instant::Zoned(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
            Instant::Floating(dt) => dt.format(NAIVE_FORMAT).to_string(),
            Instant::Date(date) => date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Local wall-clock time, with dates at midnight
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Instant::Zoned(dt) => dt.naive_local(),
            Instant::Floating(dt) => *dt,
            Instant::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }

    /// Ordering key; zoned instants compare in UTC
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            Instant::Zoned(dt) => dt.naive_utc(),
            other => other.wall_clock(),
        }
    }
}

/// Canonical text for an instant, or the trimmed input if it does not parse
pub fn canonical_instant(text: &str) -> String {
    match Instant::parse(text) {
        Some(instant) => instant.canonical(),
        None => text.trim().to_string(),
    }
}

/// Localized day name, Monday first
pub fn weekday_name(weekday: Weekday, locale: &str) -> String {
    let name = match weekday {
        Weekday::Mon => t!("weekday_mon", locale = locale),
        Weekday::Tue => t!("weekday_tue", locale = locale),
        Weekday::Wed => t!("weekday_wed", locale = locale),
        Weekday::Thu => t!("weekday_thu", locale = locale),
        Weekday::Fri => t!("weekday_fri", locale = locale),
        Weekday::Sat => t!("weekday_sat", locale = locale),
        Weekday::Sun => t!("weekday_sun", locale = locale),
    };
    name.to_string()
}

/// Render `"<Day>, YYYY-MM-DD HH:MM-HH:MM"` from two instants
pub fn format_time_range(start: &str, end: &str, locale: &str) -> String {
    let Some(start_instant) = Instant::parse(start) else {
        return format!("{}-{}", start.trim(), end.trim());
    };

    let start_time = start_instant.wall_clock();
    let end_text = match Instant::parse(end) {
        Some(end_instant) => end_instant.wall_clock().format("%H:%M").to_string(),
        None => end.trim().to_string(),
    };

    format!(
        "{}, {}-{}",
        weekday_name(start_time.weekday(), locale),
        start_time.format("%Y-%m-%d %H:%M"),
        end_text
    )
}
