//! Eastern-time normalization.
//!
//! Every timestamp the tools expose is either a `date_et` calendar day or an
//! `et_datetime` instant, both in America/New_York. Date-only input resolves
//! to ET midnight of that day; zoned input is converted; zoneless input is
//! assumed UTC first.

use std::sync::OnceLock;

use jiff::{
    Timestamp, Zoned,
    civil::{self, Time},
    tz::TimeZone,
};

use crate::error::{Result, UpstreamError};

/// The America/New_York time zone, resolved once from the tzdb.
pub fn eastern() -> TimeZone {
    static ET: OnceLock<TimeZone> = OnceLock::new();

    ET.get_or_init(|| TimeZone::get("America/New_York").expect("tzdb must contain America/New_York"))
        .clone()
}

/// Today's calendar date in ET.
pub fn today() -> civil::Date {
    Zoned::now().with_time_zone(eastern()).date()
}

/// Parse a temporal string into an ET instant.
///
/// A 10-character `YYYY-MM-DD` resolves to ET midnight of that day. Anything
/// else parses as ISO-8601; input without a zone is assumed UTC, then the
/// instant is rendered in ET.
pub fn parse_instant(raw: &str, field: &'static str) -> Result<Zoned> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UpstreamError::Normalize { field });
    }

    if raw.len() == 10 {
        let date: civil::Date = raw.parse().map_err(|_| UpstreamError::Normalize { field })?;
        return date.to_zoned(eastern()).map_err(|_| UpstreamError::Normalize { field });
    }

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Ok(timestamp.to_zoned(eastern()));
    }

    let datetime: civil::DateTime = raw.parse().map_err(|_| UpstreamError::Normalize { field })?;
    let utc = datetime
        .to_zoned(TimeZone::UTC)
        .map_err(|_| UpstreamError::Normalize { field })?;

    Ok(utc.with_time_zone(eastern()))
}

/// Parse a calendar date, accepting `YYYY-MM-DD` and `DD/MM/YYYY`.
pub fn parse_date(raw: &str, field: &'static str) -> Result<civil::Date> {
    let raw = raw.trim();

    if let Ok(date) = raw.parse::<civil::Date>() {
        return Ok(date);
    }

    civil::Date::strptime("%d/%m/%Y", raw).map_err(|_| UpstreamError::Normalize { field })
}

/// Whether an instant sits exactly on midnight. Game-log entries with a
/// midnight kickoff are date-only records whose time is unknown.
pub fn is_midnight(zoned: &Zoned) -> bool {
    zoned.time() == Time::midnight()
}

/// Render an ET instant for the wire, offset included.
pub fn render(zoned: &Zoned) -> String {
    zoned.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
