//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, TimeZone};
use chrono_tz::Tz;
use std::fmt::Write;

use crate::error::DateError;

/// Display format applied to publication dates unless configured otherwise
pub const DEFAULT_DATE_FORMAT: &str = "dd MMM yyyy";

/// `DEFAULT_DATE_FORMAT` converted to chrono's strftime syntax
const DEFAULT_CHRONO_FORMAT: &str = "%d %b %Y";

/// Formats API timestamps into localized display strings
#[derive(Debug, Clone)]
pub struct DateFormatter {
    locale: Locale,
    timezone: Tz,
    pattern: String,
    chrono_format: String,
}

impl DateFormatter {
    pub fn new(locale: Locale, timezone: Tz, pattern: &str) -> Result<Self, DateError> {
        Ok(Self {
            locale,
            timezone,
            pattern: pattern.to_string(),
            chrono_format: pattern_to_chrono_format(pattern)?,
        })
    }

    /// Build a formatter from a language tag, an IANA timezone name and a pattern.
    /// An empty timezone means UTC, an empty pattern means `DEFAULT_DATE_FORMAT`.
    pub fn from_settings(language: &str, timezone: &str, pattern: &str) -> Result<Self, DateError> {
        let tz = if timezone.trim().is_empty() {
            Tz::UTC
        } else {
            timezone
                .trim()
                .parse::<Tz>()
                .map_err(|_| DateError::UnknownTimezone(timezone.to_string()))?
        };
        let pattern = if pattern.trim().is_empty() {
            DEFAULT_DATE_FORMAT
        } else {
            pattern
        };
        Self::new(locale_from_tag(language)?, tz, pattern)
    }

    /// Parse a raw API timestamp and format it for display
    pub fn format(&self, raw: &str) -> Result<String, DateError> {
        let date = parse_datetime(raw)?;
        self.format_datetime(&date)
    }

    /// Format an already parsed date in the configured timezone
    fn format_datetime<Z: TimeZone>(&self, date: &DateTime<Z>) -> Result<String, DateError> {
        let local = date.with_timezone(&self.timezone);
        let mut out = String::new();
        write!(out, "{}", local.format_localized(&self.chrono_format, self.locale))
            .map_err(|_| DateError::InvalidPattern(self.pattern.clone()))?;
        Ok(out)
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::pt_BR,
            timezone: Tz::UTC,
            pattern: DEFAULT_DATE_FORMAT.to_string(),
            chrono_format: DEFAULT_CHRONO_FORMAT.to_string(),
        }
    }
}

/// Resolve a language tag such as `pt-BR`, `pt_br`, `fr` or `en-US` to a
/// chrono locale. A bare language gets its most common region.
fn locale_from_tag(tag: &str) -> Result<Locale, DateError> {
    let normalized = tag.trim().replace('-', "_");
    let mut parts = normalized.splitn(2, '_');
    let language = parts.next().unwrap_or_default().to_lowercase();
    let region = match parts.next() {
        Some(region) => region.to_uppercase(),
        None => match language.as_str() {
            "en" => "US".to_string(),
            "pt" => "BR".to_string(),
            "zh" => "CN".to_string(),
            "ja" => "JP".to_string(),
            "ko" => "KR".to_string(),
            other => other.to_uppercase(),
        },
    };

    Locale::try_from(format!("{}_{}", language, region).as_str())
        .map_err(|_| DateError::UnsupportedLocale(tag.to_string()))
}

/// Parse the timestamp shapes the content API emits.
///
/// Accepts RFC 3339 (`2021-03-25T12:00:00Z`), the colon-less offset form
/// (`2021-03-25T12:00:00+0000`) and bare dates (taken as UTC midnight).
fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, DateError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in &formats {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(ndt.and_utc().fixed_offset());
        }
    }

    Err(DateError::Unparseable(raw.to_string()))
}

/// Convert a date-fns / Moment.js style pattern to chrono's strftime syntax.
///
/// Letter runs are tokens, text inside single quotes is copied verbatim and
/// `''` is a literal quote. Letters with no chrono counterpart are rejected.
fn pattern_to_chrono_format(pattern: &str) -> Result<String, DateError> {
    let mut out = String::with_capacity(pattern.len() * 2);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    let push_literal = |out: &mut String, c: char| {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    };

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        i += run;

        let spec = match (c, run) {
            ('y' | 'Y', 2) => "%y",
            ('y' | 'Y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d' | 'D', 1) => "%-d",
            ('d' | 'D', 2) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', 2) => "%H",
            ('h', 1) => "%-I",
            ('h', 2) => "%I",
            ('m', 1) => "%-M",
            ('m', 2) => "%M",
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('a' | 'A', 1) => "%p",
            ('Z', 1) => "%:z",
            ('Z', 2) => "%z",
            _ => {
                return Err(DateError::UnsupportedToken(
                    std::iter::repeat(c).take(run).collect(),
                ))
            }
        };
        out.push_str(spec);
    }

    Ok(out)
}
