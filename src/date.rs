//! Date handling for pages: parsing frontmatter timestamps ([`parse_date`])
//! and formatting them with caller-supplied layouts ([`DateFormat`]).
//!
//! Layouts come in two flavors. A layout containing `%` is a strftime pattern
//! and is handed to [`chrono`] as-is. Any other layout is a reference-date
//! layout: it spells out how the reference time `Mon Jan 2 15:04:05 MST 2006`
//! should look, e.g. `2006-01-02` or `January 2006`.
//!
//! Page dates carry a fixed offset rather than a named zone, so the zone
//! chunks `MST` and `Z07:00` both format as a numeric offset (`+00:00`).

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseResult, TimeZone, Utc,
};

use crate::group::Error;

/// Components of the reference time and their strftime equivalents. Longer
/// chunks come first so that e.g. `January` wins over `Jan` and `2006` wins
/// over `2`.
const REFERENCE_CHUNKS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Jan", "%b"),
    ("Monday", "%A"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("2006", "%Y"),
    ("002", "%j"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("_2", "%e"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("Z07:00", "%:z"),
    ("PM", "%p"),
    ("pm", "%P"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// A compiled date layout. Construct with [`DateFormat::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateFormat {
    /// The layout as supplied by the caller.
    layout: String,

    /// The equivalent strftime pattern, already validated.
    pattern: String,
}

impl DateFormat {
    /// Compiles `layout` into a [`DateFormat`]. Fails with
    /// [`Error::InvalidDateFormat`] if the resulting strftime pattern holds a
    /// specifier that [`chrono`] doesn't understand or can only parse with
    /// (e.g., `%#z`).
    pub fn parse(layout: &str) -> Result<DateFormat, Error> {
        let pattern = if layout.contains('%') {
            layout.to_owned()
        } else {
            translate_reference_layout(layout)
        };

        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidDateFormat(layout.to_owned()));
        }

        // Formatting the sample must succeed so that `format` can't fail.
        let sample = utc(&NaiveDate::MIN.and_time(NaiveTime::MIN));
        let mut formatted = String::new();
        if write!(formatted, "{}", sample.format(&pattern)).is_err() {
            return Err(Error::InvalidDateFormat(layout.to_owned()));
        }

        Ok(DateFormat {
            layout: layout.to_owned(),
            pattern,
        })
    }

    /// The layout this format was compiled from.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// The strftime pattern this format formats with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Formats `date` according to the layout.
    pub fn format(&self, date: &DateTime<FixedOffset>) -> String {
        date.format(&self.pattern).to_string()
    }
}

fn translate_reference_layout(layout: &str) -> String {
    let mut pattern = String::with_capacity(layout.len() * 2);
    let mut rest = layout;
    'outer: while let Some(c) = rest.chars().next() {
        for (chunk, spec) in REFERENCE_CHUNKS {
            if rest.starts_with(chunk) {
                pattern.push_str(spec);
                rest = &rest[chunk.len()..];
                continue 'outer;
            }
        }
        pattern.push(c);
        rest = &rest[c.len_utf8()..];
    }
    pattern
}

/// Parses a frontmatter timestamp. Accepts RFC 3339 (`2014-05-01T10:00:00+02:00`),
/// `2014-05-01 10:00:00`, `2014-05-01T10:00:00`, and bare dates
/// (`2014-05-01`). Values without an offset are taken as UTC; bare dates are
/// taken as midnight.
pub fn parse_date(input: &str) -> ParseResult<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date);
    }

    for layout in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
            return Ok(utc(&naive));
        }
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")?;
    Ok(utc(&date.and_time(NaiveTime::MIN)))
}

fn utc(naive: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(naive).into()
}
