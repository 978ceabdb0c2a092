use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::Observation;
use crate::config::LoadOptions;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Row-level rejection reasons
// ---------------------------------------------------------------------------

/// Why a row was dropped. Never fatal: the loader counts and skips.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedRow {
    #[error("expected {expected} fields, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("row has {found} fields but column {column} is required")]
    MissingField { column: usize, found: usize },
    #[error("time '{0}' is not a number or ISO-8601 date")]
    BadTime(String),
    #[error("brightness '{0}' is not a finite number")]
    BadBrightness(String),
    #[error("error '{0}' is not a finite number")]
    BadError(String),
    #[error("error {0} is not positive")]
    NonPositiveError(f64),
    #[error("undecodable record: {0}")]
    Undecodable(String),
}

impl MalformedRow {
    /// Short stable label used to group skip counts.
    pub fn kind(&self) -> &'static str {
        match self {
            MalformedRow::ColumnCount { .. } => "column count",
            MalformedRow::MissingField { .. } => "missing field",
            MalformedRow::BadTime(_) => "bad time",
            MalformedRow::BadBrightness(_) => "bad brightness",
            MalformedRow::BadError(_) => "bad error",
            MalformedRow::NonPositiveError(_) => "non-positive error",
            MalformedRow::Undecodable(_) => "undecodable",
        }
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Turn the fields of one data row into an [`Observation`].
///
/// Checks run in order: field count, presence of every designated column,
/// then time, brightness and (if configured) error values.
pub fn parse_row<S: AsRef<str>>(
    fields: &[S],
    opts: &LoadOptions,
) -> Result<Observation, MalformedRow> {
    let found = fields.len();
    if let Some(expected) = opts.expected_columns {
        if found != expected {
            return Err(MalformedRow::ColumnCount { expected, found });
        }
    }

    let field = |column: usize| {
        fields
            .get(column)
            .map(|f| f.as_ref().trim())
            .ok_or(MalformedRow::MissingField { column, found })
    };

    let raw_time = field(opts.time_column)?;
    let time = parse_time(raw_time).ok_or_else(|| MalformedRow::BadTime(raw_time.to_string()))?;

    let raw_brightness = field(opts.brightness_column)?;
    let brightness = parse_finite(raw_brightness)
        .ok_or_else(|| MalformedRow::BadBrightness(raw_brightness.to_string()))?;

    let mut obs = Observation::new(time, brightness);
    if let Some(err_col) = opts.error_column {
        let raw_err = field(err_col)?;
        let err = parse_finite(raw_err).ok_or_else(|| MalformedRow::BadError(raw_err.to_string()))?;
        if err <= 0.0 {
            return Err(MalformedRow::NonPositiveError(err));
        }
        obs = obs.with_error(err);
    }
    Ok(obs)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric time as-is; ISO-8601 dates and date-times become Julian Dates.
pub fn parse_time(s: &str) -> Option<f64> {
    if let Some(v) = parse_finite(s) {
        return Some(v);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(datetime_to_jd(dt));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(datetime_to_jd)
}

fn datetime_to_jd(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_millis()) / 1000.0;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}
