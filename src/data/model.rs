use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::filter::MalformedRow;

const DAYS_PER_YEAR: f64 = 365.25;

// ---------------------------------------------------------------------------
// Observation – one valid row of the input file
// ---------------------------------------------------------------------------

/// A single brightness measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Julian Date (or whatever numeric time the file uses).
    pub time: f64,
    /// Magnitude or flux, depending on the configured scale.
    pub brightness: f64,
    /// Measurement uncertainty, strictly positive when present.
    pub error: Option<f64>,
}

impl Observation {
    pub fn new(time: f64, brightness: f64) -> Self {
        Self {
            time,
            brightness,
            error: None,
        }
    }

    pub fn with_error(mut self, error: f64) -> Self {
        self.error = Some(error);
        self
    }

    /// Brightness extent including the error bar.
    pub fn brightness_bounds(&self) -> (f64, f64) {
        let e = self.error.unwrap_or(0.0);
        (self.brightness - e, self.brightness + e)
    }
}

// ---------------------------------------------------------------------------
// LightCurve – the loaded series
// ---------------------------------------------------------------------------

/// Observations ordered by ascending time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCurve {
    observations: Vec<Observation>,
}

impl LightCurve {
    /// Build a curve, sorting by time. The sort is stable so equal
    /// timestamps keep their file order.
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.observations.iter().any(|o| o.error.is_some())
    }

    /// `(min, max)` of the time column, `None` when empty.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = self.observations.first()?;
        let last = self.observations.last()?;
        Some((first.time, last.time))
    }

    /// `(min, max)` of brightness, widened by error bars.
    pub fn brightness_range(&self) -> Option<(f64, f64)> {
        self.observations.iter().fold(None, |acc, o| {
            let (lo, hi) = o.brightness_bounds();
            Some(match acc {
                None => (lo, hi),
                Some((min, max)) => (f64::min(min, lo), f64::max(max, hi)),
            })
        })
    }

    /// Descriptive statistics of the curve, `None` when empty.
    pub fn summary(&self) -> Option<Summary> {
        let (t_min, t_max) = self.time_range()?;
        let n = self.observations.len();
        let values: Vec<f64> = self.observations.iter().map(|o| o.brightness).collect();

        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = (n > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let errors: Vec<f64> = self.observations.iter().filter_map(|o| o.error).collect();
        let mean_error =
            (!errors.is_empty()).then(|| errors.iter().sum::<f64>() / errors.len() as f64);

        let span = t_max - t_min;
        Some(Summary {
            count: n,
            time_span_days: span,
            time_span_years: span / DAYS_PER_YEAR,
            mean,
            std_dev,
            min,
            max,
            amplitude: max - min,
            mean_error,
        })
    }
}

// ---------------------------------------------------------------------------
// Summary – descriptive statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub time_span_days: f64,
    pub time_span_years: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1), undefined for a single point.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub amplitude: f64,
    pub mean_error: Option<f64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Observations:     {}", self.count)?;
        writeln!(
            f,
            "Observation span: {:.2} days ({:.2} years)",
            self.time_span_days, self.time_span_years
        )?;
        writeln!(f, "Brightness:")?;
        writeln!(f, "  Mean:      {:.4}", self.mean)?;
        match self.std_dev {
            Some(sd) => writeln!(f, "  Std Dev:   {sd:.4}")?,
            None => writeln!(f, "  Std Dev:   n/a")?,
        }
        writeln!(f, "  Min:       {:.4}", self.min)?;
        writeln!(f, "  Max:       {:.4}", self.max)?;
        write!(f, "  Amplitude: {:.4}", self.amplitude)?;
        if let Some(err) = self.mean_error {
            write!(f, "\nMean measurement error: {err:.6}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LoadReport – what happened while reading
// ---------------------------------------------------------------------------

/// Row counts collected by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen (header and comment lines excluded).
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Skipped rows per reason, keyed by [`MalformedRow::kind`].
    pub skipped_by_reason: BTreeMap<&'static str, usize>,
}

impl LoadReport {
    pub fn record_skip(&mut self, reason: &MalformedRow) {
        self.rows_skipped += 1;
        *self.skipped_by_reason.entry(reason.kind()).or_default() += 1;
    }

    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}
