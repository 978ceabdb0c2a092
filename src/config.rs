use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid delimiter '{0}': expected a single character, 'tab' or 'whitespace'")]
    Delimiter(String),
}

// ---------------------------------------------------------------------------
// Delimiter
// ---------------------------------------------------------------------------

/// Field separator of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Delimiter {
    /// A single ASCII byte handed to the csv reader.
    Byte(u8),
    /// Runs of spaces/tabs, as in fixed-width photometry dumps.
    Whitespace,
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Byte(b',')
    }
}

impl FromStr for Delimiter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" | "\\t" => return Ok(Delimiter::Byte(b'\t')),
            "whitespace" | "ws" | "space" => return Ok(Delimiter::Whitespace),
            "comma" => return Ok(Delimiter::Byte(b',')),
            "semicolon" => return Ok(Delimiter::Byte(b';')),
            _ => {}
        }
        let bytes = s.as_bytes();
        if bytes.len() == 1 && bytes[0].is_ascii() {
            Ok(Delimiter::Byte(bytes[0]))
        } else {
            Err(ConfigError::Delimiter(s.to_string()))
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Delimiter> for String {
    fn from(value: Delimiter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Byte(b'\t') => write!(f, "tab"),
            Delimiter::Byte(b) => write!(f, "{}", *b as char),
            Delimiter::Whitespace => write!(f, "whitespace"),
        }
    }
}

// ---------------------------------------------------------------------------
// Brightness scale
// ---------------------------------------------------------------------------

/// How the brightness column should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessScale {
    /// Linear flux: larger is brighter.
    #[default]
    Flux,
    /// Astronomical magnitude: smaller is brighter, y axis drawn inverted.
    Magnitude,
}

impl BrightnessScale {
    pub fn inverted(self) -> bool {
        matches!(self, BrightnessScale::Magnitude)
    }

    pub fn default_label(self) -> &'static str {
        match self {
            BrightnessScale::Flux => "Brightness (relative flux)",
            BrightnessScale::Magnitude => "Magnitude",
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Column layout of the input file. Column indices are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub delimiter: Delimiter,
    /// First line holds column names and is not data.
    pub has_header: bool,
    pub time_column: usize,
    pub brightness_column: usize,
    pub error_column: Option<usize>,
    /// When set, rows with a different field count are malformed.
    pub expected_columns: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            has_header: false,
            time_column: 0,
            brightness_column: 1,
            error_column: None,
            expected_columns: None,
        }
    }
}

impl LoadOptions {
    /// Smallest field count a row needs to cover every designated column.
    pub fn min_fields(&self) -> usize {
        let last = self
            .time_column
            .max(self.brightness_column)
            .max(self.error_column.unwrap_or(0));
        last + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub scale: BrightnessScale,
    pub title: String,
    pub x_label: String,
    /// Falls back to the scale's default label.
    pub y_label: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            scale: BrightnessScale::Flux,
            title: "Variable Star Light Curve".to_string(),
            x_label: "Time (BJD)".to_string(),
            y_label: None,
            width: 1400,
            height: 600,
        }
    }
}

impl PlotOptions {
    pub fn y_label(&self) -> &str {
        self.y_label
            .as_deref()
            .unwrap_or_else(|| self.scale.default_label())
    }
}

/// Everything a run needs besides the input/output paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: LoadOptions,
    pub plot: PlotOptions,
}

impl RunConfig {
    /// Load a JSON run config. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path_ref.display().to_string(),
            source,
        })
    }
}
