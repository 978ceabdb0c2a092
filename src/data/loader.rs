use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use super::filter::{parse_row, MalformedRow};
use super::model::{LightCurve, LoadReport, Observation};
use crate::config::{Delimiter, LoadOptions};

/// Written by some spreadsheet exports at the start of the file; not
/// whitespace as far as `str::trim` is concerned.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Fatal loading failures. Bad rows are not errors; see [`MalformedRow`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read input file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a light curve from a delimited text file.
///
/// The file handle lives only for the duration of this call.
pub fn load_file(path: &Path, opts: &LoadOptions) -> Result<(LightCurve, LoadReport), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let (curve, report) = load_reader(file, opts)?;

    info!(
        "Loaded {} observations from {} ({} rows read, {} skipped)",
        curve.len(),
        path.display(),
        report.rows_read,
        report.rows_skipped
    );
    Ok((curve, report))
}

/// Same as [`load_file`] for any byte source.
pub fn load_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<(LightCurve, LoadReport), LoadError> {
    let mut report = LoadReport::default();
    let observations = match opts.delimiter {
        Delimiter::Byte(delim) => read_delimited(reader, delim, opts, &mut report)?,
        Delimiter::Whitespace => read_whitespace(reader, opts, &mut report)?,
    };

    if report.rows_skipped > 0 {
        info!(
            "Skipped {} malformed rows: {:?}",
            report.rows_skipped, report.skipped_by_reason
        );
    }
    if observations.is_empty() {
        warn!("No valid observations remain after filtering");
    }
    Ok((LightCurve::from_observations(observations), report))
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn read_delimited<R: Read>(
    reader: R,
    delim: u8,
    opts: &LoadOptions,
    report: &mut LoadReport,
) -> Result<Vec<Observation>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(opts.has_header)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        report.rows_read += 1;
        let outcome = match result {
            Ok(record) => {
                let fields: Vec<&str> = record.iter().collect();
                parse_row(&fields, opts)
            }
            Err(e) if e.is_io_error() => return Err(into_io_error(e)),
            Err(e) => Err(MalformedRow::Undecodable(e.to_string())),
        };
        keep_or_skip(outcome, row_no, &mut observations, report);
    }
    Ok(observations)
}

fn read_whitespace<R: Read>(
    reader: R,
    opts: &LoadOptions,
    report: &mut LoadReport,
) -> Result<Vec<Observation>, LoadError> {
    let mut observations = Vec::new();
    let mut header_pending = opts.has_header;
    let mut row_no = 0;

    for (line_no, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let bytes = line?;
        let text = String::from_utf8_lossy(&bytes);
        let text = if line_no == 0 {
            text.trim_start_matches(BYTE_ORDER_MARK)
        } else {
            &text[..]
        };
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }
        report.rows_read += 1;
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        keep_or_skip(parse_row(&fields, opts), row_no, &mut observations, report);
        row_no += 1;
    }
    Ok(observations)
}

fn keep_or_skip(
    outcome: Result<Observation, MalformedRow>,
    row_no: usize,
    observations: &mut Vec<Observation>,
    report: &mut LoadReport,
) {
    match outcome {
        Ok(obs) => observations.push(obs),
        Err(reason) => {
            debug!("Skipping data row {row_no}: {reason}");
            report.record_skip(&reason);
        }
    }
}

fn into_io_error(e: csv::Error) -> LoadError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => LoadError::Io(io),
        other => LoadError::Io(std::io::Error::other(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(text: &str, opts: &LoadOptions) -> (LightCurve, LoadReport) {
        load_reader(text.as_bytes(), opts).unwrap()
    }

    fn pairs(curve: &LightCurve) -> Vec<(f64, f64)> {
        curve
            .observations()
            .iter()
            .map(|o| (o.time, o.brightness))
            .collect()
    }

    #[test]
    fn skips_bad_brightness_row() {
        let text = "2459000.5,12.3\n2459001.5,bad\n2459002.5,12.1\n";
        let (curve, report) = load_str(text, &LoadOptions::default());
        assert_eq!(pairs(&curve), vec![(2459000.5, 12.3), (2459002.5, 12.1)]);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_skipped, 1);
    }

    #[test]
    fn ten_rows_three_malformed_yield_seven() {
        let text = "\
1.0,10.0
2.0,10.1
3.0,oops
4.0,10.3
five,10.4
6.0,10.5
7.0
8.0,10.7
9.0,10.8
10.0,10.9
";
        let (curve, report) = load_str(text, &LoadOptions::default());
        assert_eq!(curve.len(), 7);
        assert_eq!(report.rows_read, 10);
        assert_eq!(report.rows_skipped, 3);
        assert_eq!(report.rows_kept(), 7);
    }

    #[test]
    fn all_rows_valid_keeps_every_row() {
        let text: String = (0..25).map(|i| format!("{i}.5,{}\n", 11.0 + i as f64 * 0.01)).collect();
        let (curve, report) = load_str(&text, &LoadOptions::default());
        assert_eq!(curve.len(), 25);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn zero_valid_rows_gives_empty_curve() {
        let (curve, report) = load_str("a,b\nc,d\n", &LoadOptions::default());
        assert!(curve.is_empty());
        assert_eq!(report.rows_skipped, 2);

        let (curve, report) = load_str("", &LoadOptions::default());
        assert!(curve.is_empty());
        assert_eq!(report.rows_read, 0);
    }

    #[test]
    fn header_and_error_column_follow_options() {
        let text = "BJD,raw,ost_decorr,ost_tfa,err\n\
                    2459000.5,1.01,0,0,0.002\n\
                    2459000.6,0.99,0,0,0\n\
                    2459000.7,1.02,0,0,nan\n\
                    2459000.8,1.00,0,0,0.003\n";
        let opts = LoadOptions {
            has_header: true,
            error_column: Some(4),
            expected_columns: Some(5),
            ..LoadOptions::default()
        };
        let (curve, report) = load_str(text, &opts);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.observations()[0].error, Some(0.002));
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.skipped_by_reason["non-positive error"], 1);
        assert_eq!(report.skipped_by_reason["bad error"], 1);
    }

    #[test]
    fn whitespace_delimiter_handles_runs_and_comments() {
        let text = "# JD   mag\n\
                    time  mag\n\
                    \n\
                    2459000.5    12.30\n\
                    2459001.5\t\t12.25\n\
                    2459002.5  x\n";
        let opts = LoadOptions {
            delimiter: Delimiter::Whitespace,
            has_header: true,
            ..LoadOptions::default()
        };
        let (curve, report) = load_str(text, &opts);
        assert_eq!(pairs(&curve), vec![(2459000.5, 12.30), (2459001.5, 12.25)]);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_skipped, 1);
    }

    #[test]
    fn whitespace_reader_strips_byte_order_mark() {
        let opts = LoadOptions {
            delimiter: Delimiter::Whitespace,
            ..LoadOptions::default()
        };
        let (curve, report) = load_str("\u{feff}2459000.5 12.3\n2459001.5 12.1\n", &opts);
        assert_eq!(pairs(&curve), vec![(2459000.5, 12.3), (2459001.5, 12.1)]);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn comma_reader_strips_byte_order_mark() {
        let (curve, report) = load_str("\u{feff}2459000.5,12.3\n2459001.5,12.1\n", &LoadOptions::default());
        assert_eq!(curve.len(), 2);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn invalid_utf8_row_is_skipped_not_fatal() {
        let bytes: &[u8] = b"1.0,2.0\n\xff\xfe,3.0\n4.0,5.0\n";
        let (curve, report) = load_reader(bytes, &LoadOptions::default()).unwrap();
        assert_eq!(pairs(&curve), vec![(1.0, 2.0), (4.0, 5.0)]);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.skipped_by_reason.get("undecodable"), Some(&1));
    }

    #[test]
    fn tab_delimiter_reads_columns() {
        let text = "2459000.5\t12.30\t0.01\n2459001.5\t\t0.01\n2459002.5\t12.10\t0.02\n";
        let opts = LoadOptions {
            delimiter: "tab".parse().unwrap(),
            error_column: Some(2),
            ..LoadOptions::default()
        };
        let (curve, report) = load_str(text, &opts);
        assert_eq!(pairs(&curve), vec![(2459000.5, 12.30), (2459002.5, 12.10)]);
        assert_eq!(curve.observations()[1].error, Some(0.02));
        assert_eq!(report.skipped_by_reason["bad brightness"], 1);
    }

    #[test]
    fn semicolon_delimiter_with_dates() {
        let text = "2000-01-01T12:00:00;5.5\n1970-01-01;6.0\n";
        let opts = LoadOptions {
            delimiter: Delimiter::Byte(b';'),
            ..LoadOptions::default()
        };
        let (curve, _) = load_str(text, &opts);
        assert_eq!(pairs(&curve), vec![(2_440_587.5, 6.0), (2_451_545.0, 5.5)]);
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let err = load_file(Path::new("/no/such/star.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
        assert!(err.to_string().contains("/no/such/star.csv"));
    }

    #[test]
    fn reading_twice_is_idempotent() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"3.0,1.0\n1.0,2.0\nbad,3\n2.0,4.0\n").unwrap();
        let path = temp.into_temp_path();
        let first = load_file(&path, &LoadOptions::default()).unwrap();
        let second = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.0.len(), 3);
    }
}
