//! Plain-text and JSON persistence of a finished run.
//!
//! Layout of the output directory:
//!
//! ```text
//! <directory>/
//!   Result_densities_Gillespie.txt   one "a b c" fraction row per recorded step
//!   Result_lattice_Gillespie.txt     final lattice, one row of codes per line
//!   run_summary.json                 identifiers, parameters, outcome, timing
//!   frames/lattice_<k>.txt           k-th snapshot (only when enabled)
//! ```
//!
//! Fractions use 18 digits after the point and a signed two-digit exponent,
//! the same number layout `numpy.savetxt` writes by default.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use cyclic_core::{RunParams, RunResult, Snapshot};
use cyclic_types::{Census, RunId, TerminalState};
use serde::Serialize;

use crate::error::EngineError;

/// File name of the per-step fraction table.
pub const DENSITIES_FILE: &str = "Result_densities_Gillespie.txt";
/// File name of the final lattice.
pub const LATTICE_FILE: &str = "Result_lattice_Gillespie.txt";
/// File name of the JSON run summary.
pub const SUMMARY_FILE: &str = "run_summary.json";
/// Subdirectory holding snapshot frames.
pub const FRAMES_DIR: &str = "frames";

/// Metadata describing one finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Seed of the run generator.
    pub seed: u64,
    /// Parameters the run was started with.
    pub params: RunParams,
    /// Why the run ended.
    pub terminal: TerminalState,
    /// Number of events applied.
    pub steps_executed: u64,
    /// Model time at the end of the run.
    pub final_time: f64,
    /// Per-capita time at the end of the run.
    pub final_per_capita_time: f64,
    /// Population counts of the final lattice.
    pub final_census: Census,
    /// Number of snapshot frames written.
    pub snapshots_written: usize,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Summarize a finished run.
    pub fn new(
        result: &RunResult,
        snapshots_written: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: result.run_id,
            seed: result.seed,
            params: result.params.clone(),
            terminal: result.terminal,
            steps_executed: result.steps_executed,
            final_time: result.final_time(),
            final_per_capita_time: result.final_per_capita_time(),
            final_census: result.lattice.census(),
            snapshots_written,
            started_at,
            finished_at,
        }
    }
}

/// Write every output file for a run into `directory`, creating it if
/// needed.
///
/// # Errors
///
/// Returns [`EngineError::Output`] naming the file that could not be
/// written, or [`EngineError::Summary`] if the summary fails to serialize.
pub fn write_outputs(
    directory: &Path,
    result: &RunResult,
    snapshots: &[Snapshot],
    summary: &RunSummary,
) -> Result<(), EngineError> {
    create_dir(directory)?;

    write_file(&directory.join(DENSITIES_FILE), |w| {
        write_densities(w, &result.fractions())
    })?;
    write_file(&directory.join(LATTICE_FILE), |w| {
        write_codes(w, &result.lattice.codes())
    })?;

    if !snapshots.is_empty() {
        let frames = directory.join(FRAMES_DIR);
        create_dir(&frames)?;
        for (k, snapshot) in snapshots.iter().enumerate() {
            let path = frames.join(format!("lattice_{k}.txt"));
            write_file(&path, |w| write_codes(w, &snapshot.codes))?;
        }
    }

    let json = serde_json::to_string_pretty(summary)?;
    write_file(&directory.join(SUMMARY_FILE), |w| writeln!(w, "{json}"))
}

/// Write one `a b c` row per fraction triple.
pub fn write_densities(writer: &mut impl Write, fractions: &[[f64; 3]]) -> io::Result<()> {
    for [a, b, c] in fractions {
        writeln!(
            writer,
            "{} {} {}",
            scientific(*a),
            scientific(*b),
            scientific(*c)
        )?;
    }
    Ok(())
}

/// Write a lattice as rows of space-separated integer codes.
pub fn write_codes(writer: &mut impl Write, codes: &[Vec<u8>]) -> io::Result<()> {
    for row in codes {
        let line: Vec<String> = row.iter().map(u8::to_string).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Format a value as `d.dddddddddddddddddde±XX`.
pub fn scientific(value: f64) -> String {
    let formatted = format!("{value:.18e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

fn create_dir(path: &Path) -> Result<(), EngineError> {
    fs::create_dir_all(path).map_err(|source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file<F>(path: &Path, body: F) -> Result<(), EngineError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source: io::Error| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cyclic_core::{RateConstants, run};

    use super::*;

    #[test]
    fn scientific_matches_savetxt_layout() {
        assert_eq!(scientific(0.5), "5.000000000000000000e-01");
        assert_eq!(scientific(1.0), "1.000000000000000000e+00");
        assert_eq!(scientific(0.0), "0.000000000000000000e+00");
        assert_eq!(scientific(0.0625), "6.250000000000000000e-02");
        assert_eq!(scientific(1024.0), "1.024000000000000000e+03");
    }

    #[test]
    fn densities_are_one_row_per_step() {
        let mut out = Vec::new();
        write_densities(&mut out, &[[0.5, 0.25, 0.25], [1.0, 0.0, 0.0]]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines.first().copied(),
            Some("5.000000000000000000e-01 2.500000000000000000e-01 2.500000000000000000e-01")
        );
    }

    #[test]
    fn codes_are_space_separated_rows() {
        let mut out = Vec::new();
        write_codes(&mut out, &[vec![0, 1, 2], vec![3, 0, 0]]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 1 2\n3 0 0\n");
    }

    #[test]
    fn summary_serializes_outcome() {
        let params = RunParams::new(6, 0.5, 20, RateConstants::default(), Some(8)).unwrap();
        let result = run(params).unwrap();
        let now = Utc::now();
        let summary = RunSummary::new(&result, 0, now, now);

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["seed"], 8);
        assert_eq!(json["terminal"], "completed_max_steps");
        assert_eq!(json["steps_executed"], 20);
        assert_eq!(json["params"]["size"], 6);
    }

    #[test]
    fn outputs_land_in_directory() {
        let directory = std::env::temp_dir().join(format!("cyclic-engine-{}", RunId::new()));
        let params = RunParams::new(5, 0.5, 30, RateConstants::default(), Some(2)).unwrap();
        let result = run(params).unwrap();
        let snapshots = vec![Snapshot {
            step: 0,
            time: 0.0,
            codes: result.lattice.codes(),
        }];
        let now = Utc::now();
        let summary = RunSummary::new(&result, snapshots.len(), now, now);

        write_outputs(&directory, &result, &snapshots, &summary).unwrap();

        let densities = fs::read_to_string(directory.join(DENSITIES_FILE)).unwrap();
        assert_eq!(densities.lines().count(), result.history.len());
        let lattice = fs::read_to_string(directory.join(LATTICE_FILE)).unwrap();
        assert_eq!(lattice.lines().count(), 5);
        assert!(directory.join(FRAMES_DIR).join("lattice_0.txt").exists());
        assert!(directory.join(SUMMARY_FILE).exists());

        fs::remove_dir_all(&directory).unwrap();
    }
}
