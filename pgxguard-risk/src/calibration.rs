//! Post-hoc calibration and calibration quality metrics.
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pgxguard_core::config::CalibrationBin;
use pgxguard_core::utils::{clamp_unit, get_dynamic_reader, round_to};

use crate::errors::CalibrationError;

///
/// Flatten raw scores onto representative bin values.
///
/// Scores are clamped to [0, 1] first. A score outside every bin passes
/// through, rounded to two decimals.
///
pub struct Calibrator<'a> {
    bins: &'a [CalibrationBin],
}

impl<'a> Calibrator<'a> {
    pub fn new(bins: &'a [CalibrationBin]) -> Self {
        Calibrator { bins }
    }

    pub fn calibrate(&self, raw_score: f64) -> f64 {
        let score = clamp_unit(raw_score);
        let value = self
            .bins
            .iter()
            .find(|bin| bin.contains(score))
            .map(|bin| bin.value)
            .unwrap_or(score);
        round_to(value, 2)
    }
}

/// A single (confidence, outcome) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRow {
    pub confidence: f64,
    pub correct: bool,
}

#[derive(Deserialize)]
struct RawCalibrationRow {
    confidence: f64,
    correct: f64,
}

/// Read `{"confidence": f, "correct": 0|1}` rows. Blank lines are skipped.
pub fn load_calibration_jsonl(path: &Path) -> Result<Vec<CalibrationRow>, CalibrationError> {
    let reader = get_dynamic_reader(path)?;
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let raw: RawCalibrationRow = serde_json::from_str(line)
            .map_err(|source| CalibrationError::InvalidRow { line: idx + 1, source })?;
        rows.push(CalibrationRow {
            confidence: clamp_unit(raw.confidence),
            correct: raw.correct != 0.0,
        });
    }

    Ok(rows)
}

fn outcome(row: &CalibrationRow) -> f64 {
    if row.correct { 1.0 } else { 0.0 }
}

pub fn brier_score(rows: &[CalibrationRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter()
        .map(|r| (r.confidence - outcome(r)).powi(2))
        .sum::<f64>()
        / rows.len() as f64
}

///
/// Expected calibration error over `bins` equal-width bins.
///
/// A confidence `c` lands in bin `min(floor(c * bins), bins - 1)`.
///
pub fn expected_calibration_error(rows: &[CalibrationRow], bins: usize) -> f64 {
    if rows.is_empty() || bins == 0 {
        return 0.0;
    }

    let mut buckets: Vec<Vec<&CalibrationRow>> = vec![Vec::new(); bins];
    for row in rows {
        let idx = ((row.confidence * bins as f64).floor() as usize).min(bins - 1);
        buckets[idx].push(row);
    }

    let n = rows.len() as f64;
    buckets
        .iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|bucket| {
            let size = bucket.len() as f64;
            let conf_avg = bucket.iter().map(|r| r.confidence).sum::<f64>() / size;
            let acc_avg = bucket.iter().map(|r| outcome(r)).sum::<f64>() / size;
            (size / n) * (conf_avg - acc_avg).abs()
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub n: usize,
    pub bins: usize,
    pub ece: f64,
    pub brier_score: f64,
}

impl CalibrationReport {
    pub fn from_rows(rows: &[CalibrationRow], bins: usize) -> Result<Self, CalibrationError> {
        if rows.is_empty() {
            return Err(CalibrationError::Empty);
        }
        Ok(CalibrationReport {
            n: rows.len(),
            bins,
            ece: round_to(expected_calibration_error(rows, bins), 6),
            brier_score: round_to(brier_score(rows), 6),
        })
    }
}
