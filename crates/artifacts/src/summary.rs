//! Descriptive statistics over a macro library.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::library::MacroLibrary;

/// Effect-size and length statistics of a macro library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSummary {
    pub count: usize,
    pub mean_effect: f64,
    pub median_effect: f64,
    pub min_effect: u32,
    pub max_effect: u32,
    pub mean_length: f64,
    pub median_length: f64,
    pub max_length: usize,
}

impl MacroSummary {
    pub fn from_library(library: &MacroLibrary) -> Self {
        let mut effects: Vec<f64> = library
            .macros
            .iter()
            .map(|m| f64::from(m.net_effect))
            .collect();
        let mut lengths: Vec<f64> = library.macros.iter().map(|m| m.length as f64).collect();

        Self {
            count: library.len(),
            mean_effect: mean(&effects),
            median_effect: median(&mut effects),
            min_effect: library.macros.iter().map(|m| m.net_effect).min().unwrap_or(0),
            max_effect: library.macros.iter().map(|m| m.net_effect).max().unwrap_or(0),
            mean_length: mean(&lengths),
            median_length: median(&mut lengths),
            max_length: library.macros.iter().map(|m| m.length).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for MacroSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Macros:        {}", self.count)?;
        writeln!(
            f,
            "Net effect:    mean {:.2}, median {:.1}, range {}..={}",
            self.mean_effect, self.median_effect, self.min_effect, self.max_effect
        )?;
        write!(
            f,
            "Length:        mean {:.2}, median {:.1}, max {}",
            self.mean_length, self.median_length, self.max_length
        )
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute the median of a slice of f64 values.
///
/// Returns 0.0 for empty slices.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MacroEntry;

    fn library(rows: &[(u32, usize)]) -> MacroLibrary {
        MacroLibrary {
            macros: rows
                .iter()
                .map(|&(net_effect, length)| MacroEntry {
                    actions: vec!["x".to_string(); length],
                    net_effect,
                    length,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn test_summary_values() {
        let summary = MacroSummary::from_library(&library(&[(12, 1), (8, 4), (16, 2)]));
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean_effect, 12.0);
        assert_eq!(summary.median_effect, 12.0);
        assert_eq!(summary.min_effect, 8);
        assert_eq!(summary.max_effect, 16);
        assert!((summary.mean_length - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.median_length, 2.0);
        assert_eq!(summary.max_length, 4);
    }

    #[test]
    fn test_summary_empty_library() {
        let summary = MacroSummary::from_library(&MacroLibrary::default());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_effect, 0.0);
        assert_eq!(summary.max_length, 0);
        assert!(summary.to_string().contains("Macros:        0"));
    }
}
