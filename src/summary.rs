//! Text and JSON rendering of a finished bin list

use crate::bins::Bin;
use crate::writer::Scope;
use serde::{Deserialize, Serialize};

/// One bin in a summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinEntry {
    /// Range label (e.g. "100-1000" or "1000+")
    pub range: String,
    pub min: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Weighted occurrence total
    pub size: u64,
}

/// Summary of one classification run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinSummary {
    pub job: u64,
    pub comm: u64,
    pub rank: u64,
    pub bins: Vec<BinEntry>,
    pub total: u64,
}

impl BinSummary {
    pub fn new(scope: Scope, bins: &[Bin]) -> Self {
        Self {
            job: scope.job,
            comm: scope.comm,
            rank: scope.rank,
            bins: bins
                .iter()
                .map(|b| BinEntry {
                    range: b.label(),
                    min: b.min,
                    max: b.max,
                    size: b.size,
                })
                .collect(),
            total: bins.iter().map(|b| b.size).fold(0u64, u64::saturating_add),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable table with a percentage column
    pub fn to_text(&self) -> String {
        let width = self
            .bins
            .iter()
            .map(|b| b.range.len())
            .max()
            .unwrap_or(0)
            .max("range".len());

        let mut output = format!(
            "job {} comm {} rank {}\n{:<width$} {:>12} {:>7}\n",
            self.job,
            self.comm,
            self.rank,
            "range",
            "count",
            "%",
            width = width
        );
        output.push_str(&"-".repeat(width + 21));
        output.push('\n');

        for entry in &self.bins {
            let percent = if self.total == 0 {
                0.0
            } else {
                entry.size as f64 * 100.0 / self.total as f64
            };
            output.push_str(&format!(
                "{:<width$} {:>12} {:>6.2}%\n",
                entry.range,
                entry.size,
                percent,
                width = width
            ));
        }

        output.push_str(&format!(
            "{:<width$} {:>12}\n",
            "total",
            self.total,
            width = width
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins;

    fn sample() -> BinSummary {
        let mut bins = bins::create(&[100, 1000]).unwrap();
        bins[0].size = 3;
        bins[2].size = 1;
        BinSummary::new(Scope::new(3, 1, 2), &bins)
    }

    #[test]
    fn test_summary_totals() {
        let summary = sample();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.bins.len(), 3);
        assert_eq!(summary.bins[2].range, "1000+");
    }

    #[test]
    fn test_json_omits_unbounded_max() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["bins"][1]["max"], 1000);
        assert!(value["bins"][2].get("max").is_none());
        assert_eq!(value["total"], 4);
    }

    #[test]
    fn test_text_table() {
        let text = sample().to_text();
        assert!(text.starts_with("job 3 comm 1 rank 2\n"));
        assert!(text.contains("0-100"));
        assert!(text.contains("75.00%"));
        assert!(text.contains("25.00%"));
        assert!(text.lines().last().unwrap().starts_with("total"));
    }

    #[test]
    fn test_total_saturates() {
        let mut bins = bins::create(&[10]).unwrap();
        bins[0].size = u64::MAX;
        bins[1].size = 1;
        let summary = BinSummary::new(Scope::new(0, 0, 0), &bins);
        assert_eq!(summary.total, u64::MAX);
    }

    #[test]
    fn test_text_empty_total() {
        let bins = bins::create(&[10]).unwrap();
        let text = BinSummary::new(Scope::new(0, 0, 0), &bins).to_text();
        assert!(text.contains("0.00%"));
    }
}
