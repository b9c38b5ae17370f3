use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::input::RiskInput;
use crate::result::PredictionResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub input: RiskInput,
    pub result: PredictionResult,
}

/// Predictions made during this session. Append-only; only cleared whole.
#[derive(Debug, Clone)]
pub struct History {
    records: Vec<HistoryRecord>,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, input: RiskInput, result: PredictionResult) -> &HistoryRecord {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.append_at(timestamp, input, result)
    }

    pub fn append_at(
        &mut self,
        timestamp: u64,
        input: RiskInput,
        result: PredictionResult,
    ) -> &HistoryRecord {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(HistoryRecord { id, timestamp, input, result });
        &self.records[self.records.len() - 1]
    }

    /// Drops every record. Ids keep counting so a cleared record's id is
    /// never reused.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Oldest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().rev()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_records(&self.records)
    }
}

/// Aggregates over a prediction history. Every figure is zero when the
/// history is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_predictions: usize,
    pub high_risk_count: usize,
    pub low_risk_count: usize,
    pub high_risk_percentage: f64,
    pub avg_age: f64,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_cholesterol: f64,
    pub smokers_count: usize,
    pub smokers_percentage: f64,
    pub hypertension_count: usize,
    pub hypertension_percentage: f64,
    pub diabetes_count: usize,
    pub diabetes_percentage: f64,
}

impl HistoryStats {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self::default();
        }
        let n = total as f64;
        let count = |pred: fn(&HistoryRecord) -> bool| records.iter().filter(|r| pred(r)).count();
        let mean = |value: fn(&RiskInput) -> f64| records.iter().map(|r| value(&r.input)).sum::<f64>() / n;
        let pct = |c: usize| c as f64 / n * 100.0;

        let high_risk_count = count(|r| r.result.is_high_risk());
        let smokers_count = count(|r| r.input.is_smoking);
        let hypertension_count = count(|r| r.input.prevalent_hyp);
        let diabetes_count = count(|r| r.input.diabetes);

        Self {
            total_predictions: total,
            high_risk_count,
            low_risk_count: total - high_risk_count,
            high_risk_percentage: pct(high_risk_count),
            avg_age: mean(|i| f64::from(i.age)),
            avg_systolic: mean(|i| i.sys_bp),
            avg_diastolic: mean(|i| i.dia_bp),
            avg_cholesterol: mean(|i| i.tot_chol),
            smokers_count,
            smokers_percentage: pct(smokers_count),
            hypertension_count,
            hypertension_percentage: pct(hypertension_count),
            diabetes_count,
            diabetes_percentage: pct(diabetes_count),
        }
    }
}
