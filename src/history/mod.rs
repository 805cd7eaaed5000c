//! Prediction History
//!
//! Keeps the most recent predictions in memory for `GET /logs` and,
//! optionally, appends every prediction to a CSV audit file.

mod audit;

pub use audit::{CsvAudit, AUDIT_HEADERS};

use faultwatch_core::sensor::SensorReading;
use faultwatch_core::wire::LogEntry;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::RwLock;

/// Timestamp format used in log entries and the audit file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bounded, oldest-first record of predictions
pub struct PredictionHistory {
    entries: RwLock<VecDeque<LogEntry>>,
    capacity: usize,
    audit: Option<CsvAudit>,
}

impl PredictionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
            audit: None,
        }
    }

    /// Also append every recorded prediction to `audit`
    pub fn with_audit(mut self, audit: CsvAudit) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a prediction, evicting the oldest entry past capacity.
    ///
    /// The in-memory entry is kept even when the audit write fails.
    pub async fn record(
        &self,
        entry: LogEntry,
        reading: &SensorReading,
    ) -> Result<(), HistoryError> {
        {
            let mut entries = self.entries.write().await;
            entries.push_back(entry.clone());
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }

        if let Some(audit) = &self.audit {
            audit.append(entry, *reading).await?;
        }

        Ok(())
    }

    /// Current entries, oldest first
    pub async fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Audit file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Audit task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let history = PredictionHistory::new(3);
        let reading = SensorReading::default();

        for i in 0..5 {
            history
                .record(LogEntry::new(format!("t{}", i), 0.1 * i as f64), &reading)
                .await
                .unwrap();
        }

        let labels: Vec<_> = history
            .snapshot()
            .await
            .into_iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(labels, vec!["t2", "t3", "t4"]);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let history = PredictionHistory::new(20);
        assert!(history.snapshot().await.is_empty());
        assert_eq!(history.capacity(), 20);
    }

    #[tokio::test]
    async fn test_records_to_audit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.csv");
        let history = PredictionHistory::new(2).with_audit(CsvAudit::new(&path));

        for i in 0..3 {
            history
                .record(LogEntry::new(format!("t{}", i), 0.5), &SensorReading::default())
                .await
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert_eq!(history.len().await, 2);
    }
}
