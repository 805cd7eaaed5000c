//! CSV Audit Trail
//!
//! One row per prediction. The header is written only when the file is new
//! or empty.

use faultwatch_core::sensor::{SensorKey, SensorReading};
use faultwatch_core::wire::LogEntry;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::HistoryError;

pub const AUDIT_HEADERS: [&str; 11] = [
    "timestamp",
    "probability",
    "error_code",
    "Temperature",
    "Pressure",
    "FlowRate",
    "Vibration",
    "FillHeight",
    "Power",
    "CO2",
    "Humidity",
];

pub struct CsvAudit {
    path: Arc<PathBuf>,
    // serializes appends so rows never interleave
    lock: Mutex<()>,
}

impl CsvAudit {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Arc::new(path.as_ref().to_path_buf()),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(
        &self,
        entry: LogEntry,
        reading: SensorReading,
    ) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().await;
        let path = Arc::clone(&self.path);

        tokio::task::spawn_blocking(move || write_row(&path, &entry, &reading)).await??;
        Ok(())
    }
}

fn write_row(path: &Path, entry: &LogEntry, reading: &SensorReading) -> Result<(), HistoryError> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if is_new {
        writer.write_record(AUDIT_HEADERS)?;
    }

    let mut record = vec![
        entry.timestamp.clone(),
        entry.probability.to_string(),
        entry.error_code.clone().unwrap_or_default(),
    ];
    record.extend(SensorKey::ALL.iter().map(|key| reading.get(*key).to_string()));

    writer.write_record(&record)?;
    writer.flush()?;
    Ok(())
}
