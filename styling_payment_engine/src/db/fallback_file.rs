use std::path::{Path, PathBuf};

use log::warn;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    db_types::FallbackVerificationRecord,
    traits::{FallbackSink, StorageError},
};

/// Appends fallback records to a local file, one JSON document per line.
///
/// Useful when the database itself is what failed: the records land somewhere that does not depend on it.
#[derive(Debug, Clone)]
pub struct JsonLinesFallbackSink {
    path: PathBuf,
}

impl JsonLinesFallbackSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Reads every record written so far.
    pub async fn read_records(&self) -> Result<Vec<FallbackVerificationRecord>, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(StorageError::from))
            .collect()
    }
}

impl FallbackSink for JsonLinesFallbackSink {
    async fn write_fallback(&self, record: &FallbackVerificationRecord) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        warn!(
            "🗃️ Fallback record for order {:?} / payment {:?} appended to {}. Manual reconciliation required.",
            record.order_id,
            record.payment_id,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db_types::PaymentVerificationRequest;

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let path = std::env::temp_dir().join(format!("sbp_fallback_{}.jsonl", rand::random::<u64>()));
        let sink = JsonLinesFallbackSink::new(&path);
        assert!(sink.read_records().await.unwrap().is_empty());
        let req = PaymentVerificationRequest::new("O1", "P1").with_signature("abc");
        let first = FallbackVerificationRecord::new(&req, true, "database is locked".into());
        let second = FallbackVerificationRecord::new(&PaymentVerificationRequest::new("O2", "P2"), false, "boom".into());
        sink.write_fallback(&first).await.unwrap();
        sink.write_fallback(&second).await.unwrap();
        let records = sink.read_records().await.unwrap();
        assert_eq!(records, vec![first, second]);
        let _ = std::fs::remove_file(path);
    }
}
