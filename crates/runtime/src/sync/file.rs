//! Directory-backed move exchange.
//!
//! Each record is one JSON file; processed markers are empty sibling files
//! named `<record>.processed.<observer>`. Records are written to a temporary
//! name and renamed into place so readers never see a partial file.
//!
//! ```text
//! exchange_dir/
//! ├── arena-1-0-1-1a2b3c4d.json
//! ├── arena-1-0-1-1a2b3c4d.processed.1
//! └── arena-1-1-2-5e6f7a8b.json
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use battle_core::ParticipantId;
use tracing::trace;

use super::error::ExchangeError;
use super::exchange::MoveExchange;
use super::record::{PublishedMoveRecord, RecordId, RoundId};

const RECORD_EXT: &str = ".json";
const MARKER_INFIX: &str = ".processed.";

#[derive(Debug, Clone)]
pub struct FileMoveExchange {
    root: PathBuf,
}

impl FileMoveExchange {
    /// Uses `root` as the shared directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, ExchangeError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, record: &RecordId) -> PathBuf {
        self.root.join(format!("{}{}", record, RECORD_EXT))
    }

    fn marker_path(&self, record: &RecordId, observer: ParticipantId) -> PathBuf {
        self.root
            .join(format!("{}{}{}", record, MARKER_INFIX, observer.0))
    }
}

#[async_trait]
impl MoveExchange for FileMoveExchange {
    async fn publish_move(
        &self,
        round: &RoundId,
        mut record: PublishedMoveRecord,
    ) -> Result<(), ExchangeError> {
        record.round = round.clone();
        let body = serde_json::to_vec_pretty(&record)?;
        let staging = self.root.join(format!(".{}.tmp", record.id));
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, self.record_path(&record.id)).await?;
        Ok(())
    }

    async fn poll_unprocessed_moves(
        &self,
        round: &RoundId,
        observer: ParticipantId,
    ) -> Result<Vec<PublishedMoveRecord>, ExchangeError> {
        // Record ids start with their round, so other rounds are skipped unread.
        let prefix = format!("{round}-");
        let mut record_files = Vec::new();
        let mut markers: HashMap<String, BTreeSet<ParticipantId>> = HashMap::new();

        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if let Some((record, who)) = name.split_once(MARKER_INFIX) {
                if let Ok(id) = who.parse::<u32>() {
                    markers
                        .entry(record.to_string())
                        .or_default()
                        .insert(ParticipantId(id));
                }
            } else if name.ends_with(RECORD_EXT) && name.starts_with(&prefix) {
                record_files.push(entry.path());
            }
        }

        let mut records = Vec::new();
        for path in record_files {
            let mut record = match read_record(&path).await {
                Ok(record) => record,
                Err(error) => {
                    trace!(target: "runtime::sync", %error, path = %path.display(), "skipping unreadable record");
                    continue;
                }
            };
            if &record.round != round {
                continue;
            }
            if let Some(seen) = markers.remove(&record.id.0) {
                record.processed_by.extend(seen);
            }
            if !record.is_processed_by(observer) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn mark_processed(
        &self,
        record: &RecordId,
        observer: ParticipantId,
    ) -> Result<(), ExchangeError> {
        if !tokio::fs::try_exists(self.record_path(record)).await? {
            return Err(ExchangeError::UnknownRecord(record.to_string()));
        }
        tokio::fs::write(self.marker_path(record, observer), b"").await?;
        Ok(())
    }
}

async fn read_record(path: &Path) -> Result<PublishedMoveRecord, ExchangeError> {
    let body = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&body)?)
}
