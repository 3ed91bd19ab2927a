//! Best-effort persistence of uploads and per-task metadata
//!
//! Nothing here is read back by the service. Upload and metadata writes
//! are best-effort: failures are logged and swallowed so a slow or full
//! disk never fails a conversion request.

use crate::meshy::JobOptions;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Metadata written once per created task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMeta {
    pub original_filename: Option<String>,
    pub options: JobOptions,
}

#[derive(Debug, Clone)]
pub struct MetaStore {
    uploads_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl MetaStore {
    /// Create the store, ensuring both directories exist
    pub fn new(data_dir: &Path) -> std::io::Result<Self> {
        let uploads_dir = data_dir.join("uploads");
        let outputs_dir = data_dir.join("outputs");
        fs::create_dir_all(&uploads_dir)?;
        fs::create_dir_all(&outputs_dir)?;
        Ok(Self {
            uploads_dir,
            outputs_dir,
        })
    }

    /// Persist uploaded image bytes under a timestamped unique name
    pub fn persist_upload(&self, bytes: &[u8], original_filename: Option<&str>) {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let id = Uuid::new_v4().simple().to_string();
        // Keep only the final path component of client-supplied names
        let name = original_filename
            .and_then(|f| Path::new(f).file_name())
            .and_then(|f| f.to_str())
            .unwrap_or("upload");
        let path = self
            .uploads_dir
            .join(format!("{}_{}_{}.bin", stamp, &id[..8], name));

        if let Err(e) = fs::write(&path, bytes) {
            warn!(path = %path.display(), "failed to persist upload: {}", e);
        }
    }

    /// Write the task's metadata JSON
    pub fn save_meta(&self, task_id: &str, meta: &TaskMeta) {
        let task_dir = self.outputs_dir.join(task_id);
        let result = fs::create_dir_all(&task_dir).and_then(|_| {
            let json = serde_json::to_vec_pretty(meta)?;
            fs::write(task_dir.join("meta.json"), json)
        });

        if let Err(e) = result {
            warn!(task_id, "failed to write task metadata: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_meta_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::new(dir.path()).unwrap();

        store.save_meta(
            "task-123",
            &TaskMeta {
                original_filename: Some("cat.png".to_string()),
                options: JobOptions::default(),
            },
        );

        let written = fs::read_to_string(dir.path().join("outputs/task-123/meta.json")).unwrap();
        let meta: TaskMeta = serde_json::from_str(&written).unwrap();
        assert_eq!(meta.original_filename.as_deref(), Some("cat.png"));
        assert_eq!(meta.options.ai_model, "latest");
    }

    #[test]
    fn test_persist_upload_keeps_only_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::new(dir.path()).unwrap();

        store.persist_upload(b"bytes", Some("../../etc/passwd"));

        let entries: Vec<_> = fs::read_dir(dir.path().join("uploads"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("_passwd.bin"));
    }
}
