//! JSONL file writer for completed runs.
//!
//! Each [`RunRecord`] becomes one JSON line carrying a generated `runId` and
//! a `timestamp`, appended through a buffered writer.

use roundtable_application::{RecordError, RunRecord, RunRecorder};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// File name used inside the configured runs directory
pub const RUNS_FILE_NAME: &str = "runs.jsonl";

/// Run recorder that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlRunRecorder {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunRecorder {
    /// Open (or create) `runs.jsonl` inside `dir` for appending.
    pub fn in_dir(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::open(dir.as_ref().join(RUNS_FILE_NAME))
    }

    /// Open (or create) the file at `path` for appending, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Recording runs to {}", path.display());

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunRecorder for JsonlRunRecorder {
    fn record(&self, record: &RunRecord<'_>) -> Result<String, RecordError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = serde_json::Map::new();
        map.insert("runId".to_string(), Value::String(run_id.clone()));
        map.insert("timestamp".to_string(), Value::String(timestamp));
        if let Value::Object(fields) = serde_json::to_value(record)? {
            map.extend(fields);
        }
        let line = serde_json::to_string(&Value::Object(map))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("run log writer poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;

        Ok(run_id)
    }
}

impl Drop for JsonlRunRecorder {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::{BudgetMeta, ResponseMeta};
    use roundtable_domain::{ChatRequest, ChatUser, Invalidation, Mode, Role, TaskCategory};

    fn request() -> ChatRequest {
        let user = ChatUser {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
        };
        ChatRequest::try_new("discord", Mode::Ask, user, "How do I rotate logs?").unwrap()
    }

    fn meta() -> ResponseMeta {
        ResponseMeta {
            task_type: TaskCategory::TechnicalExecution,
            c_final: 0.82,
            budget: BudgetMeta {
                cap_usd: 0.05,
                estimated_usd: 0.01,
                mode_cap_exceeded: false,
            },
            used_agents: vec![Role::Solver, Role::Critic],
            invalidation: Invalidation::default(),
            attempts: 1,
            clarification: false,
        }
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_records_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = JsonlRunRecorder::in_dir(dir.path().join("runs")).unwrap();
        let request = request();
        let meta = meta();
        let record = RunRecord {
            request: &request,
            plan: None,
            scored: &[],
            reply: "Use logrotate.",
            meta: &meta,
        };

        let first = recorder.record(&record).unwrap();
        let second = recorder.record(&record).unwrap();
        assert_ne!(first, second);

        let lines = read_lines(recorder.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["runId"], first.as_str());
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[0]["reply"], "Use logrotate.");
        assert_eq!(lines[0]["request"]["user"]["name"], "Ada");
        assert_eq!(lines[0]["meta"]["c_final"], 0.82);
        assert_eq!(lines[1]["runId"], second.as_str());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let request = request();
        let meta = meta();
        let record = RunRecord {
            request: &request,
            plan: None,
            scored: &[],
            reply: "ok",
            meta: &meta,
        };

        JsonlRunRecorder::in_dir(dir.path())
            .unwrap()
            .record(&record)
            .unwrap();
        let recorder = JsonlRunRecorder::in_dir(dir.path()).unwrap();
        recorder.record(&record).unwrap();

        assert_eq!(read_lines(recorder.path()).len(), 2);
    }
}
