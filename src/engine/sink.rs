use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Submission target for finished donation bundles.
///
/// The body is the literal JSON text the user consented to; the sink must
/// not reinterpret it. One submission per `donate` command; nothing is
/// retained by the engine afterwards.
pub trait DonationSink: Send {
    fn submit(&mut self, key: &str, body: &str) -> io::Result<()>;
}

/// Writes each submission to `<dir>/<key>.json`.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DonationSink for DirectorySink {
    fn submit(&mut self, key: &str, body: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file_name = format!("{}.json", sanitize_key(key));
        let path = self.dir.join(file_name);
        fs::write(&path, body)?;
        info!(key, path = %path.display(), "donation written");
        Ok(())
    }
}

/// Keys come from scripts; keep file names to a safe alphabet.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "donation".to_string()
    } else {
        cleaned
    }
}

/// Captures submissions in memory; for tests.
#[derive(Clone, Default)]
pub struct MemorySink {
    submissions: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().clone()
    }
}

impl DonationSink for MemorySink {
    fn submit(&mut self, key: &str, body: &str) -> io::Result<()> {
        self.submissions
            .lock()
            .push((key.to_string(), body.to_string()));
        Ok(())
    }
}
