//! Host capabilities for the terminal.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dlab_core::{Clipboard, Error, ExportSink, Result};

/// Clipboard kept in memory; the latest copy is echoed by the session loop.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut contents = self.contents.lock().map_err(|_| Error::Capability {
            capability: "clipboard",
            message: "clipboard lock poisoned".into(),
        })?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// Writes exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirExportSink {
    dir: PathBuf,
}

impl DirExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirExportSink {
    fn save(&mut self, file_name: &str, payload: &[u8]) -> Result<()> {
        let name = Path::new(file_name);
        if name.components().count() != 1 {
            return Err(Error::Capability {
                capability: "export",
                message: format!("refusing to write outside the export directory: {file_name}"),
            });
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_creates_directory() {
        let dir = tempdir().unwrap();
        let mut sink = DirExportSink::new(dir.path().join("out"));
        sink.save("debug-logs.txt", b"[12:00:00] LOG: hi").unwrap();
        let written = fs::read_to_string(dir.path().join("out/debug-logs.txt")).unwrap();
        assert_eq!(written, "[12:00:00] LOG: hi");
    }

    #[test]
    fn export_rejects_nested_names() {
        let dir = tempdir().unwrap();
        let mut sink = DirExportSink::new(dir.path());
        assert!(sink.save("../escape.txt", b"x").is_err());
    }

    #[test]
    fn clipboard_keeps_latest_copy() {
        let mut clipboard = MemoryClipboard::new();
        let view = clipboard.clone();
        clipboard.copy("first").unwrap();
        clipboard.copy("second").unwrap();
        assert_eq!(view.contents().as_deref(), Some("second"));
    }
}
