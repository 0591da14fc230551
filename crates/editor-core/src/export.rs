//! Export sinks for finished cue files.

use std::path::{Path, PathBuf};

use cuesmith_common::error::{CuesmithError, CuesmithResult};

/// Receives the serialized cue file and a suggested file name.
pub trait ExportSink {
    fn save(&mut self, file_name: &str, mime_type: &str, content: &str) -> CuesmithResult<()>;
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
    last_written: Option<PathBuf>,
}

impl DirectoryExportSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            last_written: None,
        }
    }

    /// Path of the most recent export, if any.
    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }
}

impl ExportSink for DirectoryExportSink {
    fn save(&mut self, file_name: &str, mime_type: &str, content: &str) -> CuesmithResult<()> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| CuesmithError::export(format!("invalid file name '{file_name}'")))?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, content)?;
        tracing::info!(path = %path.display(), mime_type, bytes = content.len(), "Export saved");
        self.last_written = Some(path);
        Ok(())
    }
}

/// Keeps exports in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryExportSink {
    pub files: Vec<ExportedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportSink for MemoryExportSink {
    fn save(&mut self, file_name: &str, mime_type: &str, content: &str) -> CuesmithResult<()> {
        self.files.push(ExportedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
