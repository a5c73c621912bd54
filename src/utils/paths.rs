//! Fixed directory layout under the data root.
//!
//! ```text
//! <root>/images/ingest     freshly generated images
//! <root>/images/process    reserved, created but unused
//! <root>/images/approved   images moved here on approval
//! <root>/prompts/prompts.json
//! <root>/logs/
//! ```
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct PathManager {
    root: PathBuf,
}

impl PathManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PathManager { root: root.into() }
    }

    /// Create every directory of the layout. Existing directories are kept.
    pub fn ensure_directories(&self) -> io::Result<()> {
        for dir in [
            self.ingest_dir(),
            self.process_dir(),
            self.approved_dir(),
            self.prompts_dir(),
            self.log_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    pub fn ingest_dir(&self) -> PathBuf {
        self.root.join("images").join("ingest")
    }

    pub fn process_dir(&self) -> PathBuf {
        self.root.join("images").join("process")
    }

    pub fn approved_dir(&self) -> PathBuf {
        self.root.join("images").join("approved")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join("prompts")
    }

    pub fn prompts_file(&self) -> PathBuf {
        self.prompts_dir().join("prompts.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
