use std::fs;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::domain::SourceName;
use crate::error::SeqDbError;

#[derive(Debug, Clone)]
pub struct Store {
    outdir: Utf8PathBuf,
}

impl Store {
    pub fn open(outdir: &Utf8Path) -> Result<Self, SeqDbError> {
        if !outdir.as_std_path().is_dir() {
            return Err(SeqDbError::MissingOutputDir(outdir.to_string()));
        }
        Ok(Self {
            outdir: outdir.to_path_buf(),
        })
    }

    pub fn outdir(&self) -> &Utf8Path {
        &self.outdir
    }

    pub fn source_dir(&self, source: SourceName) -> Utf8PathBuf {
        self.outdir.join(source.as_str())
    }

    pub fn raw_dir(&self, source: SourceName) -> Utf8PathBuf {
        self.source_dir(source).join("raw")
    }

    pub fn sequences_path(&self, source: SourceName) -> Utf8PathBuf {
        self.source_dir(source).join("sequences")
    }

    pub fn index_log_path(&self, source: SourceName) -> Utf8PathBuf {
        self.source_dir(source).join("index.log")
    }

    pub fn ensure_source_dir(&self, source: SourceName) -> Result<Utf8PathBuf, SeqDbError> {
        let dir = self.source_dir(source);
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        Ok(dir)
    }

    /// Writes through a temp file in the same directory, then persists it
    /// over `path`.
    pub fn write_atomic<T, F>(path: &Utf8Path, write: F) -> Result<T, SeqDbError>
    where
        F: FnOnce(&mut dyn Write) -> Result<T, SeqDbError>,
    {
        let parent = path
            .parent()
            .ok_or_else(|| SeqDbError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        let temp = tempfile::Builder::new()
            .prefix(".seqdb-file")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        let value = {
            let mut writer = BufWriter::new(temp.as_file());
            let value = write(&mut writer)?;
            writer
                .flush()
                .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
            value
        };
        temp.persist(path.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        Ok(value)
    }

    pub fn write_metadata(path: &Utf8Path, metadata: &Metadata) -> Result<(), SeqDbError> {
        let content = serde_json::to_vec_pretty(metadata)
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        Self::write_atomic(path, |writer| {
            writer
                .write_all(&content)
                .map_err(|err| SeqDbError::Filesystem(err.to_string()))
        })
    }

    pub fn read_metadata(path: &Utf8Path) -> Result<Option<Metadata>, SeqDbError> {
        if !path.as_std_path().exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        let metadata = serde_json::from_str(&content)
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        Ok(Some(metadata))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,
    pub url: String,
    pub fetched_at: String,
    pub tool: String,
}
