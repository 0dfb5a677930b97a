use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::acquire::Acquisition;
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;

pub mod argannot;
pub mod bacmet2;
pub mod card;
pub mod ecoh;
pub mod ecoli_vf;
pub mod ncbi;
pub mod plasmidfinder;
pub mod resfinder;
pub mod vfdb;

pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> SourceName;

    fn seq_type(&self) -> SeqType {
        SeqType::Nucl
    }

    fn acquisition(&self) -> Acquisition;

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError>;
}

pub struct AdapterRegistry {
    adapters: BTreeMap<SourceName, Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(adapter.name(), adapter);
    }

    pub fn get(&self, name: SourceName) -> Result<&dyn SourceAdapter, SeqDbError> {
        self.adapters
            .get(&name)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| SeqDbError::UnknownSource {
                name: name.to_string(),
                valid: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.adapters.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(argannot::Argannot));
        registry.register(Box::new(bacmet2::Bacmet2));
        registry.register(Box::new(card::Card));
        registry.register(Box::new(ecoh::Ecoh));
        registry.register(Box::new(ecoli_vf::EcoliVf));
        registry.register(Box::new(ncbi::Ncbi));
        registry.register(Box::new(plasmidfinder::Plasmidfinder));
        registry.register(Box::new(resfinder::Resfinder));
        registry.register(Box::new(vfdb::Vfdb));
        registry
    }
}

/// Files under `root` with one of `exts`, sorted by path. A plain file is
/// returned as-is regardless of its extension.
pub fn find_files(root: &Path, exts: &[&str]) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(path) = stack.pop() {
        if let Ok(entries) = fs::read_dir(&path) {
            for entry in entries.flatten() {
                let path = entry.path();
                let hidden = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'));
                if hidden {
                    continue;
                }
                if path.is_dir() {
                    stack.push(path);
                } else if path
                    .extension()
                    .and_then(|value| value.to_str())
                    .is_some_and(|value| exts.iter().any(|ext| value.eq_ignore_ascii_case(ext)))
                {
                    out.push(path);
                }
            }
        }
    }
    out.sort();
    out
}

pub fn require_files(root: &Path, exts: &[&str]) -> Result<Vec<PathBuf>, SeqDbError> {
    let files = find_files(root, exts);
    if files.is_empty() {
        return Err(SeqDbError::MissingInput {
            root: root.display().to_string(),
            pattern: exts
                .iter()
                .map(|ext| format!("*.{ext}"))
                .collect::<Vec<_>>()
                .join(" "),
        });
    }
    Ok(files)
}

pub fn find_named(root: &Path, file_name: &str) -> Option<PathBuf> {
    if root.is_file() {
        return (root.file_name().and_then(|name| name.to_str()) == Some(file_name))
            .then(|| root.to_path_buf());
    }
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    find_files(root, &[ext])
        .into_iter()
        .find(|path| path.file_name().and_then(|name| name.to_str()) == Some(file_name))
}

pub fn read_text(path: &Path) -> Result<String, SeqDbError> {
    let bytes = fs::read(path)
        .map_err(|err| SeqDbError::Filesystem(format!("read {}: {err}", path.display())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn split_glued_headers(text: &str) -> Cow<'_, str> {
    let glued = text
        .lines()
        .any(|line| !line.starts_with('>') && line.contains('>'));
    if !glued {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        match line.find('>') {
            Some(pos) if pos > 0 => {
                out.push_str(&line[..pos]);
                out.push('\n');
                out.push_str(&line[pos..]);
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    Cow::Owned(out)
}
