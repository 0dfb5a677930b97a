use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use super::{SourceAdapter, find_named, read_text, require_files};
use crate::acquire::Acquisition;
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const REPO_URL: &str = "https://bitbucket.org/genomicepidemiology/resfinder_db.git";
const NOTES_FILE: &str = "notes.txt";

pub struct Resfinder;

impl SourceAdapter for Resfinder {
    fn name(&self) -> SourceName {
        SourceName::Resfinder
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::git(REPO_URL)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let notes = match find_named(artifact, NOTES_FILE) {
            Some(path) => parse_notes(&read_text(&path)?),
            None => {
                warn!("no {NOTES_FILE} under {}; descriptions will be empty", artifact.display());
                HashMap::new()
            }
        };
        let mut records = Vec::new();
        for path in require_files(artifact, &["fsa"])? {
            let loaded = fasta::read_file(&path, SeqType::Nucl)?;
            records.extend(normalize(loaded, &notes)?);
        }
        Ok(records)
    }
}

pub fn parse_notes(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            let value = fields.get(2..).map(|rest| rest.join(":")).unwrap_or_default();
            (fields[0].to_string(), value)
        })
        .collect()
}

pub fn normalize(
    records: Vec<Record>,
    notes: &HashMap<String, String>,
) -> Result<Vec<Record>, SeqDbError> {
    records
        .into_iter()
        .map(|mut record| {
            let mut parts = record.id.rsplitn(3, '_');
            let (Some(acc), Some(copy), Some(name)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(SeqDbError::MalformedHeader {
                    source_name: "resfinder",
                    header: record.id.clone(),
                    reason: "expected gene_copy_accession".to_string(),
                });
            };
            let (acc, id) = (acc.to_string(), format!("{name}_{copy}"));
            record.desc = notes.get(name).cloned().unwrap_or_default();
            record.id = id;
            record.acc = acc;
            Ok(record)
        })
        .collect()
}
