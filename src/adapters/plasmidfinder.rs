use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{SourceAdapter, require_files};
use crate::acquire::Acquisition;
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const REPO_URL: &str = "https://bitbucket.org/genomicepidemiology/plasmidfinder_db.git";

static TRAILING_ACCESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*)_(?P<acc>(?:NC_\d+|[A-Z]+\d+)(?:\.\d+)?)$")
        .expect("plasmidfinder accession pattern")
});

pub struct Plasmidfinder;

impl SourceAdapter for Plasmidfinder {
    fn name(&self) -> SourceName {
        SourceName::Plasmidfinder
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::git(REPO_URL)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["fsa"])? {
            records.extend(fasta::read_file(&path, SeqType::Nucl)?);
        }
        Ok(normalize(records))
    }
}

pub fn normalize(records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            let original = record.id.clone();
            match TRAILING_ACCESSION.captures(&original) {
                Some(caps) => {
                    let name = caps["name"].trim_end_matches('_');
                    if name.is_empty() {
                        warn!("plasmidfinder: '{original}' has no name before its accession; keeping ID");
                    } else {
                        record.id = name.to_string();
                    }
                    record.acc = caps["acc"].to_string();
                }
                None => warn!("plasmidfinder: no accession found in '{original}'"),
            }
            record.desc = original;
            record
        })
        .collect()
}
