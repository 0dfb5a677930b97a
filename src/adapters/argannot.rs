use std::path::Path;

use super::{SourceAdapter, read_text, require_files};
use crate::acquire::{Acquisition, Unpack};
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const DOWNLOAD_URL: &str =
    "https://www.mediterranee-infection.com/wp-content/uploads/2019/03/ARGANNOT_V6_April2018.fasta";

pub struct Argannot;

impl SourceAdapter for Argannot {
    fn name(&self) -> SourceName {
        SourceName::Argannot
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::http(DOWNLOAD_URL, "argannot.fasta", Unpack::None)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["fasta", "fa", "fas"])? {
            let text = clean_raw(&read_text(&path)?);
            let loaded = fasta::parse_str(&text, SeqType::Nucl, &path.display().to_string())?;
            records.extend(normalize(loaded)?);
        }
        Ok(records)
    }
}

pub fn clean_raw(text: &str) -> String {
    text.chars()
        .filter(|ch| *ch == '\n' || *ch == '\t' || (!ch.is_control() && *ch != '\\'))
        .collect()
}

pub fn normalize(records: Vec<Record>) -> Result<Vec<Record>, SeqDbError> {
    records
        .into_iter()
        .map(|mut record| {
            let fields: Vec<&str> = record.id.split(':').collect();
            if fields.len() < 3 || fields[0].is_empty() {
                return Err(SeqDbError::MalformedHeader {
                    source_name: "argannot",
                    header: record.id.clone(),
                    reason: "expected (class)gene:accession:coordinates".to_string(),
                });
            }
            let (id, acc) = (fields[0].to_string(), format!("{}:{}", fields[1], fields[2]));
            record.id = id;
            record.acc = acc;
            record.desc.clear();
            Ok(record)
        })
        .collect()
}
