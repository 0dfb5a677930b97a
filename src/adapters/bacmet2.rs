use std::path::Path;

use super::{SourceAdapter, require_files};
use crate::acquire::{Acquisition, Unpack};
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const DOWNLOAD_URL: &str = "http://bacmet.biomedicine.gu.se/download/BacMet2_EXP_database.fasta";

pub struct Bacmet2;

impl SourceAdapter for Bacmet2 {
    fn name(&self) -> SourceName {
        SourceName::Bacmet2
    }

    fn seq_type(&self) -> SeqType {
        SeqType::Prot
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::http(DOWNLOAD_URL, "BacMet2_EXP_database.fasta", Unpack::None)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["fasta", "fa"])? {
            records.extend(normalize(fasta::read_file(&path, self.seq_type())?)?);
        }
        Ok(records)
    }
}

pub fn normalize(records: Vec<Record>) -> Result<Vec<Record>, SeqDbError> {
    records
        .into_iter()
        .map(|mut record| {
            let fields: Vec<&str> = record.id.split('|').collect();
            let [bac_id, gene, db, uniprot, ..] = fields.as_slice() else {
                return Err(SeqDbError::MalformedHeader {
                    source_name: "bacmet2",
                    header: record.id.clone(),
                    reason: "expected id|gene|db|accession|entry".to_string(),
                });
            };
            let (id, acc) = (format!("{gene}-{bac_id}"), format!("{db}:{uniprot}"));
            record.id = id;
            record.acc = acc;
            Ok(record)
        })
        .collect()
}
