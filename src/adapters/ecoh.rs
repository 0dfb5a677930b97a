use std::path::Path;

use super::{SourceAdapter, require_files};
use crate::acquire::{Acquisition, Unpack};
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const DOWNLOAD_URL: &str = "https://raw.githubusercontent.com/katholt/srst2/master/data/EcOH.fasta";

pub struct Ecoh;

impl SourceAdapter for Ecoh {
    fn name(&self) -> SourceName {
        SourceName::Ecoh
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::http(DOWNLOAD_URL, "EcOH.fasta", Unpack::None)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["fasta", "fa"])? {
            records.extend(normalize(fasta::read_file(&path, SeqType::Nucl)?)?);
        }
        Ok(records)
    }
}

pub fn normalize(records: Vec<Record>) -> Result<Vec<Record>, SeqDbError> {
    records
        .into_iter()
        .map(|mut record| {
            let allele = record
                .id
                .split("__")
                .nth(2)
                .filter(|allele| !allele.is_empty())
                .map(str::to_string)
                .ok_or_else(|| SeqDbError::MalformedHeader {
                    source_name: "ecoh",
                    header: record.id.clone(),
                    reason: "expected cluster__gene__allele__seqid".to_string(),
                })?;
            let mut fields = record.desc.split(';');
            let acc = fields.next().unwrap_or_default().trim().to_string();
            let desc = fields.collect::<Vec<_>>().join(" ");
            record.id = allele;
            record.acc = acc;
            record.desc = desc;
            Ok(record)
        })
        .collect()
}
