use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{SourceAdapter, require_files};
use crate::acquire::{Acquisition, Unpack};
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const DOWNLOAD_URL: &str = "http://www.mgc.ac.cn/VFs/Down/VFDB_setA_nt.fas.gz";

static VFG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\((?:\w+\|)?([^)|]+)\)$").expect("vfdb id pattern"));
static LEADING_GENE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([^)]+)\)").expect("vfdb gene pattern"));

pub struct Vfdb;

impl SourceAdapter for Vfdb {
    fn name(&self) -> SourceName {
        SourceName::Vfdb
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::http(DOWNLOAD_URL, "VFDB_setA_nt.fas.gz", Unpack::Gzip)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["fas", "fasta", "fa"])? {
            records.extend(normalize(fasta::read_file(&path, SeqType::Nucl)?)?);
        }
        Ok(records)
    }
}

pub fn normalize(records: Vec<Record>) -> Result<Vec<Record>, SeqDbError> {
    records
        .into_iter()
        .map(|mut record| {
            let Some(caps) = VFG_TOKEN.captures(&record.id) else {
                return Err(SeqDbError::MalformedHeader {
                    source_name: "vfdb",
                    header: record.id.clone(),
                    reason: "expected VFGnnnnnn(db|accession)".to_string(),
                });
            };
            let vfg = caps[1].to_string();
            let acc = caps[2].to_string();
            record.id = LEADING_GENE
                .captures(&record.desc)
                .map(|gene| gene[1].trim().to_string())
                .filter(|gene| !gene.is_empty())
                .unwrap_or(vfg);
            record.acc = acc;
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn gene_from_description() {
        let text = ">VFG000676(gb|AAD32411) (lef) anthrax toxin lethal factor precursor [Anthrax toxin (VF0142)] [Bacillus anthracis str. Sterne]\nATG\n";
        let records = fasta::parse_str(text, SeqType::Nucl, "t").unwrap();
        let out = normalize(records).unwrap();
        assert_eq!(out[0].id, "lef");
        assert_eq!(out[0].acc, "AAD32411");
        assert!(out[0].desc.starts_with("(lef) anthrax toxin"));
    }

    #[test]
    fn falls_back_to_vfg_number() {
        let text = ">VFG037176(gb|WP_001081735) phospholipase C [Plc (VF0470)]\nATG\n";
        let records = fasta::parse_str(text, SeqType::Nucl, "t").unwrap();
        let out = normalize(records).unwrap();
        assert_eq!(out[0].id, "VFG037176");
        assert_eq!(out[0].acc, "WP_001081735");
    }

    #[test]
    fn accession_without_database_tag() {
        let text = ">VFG000001(AAA00001.1) (abc) x [y]\nATG\n";
        let records = fasta::parse_str(text, SeqType::Nucl, "t").unwrap();
        let out = normalize(records).unwrap();
        assert_eq!(out[0].id, "abc");
        assert_eq!(out[0].acc, "AAA00001.1");
    }

    #[test]
    fn unexpected_id_is_fatal() {
        let records = fasta::parse_str(">VFG037176 (plc) x\nATG\n", SeqType::Nucl, "t").unwrap();
        assert_matches!(normalize(records), Err(SeqDbError::MalformedHeader { .. }));
    }
}
