use std::fs::File;
use std::io::Read;
use std::path::Path;

use gb_io::reader::SeqReader;
use gb_io::seq::{Feature, Seq};

use super::{SourceAdapter, require_files};
use crate::acquire::Acquisition;
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;

const GENBANK_FILE: &str = "sequences.gbk";
const FETCH_SCRIPT: &str = "esearch -db nuccore -query 'PRJNA313047[BioProject]' \
    | efetch -format gbwithparts > sequences.gbk";

pub struct Ncbi;

impl SourceAdapter for Ncbi {
    fn name(&self) -> SourceName {
        SourceName::Ncbi
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::Shell {
            script: FETCH_SCRIPT.to_string(),
            file_name: GENBANK_FILE.to_string(),
        }
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["gbk", "gb", "gbff"])? {
            let file = File::open(&path).map_err(|err| {
                SeqDbError::Filesystem(format!("open {}: {err}", path.display()))
            })?;
            records.extend(parse(file)?);
        }
        Ok(records)
    }
}

pub fn parse<R: Read>(reader: R) -> Result<Vec<Record>, SeqDbError> {
    SeqReader::new(reader)
        .map(|entry| {
            let seq = entry.map_err(|err| SeqDbError::GenBank(err.to_string()))?;
            cds_record(&seq)
        })
        .collect()
}

fn qualifier(feature: &Feature, key: &str) -> Option<String> {
    feature
        .qualifier_values(key.into())
        .next()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cds_record(seq: &Seq) -> Result<Record, SeqDbError> {
    let name = seq.name.clone().unwrap_or_default();
    let cds = seq
        .features
        .iter()
        .find(|feature| feature.kind == "CDS")
        .ok_or_else(|| SeqDbError::MissingCds(name.clone()))?;

    let locus_tag = qualifier(cds, "locus_tag");
    let id = qualifier(cds, "allele")
        .or_else(|| qualifier(cds, "gene"))
        .or_else(|| locus_tag.clone())
        .ok_or_else(|| SeqDbError::MissingField {
            source_name: "ncbi",
            entry: name.clone(),
            field: "allele, gene or locus_tag".to_string(),
        })?;
    let coding = seq
        .extract_location(&cds.location)
        .map_err(|err| SeqDbError::GenBank(format!("{name}: {err:?}")))?;

    Ok(Record::new(
        id,
        SeqType::Nucl.sanitize(&String::from_utf8_lossy(&coding)),
        SeqType::Nucl,
    )
    .with_acc(locus_tag.unwrap_or_default())
    .with_desc(qualifier(cds, "product").unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const RECORD: &str = "\
LOCUS       NG_047831                 24 bp    DNA     linear   BCT 05-JUN-2019
DEFINITION  Escherichia coli test beta-lactamase gene, complete CDS.
ACCESSION   NG_047831
VERSION     NG_047831.1
KEYWORDS    .
SOURCE      Escherichia coli
  ORGANISM  Escherichia coli
            Bacteria.
FEATURES             Location/Qualifiers
     source          1..24
                     /organism=\"Escherichia coli\"
     gene            4..12
                     /gene=\"blaX\"
     CDS             4..12
                     /gene=\"blaX\"
                     /allele=\"blaX-1\"
                     /locus_tag=\"NG_047831_1\"
                     /product=\"test beta-lactamase\"
ORIGIN
        1 ccgatgaaat aaggggcccc tttt
//
";

    const NO_CDS: &str = "\
LOCUS       NG_000001                 12 bp    DNA     linear   BCT 05-JUN-2019
DEFINITION  No coding feature.
ACCESSION   NG_000001
VERSION     NG_000001.1
KEYWORDS    .
SOURCE      Escherichia coli
  ORGANISM  Escherichia coli
            Bacteria.
FEATURES             Location/Qualifiers
     source          1..12
                     /organism=\"Escherichia coli\"
ORIGIN
        1 atgaaataag gg
//
";

    #[test]
    fn first_cds_defines_the_record() {
        let records = parse(RECORD.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "blaX-1");
        assert_eq!(records[0].acc, "NG_047831_1");
        assert_eq!(records[0].desc, "test beta-lactamase");
        assert_eq!(records[0].seq, "ATGAAATAA");
    }

    #[test]
    fn missing_cds_is_fatal() {
        assert_matches!(parse(NO_CDS.as_bytes()), Err(SeqDbError::MissingCds(ref name)) if name == "NG_000001");
    }
}
