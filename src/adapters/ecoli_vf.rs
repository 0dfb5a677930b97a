use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{SourceAdapter, read_text, require_files, split_glued_headers};
use crate::acquire::Acquisition;
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;
use crate::fasta;

const REPO_URL: &str = "https://github.com/phac-nml/ecoli_vf.git";

static GLUED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()\s]+)\(([^()]*)\)$").expect("ecoli_vf token pattern"));
static PLAIN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^()\s]+$").expect("ecoli_vf plain pattern"));
static STRAIN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]\s*$").expect("ecoli_vf strain pattern"));
static LEADING_GENE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([^)]+)\)\s*(.*)$").expect("ecoli_vf gene pattern"));

pub struct EcoliVf;

impl SourceAdapter for EcoliVf {
    fn name(&self) -> SourceName {
        SourceName::EcoliVf
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::git(REPO_URL)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let mut records = Vec::new();
        for path in require_files(artifact, &["ffn", "fasta", "fa"])? {
            let raw = read_text(&path)?;
            let text = split_glued_headers(&raw);
            let loaded = fasta::parse_str(&text, SeqType::Nucl, &path.display().to_string())?;
            records.extend(normalize(loaded)?);
        }
        Ok(records)
    }
}

pub fn normalize(records: Vec<Record>) -> Result<Vec<Record>, SeqDbError> {
    records.into_iter().map(normalize_one).collect()
}

fn normalize_one(mut record: Record) -> Result<Record, SeqDbError> {
    let (id, acc) = if let Some(caps) = GLUED_TOKEN.captures(&record.id) {
        (caps[1].to_string(), caps[2].to_string())
    } else if PLAIN_TOKEN.is_match(&record.id) {
        (record.id.clone(), record.id.clone())
    } else {
        return Err(SeqDbError::MalformedHeader {
            source_name: "ecoli_vf",
            header: format!("{} {}", record.id, record.desc),
            reason: "expected TOKEN(accession) or TOKEN followed by a description".to_string(),
        });
    };
    record.id = id;
    record.acc = if acc.is_empty() { record.id.clone() } else { acc };

    let desc = STRAIN_SUFFIX.replace(&record.desc, "").into_owned();
    record.desc = match LEADING_GENE.captures(&desc) {
        Some(caps) => {
            record.id = caps[1].trim().to_string();
            caps[2].to_string()
        }
        None => desc.clone(),
    };
    Ok(record)
}
