use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use super::{SourceAdapter, find_named, read_text};
use crate::acquire::{Acquisition, Unpack};
use crate::domain::{Record, SeqType, SourceName};
use crate::error::SeqDbError;

const DOWNLOAD_URL: &str = "https://card.mcmaster.ca/latest/data";
const CARD_JSON: &str = "card.json";
const PROTEIN_HOMOLOG: &str = "protein homolog model";

pub struct Card;

impl SourceAdapter for Card {
    fn name(&self) -> SourceName {
        SourceName::Card
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition::http(DOWNLOAD_URL, "card-data.tar.bz2", Unpack::TarBz2)
    }

    fn load(&self, artifact: &Path) -> Result<Vec<Record>, SeqDbError> {
        let path = find_named(artifact, CARD_JSON).ok_or_else(|| SeqDbError::MissingInput {
            root: artifact.display().to_string(),
            pattern: CARD_JSON.to_string(),
        })?;
        let records = parse(&read_text(&path)?)?;
        info!("loaded {} protein homolog models from {}", records.len(), path.display());
        Ok(records)
    }
}

pub fn parse(json: &str) -> Result<Vec<Record>, SeqDbError> {
    let root: Value = serde_json::from_str(json).map_err(|err| SeqDbError::Json(err.to_string()))?;
    let models = root
        .as_object()
        .ok_or_else(|| SeqDbError::Json("top level of card.json is not an object".to_string()))?;

    let mut records = Vec::new();
    // Non-object entries are file metadata such as `_version`.
    for (key, model) in models {
        let Some(model) = model.as_object() else {
            continue;
        };
        if model.get("model_type").and_then(Value::as_str) != Some(PROTEIN_HOMOLOG) {
            continue;
        }
        records.push(model_record(key, model)?);
    }
    Ok(records)
}

fn model_record(key: &str, model: &Map<String, Value>) -> Result<Record, SeqDbError> {
    let missing = |field: &str| SeqDbError::MissingField {
        source_name: "card",
        entry: key.to_string(),
        field: field.to_string(),
    };

    let name = model
        .get("model_name")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("model_name"))?;
    if model
        .get("model_param")
        .and_then(|param| param.get("snp"))
        .is_some()
    {
        return Err(SeqDbError::UnsupportedVariantModel {
            source_name: "card",
            model: name.to_string(),
        });
    }

    let sequences = model
        .get("model_sequences")
        .and_then(|value| value.get("sequence"))
        .and_then(Value::as_object)
        .ok_or_else(|| missing("model_sequences.sequence"))?;
    let first = sequences
        .keys()
        .min()
        .and_then(|seq_key| sequences.get(seq_key))
        .ok_or_else(|| missing("model_sequences.sequence"))?;
    let dna = first
        .get("dna_sequence")
        .ok_or_else(|| missing("dna_sequence"))?;

    let accession = dna
        .get("accession")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("dna_sequence.accession"))?;
    let fmin = coordinate(dna, "fmin").ok_or_else(|| missing("dna_sequence.fmin"))?;
    let fmax = coordinate(dna, "fmax").ok_or_else(|| missing("dna_sequence.fmax"))?;
    let sequence = dna
        .get("sequence")
        .and_then(Value::as_str)
        .filter(|seq| !seq.is_empty())
        .ok_or_else(|| missing("dna_sequence.sequence"))?;

    let desc = ["ARO_description", "ARO_accession"]
        .iter()
        .filter_map(|field| model.get(*field).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or_default();

    let id = name.split_whitespace().collect::<Vec<_>>().join("_");
    Ok(Record::new(id, SeqType::Nucl.sanitize(sequence), SeqType::Nucl)
        .with_acc(format!("{accession}:{}-{}", fmin + 1, fmax + 1))
        .with_desc(desc))
}

fn coordinate(dna: &Value, field: &str) -> Option<u64> {
    match dna.get(field)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
