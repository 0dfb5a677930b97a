use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::SourceName;
use crate::error::SeqDbError;

pub const DEFAULT_CONFIG_FILE: &str = "seqdb.json";
pub const DEFAULT_INDEXER: &str = "makeblastdb";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,
    #[serde(default)]
    pub indexer: Option<IndexerEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Shorthand(String),
    Detailed(SourceEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceEntryObject {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IndexerEntry {
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcesConfig {
    pub schema_version: u32,
    pub locations: BTreeMap<SourceName, String>,
    pub indexer_program: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            locations: BTreeMap::new(),
            indexer_program: DEFAULT_INDEXER.to_string(),
        }
    }
}

impl SourcesConfig {
    pub fn location_override(&self, source: SourceName) -> Option<&str> {
        self.locations.get(&source).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: SourceName,
    pub outdir: Utf8PathBuf,
    pub force: bool,
    pub index: bool,
    pub sources: SourcesConfig,
}

impl RunConfig {
    pub fn new(source: SourceName, outdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source,
            outdir: outdir.into(),
            force: false,
            index: true,
            sources: SourcesConfig::default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<SourcesConfig, SeqDbError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(SourcesConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| SeqDbError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| SeqDbError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<SourcesConfig, SeqDbError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let mut locations = BTreeMap::new();
        for (name, entry) in config.sources {
            let source: SourceName = name.parse()?;
            let url = match entry {
                SourceEntry::Shorthand(url) => Some(url),
                SourceEntry::Detailed(obj) => obj.url,
            };
            if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
                locations.insert(source, url);
            }
        }

        let indexer_program = config
            .indexer
            .and_then(|indexer| indexer.program)
            .unwrap_or_else(|| DEFAULT_INDEXER.to_string());

        Ok(SourcesConfig {
            schema_version,
            locations,
            indexer_program,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_config_shorthand_and_detailed() {
        let config: Config = serde_json::from_str(
            r#"{
                "sources": {
                    "vfdb": "http://mirror.example/VFDB_setA_nt.fas.gz",
                    "card": {"url": "http://mirror.example/card.tar.bz2"},
                    "ncbi": {}
                },
                "indexer": {"program": "/opt/blast/bin/makeblastdb"}
            }"#,
        )
        .unwrap();

        let resolved = ConfigLoader::resolve_config(config).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(
            resolved.location_override(SourceName::Vfdb),
            Some("http://mirror.example/VFDB_setA_nt.fas.gz")
        );
        assert_eq!(
            resolved.location_override(SourceName::Card),
            Some("http://mirror.example/card.tar.bz2")
        );
        assert_eq!(resolved.location_override(SourceName::Ncbi), None);
        assert_eq!(resolved.indexer_program, "/opt/blast/bin/makeblastdb");
    }

    #[test]
    fn unknown_source_key_is_rejected() {
        let config: Config = serde_json::from_str(r#"{"sources": {"megares": "x"}}"#).unwrap();
        assert_matches!(
            ConfigLoader::resolve_config(config),
            Err(SeqDbError::UnknownSource { .. })
        );
    }

    #[test]
    fn defaults_without_file() {
        let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
        assert_eq!(resolved, SourcesConfig::default());
        assert_matches!(
            ConfigLoader::resolve(Some("/definitely/missing/seqdb.json")),
            Err(SeqDbError::ConfigRead(_))
        );
    }
}
