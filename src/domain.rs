use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeqDbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeqType {
    Nucl,
    Prot,
}

impl SeqType {
    pub fn wildcard(self) -> u8 {
        match self {
            SeqType::Nucl => b'N',
            SeqType::Prot => b'X',
        }
    }

    pub fn sanitize(self, raw: &str) -> String {
        let wildcard = self.wildcard();
        raw.bytes()
            .map(|byte| byte.to_ascii_uppercase())
            .map(|byte| match self {
                SeqType::Nucl if matches!(byte, b'A' | b'G' | b'C' | b'T') => byte,
                SeqType::Prot if byte.is_ascii_uppercase() => byte,
                _ => wildcard,
            })
            .map(char::from)
            .collect()
    }
}

impl fmt::Display for SeqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqType::Nucl => write!(f, "nucl"),
            SeqType::Prot => write!(f, "prot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub acc: String,
    pub desc: String,
    pub seq: String,
    pub seq_type: SeqType,
}

impl Record {
    pub fn new(id: impl Into<String>, seq: impl Into<String>, seq_type: SeqType) -> Self {
        Self {
            id: id.into(),
            acc: String::new(),
            desc: String::new(),
            seq: seq.into(),
            seq_type,
        }
    }

    pub fn with_acc(mut self, acc: impl Into<String>) -> Self {
        self.acc = acc.into();
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn display_desc(&self) -> &str {
        if self.desc.is_empty() {
            &self.id
        } else {
            &self.desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceName {
    Resfinder,
    Plasmidfinder,
    Argannot,
    Bacmet2,
    Card,
    Vfdb,
    Ncbi,
    Ecoh,
    EcoliVf,
}

impl SourceName {
    pub const ALL: [SourceName; 9] = [
        SourceName::Argannot,
        SourceName::Bacmet2,
        SourceName::Card,
        SourceName::Ecoh,
        SourceName::EcoliVf,
        SourceName::Ncbi,
        SourceName::Plasmidfinder,
        SourceName::Resfinder,
        SourceName::Vfdb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceName::Resfinder => "resfinder",
            SourceName::Plasmidfinder => "plasmidfinder",
            SourceName::Argannot => "argannot",
            SourceName::Bacmet2 => "bacmet2",
            SourceName::Card => "card",
            SourceName::Vfdb => "vfdb",
            SourceName::Ncbi => "ncbi",
            SourceName::Ecoh => "ecoh",
            SourceName::EcoliVf => "ecoli_vf",
        }
    }

    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceName {
    type Err = SeqDbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == normalized)
            .ok_or_else(|| SeqDbError::UnknownSource {
                name: value.to_string(),
                valid: Self::valid_names(),
            })
    }
}
