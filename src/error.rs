use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SeqDbError {
    #[error("unknown database '{name}'; valid names are: {valid}")]
    UnknownSource { name: String, valid: String },

    #[error("output directory does not exist: {0}")]
    MissingOutputDir(String),

    #[error("record {index} in {origin} has an empty identifier")]
    EmptyIdentifier { origin: String, index: usize },

    #[error("{source_name}: cannot parse header '{header}': {reason}")]
    MalformedHeader {
        source_name: &'static str,
        header: String,
        reason: String,
    },

    #[error("{source_name}: entry '{entry}' is missing required field '{field}'")]
    MissingField {
        source_name: &'static str,
        entry: String,
        field: String,
    },

    #[error("{source_name}: model '{model}' declares SNP parameters, which are not supported")]
    UnsupportedVariantModel {
        source_name: &'static str,
        model: String,
    },

    #[error("GenBank record '{0}' has no CDS feature")]
    MissingCds(String),

    #[error("failed to parse GenBank input: {0}")]
    GenBank(String),

    #[error("no input files matching {pattern} under {root}")]
    MissingInput { root: String, pattern: String },

    #[error("indexing of '{source_name}' failed:\n{log}")]
    IndexFailed { source_name: String, log: String },

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("download failed: {0}")]
    Http(String),

    #[error("server returned status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to parse JSON input: {0}")]
    Json(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
