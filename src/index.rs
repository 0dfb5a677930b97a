use std::fs;

use camino::Utf8PathBuf;
use tracing::info;

use crate::domain::{SeqType, SourceName};
use crate::error::SeqDbError;
use crate::exec::{CommandRunner, Invocation};

#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub source: SourceName,
    pub seq_type: SeqType,
    pub sequences: Utf8PathBuf,
    pub log: Utf8PathBuf,
}

pub trait Indexer {
    fn index(&self, request: &IndexRequest) -> Result<(), SeqDbError>;
}

pub struct BlastIndexer<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> BlastIndexer<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn invocation(&self, request: &IndexRequest) -> Invocation {
        let file_name = |path: &Utf8PathBuf| {
            path.file_name()
                .map(str::to_string)
                .unwrap_or_else(|| path.to_string())
        };
        let mut invocation = Invocation::new(self.program.as_str())
            .arg("-in")
            .arg(file_name(&request.sequences))
            .arg("-title")
            .arg(request.source.as_str())
            .arg("-dbtype")
            .arg(request.seq_type.to_string())
            .arg("-hash_index")
            .arg("-logfile")
            .arg(file_name(&request.log));
        if let Some(dir) = request.sequences.parent() {
            invocation = invocation.current_dir(dir);
        }
        invocation
    }
}

impl<R: CommandRunner> Indexer for BlastIndexer<R> {
    fn index(&self, request: &IndexRequest) -> Result<(), SeqDbError> {
        let invocation = self.invocation(request);
        info!("indexing {} with {}", request.sequences, self.program);
        let outcome = self.runner.run(&invocation)?;
        if outcome.success {
            return Ok(());
        }
        let log = fs::read_to_string(request.log.as_std_path())
            .ok()
            .filter(|log| !log.trim().is_empty())
            .unwrap_or(outcome.stderr);
        Err(SeqDbError::IndexFailed {
            source_name: request.source.to_string(),
            log: log.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::exec::CommandOutcome;

    struct ScriptedRunner(CommandOutcome);

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _invocation: &Invocation) -> Result<CommandOutcome, SeqDbError> {
            Ok(self.0.clone())
        }
    }

    fn request(dir: &tempfile::TempDir) -> IndexRequest {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        IndexRequest {
            source: SourceName::Card,
            seq_type: SeqType::Nucl,
            sequences: root.join("sequences"),
            log: root.join("index.log"),
        }
    }

    #[test]
    fn builds_makeblastdb_command() {
        let dir = tempfile::tempdir().unwrap();
        let request = request(&dir);
        let indexer = BlastIndexer::new(ScriptedRunner(CommandOutcome::ok()), "makeblastdb");
        let invocation = indexer.invocation(&request);
        assert_eq!(
            invocation.display(),
            "makeblastdb -in sequences -title card -dbtype nucl -hash_index -logfile index.log"
        );
        assert_eq!(invocation.cwd.as_deref(), request.sequences.parent());
        assert!(indexer.index(&request).is_ok());
    }

    #[test]
    fn failure_surfaces_log() {
        let dir = tempfile::tempdir().unwrap();
        let request = request(&dir);
        std::fs::write(request.log.as_std_path(), "BLAST Database error: bad input\n").unwrap();
        let indexer = BlastIndexer::new(
            ScriptedRunner(CommandOutcome::failed(1, "ignored")),
            "makeblastdb",
        );
        assert_matches!(
            indexer.index(&request),
            Err(SeqDbError::IndexFailed { ref log, .. }) if log == "BLAST Database error: bad input"
        );
    }

    #[test]
    fn failure_without_log_uses_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let request = request(&dir);
        let indexer = BlastIndexer::new(
            ScriptedRunner(CommandOutcome::failed(1, "segfault\n")),
            "makeblastdb",
        );
        assert_matches!(
            indexer.index(&request),
            Err(SeqDbError::IndexFailed { ref log, .. }) if log == "segfault"
        );
    }
}
