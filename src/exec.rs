use std::path::PathBuf;
use std::process::Command;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::error::SeqDbError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    pub fn into_result(self, invocation: &Invocation) -> Result<(), SeqDbError> {
        if self.success {
            return Ok(());
        }
        let stderr = self.stderr.trim();
        let message = if stderr.is_empty() {
            format!("{} exited with {:?}", invocation.display(), self.code)
        } else {
            format!("{}: {stderr}", invocation.display())
        };
        Err(SeqDbError::CommandFailed(message))
    }
}

pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutcome, SeqDbError>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutcome, SeqDbError> {
        let program = find_in_path(&invocation.program)
            .ok_or_else(|| SeqDbError::MissingTool(invocation.program.clone()))?;
        debug!("running {}", invocation.display());
        let mut cmd = Command::new(program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir.as_std_path());
        }
        let output = cmd
            .output()
            .map_err(|err| SeqDbError::CommandFailed(format!("{}: {err}", invocation.program)))?;
        Ok(CommandOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.components().count() > 1 {
        return direct.exists().then_some(direct);
    }
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}
