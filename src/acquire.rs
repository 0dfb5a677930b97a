use std::fs::{self, File};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::info;

use crate::domain::SourceName;
use crate::error::SeqDbError;
use crate::exec::{CommandRunner, Invocation};
use crate::fs_util;
use crate::store::{Metadata, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unpack {
    None,
    Gzip,
    Zip,
    TarBz2,
}

impl Unpack {
    pub fn from_url(url: &str) -> Option<Self> {
        let name = url_file_name(url).to_ascii_lowercase();
        if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            Some(Unpack::TarBz2)
        } else if name.ends_with(".zip") {
            Some(Unpack::Zip)
        } else if name.ends_with(".gz") {
            Some(Unpack::Gzip)
        } else {
            None
        }
    }
}

fn url_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Git {
        url: String,
    },
    Http {
        url: String,
        file_name: String,
        unpack: Unpack,
    },
    Shell {
        script: String,
        file_name: String,
    },
}

impl Acquisition {
    pub fn git(url: &str) -> Self {
        Acquisition::Git {
            url: url.to_string(),
        }
    }

    pub fn http(url: &str, file_name: &str, unpack: Unpack) -> Self {
        Acquisition::Http {
            url: url.to_string(),
            file_name: file_name.to_string(),
            unpack,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Acquisition::Git { url } | Acquisition::Http { url, .. } => url,
            Acquisition::Shell { script, .. } => script,
        }
    }

    /// Replaces the upstream location, keeping the rest of the plan.
    ///
    /// A mirror serving an archive under a recognizable name (`.zip`,
    /// `.gz`, `.tar.bz2`) switches the unpack step to match.
    pub fn with_location(self, location: &str) -> Self {
        match self {
            Acquisition::Git { .. } => Acquisition::git(location),
            Acquisition::Http {
                file_name, unpack, ..
            } => match Unpack::from_url(location) {
                Some(detected) if detected != unpack => Acquisition::Http {
                    url: location.to_string(),
                    file_name: url_file_name(location).to_string(),
                    unpack: detected,
                },
                _ => Acquisition::Http {
                    url: location.to_string(),
                    file_name,
                    unpack,
                },
            },
            Acquisition::Shell { file_name, .. } => Acquisition::Shell {
                script: location.to_string(),
                file_name,
            },
        }
    }
}

pub trait Acquirer {
    fn acquire(
        &self,
        source: SourceName,
        plan: &Acquisition,
        raw_dir: &Utf8Path,
        force: bool,
    ) -> Result<Utf8PathBuf, SeqDbError>;
}

pub struct SystemAcquirer<R: CommandRunner> {
    client: Client,
    runner: R,
}

impl<R: CommandRunner> SystemAcquirer<R> {
    pub fn new(runner: R) -> Result<Self, SeqDbError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("seqdb-normalize/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| SeqDbError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|err| SeqDbError::Http(err.to_string()))?;
        Ok(Self { client, runner })
    }

    fn download(&self, url: &str, destination: &Utf8Path) -> Result<(), SeqDbError> {
        info!("downloading {url}");
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| SeqDbError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(SeqDbError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let mut file = File::create(destination.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| SeqDbError::Http(format!("{url}: {err}")))?;
        Ok(())
    }

    fn run(&self, invocation: Invocation) -> Result<(), SeqDbError> {
        self.runner.run(&invocation)?.into_result(&invocation)
    }

    fn fetch_into(&self, plan: &Acquisition, staging: &Utf8Path) -> Result<(), SeqDbError> {
        let data = staging.join("data");
        match plan {
            Acquisition::Git { url } => self.run(
                Invocation::new("git")
                    .args(["clone", "--quiet", "--depth", "1"])
                    .arg(url.as_str())
                    .arg(data.as_str()),
            ),
            Acquisition::Http {
                url,
                file_name,
                unpack,
            } => {
                fs::create_dir_all(data.as_std_path())
                    .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
                let download = staging.join(file_name);
                self.download(url, &download)?;
                match unpack {
                    Unpack::None => fs::rename(download.as_std_path(), data.join(file_name))
                        .map_err(|err| SeqDbError::Filesystem(err.to_string())),
                    Unpack::Gzip => {
                        let target = file_name.strip_suffix(".gz").unwrap_or(file_name);
                        fs_util::gunzip(download.as_std_path(), data.join(target).as_std_path())
                    }
                    Unpack::Zip => {
                        fs_util::extract_zip(download.as_std_path(), data.as_std_path()).map(|_| ())
                    }
                    Unpack::TarBz2 => self.run(
                        Invocation::new("tar")
                            .arg("-xjf")
                            .arg(download.as_str())
                            .arg("-C")
                            .arg(data.as_str()),
                    ),
                }
            }
            Acquisition::Shell { script, file_name } => {
                fs::create_dir_all(data.as_std_path())
                    .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
                self.run(
                    Invocation::new("sh")
                        .arg("-c")
                        .arg(script.as_str())
                        .current_dir(data.clone()),
                )?;
                if !data.join(file_name).as_std_path().exists() {
                    return Err(SeqDbError::CommandFailed(format!(
                        "'{script}' did not produce {file_name}"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl<R: CommandRunner> Acquirer for SystemAcquirer<R> {
    fn acquire(
        &self,
        source: SourceName,
        plan: &Acquisition,
        raw_dir: &Utf8Path,
        force: bool,
    ) -> Result<Utf8PathBuf, SeqDbError> {
        let data = raw_dir.join("data");
        if data.as_std_path().exists() {
            if !force {
                info!("reusing existing {source} download in {data}");
                return Ok(data);
            }
            info!("--force given, removing {raw_dir}");
            fs::remove_dir_all(raw_dir.as_std_path())
                .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        }
        fs::create_dir_all(raw_dir.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;

        let staging = tempfile::Builder::new()
            .prefix(".seqdb-fetch")
            .tempdir_in(raw_dir.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;
        let staging_path = Utf8PathBuf::from_path_buf(staging.path().to_path_buf())
            .map_err(|_| SeqDbError::Filesystem("non-utf8 staging path".to_string()))?;
        self.fetch_into(plan, &staging_path)?;
        fs_util::atomic_rename_dir(staging_path.join("data").as_std_path(), data.as_std_path())
            .map_err(|err| SeqDbError::Filesystem(err.to_string()))?;

        let metadata = Metadata {
            source: source.to_string(),
            url: plan.location().to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            tool: format!("seqdb-normalize/{}", env!("CARGO_PKG_VERSION")),
        };
        Store::write_metadata(&raw_dir.join("metadata.json"), &metadata)?;
        Ok(data)
    }
}
