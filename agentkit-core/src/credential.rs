use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_WALLET_DATA_FILE: &str = "wallet_data.txt";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write credential file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Plain-text file holding the exported wallet credential.
///
/// A missing or empty file is reported as `None`. Saving replaces the whole file
/// through a sibling temporary file and a rename, so readers never observe a
/// half-written blob.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<String>, CredentialError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) if blob.is_empty() => Ok(None),
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CredentialError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn save(&self, blob: &str) -> Result<(), CredentialError> {
        let write_err = |source| CredentialError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, blob).await.map_err(write_err)?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }

        debug!("Credential written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from(DEFAULT_WALLET_DATA_FILE));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
