//! Common-password list used by [`PasswordScorer`](crate::PasswordScorer).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BLACKLIST_PATH_ENV: &str = "AUTH_GUARD_BLACKLIST_PATH";
const DEFAULT_BLACKLIST_PATH: &str = "./assets/blacklist.txt";

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Blacklist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read blacklist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Blacklist file is empty")]
    EmptyFile,
}

/// Returns the blacklist file path.
///
/// Priority:
/// 1. Environment variable `AUTH_GUARD_BLACKLIST_PATH`
/// 2. Default path `./assets/blacklist.txt`
pub fn blacklist_path() -> PathBuf {
    std::env::var(BLACKLIST_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_BLACKLIST_PATH))
}

/// A case-insensitive set of passwords that must not be accepted.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    words: HashSet<String>,
}

impl Blacklist {
    /// Builds a blacklist from in-memory entries. Blank entries are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Loads the file named by `AUTH_GUARD_BLACKLIST_PATH`, or the default path.
    pub fn from_env() -> Result<Self, BlacklistError> {
        Self::from_path(blacklist_path())
    }

    /// Loads a newline-separated blacklist file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File has no entries
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BlacklistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist load FAILED: file not found {:?}", path);
            return Err(BlacklistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let blacklist = Self::from_words(content.lines());

        if blacklist.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist load FAILED: empty file {:?}", path);
            return Err(BlacklistError::EmptyFile);
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Blacklist loaded: {} passwords from {:?}", blacklist.len(), path);

        Ok(blacklist)
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, password: &str) -> bool {
        self.words.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
