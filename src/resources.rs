//! Linguistic resources on disk.
//!
//! The segmenter's abbreviation list lives in a data directory so it can be
//! edited without recompiling. Acquisition is idempotent: the directory is
//! created if absent, the bundled list is written only if the file is
//! absent, and the process-wide copy is loaded at most once.
//!
//! ```text
//! <data_dir>/
//!   abbreviations.txt   one abbreviation per line, '#' starts a comment
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::segment::DEFAULT_ABBREVIATIONS;
use crate::{Error, Result, UnicodeSegmenter};

/// File name of the abbreviation list inside the data directory.
pub const ABBREVIATIONS_FILE: &str = "abbreviations.txt";

static GLOBAL: OnceCell<Resources> = OnceCell::new();

/// Loaded linguistic resources.
#[derive(Debug, Clone)]
pub struct Resources {
    dir: PathBuf,
    abbreviations: BTreeSet<String>,
}

impl Resources {
    /// Default data directory: `<platform data dir>/condense`.
    ///
    /// Falls back to the system temp directory when the platform has no
    /// data directory.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("condense")
    }

    /// Prepare `dir` and load the resources in it.
    ///
    /// Safe to call repeatedly; files that already exist are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if the directory cannot be created or the
    /// list cannot be written or read.
    pub fn ensure(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            info!(dir = %dir.display(), "creating resource directory");
            fs::create_dir_all(dir).map_err(|source| Error::Resource {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let path = dir.join(ABBREVIATIONS_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "writing bundled abbreviation list");
            fs::write(&path, bundled_list()).map_err(|source| Error::Resource {
                path: path.clone(),
                source,
            })?;
        }

        let raw = fs::read_to_string(&path).map_err(|source| Error::Resource {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            abbreviations: parse_list(&raw),
        })
    }

    /// Process-wide resources, acquired on first call.
    ///
    /// Later calls return the cached copy and ignore `dir`.
    ///
    /// # Errors
    ///
    /// Propagates the first acquisition failure; a failed attempt is not
    /// cached, so the next call retries.
    pub fn global(dir: Option<&Path>) -> Result<&'static Self> {
        GLOBAL.get_or_try_init(|| {
            let dir = dir.map_or_else(Self::default_dir, Path::to_path_buf);
            Self::ensure(&dir)
        })
    }

    /// The directory these resources were loaded from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loaded abbreviations, lowercased, without trailing periods.
    #[must_use]
    pub fn abbreviations(&self) -> &BTreeSet<String> {
        &self.abbreviations
    }

    /// Build a segmenter that uses these abbreviations.
    #[must_use]
    pub fn segmenter(&self) -> UnicodeSegmenter {
        UnicodeSegmenter::with_abbreviations(&self.abbreviations)
    }
}

fn bundled_list() -> String {
    let mut out = String::from("# Abbreviations that do not end a sentence.\n");
    for abbreviation in DEFAULT_ABBREVIATIONS {
        out.push_str(abbreviation);
        out.push('\n');
    }
    out
}

fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('.').to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segmenter;

    #[test]
    fn ensure_creates_directory_and_list() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let resources = Resources::ensure(&dir).unwrap();
        assert!(dir.join(ABBREVIATIONS_FILE).is_file());
        assert_eq!(resources.abbreviations().len(), DEFAULT_ABBREVIATIONS.len());
        assert!(resources.abbreviations().contains("dr"));
    }

    #[test]
    fn ensure_keeps_existing_list() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(ABBREVIATIONS_FILE),
            "# custom\nApprox.\n\nvol\n",
        )
        .unwrap();

        let first = Resources::ensure(tmp.path()).unwrap();
        let second = Resources::ensure(tmp.path()).unwrap();
        let expected: BTreeSet<String> = ["approx", "vol"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first.abbreviations(), &expected);
        assert_eq!(second.abbreviations(), &expected);
    }

    #[test]
    fn segmenter_uses_loaded_list() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(ABBREVIATIONS_FILE), "vol\n").unwrap();

        let segmenter = Resources::ensure(tmp.path()).unwrap().segmenter();
        assert_eq!(segmenter.segment("See Vol. Two for details.").len(), 1);
    }
}
