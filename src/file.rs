//! Filesystem probe behind the file assertion steps.
//!
//! A `file` declaration stores one path; subsequent verify steps check a
//! predicate on it. Readability and writability are probed by actually
//! opening the file, so results are deterministic and carry the underlying
//! I/O error.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use crate::error::StepError;

/// Key under which the declaration table carries the path.
const FILENAME_KEY: &str = "filename";

/// The path declared by the most recent `file` step.
///
/// Defaults to the empty path, which fails every predicate with a
/// deterministic "does not exist" error. Last declaration wins.
#[derive(Debug, Default)]
pub struct FileProbe {
    path: PathBuf,
}

impl FileProbe {
    /// Store the path from key-value declaration rows.
    ///
    /// A missing `filename` entry leaves the probe pointing at the empty
    /// path; a duplicated entry resolves to the last row.
    pub fn declare(&mut self, rows: &[(String, String)]) {
        let filename = rows
            .iter()
            .rev()
            .find(|(key, _)| key == FILENAME_KEY)
            .map_or("", |(_, value)| value.as_str());
        self.path = PathBuf::from(filename);
    }

    /// The currently declared path.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Check that the declared path exists.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::FileNotFound`] naming the path.
    pub fn verify_exists(&self) -> Result<(), StepError> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(StepError::FileNotFound(self.path.clone()))
        }
    }

    /// Check that the declared path can be opened for reading.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::FileUnreadable`] naming the path.
    pub fn verify_readable(&self) -> Result<(), StepError> {
        File::open(&self.path)
            .map(drop)
            .map_err(|source| StepError::FileUnreadable {
                path: self.path.clone(),
                source,
            })
    }

    /// Check that the declared path can be opened for writing.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::FileUnwritable`] naming the path.
    pub fn verify_writable(&self) -> Result<(), StepError> {
        OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map(drop)
            .map_err(|source| StepError::FileUnwritable {
                path: self.path.clone(),
                source,
            })
    }
}
