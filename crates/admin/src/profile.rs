//! Local mirror of the vendor's store profile.
//!
//! Loaded once at startup and written back whenever the profile changes.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a crash never leaves a half-written profile.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use vendor_desk_core::types::{Validate, ValidationError, VendorProfile};

/// Errors from reading or writing the profile mirror.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile file {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid profile: {0}")]
    Validation(#[from] ValidationError),
}

/// The single process-wide store profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profile: VendorProfile,
}

impl ProfileStore {
    /// Read the mirror at `path`. A missing file yields the default profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileStoreError` if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ProfileStoreError> {
        let path = path.into();
        let profile = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ProfileStoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No profile mirror yet, using defaults");
                VendorProfile::default()
            }
            Err(source) => return Err(ProfileStoreError::Io { path, source }),
        };
        Ok(Self { path, profile })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Validate and persist a new profile.
    ///
    /// The in-memory profile only changes once the file is written.
    ///
    /// # Errors
    ///
    /// Returns `ProfileStoreError::Validation` for an invalid profile and
    /// `ProfileStoreError::Io` if the file cannot be written.
    pub fn save(&mut self, profile: VendorProfile) -> Result<(), ProfileStoreError> {
        profile.validate()?;
        self.write(&profile)?;
        tracing::info!(
            path = %self.path.display(),
            store_name = %profile.store_name,
            "Saved store profile"
        );
        self.profile = profile;
        Ok(())
    }

    /// Apply `change` to a copy of the profile and save it.
    ///
    /// # Errors
    ///
    /// As [`Self::save`].
    pub fn update(&mut self, change: impl FnOnce(&mut VendorProfile)) -> Result<(), ProfileStoreError> {
        let mut profile = self.profile.clone();
        change(&mut profile);
        self.save(profile)
    }

    fn write(&self, profile: &VendorProfile) -> Result<(), ProfileStoreError> {
        let io_err = |source: std::io::Error| ProfileStoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(profile).map_err(|source| ProfileStoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
