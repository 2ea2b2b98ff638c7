use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{NanopubError, Result},
    signer::RsaSigner,
};

/// Directory under `$HOME` holding the profile and keys.
pub const PROFILE_DIR: &str = ".nanopub";

/// File name of the profile inside [`PROFILE_DIR`].
pub const PROFILE_FILE: &str = "profile.yml";

/// The publishing identity: who signs and with which keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// ORCID IRI of the author, e.g. `https://orcid.org/0000-0000-0000-0000`
    pub orcid_id: String,
    pub name: String,
    /// Path of the base64 public key file
    pub public_key: PathBuf,
    /// Path of the private key file
    pub private_key: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction_nanopub_uri: Option<String>,
}

impl Profile {
    /// `$HOME/.nanopub/profile.yml`
    pub fn default_path() -> Result<PathBuf> {
        let home = env::var_os("HOME")
            .ok_or_else(|| NanopubError::Profile("HOME is not set".to_owned()))?;
        Ok(PathBuf::from(home).join(PROFILE_DIR).join(PROFILE_FILE))
    }

    /// Loads a profile from YAML.
    ///
    /// Relative key paths are resolved against the directory holding the
    /// profile.
    pub fn load(path: &Path) -> Result<Self> {
        log::trace!("loading profile from {}", path.display());
        let yaml = fs::read_to_string(path).map_err(|e| {
            NanopubError::Profile(format!("cannot read profile {}: {e}", path.display()))
        })?;
        let mut profile: Profile = serde_yaml::from_str(&yaml)?;

        if profile.orcid_id.trim().is_empty() {
            return Err(NanopubError::Profile(format!(
                "{} has an empty orcid_id",
                path.display()
            )));
        }
        if profile.name.trim().is_empty() {
            return Err(NanopubError::Profile(format!(
                "{} has an empty name",
                path.display()
            )));
        }

        if let Some(dir) = path.parent() {
            profile.public_key = resolve(dir, &profile.public_key);
            profile.private_key = resolve(dir, &profile.private_key);
        }
        Ok(profile)
    }

    /// Loads the profile at [`Profile::default_path`].
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    /// Writes the profile as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        log::debug!("wrote profile for {} to {}", self.orcid_id, path.display());
        Ok(())
    }

    /// Loads the key pair this profile points at.
    pub fn signer(&self) -> Result<RsaSigner> {
        RsaSigner::from_files(&self.private_key, Some(&self.public_key))
    }
}

fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
