use std::path::Path;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::passage::PassageKind;
use crate::restriction::RestrictionType;

/// The file looked for next to the working directory, without extension.
pub const SETTINGS_FILE: &str = "passage";
/// Environment variables such as `PASSAGE_DEFAULT_KIND` override the file.
pub const ENV_PREFIX: &str = "PASSAGE";

// ------------- Settings -------------
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The store new passages get.
    pub default_kind: PassageKind,
    /// The versification used when none is named.
    pub default_versification: String,
    /// How far the binary's blur may reach.
    pub blur_restriction: RestrictionType,
    /// Whether a parsed passage keeps reporting the text it came from.
    pub persistent_naming: bool,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_kind: PassageKind::Rocket,
            default_versification: "KJV".to_string(),
            blur_restriction: RestrictionType::Chapter,
            persistent_naming: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads `passage.toml` (or any format `config` knows) if present, then
    /// the `PASSAGE_*` environment.
    pub fn load() -> Result<Self> {
        Self::from_sources(File::with_name(SETTINGS_FILE).required(false))
    }
    /// Like [`load`](Self::load) but with an explicit settings file, which must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_sources(File::from(path.as_ref()).required(true))
    }
    fn from_sources<S>(file: S) -> Result<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
