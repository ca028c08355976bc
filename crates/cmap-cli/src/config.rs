//! TOML run configuration.
//!
//! ```toml
//! reference = "data/reference.csv"
//! retired = "data/MRCUI.RRF"
//! extra_coding_systems = ["READV3"]
//!
//! [coding_system_aliases]
//! r = "RCD"
//! ```
//!
//! Explicit flags win over the file, which wins over the `CMAP_REFERENCE`
//! and `CMAP_RETIRED` environment variables.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cmap_ingest::CodingSystemAliases;
use cmap_model::CodingSystemSet;
use serde::{Deserialize, Serialize};

pub const REFERENCE_ENV: &str = "CMAP_REFERENCE";
pub const RETIRED_ENV: &str = "CMAP_RETIRED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub reference: Option<PathBuf>,
    pub retired: Option<PathBuf>,
    pub extra_coding_systems: Vec<String>,
    pub coding_system_aliases: CodingSystemAliases,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Built-in coding systems plus the configured extras.
    pub fn coding_systems(&self) -> CodingSystemSet {
        CodingSystemSet::builtin().with_extra(self.extra_coding_systems.iter().cloned())
    }

    /// Built-in aliases overridden by the configured ones.
    pub fn aliases(&self) -> CodingSystemAliases {
        let mut aliases = CodingSystemAliases::builtin();
        aliases.extend(&self.coding_system_aliases);
        aliases
    }

    pub fn reference_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        pick_path(flag, self.reference.as_deref(), std::env::var_os(REFERENCE_ENV))
    }

    pub fn retired_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        pick_path(flag, self.retired.as_deref(), std::env::var_os(RETIRED_ENV))
    }
}

fn pick_path(flag: Option<&Path>, configured: Option<&Path>, env: Option<OsString>) -> Option<PathBuf> {
    flag.or(configured)
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
}
