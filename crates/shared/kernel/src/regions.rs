//! Loading the region → locality directory.

use handy_domain::config::RegionsConfig;
use handy_domain::regions::RegionDirectory;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::info;

const EMBEDDED_REGIONS: &str = include_str!("../assets/regions.json");

#[handy_derive::handy_error]
pub enum RegionsError {
    #[error("Region file unreadable{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Region data malformed{}: {source}", format_context(.context))]
    Parse { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Region data rejected{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Loads the configured directory, falling back to the embedded one.
///
/// # Errors
/// Fails if the configured file cannot be read, is not a JSON object of
/// string lists, or lists no regions at all.
pub fn load_regions(config: &RegionsConfig) -> Result<RegionDirectory, RegionsError> {
    let directory = match &config.path {
        Some(path) => from_file(path)?,
        None => embedded()?,
    };

    info!(regions = directory.len(), "Region directory loaded");
    Ok(directory)
}

/// The directory compiled into the binary.
///
/// # Errors
/// Only if the embedded asset is broken.
pub fn embedded() -> Result<RegionDirectory, RegionsError> {
    parse(EMBEDDED_REGIONS).context("embedded regions.json")
}

fn from_file(path: &Path) -> Result<RegionDirectory, RegionsError> {
    let raw = fs::read_to_string(path).context(path.display().to_string())?;
    parse(&raw).context(path.display().to_string())
}

fn parse(raw: &str) -> Result<RegionDirectory, RegionsError> {
    let directory: RegionDirectory = serde_json::from_str(raw)?;
    if directory.is_empty() {
        return Err(RegionsError::Invalid { message: "no regions listed".into(), context: None });
    }
    if let Some(blank) = directory.regions().find(|r| r.trim().is_empty()) {
        return Err(RegionsError::Invalid {
            message: format!("blank region name '{blank}'").into(),
            context: None,
        });
    }
    Ok(directory)
}
