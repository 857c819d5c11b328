//! Static region → locality reference data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only mapping from a region name to its ordered localities.
///
/// Loaded once at startup and shared by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionDirectory {
    regions: BTreeMap<String, Vec<String>>,
}

impl RegionDirectory {
    pub fn new<R, L>(entries: impl IntoIterator<Item = (R, L)>) -> Self
    where
        R: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let regions = entries
            .into_iter()
            .map(|(region, localities)| {
                (region.into(), localities.into_iter().map(Into::into).collect())
            })
            .collect();
        Self { regions }
    }

    /// Region names in display order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Localities of `region`, in order. Unknown or empty regions yield an empty slice.
    #[must_use]
    pub fn localities(&self, region: &str) -> &[String] {
        self.regions.get(region).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// Whether `locality` is listed under `region`.
    #[must_use]
    pub fn contains(&self, region: &str, locality: &str) -> bool {
        self.localities(region).iter().any(|l| l == locality)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
