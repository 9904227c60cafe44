//! Region to machine image lookup
//!
//! One consolidated table is used by every generator. Regions without an
//! entry resolve to the `us-east-1` image, so the table must always contain
//! that region.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Version tag of the built-in image table, bumped whenever an entry changes
pub const IMAGE_TABLE_VERSION: &str = "2023.1";

/// Region whose image every unmapped region falls back to
pub const FALLBACK_REGION: &str = "us-east-1";

const BUILTIN_IMAGES: &[(&str, &str)] = &[
    ("us-east-1", "ami-0c55b159cbfafe1f0"),
    ("us-east-2", "ami-0568773882d492fc8"),
    ("us-west-1", "ami-0d382e80be7ffdae5"),
    ("us-west-2", "ami-0735c191cf914754d"),
    ("eu-west-1", "ami-0a8e758f5e873d1c1"),
];

static BUILTIN: Lazy<MachineImageTable> = Lazy::new(|| MachineImageTable {
    version: IMAGE_TABLE_VERSION.to_string(),
    images: BUILTIN_IMAGES
        .iter()
        .map(|(region, image)| (region.to_string(), image.to_string()))
        .collect(),
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineImageTable {
    version: String,
    images: HashMap<String, String>,
}

impl MachineImageTable {
    /// The table shipped with this build
    pub fn builtin() -> &'static MachineImageTable {
        &BUILTIN
    }

    /// Build a custom table; it must map the fallback region
    pub fn from_entries<I, K, V>(version: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let images: HashMap<String, String> = entries
            .into_iter()
            .map(|(region, image)| (region.into(), image.into()))
            .collect();

        if !images.contains_key(FALLBACK_REGION) {
            bail!(
                "machine image table must contain an entry for {}",
                FALLBACK_REGION
            );
        }

        Ok(Self {
            version: version.into(),
            images,
        })
    }

    /// Exact lookup without fallback
    pub fn get(&self, region: &str) -> Option<&str> {
        self.images.get(region).map(String::as_str)
    }

    /// Image for `region`, or the fallback region's image when unmapped
    pub fn resolve(&self, region: &str) -> &str {
        self.get(region)
            .or_else(|| self.get(FALLBACK_REGION))
            .unwrap_or_default()
    }

    /// Override or add entries, keeping everything else
    pub fn with_overrides<I, K, V>(&self, version: impl Into<String>, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut images = self.images.clone();
        images.extend(
            overrides
                .into_iter()
                .map(|(region, image)| (region.into(), image.into())),
        );
        Self {
            version: version.into(),
            images,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for MachineImageTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
