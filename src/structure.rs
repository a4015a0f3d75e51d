use crate::block_entity::BlockEntityRecord;
use crate::entity::FreeEntityRecord;
use crate::metadata::SpawnMetadata;
use crate::region::RegionDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A captured volume: regions, block entities and free entities in local
/// coordinates, plus optional spawn rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    pub size: (i32, i32, i32),
    #[serde(default)]
    pub regions: Vec<RegionDescriptor>,
    #[serde(default)]
    pub block_entities: Vec<BlockEntityRecord>,
    #[serde(default)]
    pub entities: Vec<FreeEntityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SpawnMetadata>,
}

impl Structure {
    pub fn new(id: impl Into<String>, size: (i32, i32, i32)) -> Self {
        Structure {
            id: id.into(),
            author: String::new(),
            created: Utc::now(),
            size,
            regions: Vec::new(),
            block_entities: Vec::new(),
            entities: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Voxels written on placement, summed over every region.
    pub fn total_blocks(&self) -> u64 {
        self.regions.iter().map(RegionDescriptor::block_count).sum()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Horizontal extent `(x, z)`.
    pub fn footprint(&self) -> (i32, i32) {
        (self.size.0, self.size.2)
    }

    pub fn metadata_or_default(&self) -> SpawnMetadata {
        self.metadata.clone().unwrap_or_default()
    }

    pub fn metadata_mut(&mut self) -> &mut SpawnMetadata {
        self.metadata.get_or_insert_with(SpawnMetadata::default)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) {}x{}x{}, {} regions, {} blocks, {} block entities, {} entities",
            self.id,
            if self.author.is_empty() { "unknown" } else { &self.author },
            self.created.format("%Y-%m-%d %H:%M"),
            self.size.0,
            self.size.1,
            self.size.2,
            self.region_count(),
            self.total_blocks(),
            self.block_entities.len(),
            self.entities.len()
        )
    }
}
