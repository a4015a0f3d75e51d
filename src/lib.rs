//! Capture rectangular volumes of a voxel world into compact, rotatable
//! structures, store them as JSON, and place them back, either on demand or
//! naturally as chunks load.

pub mod api;
pub mod block_entity;
pub mod block_state;
pub mod bounding_box;
pub mod capture;
pub mod config;
pub mod entity;
pub mod error;
pub mod formats;
pub mod materials;
pub mod metadata;
pub mod placement;
pub mod properties;
pub mod region;
pub mod shapes;
pub mod spawner;
pub mod structure;
pub mod terrain;
pub mod transform;
pub mod world;

pub use api::StructureLib;
pub use block_state::BlockState;
pub use bounding_box::BoundingBox;
pub use capture::{CaptureReport, StructureCapture};
pub use config::{CaptureConfig, EngineConfig, PlacementConfig, TerrainConfig};
pub use error::{Result, StructureError};
pub use formats::StructureStore;
pub use metadata::{IntRange, SpawnConditions, SpawnMetadata};
pub use placement::{PlacementReport, RotationChoice, StructurePlacer};
pub use region::{BlockData, RegionDescriptor, SpanRegion};
pub use spawner::NaturalSpawner;
pub use structure::Structure;
pub use transform::{Axis, Direction, Rotation};
pub use world::{MemoryWorld, World};
