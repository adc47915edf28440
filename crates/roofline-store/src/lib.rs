//! Roofline Store - Persistence ports and adapters
//!
//! This crate defines the storage ports the acquisition pipeline and the
//! editor write through (sites, archived imagery, structure sets, drawings)
//! and provides in-memory adapter implementations.

pub mod memory;
pub mod ports;

pub use memory::{MemoryDrawingStore, MemoryImageArchive, MemorySiteStore, MemoryStructureStore};
pub use ports::{DrawingStore, ImageArchive, SiteStore, StructureStore};
