//! Persistence Adapter
//!
//! Heatmap artifacts on the local filesystem.

mod writer;

pub use writer::{
    load_meta, HeatmapWriter, OutputPaths, PersistError,
    DEFAULT_HEATMAP_FILE, DEFAULT_META_FILE, DEFAULT_OUTPUT_DIR,
};
