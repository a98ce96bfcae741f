pub mod pipeline;

pub use pipeline::{HeatmapPipeline, PipelineConfig, PipelineError, PipelineReport};
