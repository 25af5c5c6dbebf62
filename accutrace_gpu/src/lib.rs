pub mod buffer;
pub mod command;
pub mod contexts;
pub mod debug;
pub mod error;
pub mod image;
pub mod lanes;
pub mod pipeline;
pub mod shader;

pub use buffer::AllocatedBuffer;
pub use contexts::{GpuContext, PipelineContext, RenderContext};
pub use error::GpuError;
pub use image::AllocatedImage;
