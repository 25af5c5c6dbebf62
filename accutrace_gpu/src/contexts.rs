use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue:  Arc<wgpu::Queue>,
}

#[derive(Copy, Clone, Debug)]
pub struct PipelineContext {
    pub surface_format: wgpu::TextureFormat,
}

pub struct RenderContext<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub target:  &'a wgpu::TextureView,
}

impl GpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device: Arc::new(device),
            queue:  Arc::new(queue),
        }
    }
}
