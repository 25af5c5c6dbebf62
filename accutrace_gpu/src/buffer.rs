use crate::{GpuContext, GpuError};
use wgpu::util::DeviceExt;

/// A GPU buffer holding a fixed number of `T` records.
#[derive(Debug)]
pub struct AllocatedBuffer<T: bytemuck::Pod> {
    pub buffer: wgpu::Buffer,
    pub len:    usize,
    label:      String,
    _phantom:   std::marker::PhantomData<T>,
}

impl<T: bytemuck::Pod> AllocatedBuffer<T> {
    /// Creates a buffer already filled with `data`. The contents are
    /// uploaded before this returns to the caller's next submission.
    pub fn with_data(ctx: &GpuContext, label: &str, usage: wgpu::BufferUsages, data: &[T]) -> Self {
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: usage | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            len: data.len(),
            label: label.to_owned(),
            _phantom: Default::default(),
        }
    }

    pub fn set_data(&self, ctx: &GpuContext, data: &[T]) -> Result<(), GpuError> {
        if data.len() > self.len {
            return Err(GpuError::BufferOverflow {
                label: self.label.clone(),
                requested: data.len(),
                capacity: self.len,
            });
        }
        ctx.queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        Ok(())
    }
}
