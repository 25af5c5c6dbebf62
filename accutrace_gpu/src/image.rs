use crate::{command, GpuContext, GpuError};
use std::sync::mpsc;

#[derive(Debug)]
pub struct AllocatedImage {
    pub texture: wgpu::Texture,
    pub view:    wgpu::TextureView,
    pub extent:  wgpu::Extent3d,
    pub format:  wgpu::TextureFormat,
}

impl AllocatedImage {
    pub fn new(
        ctx: &GpuContext,
        label: &str,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        usage: wgpu::TextureUsages,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            extent,
            format,
        }
    }

    /// A render target that later passes can also read and that can be copied out.
    pub fn color_attachment(
        ctx: &GpuContext,
        label: &str,
        format: wgpu::TextureFormat,
        size: [u32; 2],
    ) -> Self {
        Self::new(
            ctx,
            label,
            format,
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        )
    }

    pub fn size(&self) -> [u32; 2] {
        [self.extent.width, self.extent.height]
    }

    /// Copies the whole image back to the host. Rows are tightly packed and
    /// keep the texture's row order (row 0 is the top of the render target).
    pub fn copy_to_host(&self, ctx: &GpuContext) -> Result<Vec<u8>, GpuError> {
        let texel_size = self
            .format
            .block_copy_size(None)
            .ok_or(GpuError::UncopyableFormat(self.format))?;
        let row_size = self.extent.width * texel_size;
        let padded_row_size = padded_bytes_per_row(row_size);
        let height = self.extent.height;

        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Image read-back"),
            size: padded_row_size as wgpu::BufferAddress * height as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        command::immediate_submit(ctx, "Image read-back", |encoder| {
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &staging,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_row_size),
                        rows_per_image: Some(height),
                    },
                },
                self.extent,
            );
        })?;

        let (sender, receiver) = mpsc::channel();
        staging.map_async(wgpu::MapMode::Read, .., move |result| {
            let _ = sender.send(result);
        });
        ctx.device.poll(wgpu::PollType::wait_indefinitely())?;
        receiver.recv().map_err(|_| GpuError::MapCallbackDropped)??;

        let pixels = {
            let mapped = staging.get_mapped_range(..);
            unpad_rows(&mapped, row_size as usize, padded_row_size as usize)
        };
        staging.unmap();
        Ok(pixels)
    }
}

pub fn padded_bytes_per_row(row_size: u32) -> u32 {
    row_size.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

fn unpad_rows(padded: &[u8], row_size: usize, padded_row_size: usize) -> Vec<u8> {
    padded
        .chunks(padded_row_size)
        .flat_map(|row| &row[..row_size])
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(16), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(257), 512);
        assert_eq!(padded_bytes_per_row(1280 * 16), 1280 * 16);
    }

    #[test]
    fn padding_is_stripped() {
        let padded = [1, 2, 0, 0, 3, 4, 0, 0];
        assert_eq!(unpad_rows(&padded, 2, 4), vec![1, 2, 3, 4]);
    }
}
