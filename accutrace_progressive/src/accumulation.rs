use accutrace_gpu::{AllocatedImage, GpuContext};

pub const ACCUMULATION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Which accumulation target a tick samples and which it renders into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferIndices {
    pub read: usize,
    pub write: usize,
}

impl BufferIndices {
    pub fn for_frame(frame: u32) -> Self {
        Self {
            read: (frame % 2) as usize,
            write: (frame.wrapping_add(1) % 2) as usize,
        }
    }
}

/// Two equally sized floating-point colour targets. Each tick reads the
/// running average from one and writes the updated average into the other.
#[derive(Debug)]
pub struct AccumulationTargets {
    images: [AllocatedImage; 2],
}

impl AccumulationTargets {
    pub fn new(ctx: &GpuContext, size: [u32; 2]) -> Self {
        Self {
            images: [
                AllocatedImage::color_attachment(ctx, "Accumulation 0", ACCUMULATION_FORMAT, size),
                AllocatedImage::color_attachment(ctx, "Accumulation 1", ACCUMULATION_FORMAT, size),
            ],
        }
    }

    pub fn image(&self, index: usize) -> &AllocatedImage {
        &self.images[index]
    }

    pub fn read(&self, indices: BufferIndices) -> &AllocatedImage {
        &self.images[indices.read]
    }

    pub fn write(&self, indices: BufferIndices) -> &AllocatedImage {
        &self.images[indices.write]
    }

    pub fn size(&self) -> [u32; 2] {
        self.images[0].size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_alternate_and_never_alias() {
        for frame in [0, 1, 2, 3, 100, 101, u32::MAX - 1, u32::MAX] {
            let indices = BufferIndices::for_frame(frame);
            assert_eq!(indices.write, 1 - indices.read);
            assert_eq!(indices.read, (frame % 2) as usize);
        }
        assert_eq!(BufferIndices::for_frame(0), BufferIndices { read: 0, write: 1 });
        assert_eq!(BufferIndices::for_frame(1), BufferIndices { read: 1, write: 0 });
    }
}
