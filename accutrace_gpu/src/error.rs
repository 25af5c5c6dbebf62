use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("{what} failed validation: {message}")]
    Validation { what: String, message: String },
    #[error("cannot write {requested} records into buffer '{label}' sized for {capacity}")]
    BufferOverflow {
        label: String,
        requested: usize,
        capacity: usize,
    },
    #[error("texture format {0:?} cannot be copied to a buffer")]
    UncopyableFormat(wgpu::TextureFormat),
    #[error("cannot wait for the device: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("cannot map read-back buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("read-back callback was dropped before it ran")]
    MapCallbackDropped,
}
