use crate::GpuError;

/// Logs device errors that no error scope caught.
pub fn install_error_logger(device: &wgpu::Device) {
    device.on_uncaptured_error(std::sync::Arc::new(|error: wgpu::Error| {
        log::error!("Uncaptured device error: {error}");
    }));
}

/// Runs `create` inside a validation error scope and turns a validation
/// failure into an error instead of a deferred device error.
pub fn validated<T, F>(device: &wgpu::Device, what: &str, create: F) -> Result<T, GpuError>
where
    F: FnOnce() -> T,
{
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(GpuError::Validation {
            what: what.to_owned(),
            message: error.to_string(),
        }),
        None => Ok(created),
    }
}
