use crate::{GpuContext, GpuError};

/// Records commands into a fresh encoder, submits them and blocks until the
/// device is idle.
pub fn immediate_submit<F>(ctx: &GpuContext, label: &str, record_commands: F) -> Result<(), GpuError>
where
    F: FnOnce(&mut wgpu::CommandEncoder),
{
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
    record_commands(&mut encoder);
    ctx.queue.submit(Some(encoder.finish()));
    ctx.device.poll(wgpu::PollType::wait_indefinitely())?;
    Ok(())
}
