/// Records the commands issued by `function` into a finished command buffer.
pub fn record(
    device: &wgpu::Device,
    label: &str,
    function: impl FnOnce(&mut wgpu::CommandEncoder),
) -> wgpu::CommandBuffer {
    let mut command_encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
    function(&mut command_encoder);
    command_encoder.finish()
}
