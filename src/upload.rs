/*!
Uploading the generated image into a sampled texture.

`copy_buffer_to_texture` requires every source row to start on a multiple of
[`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`] bytes. The generated image is unpadded
(an 800 texel row is 3200 bytes, not a multiple of 256), so its rows are
copied one by one into a padded staging buffer first.
*/

use std::num::NonZeroU32;

use log::debug;
use mandelbrot_texture::{screen, Error, Image};
use wgpu::util::DeviceExt;

use crate::command_buffer;

pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Smallest row pitch of at least `row_bytes` that the GPU accepts for copies.
pub fn padded_pitch(row_bytes: u32) -> u32 {
    let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (row_bytes + alignment - 1) / alignment * alignment
}

/// An image laid out with padded rows in a `COPY_SRC` buffer.
pub struct Staged {
    buffer: wgpu::Buffer,
    pitch: u32,
    size: screen::Size,
}

impl Staged {
    pub fn copy_to_texture(
        &self,
        command_encoder: &mut wgpu::CommandEncoder,
        texture: &wgpu::Texture,
    ) {
        command_encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &self.buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: NonZeroU32::new(self.pitch),
                    rows_per_image: None,
                },
            },
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            extent(self.size),
        )
    }
}

pub struct Builder<'a> {
    label: Option<&'a str>,
    image: &'a Image,
}

impl<'a> Builder<'a> {
    pub fn new(image: &'a Image) -> Self {
        Self { label: None, image }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn create(self, device: &wgpu::Device) -> Result<Staged, Error> {
        let size = self.image.size();
        let row_bytes = u32::try_from(self.image.row_bytes()).map_err(|_| {
            Error::InvalidArgument(format!("{} texel rows are too wide to upload", size.width))
        })?;
        let pitch = padded_pitch(row_bytes);
        debug!("staging {}x{} image at pitch {}", size.width, size.height, pitch);

        let mut contents = vec![0u8; pitch as usize * size.height as usize];
        self.image.copy_rows_into(&mut contents, pitch as usize)?;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: self.label,
            contents: &contents,
            usage: wgpu::BufferUsages::COPY_SRC,
        });

        Ok(Staged {
            buffer,
            pitch,
            size,
        })
    }
}

fn extent(size: screen::Size) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

/// Creates a sampled texture holding `image` and submits the copy that fills it.
pub fn texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &Image,
) -> Result<wgpu::Texture, Error> {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("fractal-texture"),
        size: extent(image.size()),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    });

    let staged = Builder::new(image)
        .with_label("fractal-staging-buffer")
        .create(device)?;

    queue.submit([command_buffer::record(device, "upload", |command_encoder| {
        staged.copy_to_texture(command_encoder, &texture)
    })]);

    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_rounds_up_to_copy_alignment() {
        assert_eq!(padded_pitch(800 * 4), 3328);
        assert_eq!(padded_pitch(256), 256);
        assert_eq!(padded_pitch(4), 256);
    }
}
