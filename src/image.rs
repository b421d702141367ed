//! The generated image and the ways a presentation layer can read it.

use crate::{error::Error, pixel::Rgba, screen::Size};

/// Row-major, unpadded RGBA image owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    size: Size,
    texels: Vec<Rgba>,
}

impl Image {
    pub(crate) fn from_texels(size: Size, texels: Vec<Rgba>) -> Self {
        debug_assert_eq!(texels.len(), size.area());
        Self { size, texels }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn texels(&self) -> &[Rgba] {
        &self.texels
    }

    pub fn texel(&self, x: u32, y: u32) -> Rgba {
        self.texels[y as usize * self.size.width as usize + x as usize]
    }

    /// `width * height * 4` bytes, one RGBA quadruple per texel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn row_bytes(&self) -> usize {
        self.size.width as usize * std::mem::size_of::<Rgba>()
    }

    /// Copies the image into `destination`, whose rows start `pitch` bytes apart.
    ///
    /// Bytes between the end of one row and the start of the next are left
    /// untouched.
    pub fn copy_rows_into(&self, destination: &mut [u8], pitch: usize) -> Result<(), Error> {
        let row_bytes = self.row_bytes();
        if pitch < row_bytes {
            return Err(Error::InvalidArgument(format!(
                "pitch {} is shorter than a {} byte row",
                pitch, row_bytes
            )));
        }
        let height = self.size.height as usize;
        let required = (height - 1).saturating_mul(pitch).saturating_add(row_bytes);
        if destination.len() < required {
            return Err(Error::InvalidArgument(format!(
                "destination holds {} bytes, {} rows at pitch {} need {}",
                destination.len(),
                height,
                pitch,
                required
            )));
        }

        for (source, target) in self
            .as_bytes()
            .chunks_exact(row_bytes)
            .zip(destination.chunks_mut(pitch))
        {
            target[..row_bytes].copy_from_slice(source);
        }
        Ok(())
    }
}
