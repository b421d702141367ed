use log::{debug, trace};
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{
    colour::Histogram,
    config::RenderConfig,
    error::Error,
    field::{EscapeField, FieldGeometry},
    image::Image,
    pixel::Rgba,
    screen::Size,
};

/// Renders the histogram-coloured Mandelbrot crop described by a [`RenderConfig`].
#[derive(Clone, Debug)]
pub struct FractalRenderer {
    config: RenderConfig,
}

impl FractalRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders a `width` x `height` image.
    ///
    /// Escape counts are computed for the whole virtual field so the histogram
    /// covers it, then only the configured crop is coloured. The field is
    /// released before this returns, on success and on failure alike.
    pub fn generate(&self, width: i64, height: i64) -> Result<Image, Error> {
        let size = Size::new(width, height)?;
        let geometry = FieldGeometry::new(size, &self.config.viewport)?;
        // Refuse oversized fields before anything is allocated.
        geometry.cells()?;
        debug!(
            "rendering {}x{} crop at ({}, {}) of a {}x{} field",
            size.width,
            size.height,
            geometry.offset_x,
            geometry.offset_y,
            geometry.width,
            geometry.height
        );

        let mut texels = Vec::new();
        texels.try_reserve_exact(size.area())?;
        texels.resize(size.area(), Rgba::default());

        let max_iterations = self.config.max_iterations;
        let field = EscapeField::compute(&geometry, max_iterations)?;
        let histogram = Histogram::from_field(&field, max_iterations);
        debug!(
            "histogram over {} cells: {:?}",
            histogram.total(),
            histogram.as_slice()
        );

        trace!("begin colouring");
        let colouring = self.config.colouring;
        texels
            .par_chunks_mut(size.width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let counts = &field.row(y + geometry.offset_y)[geometry.offset_x..];
                for (texel, &count) in row.iter_mut().zip(counts) {
                    *texel = colouring.texel(&histogram, count);
                }
            });
        trace!("end colouring");

        Ok(Image::from_texels(size, texels))
    }
}

impl Default for FractalRenderer {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }
}

/// Renders a `width` x `height` image with the reference configuration.
pub fn generate(width: i64, height: i64) -> Result<Image, Error> {
    FractalRenderer::default().generate(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Colouring, Viewport};

    #[test]
    fn rejects_invalid_configuration_up_front() {
        let config = RenderConfig::new().with_viewport(Viewport {
            x0: 0.7,
            ..Viewport::REFERENCE
        });
        assert!(matches!(
            FractalRenderer::new(config),
            Err(Error::Config(_))
        ));
    }

    #[test_log::test]
    fn crop_reads_offset_field_cells() {
        let renderer = FractalRenderer::default();
        let image = renderer.generate(25, 15).unwrap();

        let size = Size::new(25, 15).unwrap();
        let geometry = FieldGeometry::new(size, &Viewport::REFERENCE).unwrap();
        let field = EscapeField::compute(&geometry, 32).unwrap();
        let histogram = Histogram::from_field(&field, 32);

        for (x, y) in [(0, 0), (24, 0), (0, 14), (24, 14), (12, 7)] {
            let count = field.count(
                x as usize + geometry.offset_x,
                y as usize + geometry.offset_y,
            );
            assert_eq!(
                image.texel(x, y),
                Colouring::Reference.texel(&histogram, count)
            );
        }
    }

    #[test]
    fn oversized_field_is_refused_before_allocating() {
        // 166666 x 36363 cells, more than a u32 histogram entry can count.
        assert!(matches!(
            generate(40_000, 16_000),
            Err(Error::ResourceExhausted(_))
        ));
    }

    #[test_log::test]
    fn greyscale_channels_are_identical() {
        let renderer =
            FractalRenderer::new(RenderConfig::new().with_colouring(Colouring::Greyscale))
                .unwrap();
        let image = renderer.generate(32, 20).unwrap();
        assert!(image
            .texels()
            .iter()
            .all(|texel| texel.r == texel.g && texel.g == texel.b && texel.a == 0xFF));
    }
}
