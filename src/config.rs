//! Render configuration.
//!
//! The defaults select the detail area and iteration cap of the reference
//! image; changing them produces a different picture.

use crate::error::Error;

/// Iteration cap of the reference image.
pub const DEFAULT_MAX_ITERATIONS: u16 = 32;

/// Fractional sub-rectangle of the virtual field that ends up in the image.
///
/// Bounds are normalised to `[0, 1]`. They stay `f32`: derived field
/// dimensions are truncated from `f32` quotients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

impl Viewport {
    pub const REFERENCE: Self = Viewport {
        x0: 0.36,
        x1: 0.60,
        y0: 0.36,
        y1: 0.80,
    };

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn validate(&self) -> Result<(), Error> {
        // Negated comparisons so NaN bounds are rejected too.
        if !(0.0 <= self.x0 && self.x0 < self.x1 && self.x1 <= 1.0) {
            return Err(Error::Config(format!(
                "horizontal bounds must satisfy 0 <= x0 < x1 <= 1, got x0={} x1={}",
                self.x0, self.x1
            )));
        }
        if !(0.0 <= self.y0 && self.y0 < self.y1 && self.y1 <= 1.0) {
            return Err(Error::Config(format!(
                "vertical bounds must satisfy 0 <= y0 < y1 <= 1, got y0={} y1={}",
                self.y0, self.y1
            )));
        }
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// How a cumulative histogram entry becomes a texel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colouring {
    /// Bit pattern of the reference image: the word
    /// `max_iterations * cumulative | 0xFF` (wrapping `u32` arithmetic) laid
    /// out big-endian, so its high byte is red and its low byte is alpha.
    Reference,
    /// Normalised ramp: every colour channel is `cumulative * 255 / total`.
    Greyscale,
}

impl Default for Colouring {
    fn default() -> Self {
        Colouring::Reference
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub max_iterations: u16,
    pub viewport: Viewport,
    pub colouring: Colouring,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            viewport: Viewport::REFERENCE,
            colouring: Colouring::Reference,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u16) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_colouring(mut self, colouring: Colouring) -> Self {
        self.colouring = colouring;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be at least 1".into()));
        }
        self.viewport.validate()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_image() {
        let config = RenderConfig::default();
        assert_eq!(config.max_iterations, 32);
        assert_eq!(config.viewport, Viewport::REFERENCE);
        assert_eq!(config.colouring, Colouring::Reference);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = RenderConfig::new().with_max_iterations(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_inverted_and_out_of_range_viewports() {
        let inverted = Viewport {
            x0: 0.6,
            x1: 0.36,
            ..Viewport::REFERENCE
        };
        assert!(matches!(inverted.validate(), Err(Error::Config(_))));

        let outside = Viewport {
            y1: 1.5,
            ..Viewport::REFERENCE
        };
        assert!(matches!(outside.validate(), Err(Error::Config(_))));

        let empty = Viewport {
            y0: 0.5,
            y1: 0.5,
            ..Viewport::REFERENCE
        };
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let nan = Viewport {
            x0: f32::NAN,
            ..Viewport::REFERENCE
        };
        assert!(matches!(nan.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn whole_field_is_a_valid_viewport() {
        let whole = Viewport {
            x0: 0.0,
            x1: 1.0,
            y0: 0.0,
            y1: 1.0,
        };
        assert!(whole.validate().is_ok());
        assert_eq!(whole.width(), 1.0);
    }
}
