//! Escape-time computation over the virtual field.
//!
//! The visible image is a crop of a larger "virtual" field. Escape counts are
//! computed for the whole field so the colour histogram reflects all of it,
//! not just the crop.

use log::{debug, trace};
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{config::Viewport, error::Error, screen::Size};

/// Escape iteration stops once `|z|^2` exceeds this.
const ESCAPE_RADIUS_SQUARED: f32 = 4.0;

/// Horizontal extent of the field in the complex plane.
const PLANE_SPAN: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub real: f32,
    pub imaginary: f32,
}

impl Complex {
    pub const ZERO: Self = Complex {
        real: 0.0,
        imaginary: 0.0,
    };

    pub fn norm_squared(self) -> f32 {
        self.real * self.real + self.imaginary * self.imaginary
    }

    /// `self^2 + c`, all in `f32`.
    fn square_add(self, c: Complex) -> Complex {
        Complex {
            real: self.real * self.real - self.imaginary * self.imaginary + c.real,
            imaginary: 2.0 * self.real * self.imaginary + c.imaginary,
        }
    }
}

/// Number of iterations of `z = z^2 + c` starting from zero before `z` escapes,
/// capped at `max_iterations`.
///
/// The first iteration always runs because `|0|^2 <= 4`, so the result is at
/// least 1 whenever `max_iterations` is.
pub fn escape_count(c: Complex, max_iterations: u16) -> u16 {
    let mut z = Complex::ZERO;
    let mut count = 0;
    while z.norm_squared() <= ESCAPE_RADIUS_SQUARED && count < max_iterations {
        z = z.square_add(c);
        count += 1;
    }
    count
}

/// Dimensions of the virtual field and where the visible crop sits inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldGeometry {
    pub width: usize,
    pub height: usize,
    pub offset_x: usize,
    pub offset_y: usize,
}

impl FieldGeometry {
    pub fn new(size: Size, viewport: &Viewport) -> Result<Self, Error> {
        let width = full_extent("width", size.width, viewport.width())?;
        let height = full_extent("height", size.height, viewport.height())?;
        let offset_x = (size.width as f32 * viewport.x0) as usize;
        let offset_y = (size.height as f32 * viewport.y0) as usize;

        if offset_x + size.width as usize > width || offset_y + size.height as usize > height {
            return Err(Error::Config(format!(
                "crop {}x{} at ({}, {}) does not fit in a {}x{} field",
                size.width, size.height, offset_x, offset_y, width, height
            )));
        }

        Ok(Self {
            width,
            height,
            offset_x,
            offset_y,
        })
    }

    /// Number of cells in the field.
    ///
    /// Histogram entries are `u32`, so fields with more cells than that are
    /// refused up front.
    pub fn cells(&self) -> Result<usize, Error> {
        let cells = self.width.checked_mul(self.height).ok_or_else(|| {
            Error::ResourceExhausted(format!(
                "{}x{} field overflows the address space",
                self.width, self.height
            ))
        })?;
        if u32::try_from(cells).is_err() {
            return Err(Error::ResourceExhausted(format!(
                "{}x{} field has more than {} cells",
                self.width,
                self.height,
                u32::MAX
            )));
        }
        Ok(cells)
    }

    /// Maps field cell `(x, y)` into the complex plane.
    ///
    /// The field spans `[-2, 2)` horizontally. The vertical step deliberately
    /// reuses the horizontal one.
    pub fn complex_at(&self, x: usize, y: usize) -> Complex {
        let width = self.width as f64;
        let height = self.height as f64;
        let step = PLANE_SPAN / width;
        Complex {
            real: ((x as f64 - width / 2.0) * step) as f32,
            imaginary: ((y as f64 - height / 2.0) * step) as f32,
        }
    }
}

fn full_extent(name: &str, visible: u32, span: f32) -> Result<usize, Error> {
    let extent = visible as f32 / span;
    if !extent.is_finite() || extent < 1.0 {
        return Err(Error::Config(format!(
            "viewport {} {} yields an empty field {}",
            name, span, extent
        )));
    }
    Ok(extent as usize)
}

/// Row-major escape counts for every cell of the virtual field.
pub struct EscapeField {
    width: usize,
    counts: Vec<u16>,
}

impl EscapeField {
    pub fn compute(geometry: &FieldGeometry, max_iterations: u16) -> Result<Self, Error> {
        if geometry.width == 0 || geometry.height == 0 {
            return Err(Error::Config(format!(
                "{}x{} field has no cells",
                geometry.width, geometry.height
            )));
        }
        let cells = geometry.cells()?;

        let mut counts = Vec::new();
        counts.try_reserve_exact(cells)?;
        counts.resize(cells, 0u16);

        let min_rows = (geometry.height / (num_cpus::get() * 4)).max(1);
        debug!(
            "computing {}x{} escape field, at least {} rows per task",
            geometry.width, geometry.height, min_rows
        );

        trace!("begin escape pass");
        counts
            .par_chunks_mut(geometry.width)
            .enumerate()
            .with_min_len(min_rows)
            .for_each(|(y, row)| {
                for (x, count) in row.iter_mut().enumerate() {
                    *count = escape_count(geometry.complex_at(x, y), max_iterations);
                }
            });
        trace!("end escape pass");

        Ok(Self {
            width: geometry.width,
            counts,
        })
    }

    pub fn counts(&self) -> &[u16] {
        &self.counts
    }

    pub fn row(&self, y: usize) -> &[u16] {
        &self.counts[y * self.width..(y + 1) * self.width]
    }

    pub fn count(&self, x: usize, y: usize) -> u16 {
        self.counts[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_geometry(width: i64, height: i64) -> FieldGeometry {
        FieldGeometry::new(Size::new(width, height).unwrap(), &Viewport::REFERENCE).unwrap()
    }

    #[test]
    fn reference_surface_geometry() {
        assert_eq!(
            reference_geometry(800, 480),
            FieldGeometry {
                width: 3333,
                height: 1090,
                offset_x: 288,
                offset_y: 172,
            }
        );
    }

    #[test]
    fn single_pixel_geometry_contains_its_crop() {
        let geometry = reference_geometry(1, 1);
        assert!(geometry.width >= 1 && geometry.height >= 1);
        assert!(geometry.offset_x < geometry.width);
        assert!(geometry.offset_y < geometry.height);
    }

    #[test]
    fn oversized_field_is_refused() {
        let geometry = FieldGeometry {
            width: 1 << 20,
            height: 1 << 13,
            offset_x: 0,
            offset_y: 0,
        };
        assert!(matches!(geometry.cells(), Err(Error::ResourceExhausted(_))));

        let overflowing = FieldGeometry {
            width: usize::MAX,
            height: 2,
            offset_x: 0,
            offset_y: 0,
        };
        assert!(matches!(
            overflowing.cells(),
            Err(Error::ResourceExhausted(_))
        ));
    }

    #[test]
    fn empty_field_is_a_configuration_error() {
        for (width, height) in [(0, 3), (3, 0)] {
            let geometry = FieldGeometry {
                width,
                height,
                offset_x: 0,
                offset_y: 0,
            };
            assert!(matches!(
                EscapeField::compute(&geometry, 32),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn plane_mapping_reuses_horizontal_step() {
        let geometry = FieldGeometry {
            width: 100,
            height: 50,
            offset_x: 0,
            offset_y: 0,
        };
        assert_eq!(
            geometry.complex_at(0, 0),
            Complex {
                real: -2.0,
                imaginary: -1.0
            }
        );
        assert_eq!(
            geometry.complex_at(50, 25),
            Complex {
                real: 0.0,
                imaginary: 0.0
            }
        );
    }

    #[test]
    fn escape_counts() {
        // Far outside: escapes after the first step.
        let outside = Complex {
            real: 2.0,
            imaginary: 2.0,
        };
        assert_eq!(escape_count(outside, 32), 1);

        // Origin and the tip of the real axis never escape.
        assert_eq!(escape_count(Complex::ZERO, 32), 32);
        let tip = Complex {
            real: -2.0,
            imaginary: 0.0,
        };
        assert_eq!(escape_count(tip, 32), 32);

        // z: 0 -> 1 -> 2 -> 5, escaping on the third check.
        let one = Complex {
            real: 1.0,
            imaginary: 0.0,
        };
        assert_eq!(escape_count(one, 32), 3);
    }

    #[test_log::test]
    fn field_counts_stay_in_range() {
        let geometry = reference_geometry(40, 24);
        let field = EscapeField::compute(&geometry, 32).unwrap();
        assert_eq!(field.counts().len(), geometry.width * geometry.height);
        assert!(field.counts().iter().all(|&count| (1..=32).contains(&count)));
        assert_eq!(field.row(3).len(), geometry.width);
        assert_eq!(field.count(0, 0), field.counts()[0]);
    }
}
