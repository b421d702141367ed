use bytemuck::{Pod, Zeroable};

use crate::error::Error;

/// Pixel dimensions of the image handed to the presentation layer.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Validates caller-supplied dimensions. Both must be positive and fit in a `u32`.
    pub fn new(width: i64, height: i64) -> Result<Self, Error> {
        Ok(Self {
            width: dimension("width", width)?,
            height: dimension("height", height)?,
        })
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn dimension(name: &str, value: i64) -> Result<u32, Error> {
    if value <= 0 {
        return Err(Error::InvalidArgument(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    u32::try_from(value).map_err(|_| {
        Error::InvalidArgument(format!("{} {} does not fit in 32 bits", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_dimensions() {
        let size = Size::new(800, 480).unwrap();
        assert_eq!(
            size,
            Size {
                width: 800,
                height: 480
            }
        );
        assert_eq!(size.area(), 384_000);
    }

    #[test]
    fn rejects_zero_negative_and_oversized() {
        assert!(matches!(Size::new(0, 480), Err(Error::InvalidArgument(_))));
        assert!(matches!(Size::new(800, -5), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            Size::new(i64::from(u32::MAX) + 1, 1),
            Err(Error::InvalidArgument(_))
        ));
    }
}
