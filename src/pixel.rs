use bytemuck::{Pod, Zeroable};

/// One texel of an `Rgba8Unorm` image.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const OPAQUE: u8 = 0xFF;

    /// Splits a packed `0xRRGGBBAA` word.
    pub fn from_word(word: u32) -> Self {
        let [r, g, b, a] = word.to_be_bytes();
        Self { r, g, b, a }
    }

    pub fn grey(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
            a: Self::OPAQUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_high_byte_is_red() {
        assert_eq!(
            Rgba::from_word(0x1234_56FF),
            Rgba {
                r: 0x12,
                g: 0x34,
                b: 0x56,
                a: 0xFF
            }
        );
    }

    #[test]
    fn texel_is_four_bytes_in_channel_order() {
        let texels = [Rgba::from_word(0x0102_0304)];
        assert_eq!(bytemuck::cast_slice::<Rgba, u8>(&texels), &[1, 2, 3, 4]);
    }
}
