/*!
Histogram-coloured Mandelbrot images, rendered once on the CPU.

[`FractalRenderer::generate`] computes escape counts over a "virtual" field
larger than the requested image, builds a cumulative histogram of those counts,
and colours the visible crop from it. The result is an [`Image`] ready to be
uploaded as an `Rgba8Unorm` texture.

```no_run
let image = mandelbrot_texture::generate(800, 480)?;
assert_eq!(image.as_bytes().len(), 800 * 480 * 4);
# Ok::<(), mandelbrot_texture::Error>(())
```
*/

pub mod colour;
pub mod config;
pub mod error;
pub mod field;
pub mod image;
pub mod pixel;
pub mod renderer;
pub mod screen;

pub use config::{Colouring, RenderConfig, Viewport};
pub use error::Error;
pub use image::Image;
pub use renderer::{generate, FractalRenderer};
