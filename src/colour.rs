//! Colouring algorithms.

use log::trace;
use rayon::prelude::{ParallelIterator, ParallelSlice};

use crate::{config::Colouring, field::EscapeField, pixel::Rgba};

/// Cells handed to one fold task while counting.
const COUNTING_CHUNK: usize = 1 << 14;

/// Cumulative histogram of escape counts ([Wikipedia](https://en.wikipedia.org/wiki/Plotting_algorithms_for_the_Mandelbrot_set#Histogram_coloring)).
///
/// Entry `k` holds the number of cells whose escape count is at most `k + 1`,
/// so the last entry is the number of cells counted.
pub struct Histogram {
    cumulative: Vec<u32>,
}

impl Histogram {
    /// # Panics
    ///
    /// Panics if `max_iterations` is below the largest count in `field`.
    pub fn from_field(field: &EscapeField, max_iterations: u16) -> Self {
        Self::from_counts(field.counts(), max_iterations)
    }

    /// Builds the histogram of `counts`, each of which must lie in `1..=max_iterations`.
    ///
    /// # Panics
    ///
    /// Panics if a count is 0 or greater than `max_iterations`.
    pub fn from_counts(counts: &[u16], max_iterations: u16) -> Self {
        let buckets = max_iterations as usize;

        trace!("begin histogram");

        // Per-task partial histograms, merged afterwards.
        let mut cumulative = counts
            .par_chunks(COUNTING_CHUNK)
            .fold(
                || vec![0u32; buckets],
                |mut partial, chunk| {
                    for &count in chunk {
                        debug_assert!(
                            (1..=max_iterations).contains(&count),
                            "escape count {} outside 1..={}",
                            count,
                            max_iterations
                        );
                        partial[count as usize - 1] += 1;
                    }
                    partial
                },
            )
            .reduce(
                || vec![0u32; buckets],
                |mut merged, partial| {
                    for (total, value) in merged.iter_mut().zip(partial) {
                        *total += value;
                    }
                    merged
                },
            );

        let mut acc = 0;
        for entry in &mut cumulative {
            acc += *entry;
            *entry = acc;
        }

        debug_assert_eq!(acc as usize, counts.len());

        trace!("end histogram");

        Self { cumulative }
    }

    pub fn max_iterations(&self) -> u16 {
        self.cumulative.len() as u16
    }

    /// Number of cells with an escape count of at most `count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0 or greater than [`max_iterations`](Self::max_iterations).
    pub fn cumulative(&self, count: u16) -> u32 {
        self.cumulative[count as usize - 1]
    }

    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cumulative
    }
}

impl Colouring {
    /// Texel for a cell whose escape count is `count`.
    ///
    /// Panics under the same conditions as [`Histogram::cumulative`].
    pub fn texel(self, histogram: &Histogram, count: u16) -> Rgba {
        let cumulative = histogram.cumulative(count);
        match self {
            Colouring::Reference => {
                let value = u32::from(histogram.max_iterations()).wrapping_mul(cumulative);
                Rgba::from_word(value | u32::from(Rgba::OPAQUE))
            }
            Colouring::Greyscale => {
                let level = u64::from(cumulative) * 255 / u64::from(histogram.total().max(1));
                Rgba::grey(level as u8)
            }
        }
    }
}
