//! Drop-shadow alpha plane.
//!
//! The shadow is the image silhouette blurred by three box passes per axis,
//! which approximates a Gaussian of the requested sigma in linear time
//! regardless of radius. Rows are blurred in parallel with rayon; columns
//! are handled by transposing and blurring rows again.

use super::calculations::box_sizes_for_gauss;
use rayon::prelude::*;

/// A single-channel `f32` plane, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl AlphaPlane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    fn transposed(&self) -> AlphaPlane {
        let mut out = AlphaPlane::new(self.height, self.width);
        out.data
            .par_chunks_mut(self.height)
            .enumerate()
            .for_each(|(x, column)| {
                for (y, value) in column.iter_mut().enumerate() {
                    *value = self.data[y * self.width + x];
                }
            });
        out
    }

    fn blur_rows(&mut self, radius: usize) {
        if radius == 0 || self.width == 0 {
            return;
        }
        let width = self.width;
        self.data.par_chunks_mut(width).for_each(|row| {
            let blurred = box_blur_line(row, radius);
            row.copy_from_slice(&blurred);
        });
    }

    /// Gaussian-approximating blur; values outside the plane count as zero.
    pub fn blur(&self, sigma: f64) -> AlphaPlane {
        let radii: Vec<usize> = box_sizes_for_gauss(sigma, 3)
            .into_iter()
            .map(|w| (w - 1) / 2)
            .collect();
        if radii.iter().all(|&r| r == 0) {
            return self.clone();
        }

        let mut plane = self.clone();
        for &r in &radii {
            plane.blur_rows(r);
        }
        let mut plane = plane.transposed();
        for &r in &radii {
            plane.blur_rows(r);
        }
        plane.transposed()
    }
}

/// Running-sum box blur of one line with a zero border.
fn box_blur_line(line: &[f32], radius: usize) -> Vec<f32> {
    let len = line.len();
    let window = (2 * radius + 1) as f32;
    let mut out = vec![0.0; len];
    let mut sum: f32 = line.iter().take(radius.min(len)).sum();

    for (i, value) in out.iter_mut().enumerate() {
        let incoming = i + radius;
        if incoming < len {
            sum += line[incoming];
        }
        *value = sum / window;
        if i >= radius {
            sum -= line[i - radius];
        }
    }
    out
}
