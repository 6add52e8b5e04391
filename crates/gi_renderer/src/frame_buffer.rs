//! Radiance buffer and tone reproduction.
//!
//! Tracing writes unbounded linear radiance. Tone mapping compresses it into
//! an RGBA8 buffer, using the log-average luminance of the frame as the
//! adaptation level:
//!
//! | Operator              | Mapping                                                    |
//! |-----------------------|------------------------------------------------------------|
//! | `None`                | `c * 255`                                                  |
//! | `Ward`                | `c / Ld_max * sf * 255`, sf from Ward's contrast formula    |
//! | `Reinhard`            | `s / (1 + s) * 255` with `s = 0.18 / L_avg * c`             |
//! | `AdaptiveLogarithmic` | `c * L_d / Ld_max * 255`, L_d from Drago's bias curve       |
//!
//! Every output channel is clamped to [0, 255] (NaN becomes 0) before it is
//! narrowed to a byte.

use gi_core::ToneOperator;
use gi_math::luminance;
use rayon::prelude::*;

use crate::error::{allocate, pixel_count, RenderResult};
use crate::material::Color;

/// Offset keeping `ln` finite for black pixels.
const LOG_DELTA: f32 = 1e-6;

/// Ward: maximum display luminance.
const WARD_MAX_ILLUMINANCE: f32 = 10.0;

/// Reinhard: key value mapping the log-average to middle grey.
const REINHARD_KEY: f32 = 0.18;

/// Adaptive logarithmic: bias parameter and maximum display luminance.
const DRAGO_BIAS: f32 = 0.85;
const DRAGO_MAX_ILLUMINANCE: f32 = 1.0;

/// One display pixel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Clamp a display-range color into a pixel.
    pub fn from_display(color: Color) -> Self {
        Self::rgb(to_byte(color.x), to_byte(color.y), to_byte(color.z))
    }
}

/// Clamp to [0, 255] and narrow. NaN maps to 0.
#[inline]
fn to_byte(value: f32) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Per-frame buffers, allocated once per session.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    radiance: Vec<Color>,
    luminance: Vec<f32>,
    pixels: Vec<Pixel>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> RenderResult<Self> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            radiance: allocate("radiance buffer", count, Color::ZERO)?,
            luminance: allocate("luminance buffer", count, 0.0)?,
            pixels: allocate("pixel buffer", count, Pixel::BLACK)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear radiance, row-major.
    pub fn radiance(&self) -> &[Color] {
        &self.radiance
    }

    pub fn radiance_mut(&mut self) -> &mut [Color] {
        &mut self.radiance
    }

    /// Tone-mapped pixels, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Tone-mapped pixels as contiguous RGBA bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Log-average luminance of the radiance buffer.
    ///
    /// Refreshes the luminance scratch buffer.
    pub fn log_average_luminance(&mut self) -> f32 {
        self.compute_luminance();
        self.log_average()
    }

    /// Compress the radiance buffer into the pixel buffer.
    pub fn tone_map(&mut self, operator: ToneOperator) {
        match operator {
            ToneOperator::None => self.map_channels(|c| c * 255.0),
            ToneOperator::Ward => {
                let l_avg = self.log_average_luminance();
                let sf = ward_scale_factor(l_avg);
                log::debug!("Ward: L_avg = {:.4}, sf = {:.4}", l_avg, sf);
                self.map_channels(|c| c / WARD_MAX_ILLUMINANCE * sf * 255.0);
            }
            ToneOperator::Reinhard => {
                let l_avg = self.log_average_luminance();
                log::debug!("Reinhard: L_avg = {:.4}", l_avg);
                self.map_channels(|c| {
                    let scaled = REINHARD_KEY / l_avg * c;
                    scaled / (Color::ONE + scaled) * 255.0
                });
            }
            ToneOperator::AdaptiveLogarithmic => self.adaptive_logarithmic(),
        }
    }

    fn compute_luminance(&mut self) {
        self.luminance
            .par_iter_mut()
            .zip(self.radiance.par_iter())
            .for_each(|(l, c)| *l = luminance(*c));
    }

    fn log_average(&self) -> f32 {
        let sum: f32 = self.luminance.par_iter().map(|l| (LOG_DELTA + l).ln()).sum();
        (sum / self.luminance.len() as f32).exp()
    }

    fn map_channels<F>(&mut self, map: F)
    where
        F: Fn(Color) -> Color + Sync,
    {
        self.pixels
            .par_iter_mut()
            .zip(self.radiance.par_iter())
            .for_each(|(pixel, c)| *pixel = Pixel::from_display(map(*c)));
    }

    /// Drago et al.: per-pixel logarithmic compression with a base that
    /// varies with the pixel's luminance.
    fn adaptive_logarithmic(&mut self) {
        let l_avg = self.log_average_luminance();
        let l_max = self.luminance.par_iter().copied().reduce(|| 0.0, f32::max);
        let l_wmax = l_max / l_avg;
        let exponent = DRAGO_BIAS.ln() / 0.5f32.ln();
        let scale = 1.0 / (l_wmax + 1.0).log10();

        log::debug!("Adaptive log: L_avg = {:.4}, L_wmax = {:.4}", l_avg, l_wmax);

        self.pixels
            .par_iter_mut()
            .zip(self.radiance.par_iter().zip(self.luminance.par_iter()))
            .for_each(|(pixel, (c, l))| {
                let l_w = l / l_avg;
                let l_d = scale * (l_w + 1.0).ln() / (2.0 + (l_w / l_wmax).powf(exponent) * 8.0).ln();
                *pixel = Pixel::from_display(*c * l_d / DRAGO_MAX_ILLUMINANCE * 255.0);
            });
    }
}

/// Ward's contrast-based scale factor for a given adaptation luminance.
fn ward_scale_factor(l_avg: f32) -> f32 {
    let numerator = 1.219 + (WARD_MAX_ILLUMINANCE / 2.0).powf(0.4);
    let denominator = 1.219 + l_avg.powf(0.4);
    (numerator / denominator).powf(2.5)
}
