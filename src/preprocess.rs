use ndarray::{Array3, Array4, ArrayView4, Axis};

use crate::error::{ClassifyError, Result};

/// Images are always fed as RGB.
pub const CHANNELS: usize = 3;

/// Input geometry and normalization the target network was trained with.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessConfig {
    pub mean: f32,
    pub height: usize,
    pub width: usize,
}

impl PreprocessConfig {
    /// Inception v1 (`inception5h`): 224x224 RGB, mean-centered at 117.
    pub fn inception() -> Self {
        Self {
            mean: 117.0,
            height: 224,
            width: 224,
        }
    }

    /// NHWC shape of the tensor produced for a single image.
    pub fn input_shape(&self) -> [usize; 4] {
        [1, self.height, self.width, CHANNELS]
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self::inception()
    }
}

#[derive(Debug)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    /// Create a new instance of the Processor struct
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Turns encoded image bytes into the model input tensor.
    ///
    /// Decodes to RGB, casts to `f32`, adds the batch axis, resizes
    /// bilinearly to the configured size and subtracts the mean.
    pub fn preprocess(&self, bytes: &[u8]) -> Result<Array4<f32>> {
        let t = std::time::Instant::now();
        let image = image::load_from_memory(bytes)?.into_rgb8();
        let (width, height) = image.dimensions();
        tracing::debug!(width, height, elapsed = ?t.elapsed(), "decoded image");

        let pixels = Array3::from_shape_vec(
            (height as usize, width as usize, CHANNELS),
            image.into_raw(),
        )
        .map_err(|e| ClassifyError::Resize(e.to_string()))?;
        let batch = pixels.mapv(f32::from).insert_axis(Axis(0));

        let t = std::time::Instant::now();
        let mut tensor = resize_bilinear(batch.view(), self.config.height, self.config.width)?;
        tensor -= self.config.mean;
        tracing::debug!(elapsed = ?t.elapsed(), "resized image");
        Ok(tensor)
    }
}

/// Source coordinates blended into one output row or column.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    lo: usize,
    hi: usize,
    lerp: f32,
}

/// Output position `i` reads source position `i * in_len / out_len`, with no
/// half-pixel offset and no antialiasing, so a 2x downscale reads every
/// other source pixel exactly.
fn samples(in_len: usize, out_len: usize) -> Vec<Sample> {
    let scale = in_len as f32 / out_len as f32;
    (0..out_len)
        .map(|i| {
            let src = i as f32 * scale;
            let lo = (src.floor() as usize).min(in_len - 1);
            Sample {
                lo,
                hi: (lo + 1).min(in_len - 1),
                lerp: src - src.floor(),
            }
        })
        .collect()
}

/// Bilinear resize of an NHWC batch to `height` x `width`.
fn resize_bilinear(input: ArrayView4<f32>, height: usize, width: usize) -> Result<Array4<f32>> {
    let (batch, in_h, in_w, channels) = input.dim();
    if in_h == 0 || in_w == 0 {
        return Err(ClassifyError::Resize(format!("cannot resize a {in_w}x{in_h} image")));
    }
    let rows = samples(in_h, height);
    let cols = samples(in_w, width);

    Ok(Array4::from_shape_fn((batch, height, width, channels), |(n, y, x, c)| {
        let (r, k) = (rows[y], cols[x]);
        let top_left = input[[n, r.lo, k.lo, c]];
        let top_right = input[[n, r.lo, k.hi, c]];
        let bottom_left = input[[n, r.hi, k.lo, c]];
        let bottom_right = input[[n, r.hi, k.hi, c]];
        let top = top_left + (top_right - top_left) * k.lerp;
        let bottom = bottom_left + (bottom_right - bottom_left) * k.lerp;
        top + (bottom - top) * r.lerp
    }))
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(PreprocessConfig::inception())
    }
}
