use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use ndarray::Array2;

/// Linearly rescales the field so its minimum maps to 0 and its maximum to 1.
/// A constant field maps to all zeros.
pub fn normalize(field: &Array2<f64>) -> Array2<f64> {
    let (min, max) = field
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !(range > 0.0) {
        return Array2::zeros(field.dim());
    }
    field.mapv(|v| (v - min) / range)
}

/// Bilinear sample at fractional `(row, col)`, clamped to the edge samples.
pub fn bilinear(data: &Array2<f64>, row: f64, col: f64) -> f64 {
    let (rows, cols) = data.dim();
    let row = row.clamp(0.0, (rows - 1) as f64);
    let col = col.clamp(0.0, (cols - 1) as f64);

    let r0 = row.floor() as usize;
    let c0 = col.floor() as usize;
    let r1 = (r0 + 1).min(rows - 1);
    let c1 = (c0 + 1).min(cols - 1);
    let fr = row - r0 as f64;
    let fc = col - c0 as f64;

    let top = data[[r0, c0]] * (1.0 - fc) + data[[r0, c1]] * fc;
    let bottom = data[[r1, c0]] * (1.0 - fc) + data[[r1, c1]] * fc;
    top * (1.0 - fr) + bottom * fr
}

pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
