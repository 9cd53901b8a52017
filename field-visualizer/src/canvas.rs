use std::cell::Cell;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

use color_lib::ColorScale;
use image::{Rgba, RgbaImage};
use log::{debug, trace};
use ndarray::Array2;
use svg::Document;

use crate::code::make_document;
use crate::error::GenerateError;
use crate::raster::{bilinear, encode_png, normalize};

pub const POINTS_PER_INCH: f64 = 72.0;
/// Raster pixels per canvas point.
pub const RASTER_SCALE: f64 = 2.0;

thread_local! {
    static OPEN_CANVASES: Cell<usize> = const { Cell::new(0) };
}

/// Number of canvases currently open on this thread.
pub fn open_canvases() -> usize {
    OPEN_CANVASES.with(Cell::get)
}

/// Rectangle in canvas units (points, y pointing down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipCircle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl ClipCircle {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.cx - self.r,
            y: self.cy - self.r,
            width: 2.0 * self.r,
            height: 2.0 * self.r,
        }
    }
}

/// A square drawing surface holding one undecorated, equal-aspect axis that
/// fills it. Open canvases are counted per thread and released on drop, so
/// a canvas never outlives the call that opened it.
pub struct Canvas {
    size: f64,
    raster: RgbaImage,
    clip: Option<ClipCircle>,
    // Canvases are tracked per thread and must be dropped where they were opened.
    _not_send: PhantomData<Rc<()>>,
}

impl Canvas {
    /// Opens a `size_in` x `size_in` inch canvas.
    pub fn open(size_in: f64) -> Result<Self, GenerateError> {
        if !(size_in.is_finite() && size_in > 0.0) {
            return Err(GenerateError::Backend(format!(
                "invalid canvas size {size_in}in"
            )));
        }
        let size = size_in * POINTS_PER_INCH;
        let pixels = (size * RASTER_SCALE).round() as u32;
        if pixels == 0 {
            return Err(GenerateError::Backend(format!(
                "canvas of {size}pt has no pixels"
            )));
        }

        OPEN_CANVASES.with(|n| n.set(n.get() + 1));
        trace!("canvas opened: {size}pt, {pixels}x{pixels} raster");
        Ok(Self {
            size,
            raster: RgbaImage::new(pixels, pixels),
            clip: None,
            _not_send: PhantomData,
        })
    }

    /// Side length in points.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn clip(&self) -> Option<&ClipCircle> {
        self.clip.as_ref()
    }

    /// The axis box in canvas units.
    pub fn frame(&self) -> Bounds {
        Bounds {
            x: 0.0,
            y: 0.0,
            width: self.size,
            height: self.size,
        }
    }

    /// Maps axis-relative coordinates (origin bottom left, 1 at the far edge)
    /// to canvas units.
    pub fn axis_to_canvas(&self, rx: f64, ry: f64) -> (f64, f64) {
        let frame = self.frame();
        (frame.x + rx * frame.width, frame.y + (1.0 - ry) * frame.height)
    }

    /// Center of raster pixel `(px, py)` in canvas units.
    fn pixel_center(&self, px: u32, py: u32) -> (f64, f64) {
        let frame = self.frame();
        (
            frame.x + (px as f64 + 0.5) * frame.width / self.raster.width() as f64,
            frame.y + (py as f64 + 0.5) * frame.height / self.raster.height() as f64,
        )
    }

    /// Paints `field` over the whole axis. Each sample owns an equal cell of the
    /// extent, row 0 sits at the bottom edge, and pixels are resampled bilinearly
    /// from the min/max normalized field before going through `scale`.
    pub fn draw_field(&mut self, field: &Array2<f64>, scale: &ColorScale) {
        let normalized = normalize(field);
        let (rows, cols) = normalized.dim();
        let frame = self.frame();
        debug!(
            "drawing {rows}x{cols} field with {} onto {}x{} raster",
            scale.name(),
            self.raster.width(),
            self.raster.height()
        );

        let centers = self
            .raster
            .enumerate_pixels()
            .map(|(px, py, _)| self.pixel_center(px, py))
            .collect::<Vec<_>>();
        for ((x, y), pixel) in centers.into_iter().zip(self.raster.pixels_mut()) {
            let rx = (x - frame.x) / frame.width;
            let ry = 1.0 - (y - frame.y) / frame.height;
            let value = bilinear(
                &normalized,
                ry * rows as f64 - 0.5,
                rx * cols as f64 - 0.5,
            );
            let [r, g, b] = scale.sample(value as f32);
            *pixel = Rgba([r, g, b, 0xFF]);
        }
    }

    /// Clips the canvas to the circle inscribed in the axis box. Raster pixels
    /// whose centers fall outside it become fully transparent.
    pub fn clip_to_circle(&mut self) -> ClipCircle {
        let (cx, cy) = self.axis_to_canvas(0.5, 0.5);
        let circle = ClipCircle {
            cx,
            cy,
            r: 0.5 * self.frame().width,
        };

        let outside = self
            .raster
            .enumerate_pixels()
            .map(|(px, py, _)| {
                let (x, y) = self.pixel_center(px, py);
                !circle.contains(x, y)
            })
            .collect::<Vec<_>>();
        for (hidden, pixel) in outside.into_iter().zip(self.raster.pixels_mut()) {
            if hidden {
                *pixel = Rgba([0, 0, 0, 0]);
            }
        }

        trace!("canvas clipped to {circle:?}");
        self.clip = Some(circle);
        circle
    }

    /// Extent of the visible content: the clip region when one is set,
    /// otherwise the axis box. Decorations are never drawn, so there is
    /// nothing else to include.
    pub fn tight_bbox(&self) -> Bounds {
        match self.clip {
            Some(clip) => clip.bounds(),
            None => self.frame(),
        }
    }

    pub fn to_document(&self) -> Result<Document, GenerateError> {
        let png = encode_png(&self.raster)?;
        debug!("encoded {} byte png", png.len());
        Ok(make_document(
            &self.tight_bbox(),
            &self.frame(),
            self.clip.as_ref(),
            &png,
        ))
    }

    /// Serializes the canvas as SVG, whatever the extension of `path`.
    pub fn save<T>(&self, path: T) -> Result<(), GenerateError>
    where
        T: AsRef<Path>,
    {
        let path = path.as_ref();
        let document = self.to_document()?;
        svg::save(path, &document).map_err(|source| GenerateError::FilesystemWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        OPEN_CANVASES.with(|n| n.set(n.get().saturating_sub(1)));
        trace!("canvas released");
    }
}
