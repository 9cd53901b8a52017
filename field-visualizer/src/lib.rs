mod canvas;
mod code;
mod error;
pub mod field;
mod raster;

use std::path::{Path, PathBuf};

pub use canvas::{open_canvases, Bounds, Canvas, ClipCircle};
pub use code::{make_document, CLIP_ID};
pub use error::GenerateError;

use color_lib::ColorScale;
use log::{debug, info};

pub const DEFAULT_OUTPUT: &str = "public/tools.svg";
pub const DEFAULT_COLOR_SCALE: &str = "plasma";
/// Physical side length of the square figure.
pub const FIGURE_SIZE_IN: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub output_path: PathBuf,
    pub color_scale: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            color_scale: DEFAULT_COLOR_SCALE.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn run(&self) -> Result<(), GenerateError> {
        generate(&self.output_path, &self.color_scale)
    }
}

/// Renders the circular interference icon and writes it as SVG to `path`.
///
/// The scale is resolved before anything touches the filesystem, so an unknown
/// name leaves `path` as it was.
pub fn generate<T>(path: T, color_scale: &str) -> Result<(), GenerateError>
where
    T: AsRef<Path>,
{
    let path = path.as_ref();
    let scale = ColorScale::from_name(color_scale)?;

    let field = field::synthesize();
    debug!("synthesized {:?} field", field.dim());

    let mut canvas = Canvas::open(FIGURE_SIZE_IN)?;
    canvas.draw_field(&field, &scale);
    canvas.clip_to_circle();
    canvas.save(path)?;

    info!("wrote {} ({})", path.display(), scale.name());
    Ok(())
}
