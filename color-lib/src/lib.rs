pub mod color;
pub mod scale;

pub use color::sRGB;
pub use scale::{known_names, ColorScale, UnknownColorScale};
