use svg::node::element::{Circle, ClipPath, Definitions, Image};
use svg::Document;

use crate::canvas::{Bounds, ClipCircle};
use crate::raster::data_uri;

pub const CLIP_ID: &str = "field-clip";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

fn make_clip_path(clip: &ClipCircle) -> ClipPath {
    ClipPath::new().set("id", CLIP_ID).add(
        Circle::new()
            .set("cx", clip.cx)
            .set("cy", clip.cy)
            .set("r", clip.r),
    )
}

fn make_image(frame: &Bounds, png: &[u8]) -> Image {
    Image::new()
        .set("x", frame.x)
        .set("y", frame.y)
        .set("width", frame.width)
        .set("height", frame.height)
        .set("preserveAspectRatio", "none")
        .set("xlink:href", data_uri(png))
}

/// Lays out the rendered raster in a document whose viewport is exactly `view`,
/// so nothing outside the content box is emitted.
pub fn make_document(
    view: &Bounds,
    frame: &Bounds,
    clip: Option<&ClipCircle>,
    png: &[u8],
) -> Document {
    let image = make_image(frame, png);

    let document = Document::new()
        .set("xmlns:xlink", XLINK_NS)
        .set("version", "1.1")
        .set("width", format!("{}pt", view.width))
        .set("height", format!("{}pt", view.height))
        .set("viewBox", (view.x, view.y, view.width, view.height));

    match clip {
        Some(clip) => document
            .add(Definitions::new().add(make_clip_path(clip)))
            .add(image.set("clip-path", format!("url(#{CLIP_ID})"))),
        None => document.add(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 288.0,
        height: 288.0,
    };

    #[test]
    fn test_clipped_document() {
        let clip = ClipCircle {
            cx: 144.0,
            cy: 144.0,
            r: 144.0,
        };
        let text = make_document(&FRAME, &FRAME, Some(&clip), b"png").to_string();

        assert!(text.contains("<clipPath"), "{text}");
        assert!(text.contains(r#"id="field-clip""#), "{text}");
        assert!(text.contains(r#"clip-path="url(#field-clip)""#), "{text}");
        assert!(text.contains(r#"cx="144""#), "{text}");
        assert!(text.contains(r#"r="144""#), "{text}");
        assert!(text.contains(r#"viewBox="0 0 288 288""#), "{text}");
        assert!(text.contains(r#"width="288pt""#), "{text}");
        assert!(text.contains("data:image/png;base64,cG5n"), "{text}");
    }

    #[test]
    fn test_unclipped_document() {
        let text = make_document(&FRAME, &FRAME, None, b"png").to_string();
        assert!(!text.contains("clipPath"), "{text}");
        assert!(!text.contains("clip-path"), "{text}");
        assert!(text.contains("<image"), "{text}");
    }

    #[test]
    fn test_view_offsets() {
        let view = Bounds {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        let text = make_document(&view, &FRAME, None, b"").to_string();
        assert!(text.contains(r#"viewBox="10 20 100 50""#), "{text}");
        assert!(text.contains(r#"height="50pt""#), "{text}");
    }
}
