use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use field_visualizer::{generate, open_canvases, GenerateError, GeneratorConfig};
use regex::Regex;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "field-visualizer-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn attribute<'a>(text: &'a str, element: &str, name: &str) -> &'a str {
    let tag = Regex::new(&format!(r"<{element}\b[^>]*>"))
        .unwrap()
        .find(text)
        .unwrap_or_else(|| panic!("no <{element}> in output"))
        .as_str();
    Regex::new(&format!(r#"\s{}="([^"]*)""#, regex::escape(name)))
        .unwrap()
        .captures(tag)
        .and_then(|captures| captures.get(1))
        .unwrap_or_else(|| panic!("<{element}> has no {name}: {tag}"))
        .as_str()
}

fn embedded_png(text: &str) -> image::RgbaImage {
    let href = attribute(text, "image", "xlink:href");
    let payload = href.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = STANDARD.decode(payload).unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgba8()
}

#[test]
fn writes_clipped_svg() {
    let dir = scratch_dir("writes");
    let path = dir.join("out.svg");
    generate(&path, "plasma").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.trim_end().ends_with("</svg>"));

    assert_eq!(attribute(&text, "svg", "viewBox"), "0 0 288 288");
    assert_eq!(attribute(&text, "svg", "width"), "288pt");
    assert_eq!(attribute(&text, "svg", "height"), "288pt");

    assert_eq!(attribute(&text, "circle", "cx"), "144");
    assert_eq!(attribute(&text, "circle", "cy"), "144");
    assert_eq!(attribute(&text, "circle", "r"), "144");
    assert_eq!(attribute(&text, "image", "clip-path"), "url(#field-clip)");

    // no background and no axis decorations
    for element in ["<rect", "<line", "<text", "<path"] {
        assert!(!text.contains(element), "unexpected {element}");
    }

    let raster = embedded_png(&text);
    let (w, h) = raster.dimensions();
    assert_eq!((w, h), (576, 576));
    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_eq!(raster.get_pixel(x, y).0[3], 0, "corner {x} {y}");
    }
    assert_eq!(raster.get_pixel(w / 2, h / 2).0[3], 0xFF);
    // the circle touches every edge midpoint
    assert_eq!(raster.get_pixel(w / 2, 0).0[3], 0xFF);
    assert_eq!(raster.get_pixel(0, h / 2).0[3], 0xFF);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn output_is_deterministic() {
    let dir = scratch_dir("deterministic");
    let first = dir.join("first.svg");
    let second = dir.join("second.svg");
    generate(&first, "viridis").unwrap();
    generate(&second, "viridis").unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn repeated_calls_overwrite() {
    let dir = scratch_dir("overwrite");
    let path = dir.join("out.svg");
    fs::write(&path, "stale").unwrap();

    for _ in 0..3 {
        generate(&path, "inferno").unwrap();
        assert_eq!(open_canvases(), 0);
    }
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn invalid_color_scale_leaves_file_alone() {
    let dir = scratch_dir("invalid");
    let existing = dir.join("existing.svg");
    fs::write(&existing, "sentinel").unwrap();

    let err = generate(&existing, "not_a_real_colormap").unwrap_err();
    assert!(matches!(err, GenerateError::InvalidColorScale(_)), "{err}");
    assert!(err.to_string().contains("not_a_real_colormap"));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "sentinel");

    let missing = dir.join("missing.svg");
    assert!(generate(&missing, "not_a_real_colormap").is_err());
    assert!(!missing.exists());
    assert_eq!(open_canvases(), 0);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn unwritable_path_fails_cleanly() {
    let dir = scratch_dir("unwritable");
    let path = dir.join("no/such/dir/out.svg");
    let err = generate(&path, "plasma").unwrap_err();
    match &err {
        GenerateError::FilesystemWrite { path: failed, .. } => assert_eq!(failed, &path),
        other => panic!("unexpected error {other}"),
    }
    assert!(!path.exists());
    assert_eq!(open_canvases(), 0);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn scales_share_geometry() {
    let dir = scratch_dir("scales");
    let plasma_path = dir.join("plasma.svg");
    let viridis_path = dir.join("viridis.svg");
    generate(&plasma_path, "plasma").unwrap();
    generate(&viridis_path, "viridis").unwrap();

    let plasma = fs::read_to_string(&plasma_path).unwrap();
    let viridis = fs::read_to_string(&viridis_path).unwrap();
    for (element, name) in [
        ("svg", "viewBox"),
        ("circle", "cx"),
        ("circle", "cy"),
        ("circle", "r"),
        ("image", "width"),
        ("image", "height"),
    ] {
        assert_eq!(
            attribute(&plasma, element, name),
            attribute(&viridis, element, name)
        );
    }
    assert_ne!(
        attribute(&plasma, "image", "xlink:href"),
        attribute(&viridis, "image", "xlink:href")
    );

    // same visibility mask, different colors
    let plasma_raster = embedded_png(&plasma);
    let viridis_raster = embedded_png(&viridis);
    let mut differing = 0;
    for (p, v) in plasma_raster.pixels().zip(viridis_raster.pixels()) {
        assert_eq!(p.0[3], v.0[3]);
        if p.0[3] != 0 && p.0[..3] != v.0[..3] {
            differing += 1;
        }
    }
    assert!(differing > 0);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn extension_does_not_change_format() {
    let dir = scratch_dir("extension");
    let path = dir.join("out.png");
    generate(&path, "magma_r").unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("<svg"));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn default_config() {
    let config = GeneratorConfig::default();
    assert_eq!(config.output_path, PathBuf::from("public/tools.svg"));
    assert_eq!(config.color_scale, "plasma");

    let dir = scratch_dir("config");
    let config = GeneratorConfig {
        output_path: dir.join("tools.svg"),
        ..GeneratorConfig::default()
    };
    config.run().unwrap();
    assert!(fs::metadata(&config.output_path).unwrap().len() > 0);
    fs::remove_dir_all(dir).unwrap();
}
