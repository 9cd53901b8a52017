use fast_srgb8::srgb8_to_f32;

#[allow(non_camel_case_types)]
pub type sRGB = [u8; 3];

pub fn as_index(c: &sRGB) -> usize {
    let mut out: usize = c[2] as usize;
    out |= (c[1] as usize) << 8;
    out |= (c[0] as usize) << 16;
    out
}

pub fn to_string(c: &sRGB) -> String {
    format!("#{:06x}", as_index(c)).to_uppercase()
}

/// Builds a color from a `0xRRGGBB` literal, so tables read like hex codes.
pub const fn from_hex(hex: u32) -> sRGB {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

/// Linear interpolation between two colors in gamma-encoded space,
/// which is how the plotting backends blend colormap entries.
pub fn lerp(c1: &sRGB, c2: &sRGB, f: f32) -> sRGB {
    let f = f.clamp(0.0, 1.0);
    let mut out = [0; 3];
    for i in 0..3 {
        let a = c1[i] as f32;
        let b = c2[i] as f32;
        out[i] = (a + f * (b - a)).round() as u8;
    }
    out
}

/// Converts a channel intensity in [0, 1] to an 8-bit value.
pub fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug)]
struct RGB {
    r: f32,
    g: f32,
    b: f32,
}

impl From<sRGB> for RGB {
    fn from(c: sRGB) -> Self {
        RGB {
            r: srgb8_to_f32(c[0]),
            g: srgb8_to_f32(c[1]),
            b: srgb8_to_f32(c[2]),
        }
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Oklab {
    L: f32,
    a: f32,
    b: f32,
}

// Scaled so lightness reads 0..100, roughly in line with CIELAB.
const OKLAB_SCALE: f32 = 100.0;

impl From<RGB> for Oklab {
    fn from(c: RGB) -> Self {
        // https://bottosson.github.io/posts/oklab/#converting-from-linear-srgb-to-oklab
        let l = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
        let m = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
        let s = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Oklab {
            L: (0.2104542553 * OKLAB_SCALE) * l_ + (0.7936177850 * OKLAB_SCALE) * m_
                - (0.0040720468 * OKLAB_SCALE) * s_,
            a: (1.9779984951 * OKLAB_SCALE) * l_ - (2.4285922050 * OKLAB_SCALE) * m_
                + (0.4505937099 * OKLAB_SCALE) * s_,
            b: (0.0259040371 * OKLAB_SCALE) * l_ + (0.7827717662 * OKLAB_SCALE) * m_
                - (0.8086757660 * OKLAB_SCALE) * s_,
        }
    }
}

impl From<sRGB> for Oklab {
    fn from(c: sRGB) -> Self {
        Into::<RGB>::into(c).into()
    }
}

impl Oklab {
    pub fn lightness(&self) -> f32 {
        self.L
    }
}

/// Perceived lightness of an sRGB color on a 0..100 scale.
pub fn lightness(c: &sRGB) -> f32 {
    Into::<Oklab>::into(*c).lightness()
}
