use std::collections::HashMap;

use log::trace;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::color::{channel_to_u8, from_hex, lerp, sRGB, to_string};

/// Suffix that selects the reversed version of any registered scale.
pub const REVERSED_SUFFIX: &str = "_r";

// Ten evenly spaced stops sampled from each of the perceptually uniform maps.
const VIRIDIS: [sRGB; 10] = [
    from_hex(0x440154),
    from_hex(0x482878),
    from_hex(0x3E4A89),
    from_hex(0x31688E),
    from_hex(0x26828E),
    from_hex(0x1F9E89),
    from_hex(0x35B779),
    from_hex(0x6DCD59),
    from_hex(0xB4DE2C),
    from_hex(0xFDE725),
];

const PLASMA: [sRGB; 10] = [
    from_hex(0x0D0887),
    from_hex(0x47039F),
    from_hex(0x7301A8),
    from_hex(0x9C179E),
    from_hex(0xBD3786),
    from_hex(0xD8576B),
    from_hex(0xED7953),
    from_hex(0xFA9E3B),
    from_hex(0xFDC926),
    from_hex(0xF0F921),
];

const INFERNO: [sRGB; 10] = [
    from_hex(0x000004),
    from_hex(0x1B0C42),
    from_hex(0x4B0C6B),
    from_hex(0x781C6D),
    from_hex(0xA52C60),
    from_hex(0xCF4446),
    from_hex(0xED6925),
    from_hex(0xFB9A06),
    from_hex(0xF7D03C),
    from_hex(0xFCFFA4),
];

const MAGMA: [sRGB; 10] = [
    from_hex(0x000004),
    from_hex(0x180F3E),
    from_hex(0x451077),
    from_hex(0x721F81),
    from_hex(0x9F2F7F),
    from_hex(0xCD4071),
    from_hex(0xF1605D),
    from_hex(0xFD9567),
    from_hex(0xFEC98D),
    from_hex(0xFCFDBF),
];

const CIVIDIS: [sRGB; 10] = [
    from_hex(0x00204D),
    from_hex(0x00336F),
    from_hex(0x39486B),
    from_hex(0x575C6D),
    from_hex(0x707173),
    from_hex(0x8A8779),
    from_hex(0xA69D75),
    from_hex(0xC4B56C),
    from_hex(0xE4CF5B),
    from_hex(0xFFEA46),
];

// Per channel (position, intensity) anchors, positions ascending from 0 to 1.
type Anchors = &'static [(f32, f32)];

const JET: [Anchors; 3] = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[
        (0.0, 0.0),
        (0.125, 0.0),
        (0.375, 1.0),
        (0.64, 1.0),
        (0.91, 0.0),
        (1.0, 0.0),
    ],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

const HSV: [Anchors; 3] = [
    &[
        (0.0, 1.0),
        (0.158730, 1.0),
        (0.174603, 0.968750),
        (0.333333, 0.031250),
        (0.349206, 0.0),
        (0.666667, 0.0),
        (0.682540, 0.031250),
        (0.841270, 0.968750),
        (0.857143, 1.0),
        (1.0, 1.0),
    ],
    &[
        (0.0, 0.0),
        (0.158730, 0.937500),
        (0.174603, 1.0),
        (0.507937, 1.0),
        (0.666667, 0.062500),
        (0.682540, 0.0),
        (1.0, 0.0),
    ],
    &[
        (0.0, 0.0),
        (0.333333, 0.0),
        (0.349206, 0.062500),
        (0.507937, 1.0),
        (0.841270, 1.0),
        (0.857143, 0.937500),
        (1.0, 0.09375),
    ],
];

const GRAY: [Anchors; 3] = [
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gradient {
    /// Evenly spaced stops, blended pairwise.
    Listed(&'static [sRGB]),
    /// Independent piecewise linear curve per channel.
    Segmented([Anchors; 3]),
}

static REGISTRY: Lazy<HashMap<&'static str, Gradient>> = Lazy::new(|| {
    HashMap::from([
        ("viridis", Gradient::Listed(&VIRIDIS)),
        ("plasma", Gradient::Listed(&PLASMA)),
        ("inferno", Gradient::Listed(&INFERNO)),
        ("magma", Gradient::Listed(&MAGMA)),
        ("cividis", Gradient::Listed(&CIVIDIS)),
        ("jet", Gradient::Segmented(JET)),
        ("hsv", Gradient::Segmented(HSV)),
        ("gray", Gradient::Segmented(GRAY)),
        ("grey", Gradient::Segmented(GRAY)),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color scale '{name}' (known scales: {})", known_names().join(", "))]
pub struct UnknownColorScale {
    pub name: String,
}

/// Every name [`ColorScale::from_name`] accepts, reversed variants included.
pub fn known_names() -> Vec<String> {
    let mut names = REGISTRY
        .keys()
        .flat_map(|name| [name.to_string(), format!("{name}{REVERSED_SUFFIX}")])
        .collect::<Vec<_>>();
    names.sort();
    names
}

/// A named continuous mapping from `[0, 1]` to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    name: String,
    gradient: Gradient,
    reversed: bool,
}

impl ColorScale {
    pub fn from_name(name: &str) -> Result<Self, UnknownColorScale> {
        let (base, reversed) = match name.strip_suffix(REVERSED_SUFFIX) {
            Some(base) => (base, true),
            None => (name, false),
        };
        let gradient = *REGISTRY.get(base).ok_or_else(|| UnknownColorScale {
            name: name.to_string(),
        })?;
        let scale = Self {
            name: name.to_string(),
            gradient,
            reversed,
        };
        trace!(
            "color scale {} resolved: {} -> {}",
            scale.name,
            to_string(&scale.sample(0.0)),
            to_string(&scale.sample(1.0))
        );
        Ok(scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Color at `t`. Values outside `[0, 1]` are clamped and NaN reads as 0.
    pub fn sample(&self, t: f32) -> sRGB {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        match self.gradient {
            Gradient::Listed(stops) => sample_listed(stops, t),
            Gradient::Segmented(channels) => {
                channels.map(|anchors| channel_to_u8(sample_anchors(anchors, t)))
            }
        }
    }
}

fn sample_listed(stops: &[sRGB], t: f32) -> sRGB {
    let segs = (stops.len() - 1) as f32;
    let x = t * segs;
    let i = (x.floor() as usize).min(stops.len() - 2);
    lerp(&stops[i], &stops[i + 1], x - i as f32)
}

fn sample_anchors(anchors: &[(f32, f32)], t: f32) -> f32 {
    let k = anchors
        .iter()
        .position(|&(x, _)| x >= t)
        .unwrap_or(anchors.len() - 1);
    if k == 0 {
        return anchors[0].1;
    }
    let (x0, y0) = anchors[k - 1];
    let (x1, y1) = anchors[k];
    if x1 <= x0 {
        y1
    } else {
        y0 + (y1 - y0) * (t - x0) / (x1 - x0)
    }
}
