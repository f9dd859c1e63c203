//! Colors and the sector palette.
//!
//! Sector colors are sampled from the ColorBrewer "Spectral" diverging
//! scheme, linearly interpolated between its eleven anchors.

use hotball_data::SectorMapping;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ColorBrewer Spectral anchors, from dark red to purple.
const SPECTRAL: [(u8, u8, u8); 11] = [
    (0x9e, 0x01, 0x42),
    (0xd5, 0x3e, 0x4f),
    (0xf4, 0x6d, 0x43),
    (0xfd, 0xae, 0x61),
    (0xfe, 0xe0, 0x8b),
    (0xff, 0xff, 0xbf),
    (0xe6, 0xf5, 0x98),
    (0xab, 0xdd, 0xa4),
    (0x66, 0xc2, 0xa5),
    (0x32, 0x88, 0xbd),
    (0x5e, 0x4f, 0xa2),
];

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Green used for sectors with a positive average.
    pub const GREEN: Self = Self(0x00, 0x80, 0x00);
    /// Red used for sectors with a zero or negative average.
    pub const RED: Self = Self(0xff, 0x00, 0x00);
    /// Gold used for the best sector of a window.
    pub const GOLD: Self = Self(0xd1, 0xb0, 0x00);
    /// Black.
    pub const BLACK: Self = Self(0x00, 0x00, 0x00);

    /// Lowercase `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Sample the Spectral scheme at `n` evenly spaced points from 0 to 1.
///
/// A single sample takes the first anchor.
pub fn spectral(n: usize) -> Vec<Rgb> {
    let last = (SPECTRAL.len() - 1) as f64;
    (0..n)
        .map(|i| {
            let x = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let pos = x * last;
            let lo = (pos.floor() as usize).min(SPECTRAL.len() - 2);
            let t = pos - lo as f64;
            let (a, b) = (SPECTRAL[lo], SPECTRAL[lo + 1]);
            let mix = |p: u8, q: u8| (f64::from(p) + (f64::from(q) - f64::from(p)) * t).round() as u8;
            Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        })
        .collect()
}

/// One color per distinct sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorPalette {
    entries: Vec<(String, Rgb)>,
}

impl SectorPalette {
    /// Assign Spectral colors to the sectors of `mapping` in first-occurrence
    /// order.
    pub fn from_mapping(mapping: &SectorMapping) -> Self {
        Self::from_sectors(mapping.sectors())
    }

    /// Assign Spectral colors to `sectors` in the given order. Repeats are
    /// ignored.
    pub fn from_sectors<I, S>(sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for sector in sectors {
            let sector = sector.into();
            if !names.contains(&sector) {
                names.push(sector);
            }
        }
        let colors = spectral(names.len());
        Self {
            entries: names.into_iter().zip(colors).collect(),
        }
    }

    /// Color of a sector.
    pub fn color(&self, sector: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(name, _)| name == sector)
            .map(|(_, color)| *color)
    }

    /// Iterate over `(sector, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> + '_ {
        self.entries.iter().map(|(name, color)| (name.as_str(), *color))
    }

    /// Number of sectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
