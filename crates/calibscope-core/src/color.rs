//! Heatmap color interpolation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CalibError, Result};

/// Perceptually uniform dark-to-light ramp.
pub const VIRIDIS: &[&str] = &["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"];

/// Bad-to-good ramp for pass/fail style metrics.
pub const RED_YELLOW_GREEN: &[&str] = &["#d73027", "#fee08b", "#1a9850"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional, any case).
    pub fn from_hex(raw: &str) -> Result<Self> {
        let hex = raw.trim().trim_start_matches('#');
        let invalid = || CalibError::InvalidColor(raw.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear blend, `t = 0` → `self`, `t = 1` → `other`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(CalibError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let colors = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn viridis() -> Self {
        Self::builtin(VIRIDIS)
    }

    pub fn red_yellow_green() -> Self {
        Self::builtin(RED_YELLOW_GREEN)
    }

    fn builtin(hex: &[&str]) -> Self {
        let colors = hex.iter().filter_map(|c| Rgb::from_hex(c).ok()).collect();
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn last(&self) -> Rgb {
        self.colors[self.colors.len() - 1]
    }

    /// Color at normalized position `t` (clamped to [0, 1]).
    ///
    /// `t·(K−1)` selects the two neighbouring entries; the fractional part is
    /// the blend factor. Landing exactly on an entry returns it unchanged.
    pub fn interpolate(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let position = t * (self.colors.len() - 1) as f64;
        let lo = position.floor() as usize;
        let hi = position.ceil() as usize;
        if lo == hi {
            return self.colors[lo];
        }
        self.colors[lo].lerp(self.colors[hi], position - lo as f64)
    }

    /// Color for `value` on the domain `[min, max]`; a collapsed domain
    /// (`min == max`) yields the last palette color.
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> Rgb {
        if min == max {
            return self.last();
        }
        self.interpolate((value - min) / (max - min))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::viridis()
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let colors = Vec::<Rgb>::deserialize(deserializer)?;
        Palette::new(colors).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_black_white() {
        let p = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        assert_eq!(p.interpolate(0.5).to_hex(), "#808080");
    }

    #[test]
    fn test_endpoints_exact() {
        let p = Palette::from_hex(&["#102030", "#a0b0c0", "#ff0000"]).unwrap();
        assert_eq!(p.interpolate(0.0).to_hex(), "#102030");
        assert_eq!(p.interpolate(0.5).to_hex(), "#a0b0c0");
        assert_eq!(p.interpolate(1.0).to_hex(), "#ff0000");
    }

    #[test]
    fn test_blend_between_neighbours() {
        let p = Palette::from_hex(&["#000000", "#640000", "#64c800"]).unwrap();
        // position 1.5 → halfway between #640000 and #64c800.
        assert_eq!(p.interpolate(0.75), Rgb::new(100, 100, 0));
    }

    #[test]
    fn test_out_of_range_t_clamped() {
        let p = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        assert_eq!(p.interpolate(-3.0), Rgb::new(0, 0, 0));
        assert_eq!(p.interpolate(7.0), Rgb::new(255, 255, 255));
        assert_eq!(p.interpolate(f64::NAN), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_collapsed_domain_uses_last_color() {
        let p = Palette::red_yellow_green();
        assert_eq!(p.color_for(3.0, 3.0, 3.0).to_hex(), "#1a9850");
        assert_eq!(p.color_for(0.0, 0.0, 10.0).to_hex(), "#d73027");
        assert_eq!(p.color_for(5.0, 0.0, 10.0).to_hex(), "#fee08b");
    }

    #[test]
    fn test_single_color_palette() {
        let p = Palette::from_hex(&["#abcdef"]).unwrap();
        assert_eq!(p.interpolate(0.3).to_hex(), "#abcdef");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FFaa00").unwrap(), Rgb::new(255, 170, 0));
        assert_eq!(Rgb::from_hex("0f0").unwrap(), Rgb::new(0, 255, 0));
        assert!(matches!(Rgb::from_hex("#12345"), Err(CalibError::InvalidColor(_))));
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
        assert!(matches!(
            Palette::from_hex::<&str>(&[]),
            Err(CalibError::EmptyPalette)
        ));
    }

    #[test]
    fn test_builtins_parse() {
        assert_eq!(Palette::viridis().colors().len(), VIRIDIS.len());
        assert_eq!(Palette::red_yellow_green().colors().len(), RED_YELLOW_GREEN.len());
    }

    #[test]
    fn test_palette_serde() {
        let p: Palette = serde_json::from_str(r##"["#000", "#ffffff"]"##).unwrap();
        assert_eq!(p.colors()[1], Rgb::new(255, 255, 255));
        assert_eq!(serde_json::to_string(&p).unwrap(), r##"["#000000","#ffffff"]"##);
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }
}
