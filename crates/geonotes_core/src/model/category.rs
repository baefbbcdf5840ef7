//! Category domain model.
//!
//! # Responsibility
//! - Define category identity and display color.
//! - Hold the default category table seeded on first initialization.
//!
//! # Invariants
//! - Colors are persisted as `#rrggbb` text.
//! - Default categories keep ids `1..=11` in declaration order.

use crate::model::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{6})$").expect("valid hex color regex"));

/// Default `(color, name)` pairs seeded into an empty category table.
pub const DEFAULT_CATEGORIES: [(&str, &str); 11] = [
    ("#f44336", "Red"),
    ("#e91e63", "Pink"),
    ("#9c27b0", "Purple"),
    ("#3f51b5", "Blue"),
    ("#03a9f4", "Light blue"),
    ("#009688", "Teal"),
    ("#4caf50", "Green"),
    ("#fdd835", "Yellow"),
    ("#ff9800", "Orange"),
    ("#795548", "Brown"),
    ("#9e9e9e", "Grey"),
];

/// Stable identifier of a category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl CategoryId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the color as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Display for RgbColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = HEX_COLOR_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ModelError::InvalidColor(value.to_string()))?;
        let rgb = u32::from_str_radix(digits, 16)
            .map_err(|_| ModelError::InvalidColor(value.to_string()))?;
        Ok(Self::new(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        ))
    }
}

/// Persisted category with its display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub color: RgbColor,
    pub name: String,
}
