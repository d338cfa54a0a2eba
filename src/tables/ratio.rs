//! Aspect ratio reduction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Greatest common divisor of two magnitudes. `gcd(0, 0) == 0`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A width:height ratio reduced to lowest terms.
///
/// Serialized as the text `"W:H"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    width: i64,
    height: i64,
}

impl AspectRatio {
    /// Reduces `width:height` by their greatest common divisor.
    ///
    /// Returns `None` when either dimension is zero.
    pub fn reduce(width: i64, height: i64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        // Non-zero inputs guarantee g >= 1.
        let g = gcd(width.unsigned_abs(), height.unsigned_abs()) as i128;
        Some(Self {
            width: (width as i128 / g) as i64,
            height: (height as i128 / g) as i64,
        })
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("expected 'W:H', got '{}'", s))?;
        let w: i64 = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
        let h: i64 = h.trim().parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
        Self::reduce(w, h).ok_or_else(|| format!("degenerate ratio '{}'", s))
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `width / height` as a real number, or `None` when `height` is zero.
pub fn aspect_ratio_float(width: i64, height: i64) -> Option<f64> {
    if height == 0 {
        None
    } else {
        Some(width as f64 / height as f64)
    }
}
