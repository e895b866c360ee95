use anyhow::{Result, anyhow, bail};
use std::fmt;
use std::str::FromStr;

/// Hemisphere reference attached to a GPS coordinate (`GPSLatitudeRef` / `GPSLongitudeRef`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    pub fn is_latitude(self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }

    fn max_degrees(self) -> f64 {
        if self.is_latitude() { 90.0 } else { 180.0 }
    }
}

impl FromStr for Hemisphere {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            _ => Err(anyhow!("invalid hemisphere reference {:?}", s)),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        };
        f.write_str(letter)
    }
}

/// Degrees-minutes-seconds magnitude, always non-negative; the sign comes from the hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Result<Self> {
        for (name, value) in [("degrees", degrees), ("minutes", minutes), ("seconds", seconds)] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number, got {}", name, value);
            }
        }
        // Exactly 60 shows up in rounded camera values.
        if minutes > 60.0 {
            bail!("minutes out of range: {}", minutes);
        }
        if seconds > 60.0 {
            bail!("seconds out of range: {}", seconds);
        }

        Ok(Self {
            degrees,
            minutes,
            seconds,
        })
    }

    /// Builds a DMS value from EXIF RATIONAL components given as `(numerator, denominator)`.
    pub fn from_rationals(parts: &[(u32, u32)]) -> Result<Self> {
        if parts.is_empty() || parts.len() > 3 {
            bail!("expected 1 to 3 rational components, got {}", parts.len());
        }

        let mut values = [0.0f64; 3];
        for (slot, &(num, denom)) in values.iter_mut().zip(parts) {
            if denom == 0 {
                bail!("rational component {}/{} has a zero denominator", num, denom);
            }
            *slot = num as f64 / denom as f64;
        }

        Self::new(values[0], values[1], values[2])
    }

    pub fn to_decimal(&self, hemisphere: Hemisphere) -> Result<f64> {
        let magnitude = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;
        if magnitude > hemisphere.max_degrees() {
            bail!(
                "{} coordinate {} exceeds {} degrees",
                hemisphere,
                magnitude,
                hemisphere.max_degrees()
            );
        }
        Ok(hemisphere.sign() * magnitude)
    }
}

impl FromStr for Dms {
    type Err = anyhow::Error;

    /// Accepts `40,26,46.302`, `40 26 46.302`, `40° 26' 46.302"` and
    /// `40 deg 26 min 46.302 sec`. Trailing components may be omitted.
    fn from_str(s: &str) -> Result<Self> {
        let mut cleaned = s.to_ascii_lowercase();
        for marker in ["deg", "min", "sec"] {
            cleaned = cleaned.replace(marker, " ");
        }
        let cleaned: String = cleaned
            .chars()
            .map(|c| match c {
                '°' | '\'' | '"' | '′' | '″' | ',' => ' ',
                other => other,
            })
            .collect();

        let parts = cleaned
            .split_whitespace()
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| anyhow!("invalid DMS component {:?} in {:?}", part, s))
            })
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [d] => Self::new(*d, 0.0, 0.0),
            [d, m] => Self::new(*d, *m, 0.0),
            [d, m, sec] => Self::new(*d, *m, *sec),
            _ => Err(anyhow!("expected 1 to 3 DMS components in {:?}", s)),
        }
    }
}
