use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Inclusive geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::world()
    }
}

impl Bounds {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    pub fn world() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Reject boxes that cannot be mapped onto a viewport: non-finite
    /// corners or a zero/negative span on either axis.
    pub fn validate(&self) -> Result<()> {
        let corners = [self.min_lon, self.max_lon, self.min_lat, self.max_lat];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "bounds must be finite, got {:?}",
                self
            )));
        }
        if self.width() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "bounds have no longitude span (minLon {} >= maxLon {})",
                self.min_lon, self.max_lon
            )));
        }
        if self.height() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "bounds have no latitude span (minLat {} >= maxLat {})",
                self.min_lat, self.max_lat
            )));
        }
        Ok(())
    }
}

/// Size of the map viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "viewport must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Minimum pixel separation between two rendered places.
pub fn validate_limit(limit: f64) -> Result<()> {
    if !limit.is_finite() || limit < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "limit must be a non-negative number of pixels, got {}",
            limit
        )));
    }
    Ok(())
}

fn default_limit() -> f64 {
    30.0
}

/// Parameters of one simplification run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifyConfig {
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_limit")]
    pub limit: f64,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            viewport: Viewport::default(),
            limit: default_limit(),
        }
    }
}

impl SimplifyConfig {
    pub fn new(bounds: Bounds, viewport: Viewport, limit: f64) -> Self {
        Self {
            bounds,
            viewport,
            limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        self.viewport.validate()?;
        validate_limit(self.limit)
    }
}
