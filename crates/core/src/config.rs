//! Default values for new elements.
//!
//! A config is a plain value constructed by the caller and handed to the
//! factory -- there is no global or cached configuration state inside the
//! engine.

use crate::units::Coord;

/// Track defaults and limits.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    pub default_width: Coord,
    pub min_width: Coord,
    pub max_width: Coord,
    pub default_clearance: Coord,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            default_width: Coord::from_nm(250_000),     // 0.25 mm
            min_width: Coord::from_nm(100_000),         // 0.1 mm
            max_width: Coord::from_nm(10_000_000),      // 10 mm
            default_clearance: Coord::from_nm(200_000), // 0.2 mm
        }
    }
}

/// Via defaults and limits.
#[derive(Debug, Clone)]
pub struct ViaConfig {
    pub default_size: Coord,
    pub default_drill: Coord,
    pub min_size: Coord,
    pub min_drill: Coord,
    pub min_annular_ring: Coord,
}

impl Default for ViaConfig {
    fn default() -> Self {
        ViaConfig {
            default_size: Coord::from_nm(800_000),      // 0.8 mm
            default_drill: Coord::from_nm(400_000),     // 0.4 mm
            min_size: Coord::from_nm(200_000),          // 0.2 mm
            min_drill: Coord::from_nm(100_000),         // 0.1 mm
            min_annular_ring: Coord::from_nm(150_000),  // 0.15 mm
        }
    }
}

/// Bundle of element defaults used by the factory.
#[derive(Debug, Clone, Default)]
pub struct BoardConfig {
    pub track: TrackConfig,
    pub via: ViaConfig,
}
