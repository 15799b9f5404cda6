//! Nearest simple aspect ratio of a frame.

use super::probe::Geometry;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::models::Orientation;

/// Largest denominator tried when simplifying a ratio.
const MAX_DENOMINATOR: u64 = 20;
/// Relative error a simplified ratio may have and still be accepted.
const TOLERANCE: f64 = 0.05;

/// A `numerator:denominator` approximation of width/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub numerator: u64,
    pub denominator: u64,
}

impl AspectRatio {
    /// Scan denominators 1..=20 for the closest `round(r * d) / d`.
    ///
    /// A candidate replaces the current best only when its relative error is below 5%
    /// and strictly lower than the best so far, so the smallest denominator wins ties.
    /// When no candidate qualifies the raw `width:height` pair is returned as is.
    pub fn from_geometry(geometry: Geometry) -> Self {
        let ratio = f64::from(geometry.width) / f64::from(geometry.height);

        let mut best: Option<AspectRatio> = None;
        let mut best_error = 1.0_f64;

        for denominator in 1..=MAX_DENOMINATOR {
            let numerator = (ratio * denominator as f64).round();
            if numerator == 0.0 {
                continue;
            }

            let error = (numerator / denominator as f64 - ratio).abs() / ratio;
            if error < TOLERANCE && error < best_error {
                best_error = error;
                best = Some(AspectRatio {
                    numerator: numerator as u64,
                    denominator,
                });
            }
        }

        best.unwrap_or(AspectRatio {
            numerator: u64::from(geometry.width),
            denominator: u64::from(geometry.height),
        })
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_aspect_label(&self.to_string())
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}
