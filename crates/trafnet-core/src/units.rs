//! Unit newtypes for the two physical quantities in a road table.
//!
//! Hourly volumes and posted speeds are both plain numbers in the source
//! data; keeping them apart stops a speed from being passed where a
//! capacity is expected. Matrix and vector math in the solver stays on
//! plain `f64`.
//!
//! ```
//! use trafnet_core::units::{KilometresPerHour, VehiclesPerHour};
//!
//! let capacity = VehiclesPerHour(2150.0);
//! let flow = VehiclesPerHour(1075.0);
//! assert_eq!(flow / capacity, 0.5);
//! assert_eq!((capacity * 2.0).to_string(), "4300.00 veh/hr");
//!
//! assert_eq!(KilometresPerHour(60.0).value(), 60.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

macro_rules! impl_unit_ops {
    ($type:ty, $symbol:literal) => {
        impl $type {
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        /// Scaling, e.g. by a growth factor.
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, factor: f64) -> Self {
                Self(self.0 * factor)
            }
        }

        /// Ratio of two quantities of the same unit.
        impl Div for $type {
            type Output = f64;
            fn div(self, other: Self) -> f64 {
                self.0 / other.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2} {}", self.0, $symbol)
            }
        }
    };
}

/// Hourly traffic volume (veh/hr): capacities and demand.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehiclesPerHour(pub f64);

impl_unit_ops!(VehiclesPerHour, "veh/hr");

/// Posted road speed (km/hr).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilometresPerHour(pub f64);

impl_unit_ops!(KilometresPerHour, "km/hr");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_over_capacity_is_a_plain_ratio() {
        let demand = VehiclesPerHour(6500.0);
        let capacity = VehiclesPerHour(6450.0);
        assert!(demand / capacity > 1.0);
        assert_eq!((demand * 1.1).value(), 6500.0 * 1.1);
    }

    #[test]
    fn display_carries_the_unit() {
        assert_eq!(VehiclesPerHour(400.0).to_string(), "400.00 veh/hr");
        assert_eq!(KilometresPerHour(80.0).to_string(), "80.00 km/hr");
        assert!(!KilometresPerHour(f64::NAN).is_finite());
    }
}
