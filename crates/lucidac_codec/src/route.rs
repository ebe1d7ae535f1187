//! The physical route, the unit of a compiled routing table.

use lucidac_common::{Clane, Lane};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One lane of the crossbar, fully resolved.
///
/// Signal flows from M-block output cross-lane `uin` through the U-block onto
/// `lane`, is weighted by `cval` in the C-block, and leaves through the
/// I-block onto M-block input cross-lane `iout`. A route without `iout` only
/// taps the lane, as ADC channels and external outputs do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalRoute {
    /// The lane, in `0..32`.
    pub lane: Lane,
    /// The U-block input cross-lane, in `0..16`.
    pub uin: Clane,
    /// The lane coefficient, in `[-20, 20]`.
    pub cval: f64,
    /// The I-block output cross-lane, if the lane feeds an M-block input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iout: Option<Clane>,
}

impl PhysicalRoute {
    /// Creates a route.
    pub fn new(lane: Lane, uin: Clane, cval: f64, iout: Option<Clane>) -> Self {
        Self {
            lane,
            uin,
            cval,
            iout,
        }
    }
}

impl fmt::Display for PhysicalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[lane {}: {} -> {}", self.lane, self.uin, self.cval)?;
        match self.iout {
            Some(iout) => write!(f, " -> {iout}]"),
            None => write!(f, " -> (tap)]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(lane: usize, uin: usize, cval: f64, iout: Option<usize>) -> PhysicalRoute {
        PhysicalRoute::new(
            Lane::new(lane).unwrap(),
            Clane::new(uin).unwrap(),
            cval,
            iout.and_then(Clane::new),
        )
    }

    #[test]
    fn serde_shape() {
        let r = route(3, 8, -0.5, Some(2));
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"lane": 3, "uin": 8, "cval": -0.5, "iout": 2})
        );
    }

    #[test]
    fn missing_iout_is_a_tap() {
        let r: PhysicalRoute = serde_json::from_str(r#"{"lane":0,"uin":1,"cval":0}"#).unwrap();
        assert_eq!(r.iout, None);
        assert!(!serde_json::to_string(&r).unwrap().contains("iout"));
        let r: PhysicalRoute =
            serde_json::from_str(r#"{"lane":0,"uin":1,"cval":0,"iout":null}"#).unwrap();
        assert_eq!(r.iout, None);
    }

    #[test]
    fn rejects_out_of_range_lane() {
        assert!(serde_json::from_str::<PhysicalRoute>(r#"{"lane":32,"uin":1,"cval":1}"#).is_err());
        assert!(serde_json::from_str::<PhysicalRoute>(r#"{"lane":1,"uin":16,"cval":1}"#).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(route(1, 9, -1.0, Some(2)).to_string(), "[lane 1: 9 -> -1 -> 2]");
        assert_eq!(route(0, 8, 0.0, None).to_string(), "[lane 0: 8 -> 0 -> (tap)]");
    }
}
