//! Conversion between route lists and the lane-indexed U-C-I matrix.

use crate::route::PhysicalRoute;
use lucidac_common::{Clane, Lane, NUM_LANES};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// The U-C-I matrix as three lane-indexed arrays.
///
/// `u[lane]` is the cross-lane feeding the lane, `c[lane]` its coefficient
/// (0 for an unused lane) and `i[lane]` the cross-lane the lane feeds.
///
/// On deserialization, shorter arrays are padded and `null` entries read as
/// unused, so `{"u": [], "c": [], "i": []}` is the empty matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReducedConfig {
    /// Input cross-lane per lane.
    #[serde(deserialize_with = "padded")]
    pub u: [Option<Clane>; NUM_LANES],
    /// Coefficient per lane.
    #[serde(deserialize_with = "padded")]
    pub c: [f64; NUM_LANES],
    /// Output cross-lane per lane.
    #[serde(deserialize_with = "padded")]
    pub i: [Option<Clane>; NUM_LANES],
}

fn padded<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default + Copy,
{
    let items: Vec<Option<T>> = Vec::deserialize(deserializer)?;
    if items.len() > N {
        return Err(serde::de::Error::custom(format!(
            "expected at most {N} entries, found {}",
            items.len()
        )));
    }
    let mut out = [T::default(); N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.unwrap_or_default();
    }
    Ok(out)
}

impl ReducedConfig {
    /// Returns `true` if no lane carries a coefficient.
    pub fn is_empty(&self) -> bool {
        self.c.iter().all(|&c| c == 0.0)
    }

    /// Returns a copy with every lane whose coefficient is zero cleared.
    ///
    /// This is the part of a matrix that survives a round trip through
    /// [`matrix_to_routes`].
    pub fn masked(&self) -> ReducedConfig {
        let mut out = ReducedConfig::default();
        for lane in 0..NUM_LANES {
            if self.c[lane] != 0.0 && self.u[lane].is_some() {
                out.u[lane] = self.u[lane];
                out.c[lane] = self.c[lane];
                out.i[lane] = self.i[lane];
            }
        }
        out
    }
}

/// Scatters routes into the lane-indexed matrix.
///
/// Each lane takes at most one route. Routes sharing a lane are a caller
/// error; the first one wins and the rest are dropped with a warning.
pub fn routes_to_matrix(routes: &[PhysicalRoute]) -> ReducedConfig {
    let mut matrix = ReducedConfig::default();
    let mut taken = HashSet::new();
    for route in routes {
        let lane = route.lane.index();
        if !taken.insert(lane) {
            tracing::warn!(lane, %route, "lane already occupied, dropping route");
            continue;
        }
        matrix.u[lane] = Some(route.uin);
        matrix.c[lane] = route.cval;
        matrix.i[lane] = route.iout;
    }
    matrix
}

/// Gathers the used lanes of a matrix into routes, in ascending lane order.
///
/// Lanes with a zero coefficient are unused and dropped. A lane with a
/// coefficient but no input cross-lane cannot form a route and is dropped
/// with a warning.
pub fn matrix_to_routes(matrix: &ReducedConfig) -> Vec<PhysicalRoute> {
    Lane::all()
        .filter_map(|lane| {
            let idx = lane.index();
            let cval = matrix.c[idx];
            if cval == 0.0 {
                return None;
            }
            let Some(uin) = matrix.u[idx] else {
                tracing::warn!(lane = idx, cval, "lane has a coefficient but no input cross-lane");
                return None;
            };
            Some(PhysicalRoute::new(lane, uin, cval, matrix.i[idx]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(n: usize) -> Lane {
        Lane::new(n).unwrap()
    }

    fn clane(n: usize) -> Clane {
        Clane::new(n).unwrap()
    }

    #[test]
    fn example_routes_roundtrip() {
        let routes = vec![
            PhysicalRoute::new(lane(0), clane(8), 1.0, Some(clane(2))),
            PhysicalRoute::new(lane(1), clane(9), -1.0, Some(clane(2))),
        ];
        let matrix = routes_to_matrix(&routes);
        assert_eq!(matrix.u[0], Some(clane(8)));
        assert_eq!(matrix.c[1], -1.0);
        assert_eq!(matrix.i[1], Some(clane(2)));
        assert_eq!(matrix.c[2], 0.0);
        assert_eq!(matrix_to_routes(&matrix), routes);
    }

    #[test]
    fn matrix_roundtrip_masks_zero_lanes() {
        let mut m = ReducedConfig::default();
        for n in 0..NUM_LANES {
            m.u[n] = Some(clane(n % 16));
            m.i[n] = if n % 3 == 0 { None } else { Some(clane((n * 5) % 16)) };
            m.c[n] = match n % 4 {
                0 => 0.0,
                1 => -20.0,
                2 => 0.25,
                _ => 20.0,
            };
        }
        let back = routes_to_matrix(&matrix_to_routes(&m));
        assert_eq!(back, m.masked());
        assert_ne!(back, m);
        assert_eq!(back.u[0], None);
        assert_eq!(back.u[1], Some(clane(1)));
    }

    #[test]
    fn lane_without_input_is_dropped() {
        let mut m = ReducedConfig::default();
        m.c[4] = 2.0;
        m.i[4] = Some(clane(3));
        assert!(matrix_to_routes(&m).is_empty());
    }

    #[test]
    fn duplicate_lane_keeps_first_route() {
        let routes = [
            PhysicalRoute::new(lane(5), clane(1), 0.5, None),
            PhysicalRoute::new(lane(5), clane(2), 0.7, Some(clane(9))),
        ];
        let m = routes_to_matrix(&routes);
        assert_eq!(m.u[5], Some(clane(1)));
        assert_eq!(m.c[5], 0.5);
        assert_eq!(m.i[5], None);
    }

    #[test]
    fn lenient_deserialization() {
        let m: ReducedConfig = serde_json::from_str(r#"{"u":[],"c":[],"i":[]}"#).unwrap();
        assert_eq!(m, ReducedConfig::default());

        let m: ReducedConfig =
            serde_json::from_str(r#"{"u":[3,null],"c":[0.5,null],"i":[null,7]}"#).unwrap();
        assert_eq!(m.u[0], Some(clane(3)));
        assert_eq!(m.c[1], 0.0);
        assert_eq!(m.i[1], Some(clane(7)));

        let too_long = format!(r#"{{"u":[],"c":{:?},"i":[]}}"#, vec![1.0; 33]);
        assert!(serde_json::from_str::<ReducedConfig>(&too_long).is_err());
    }

    #[test]
    fn serializes_full_arrays() {
        let json = serde_json::to_value(ReducedConfig::default()).unwrap();
        assert_eq!(json["u"].as_array().unwrap().len(), NUM_LANES);
        assert_eq!(json["c"][0], 0.0);
    }

    #[test]
    fn empty() {
        assert!(ReducedConfig::default().is_empty());
        assert!(matrix_to_routes(&ReducedConfig::default()).is_empty());
    }
}
