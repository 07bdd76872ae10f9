//! Great-circle kinematics on a spherical Earth.
//!
//! A [`Path`] is fixed at boarding: start, end, haversine distance and the
//! initial bearing. A [`Vehicle`] moves along it by re-projecting from the
//! path start along the initial bearing at the cumulative distance flown,
//! which keeps it on the great circle without accumulating drift.
//!
//! # Altitude profile
//!
//! ```text
//! altitude = max(0, min(traveled * g, CRUISE, (total - traveled) * g))
//! g        = CRUISE / DISTANCE_TO_CRUISE
//! ```
//!
//! so the vehicle is on the ground at both endpoints and at cruise altitude
//! once it is [`DISTANCE_TO_CRUISE_KM`] away from either.

use contagion_types::Coordinates;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::numeric::ceil_u64;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cruise altitude in kilometres.
pub const CRUISE_ALTITUDE_KM: f64 = 10.0;

/// Ground distance needed to climb to cruise altitude.
pub const DISTANCE_TO_CRUISE_KM: f64 = 1000.0;

/// Remaining distance below which a vehicle is snapped onto the path end.
const ARRIVAL_EPSILON_KM: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Path and vehicle
// ---------------------------------------------------------------------------

/// A fixed great-circle route between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Departure point.
    pub start: Coordinates,
    /// Arrival point.
    pub end: Coordinates,
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
    /// Initial bearing in degrees, `[0, 360)`.
    pub bearing_deg: f64,
}

/// Moving state of a vehicle along a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Current position.
    pub position: Coordinates,
    /// Instantaneous heading in degrees, `[0, 360)`.
    pub bearing_deg: f64,
    /// Current altitude in kilometres.
    pub altitude_km: f64,
    /// Distance flown so far in kilometres.
    pub distance_traveled_km: f64,
    /// Distance covered per advance, in kilometres.
    pub speed_km: f64,
}

impl Vehicle {
    /// Place a vehicle on the ground at the start of `path`.
    pub const fn new(path: &Path, speed_km: f64) -> Self {
        Self {
            position: path.start,
            bearing_deg: path.bearing_deg,
            altitude_km: 0.0,
            distance_traveled_km: 0.0,
            speed_km,
        }
    }

    /// Whether the vehicle has reached the end of `path`.
    pub fn has_arrived(&self, path: &Path) -> bool {
        self.distance_traveled_km >= path.distance_km
    }

    /// Distance still to fly along `path`.
    pub fn remaining_km(&self, path: &Path) -> f64 {
        (path.distance_km - self.distance_traveled_km).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Spherical formulae
// ---------------------------------------------------------------------------

/// Haversine distance between two points in kilometres.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    let h = (lat1.cos() * lat2.cos()).mul_add(half_lon * half_lon, half_lat * half_lat);
    let h = h.clamp(0.0, 1.0);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Forward azimuth from `a` to `b` in degrees, `[0, 360)`.
pub fn bearing_deg(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos().mul_add(lat2.sin(), -(lat1.sin() * lat2.cos() * d_lon.cos()));
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Point reached from `start` after `distance_km` along `bearing_deg`.
///
/// Longitude is normalised to `[-180, 180]`.
pub fn destination(start: Coordinates, bearing_deg: f64, distance_km: f64) -> Coordinates {
    let lat1 = start.lat.to_radians();
    let lon1 = start.lon.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let sin_lat2 = lat1
        .sin()
        .mul_add(angular.cos(), lat1.cos() * angular.sin() * bearing.cos())
        .clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(lat1.sin().mul_add(-sin_lat2, angular.cos()));

    Coordinates::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
}

/// Build the great-circle path between two points.
///
/// # Errors
///
/// Returns [`WorldError::InvalidCoordinates`] if either point is non-finite
/// or out of range.
pub fn build_path(start: Coordinates, end: Coordinates) -> Result<Path, WorldError> {
    for point in [start, end] {
        if !point.is_valid() {
            return Err(WorldError::InvalidCoordinates {
                lat: point.lat,
                lon: point.lon,
            });
        }
    }
    Ok(Path {
        start,
        end,
        distance_km: distance_km(start, end),
        bearing_deg: bearing_deg(start, end),
    })
}

/// Altitude at `traveled` km along a path of `total` km.
pub fn altitude_profile(traveled: f64, total: f64) -> f64 {
    let gradient = CRUISE_ALTITUDE_KM / DISTANCE_TO_CRUISE_KM;
    let climbing = traveled * gradient;
    let descending = (total - traveled) * gradient;
    climbing.min(CRUISE_ALTITUDE_KM).min(descending).max(0.0)
}

/// Move `vehicle` one step along `path`.
///
/// The step is `min(speed, remaining)`, so the vehicle never overshoots.
/// Position is re-projected from the path start; the bearing is the azimuth
/// from the previous to the new position and is left unchanged when the
/// vehicle does not move. Returns the distance covered.
pub fn advance(vehicle: &mut Vehicle, path: &Path) -> f64 {
    let remaining = vehicle.remaining_km(path);
    let step = vehicle.speed_km.max(0.0).min(remaining);
    if step <= 0.0 {
        if remaining <= 0.0 {
            vehicle.distance_traveled_km = path.distance_km;
            vehicle.position = path.end;
            vehicle.altitude_km = 0.0;
        }
        return 0.0;
    }

    let previous = vehicle.position;
    let mut traveled = vehicle.distance_traveled_km + step;
    if path.distance_km - traveled <= ARRIVAL_EPSILON_KM {
        traveled = path.distance_km;
    }

    let position = if traveled >= path.distance_km {
        path.end
    } else {
        destination(path.start, path.bearing_deg, traveled)
    };

    vehicle.bearing_deg = bearing_deg(previous, position);
    vehicle.position = position;
    vehicle.distance_traveled_km = traveled;
    vehicle.altitude_km = altitude_profile(traveled, path.distance_km);
    step
}

/// Number of advances needed to cover `path` at `speed_km` per step, or
/// `None` for a non-positive speed.
pub fn steps_to_arrive(path: &Path, speed_km: f64) -> Option<u64> {
    if speed_km.is_nan() || speed_km <= 0.0 {
        return None;
    }
    Some(ceil_u64(path.distance_km / speed_km))
}

/// Wrap a bearing into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap a longitude into `[-180, 180]`.
pub fn normalize_longitude(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const JOHANNESBURG: Coordinates = Coordinates::new(-26.1392, 28.246);
    const LONDON: Coordinates = Coordinates::new(51.4706, -0.461_941);
    const NEW_YORK: Coordinates = Coordinates::new(40.6413, -73.7781);

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(JOHANNESBURG, LONDON);
        let back = distance_km(LONDON, JOHANNESBURG);
        assert!((there - back).abs() < 1e-6);
        // JNB-LHR is roughly 9,000 km.
        assert!((8_900.0..9_100.0).contains(&there));
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(distance_km(LONDON, LONDON).abs() < 1e-9);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Coordinates::new(0.0, 0.0);
        assert!(bearing_deg(origin, Coordinates::new(10.0, 0.0)).abs() < 1e-9);
        assert!((bearing_deg(origin, Coordinates::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(origin, Coordinates::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(origin, Coordinates::new(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn destination_lands_on_path_end() {
        let path = build_path(LONDON, NEW_YORK).unwrap();
        let end = destination(path.start, path.bearing_deg, path.distance_km);
        assert!((end.lat - NEW_YORK.lat).abs() < 1e-6);
        assert!((end.lon - NEW_YORK.lon).abs() < 1e-6);
    }

    #[test]
    fn longitude_normalised_across_date_line() {
        let start = Coordinates::new(0.0, 179.0);
        let end = destination(start, 90.0, 300.0);
        assert!((-180.0..=180.0).contains(&end.lon));
        assert!(end.lon < 0.0);
    }

    #[test]
    fn invalid_coordinates_rejected() {
        let result = build_path(Coordinates::new(95.0, 0.0), LONDON);
        assert!(matches!(result, Err(WorldError::InvalidCoordinates { .. })));
    }

    #[test]
    fn altitude_zero_at_endpoints_and_capped() {
        assert!(altitude_profile(0.0, 5_000.0).abs() < f64::EPSILON);
        assert!(altitude_profile(5_000.0, 5_000.0).abs() < f64::EPSILON);
        assert!((altitude_profile(2_500.0, 5_000.0) - CRUISE_ALTITUDE_KM).abs() < 1e-12);
        assert!((altitude_profile(500.0, 5_000.0) - 5.0).abs() < 1e-12);
        // Short hop never reaches cruise.
        assert!((altitude_profile(100.0, 200.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn advance_is_monotone_and_arrives_on_schedule() {
        let path = build_path(JOHANNESBURG, LONDON).unwrap();
        let speed = 250.0;
        let expected = steps_to_arrive(&path, speed).unwrap();
        let mut vehicle = Vehicle::new(&path, speed);

        let mut steps = 0_u64;
        let mut last = 0.0;
        while !vehicle.has_arrived(&path) {
            let step = advance(&mut vehicle, &path);
            steps = steps.saturating_add(1);
            assert!(step > 0.0);
            assert!(vehicle.distance_traveled_km > last);
            assert!(vehicle.distance_traveled_km <= path.distance_km);
            assert!(vehicle.altitude_km >= 0.0);
            last = vehicle.distance_traveled_km;
            assert!(steps <= expected);
        }

        assert_eq!(steps, expected);
        assert_eq!(vehicle.position, path.end);
        assert!(vehicle.altitude_km.abs() < f64::EPSILON);
    }

    #[test]
    fn advance_after_arrival_is_a_no_op() {
        let path = build_path(LONDON, NEW_YORK).unwrap();
        let mut vehicle = Vehicle::new(&path, 1.0e6);
        assert!(advance(&mut vehicle, &path) > 0.0);
        assert!(vehicle.has_arrived(&path));
        let bearing = vehicle.bearing_deg;
        assert!(advance(&mut vehicle, &path).abs() < f64::EPSILON);
        assert!((vehicle.bearing_deg - bearing).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_speed_never_arrives() {
        let path = build_path(LONDON, NEW_YORK).unwrap();
        let mut vehicle = Vehicle::new(&path, 0.0);
        assert!(advance(&mut vehicle, &path).abs() < f64::EPSILON);
        assert!(!vehicle.has_arrived(&path));
        assert_eq!(steps_to_arrive(&path, 0.0), None);
    }
}
