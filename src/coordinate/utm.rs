//! Transverse Mercator math for the WGS 84 UTM zones

use std::f64::consts::PI;

/// UTM projection for a specific zone.
#[derive(Debug, Clone, Copy)]
pub struct UtmProjection {
    /// Central meridian in degrees
    central_meridian: f64,
    /// False northing in meters (0 for northern hemisphere, 10,000,000 for southern)
    false_northing: f64,
}

impl UtmProjection {
    /// WGS84 equatorial radius in meters
    const A: f64 = 6_378_137.0;
    /// WGS84 flattening
    const F: f64 = 1.0 / 298.257_223_563;
    /// Scale factor at central meridian
    const SCALE_FACTOR: f64 = 0.9996;
    /// False easting in meters
    const FALSE_EASTING: f64 = 500_000.0;

    /// Create a UTM projection for a given zone (1-60) and hemisphere.
    pub fn new(zone: u8, northern: bool) -> Self {
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;

        Self {
            central_meridian,
            false_northing: if northern { 0.0 } else { 10_000_000.0 },
        }
    }

    /// Get the central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    /// Standard zone and hemisphere containing a longitude/latitude.
    ///
    /// Returns `(zone, is_southern)`. The Norway and Svalbard exceptions are
    /// not applied.
    pub fn zone_for(lon: f64, lat: f64) -> (u8, bool) {
        // Normalise into [-180, 180) so 180 falls into zone 1
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        let zone = (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;
        (zone, lat < 0.0)
    }

    /// Convert geographic longitude/latitude in degrees to easting/northing in meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat_rad = lat * PI / 180.0;
        let lon_rad = lon * PI / 180.0;
        let lon0_rad = self.central_meridian * PI / 180.0;

        let e2 = 2.0 * Self::F - Self::F * Self::F;
        let e_prime2 = e2 / (1.0 - e2);

        let n = Self::A / (1.0 - e2 * lat_rad.sin().powi(2)).sqrt();
        let t = lat_rad.tan().powi(2);
        let c = e_prime2 * lat_rad.cos().powi(2);
        let a_coef = (lon_rad - lon0_rad) * lat_rad.cos();

        // Meridian arc length
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let m = Self::A
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin());

        let x = Self::SCALE_FACTOR * n
            * (a_coef
                + (1.0 - t + c) * a_coef.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * e_prime2) * a_coef.powi(5) / 120.0)
            + Self::FALSE_EASTING;

        let y = Self::SCALE_FACTOR
            * (m
                + n * lat_rad.tan()
                    * (a_coef.powi(2) / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a_coef.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * e_prime2)
                            * a_coef.powi(6)
                            / 720.0))
            + self.false_northing;

        (x, y)
    }

    /// Convert easting/northing in meters back to longitude/latitude in degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - Self::FALSE_EASTING;
        let y = y - self.false_northing;

        let e2 = 2.0 * Self::F - Self::F * Self::F;
        let e_prime2 = e2 / (1.0 - e2);
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let m = y / Self::SCALE_FACTOR;
        let mu = m / (Self::A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        // Footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let n1 = Self::A / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let t1 = phi1.tan().powi(2);
        let c1 = e_prime2 * phi1.cos().powi(2);
        let r1 = Self::A * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = x / (n1 * Self::SCALE_FACTOR);

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * e_prime2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * e_prime2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon = self.central_meridian * PI / 180.0
            + (d
                - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * e_prime2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos();

        (lon * 180.0 / PI, lat * 180.0 / PI)
    }
}
