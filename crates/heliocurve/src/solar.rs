//! Solar position from NOAA low-order closed forms.
//!
//! Purpose
//! - Turn (site, date, wall-clock hour) into sun elevation/azimuth and from
//!   there into the unit sun vectors the rasterizer consumes.
//!
//! Model
//! - Fractional year from day-of-year and UTC hour, equation of time and
//!   declination from the NOAA trigonometric series, hour angle from true
//!   solar time, zenith via clamped acos, optional refraction correction.
//! - Timezone handling is a fixed offset; there is no DST.
//!
//! Code cross-refs: `shadow::ShadowRaster::run_with_sun_vectors`,
//! `fitness::DaylightEvaluator` (precomputes seasonal vector sets).

use crate::Vec3;

/// Observer site: geographic coordinates plus fixed UTC offset in hours.
#[derive(Clone, Copy, Debug)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub tz_hours: f64,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            latitude_deg: 32.0603,
            longitude_deg: 118.7969,
            tz_hours: 8.0,
        }
    }
}

/// Civil calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// 1-based ordinal day, leap-year aware.
    pub fn day_of_year(&self) -> u32 {
        const CUM: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        let m = self.month.clamp(1, 12) as usize;
        let mut doy = CUM[m - 1] + self.day;
        if m > 2 && is_leap(self.year) {
            doy += 1;
        }
        doy
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Full solar position record for one instant.
#[derive(Clone, Copy, Debug)]
pub struct SolarPosition {
    pub geometric_elevation_deg: f64,
    pub apparent_elevation_deg: f64,
    /// Clockwise from north, normalized to [0, 360).
    pub azimuth_deg: f64,
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
    pub equation_of_time_min: f64,
    /// Local minutes after midnight.
    pub solar_noon_min: f64,
}

/// Fractional year in radians. `utc_hour` may lie outside [0, 24).
#[inline]
fn fractional_year(day_of_year: u32, utc_hour: f64) -> f64 {
    2.0 * std::f64::consts::PI / 365.0
        * (day_of_year as f64 - 1.0 + (utc_hour - 12.0) / 24.0)
}

/// Equation of time in minutes.
fn equation_of_time_min(gamma: f64) -> f64 {
    229.18
        * (0.000075 + 0.001868 * gamma.cos() - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin())
}

/// Solar declination in radians.
fn declination_rad(gamma: f64) -> f64 {
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin() - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Atmospheric refraction correction in degrees, zero at or below -0.575°.
fn refraction_deg(geometric_elevation_deg: f64) -> f64 {
    let h = geometric_elevation_deg;
    if h <= -0.575 || h > 85.0 {
        return 0.0;
    }
    let te = h.to_radians().tan();
    let arcsec = if h > 5.0 {
        58.1 / te - 0.07 / te.powi(3) + 0.000086 / te.powi(5)
    } else {
        1735.0 + h * (-518.2 + h * (103.4 + h * (-12.79 + h * 0.711)))
    };
    arcsec / 3600.0
}

/// Solar position at `local_hour` (fractional wall-clock hours) on `date`.
pub fn solar_position(site: Site, date: Date, local_hour: f64, apply_refraction: bool) -> SolarPosition {
    let doy = date.day_of_year();
    let utc_hour = local_hour - site.tz_hours;
    let gamma = fractional_year(doy, utc_hour);
    let eot = equation_of_time_min(gamma);
    let decl = declination_rad(gamma);

    // True solar time in minutes, then hour angle.
    let tst = local_hour * 60.0 + eot + 4.0 * site.longitude_deg - 60.0 * site.tz_hours;
    let hour_angle_deg = tst / 4.0 - 180.0;
    let ha = hour_angle_deg.to_radians();
    let lat = site.latitude_deg.to_radians();

    let cos_zenith = (lat.sin() * decl.sin() + lat.cos() * decl.cos() * ha.cos()).clamp(-1.0, 1.0);
    let geometric_elevation_deg = 90.0 - cos_zenith.acos().to_degrees();
    let apparent_elevation_deg = if apply_refraction {
        geometric_elevation_deg + refraction_deg(geometric_elevation_deg)
    } else {
        geometric_elevation_deg
    };

    let az = ha.sin().atan2(ha.cos() * lat.sin() - decl.tan() * lat.cos());
    let azimuth_deg = (az.to_degrees() + 180.0).rem_euclid(360.0);

    // Solar noon: the estimator depends on the equation of time at the
    // estimated instant, so run two fixed-point passes.
    let mut noon_min = 720.0;
    for _ in 0..2 {
        let g = fractional_year(doy, noon_min / 60.0 - site.tz_hours);
        noon_min = 720.0 - 4.0 * site.longitude_deg - equation_of_time_min(g) + 60.0 * site.tz_hours;
    }

    SolarPosition {
        geometric_elevation_deg,
        apparent_elevation_deg,
        azimuth_deg,
        declination_deg: decl.to_degrees(),
        hour_angle_deg,
        equation_of_time_min: eot,
        solar_noon_min: noon_min,
    }
}

/// Unit vector from the scene toward the sun in the basis spanned by `up` and
/// `north`, with `east = north × up` (right-handed).
pub fn direction_to_sun(elevation_deg: f64, azimuth_deg: f64, up: Vec3, north: Vec3) -> Vec3 {
    let east = north.cross(&up);
    let e = elevation_deg.to_radians();
    let a = azimuth_deg.to_radians();
    let horizontal = north * a.cos() + east * a.sin();
    (horizontal * e.cos() + up * e.sin()).normalize()
}

/// Local sunrise and sunset in minutes after midnight, using the NOAA
/// zenith of 90.833° (refraction plus solar radius). `None` during polar day
/// or polar night.
pub fn sunrise_sunset(site: Site, date: Date) -> Option<(f64, f64)> {
    let pos = solar_position(site, date, 12.0, false);
    let lat = site.latitude_deg.to_radians();
    let decl = pos.declination_deg.to_radians();
    let zenith = 90.833f64.to_radians();
    let cos_ha = (zenith.cos() - lat.sin() * decl.sin()) / (lat.cos() * decl.cos());
    if !(-1.0..=1.0).contains(&cos_ha) {
        return None;
    }
    let ha_deg = cos_ha.acos().to_degrees();
    Some((
        pos.solar_noon_min - 4.0 * ha_deg,
        pos.solar_noon_min + 4.0 * ha_deg,
    ))
}

/// One sampled day: instants `start, start+interval, ..` up to `end` inclusive.
#[derive(Clone, Copy, Debug)]
pub struct SampleWindow {
    pub date: Date,
    pub start_hour: f64,
    pub end_hour: f64,
    pub interval_hours: f64,
    /// Samples at apparent elevation at or below this yield no sun vector.
    pub min_elevation_deg: f64,
}

impl SampleWindow {
    pub fn new(date: Date) -> Self {
        Self {
            date,
            start_hour: 8.0,
            end_hour: 16.0,
            interval_hours: 2.0,
            min_elevation_deg: 0.0,
        }
    }
}

/// Precompute the sun-vector set for one window. Below-threshold instants are
/// dropped, so the result may be shorter than the instant count.
pub fn sun_vectors(site: Site, window: SampleWindow, up: Vec3, north: Vec3) -> Vec<Vec3> {
    let mut out = Vec::new();
    if window.interval_hours <= 0.0 {
        return out;
    }
    let mut hour = window.start_hour;
    while hour <= window.end_hour + 1e-9 {
        let pos = solar_position(site, window.date, hour, true);
        if pos.apparent_elevation_deg > window.min_elevation_deg {
            out.push(direction_to_sun(pos.apparent_elevation_deg, pos.azimuth_deg, up, north));
        }
        hour += window.interval_hours;
    }
    out
}
