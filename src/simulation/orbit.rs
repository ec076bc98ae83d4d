//! Keplerian orbital elements → Cartesian state
//!
//! Converts `OrbitalElements` around a central mass into position and
//! velocity vectors: perifocal state first, then a rotation into the
//! inertial frame. The disk initializer only needs circular orbits
//! (`a`, true anomaly `f`), but the conversion is kept general.

use anyhow::{bail, Result};

use crate::simulation::states::NVec3;

/// Classical orbital elements, angles in radians.
#[derive(Debug, Clone)]
pub struct OrbitalElements {
    pub a: f64,    // semi-major axis
    pub e: f64,    // eccentricity
    pub inc: f64,  // inclination
    pub raan: f64, // longitude of ascending node
    pub argp: f64, // argument of pericenter
    pub f: f64,    // true anomaly
}

impl OrbitalElements {
    /// A circular, planar orbit at semi-major axis `a` and true anomaly `f`.
    pub fn circular(a: f64, f: f64) -> Self {
        Self {
            a,
            e: 0.0,
            inc: 0.0,
            raan: 0.0,
            argp: 0.0,
            f,
        }
    }
}

/// Convert orbital elements around a body of gravitational parameter
/// `gm = G * M` into an inertial-frame position/velocity pair.
///
/// Fails on degenerate elements: non-positive semi-major axis or an
/// eccentricity outside `[0, 1)`.
pub fn cartesian_from_elements(gm: f64, el: &OrbitalElements) -> Result<(NVec3, NVec3)> {
    if el.a <= 0.0 {
        bail!("degenerate orbit: semi-major axis {} must be positive", el.a);
    }
    if !(0.0..1.0).contains(&el.e) {
        bail!("degenerate orbit: eccentricity {} must be in [0, 1)", el.e);
    }
    if gm <= 0.0 {
        bail!("degenerate orbit: gravitational parameter {} must be positive", gm);
    }

    // Semi-latus rectum and radius at the given true anomaly
    let p = el.a * (1.0 - el.e * el.e);
    let cos_f = el.f.cos();
    let sin_f = el.f.sin();
    let r = p / (1.0 + el.e * cos_f);

    // Perifocal position and velocity
    let x_orb = r * cos_f;
    let y_orb = r * sin_f;
    let v_coef = (gm / p).sqrt();
    let vx_orb = -v_coef * sin_f;
    let vy_orb = v_coef * (el.e + cos_f);

    // Rotation from perifocal to the inertial frame
    let cos_raan = el.raan.cos();
    let sin_raan = el.raan.sin();
    let cos_w = el.argp.cos();
    let sin_w = el.argp.sin();
    let cos_i = el.inc.cos();
    let sin_i = el.inc.sin();

    // Combined rotation matrix elements
    let r11 = cos_raan * cos_w - sin_raan * sin_w * cos_i;
    let r12 = -cos_raan * sin_w - sin_raan * cos_w * cos_i;
    let r21 = sin_raan * cos_w + cos_raan * sin_w * cos_i;
    let r22 = -sin_raan * sin_w + cos_raan * cos_w * cos_i;
    let r31 = sin_w * sin_i;
    let r32 = cos_w * sin_i;

    let position = NVec3::new(
        r11 * x_orb + r12 * y_orb,
        r21 * x_orb + r22 * y_orb,
        r31 * x_orb + r32 * y_orb,
    );
    let velocity = NVec3::new(
        r11 * vx_orb + r12 * vy_orb,
        r21 * vx_orb + r22 * vy_orb,
        r31 * vx_orb + r32 * vy_orb,
    );

    Ok((position, velocity))
}
