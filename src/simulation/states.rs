//! Core state types for the recoil simulation.
//!
//! Defines the body/system structs:
//! - `Body` using `NVec3`
//! - `System` holding the list of bodies and the current simulation time `t`
//!
//! The central black hole is always `bodies[0]`; every other body is a
//! massless test particle (`m = 0`).

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass (0 for test particles)
    pub radius: f64, // radius (softening)
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, central body first
    pub t: f64, // time
}

impl System {
    /// The central body (index 0). Panics on an empty system.
    pub fn central(&self) -> &Body {
        &self.bodies[0]
    }
}
