//! Reference-frame transforms for the recoil system
//!
//! The drive loop sequences three frame operations:
//! - `move_to_com` shifts positions and velocities into the mass-weighted
//!   center-of-mass frame,
//! - `move_to_central_frame` shifts positions and velocities so the central
//!   body sits at the origin at rest (the kick is applied here),
//! - `recenter_on_central` translates positions only, keeping the central
//!   body at the origin between frames without touching velocities.
//!
//! A uniform translation leaves all relative separations unchanged, so none
//! of these alter the forces or the relative trajectories.

use crate::simulation::states::{NVec3, System};

impl System {
    /// Shift all positions and velocities into the center-of-mass frame.
    /// A system with zero total mass is left unchanged.
    pub fn move_to_com(&mut self) {
        let m_total: f64 = self.bodies.iter().map(|b| b.m).sum();
        if m_total <= 0.0 {
            return;
        }

        let mut x_com = NVec3::zeros();
        let mut v_com = NVec3::zeros();
        for b in &self.bodies {
            x_com += b.m * b.x;
            v_com += b.m * b.v;
        }
        x_com /= m_total;
        v_com /= m_total;

        for b in self.bodies.iter_mut() {
            b.x -= x_com;
            b.v -= v_com;
        }
    }

    /// Shift all positions and velocities so the central body (index 0) is
    /// at the origin at rest.
    pub fn move_to_central_frame(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let x0 = self.bodies[0].x;
        let v0 = self.bodies[0].v;
        for b in self.bodies.iter_mut() {
            b.x -= x0;
            b.v -= v0;
        }
    }

    /// Translate positions so the central body is at the origin.
    /// Velocities are untouched: the archived central velocity stays exactly
    /// what the kick set it to.
    pub fn recenter_on_central(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let x0 = self.bodies[0].x;
        for b in self.bodies.iter_mut() {
            b.x -= x0;
        }
    }
}
