//! Force / acceleration contributors for the recoil engine
//!
//! Defines the acceleration trait and the Newtonian gravity term used by the
//! integrators. Only bodies with positive mass act as sources; every body is
//! a sink. Test particles are massless, so they shape nothing — in
//! particular the central body feels no pull from the disk and coasts.

use crate::simulation::states::{System, NVec3};

/// Collection of acceleration terms (gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec3]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec3]);
}

/// Newtonian gravity with softening, massive sources only
///
/// With a single massive body this is O(N): each test particle feels the
/// central body and nothing else. Additional massive bodies attract each
/// other pairwise as usual.
pub struct NewtonianGravity {
    pub g: f64,    // gravitational constant
    pub eps2: f64, // softening
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) {
        let n = sys.bodies.len();
        if n == 0 { // no bodies, return
            return;
        }

        // Loop over sources j with m_j > 0, pulling every other body i
        for j in 0..n {
            let bj = &sys.bodies[j];
            let mj = bj.m;      // mass of the source
            if mj <= 0.0 {
                // massless bodies exert nothing
                continue;
            }
            let xj = bj.x;      // position of the source

            for i in 0..n {
                if i == j {
                    continue;
                }
                let bi = &sys.bodies[i];

                // r points from the sink i toward the source j,
                // so i feels a pull along +r
                let r = xj - bi.x;

                // Squared separation distance |r|^2 (no softening yet)
                let r2 = r.dot(&r);

                // Per-pair softening: average of the squared radii plus the
                // global floor eps2
                let soft2 = 0.5 * (bi.radius * bi.radius + bj.radius * bj.radius) + self.eps2;

                // Total softened squared distance
                let d2 = r2 + soft2;

                // 1 / |r_soft| and 1 / |r_soft|^3
                let inv_r = d2.sqrt().recip();
                let inv_r3 = inv_r * inv_r * inv_r;

                // a_i += G * m_j * r / |r_soft|^3
                out[i] += self.g * mj * inv_r3 * r;
            }
        }
    }
}
