//! Fixed-step time integrators for the recoil system
//!
//! Provides a double-evaluation velocity-Verlet and a single-evaluation
//! leapfrog integrator, both driven by `AccelSet` and `Parameters`

use super::states::{System, NVec3};
use super::forces::AccelSet;
use super::params::Parameters;

/// Advance the system by one step using velocity-Verlet
/// Uses two force evaluations per step and updates positions, velocities,
/// and `sys.t` in-place based on `params.h0`
pub fn verlet_integrator(sys: &mut System, forces: &mut AccelSet, params: &mut Parameters) {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return;
    }

    let dt = params.h0; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2

    // a_n from x_n at time t_n
    let mut a_old = vec![NVec3::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_old);

    // Kick: v_n+1/2 = v_n + (1/2 * dt) * a_n
    for (b, a) in sys.bodies.iter_mut().zip(a_old.iter()) {
        b.v += half_dt * *a;
    }

    // Drift: full-step position: x_n+1 = x_n + dt v_n+1/2
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }

    // advance time: t_n+1 = t_n + dt
    sys.t += dt;

    // a_n+1 from x_n+1 at time t_n+1
    let mut a_new = vec![NVec3::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut a_new);

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) * a_n+1
    for (b, a) in sys.bodies.iter_mut().zip(a_new.iter()) {
        b.v += half_dt * *a;
    }
}

/// Advance the system by one step using a single-force-eval leapfrog.
/// Uses one force evaluation per step and updates positions, velocities,
/// and `sys.t` in-place with fixed step `dt = params.h0`.
pub fn leapfrog_integrator(sys: &mut System, forces: &mut AccelSet, params: &mut Parameters) {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return;
    }
    let dt = params.h0; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2

    // Drift: x_half = x_n + (dt/2) * v_n
    for b in sys.bodies.iter_mut() {
        b.x += half_dt * b.v;
    }

    // half time (t_n + dt/2)
    let t_mid = sys.t + half_dt;

    // compute a_mid from x_half
    let mut a_mid = vec![NVec3::zeros(); n];
    forces.accumulate_accels(t_mid, &*sys, &mut a_mid);

    // Kick: v_n+1 = v_n + dt * a_mid
    for (b, a) in sys.bodies.iter_mut().zip(a_mid.iter()) {
        b.v += dt * *a;
    }

    // Second drift: x_n+1 = x_half + (dt/2) * v_n+1
    for b in sys.bodies.iter_mut() {
        b.x += half_dt * b.v;
    }

    // finish advancing time: t_n+1 = t_n + dt
    sys.t += dt;
}
