//! Per-frame scatter-panel rendering
//!
//! `render_frame` is a pure function of a snapshot: it writes one JPEG,
//! `image_<frame>.jpg`, laid out as a 2×2 grid:
//!
//! ```text
//!   XZ    | info (recoil velocities, km/s)
//!   XY    | YZ
//! ```
//!
//! Test particles are small translucent dots; the central body is a large
//! magenta marker at the panel origin. When `color_by_velocity` is set,
//! each projection colors its points by the out-of-plane velocity component
//! (XY by vz, YZ by vx, XZ by vy) on a blue-red ramp, the XY panel with the
//! ramp reversed.

use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::archive::archive::Snapshot;
use crate::simulation::params::KMS_PER_CODE_VELOCITY;
use crate::simulation::states::NVec3;

/// Rendering options shared by every frame of a run.
#[derive(Debug, Clone)]
pub struct FrameStyle {
    pub kick: NVec3,             // recoil velocity for the info panel, code units
    pub color_by_velocity: bool, // color points by out-of-plane velocity
}

const IMAGE_SIZE: (u32, u32) = (900, 800);
const DOT_SIZE: i32 = 2;
const CENTRAL_SIZE: i32 = 6;

/// Render one frame to `<dir>/image_<frame>.jpg`.
pub fn render_frame(snap: &Snapshot, frame: usize, dir: &Path, style: &FrameStyle) -> Result<()> {
    let path = dir.join(format!("image_{frame}.jpg"));
    let root = BitMapBackend::new(&path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Test-particle projections; the central body is drawn separately.
    let disk = snap.bodies.get(1..).unwrap_or_default();
    let xy: Vec<(f64, f64)> = disk.iter().map(|b| (b.x.x, b.x.y)).collect();
    let zy: Vec<(f64, f64)> = disk.iter().map(|b| (b.x.z, b.x.y)).collect();
    let xz: Vec<(f64, f64)> = disk.iter().map(|b| (b.x.x, b.x.z)).collect();
    let vx: Vec<f64> = disk.iter().map(|b| b.v.x).collect();
    let vy: Vec<f64> = disk.iter().map(|b| b.v.y).collect();
    let vz: Vec<f64> = disk.iter().map(|b| b.v.z).collect();

    let colored = style.color_by_velocity;
    let panels = root.split_evenly((2, 2));
    scatter_panel(&panels[0], "XZ", &xz, colored.then_some(vy.as_slice()), false)?;
    info_panel(&panels[1], style.kick)?;
    scatter_panel(&panels[2], "XY", &xy, colored.then_some(vz.as_slice()), true)?;
    scatter_panel(&panels[3], "YZ", &zy, colored.then_some(vx.as_slice()), false)?;

    root.present()?;
    Ok(())
}

/// One scatter projection: test particles, then the central-body marker.
fn scatter_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    pts: &[(f64, f64)],
    color_by: Option<&[f64]>,
    reversed: bool,
) -> Result<()> {
    let (x_range, y_range) = panel_ranges(pts);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(24)
        .y_label_area_size(48)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().disable_mesh().draw()?;

    match color_by {
        Some(vals) => {
            let (lo, hi) = min_max(vals);
            chart.draw_series(pts.iter().zip(vals.iter()).map(|(&(x, y), &v)| {
                let mut u = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
                if reversed {
                    u = 1.0 - u;
                }
                Circle::new((x, y), DOT_SIZE, ramp_color(u).filled())
            }))?;
        }
        None => {
            chart.draw_series(
                pts.iter()
                    .map(|&(x, y)| Circle::new((x, y), DOT_SIZE, BLUE.mix(0.25).filled())),
            )?;
        }
    }

    // Central body: distinct marker at the panel origin
    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        CENTRAL_SIZE,
        MAGENTA.filled(),
    )))?;

    Ok(())
}

/// The informational panel: run description and recoil velocities in km/s.
fn info_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, kick: NVec3) -> Result<()> {
    let header = ("sans-serif", 22).into_font().color(&BLACK);
    let line = ("sans-serif", 18).into_font().color(&BLACK);

    area.draw(&Text::new(
        "SMBH Recoil [Distance in AU]".to_string(),
        (40, 60),
        header,
    ))?;
    area.draw(&Text::new(
        format!("Initial Z velocity (km/s): {:.4}", kick.z * KMS_PER_CODE_VELOCITY),
        (40, 100),
        line.clone(),
    ))?;
    area.draw(&Text::new(
        format!("Initial X velocity (km/s): {:.4}", kick.x * KMS_PER_CODE_VELOCITY),
        (40, 130),
        line.clone(),
    ))?;
    area.draw(&Text::new(
        format!("Initial Y velocity (km/s): {:.4}", kick.y * KMS_PER_CODE_VELOCITY),
        (40, 160),
        line,
    ))?;

    Ok(())
}

/// Symmetric-ish plot ranges covering all points and the origin, padded 5%.
fn panel_ranges(pts: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_lo = 0.0f64;
    let mut x_hi = 0.0f64;
    let mut y_lo = 0.0f64;
    let mut y_hi = 0.0f64;
    for &(x, y) in pts {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    (pad_range(x_lo, x_hi), pad_range(y_lo, y_hi))
}

fn pad_range(lo: f64, hi: f64) -> std::ops::Range<f64> {
    let span = hi - lo;
    if span <= 0.0 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = 0.05 * span;
    (lo - pad)..(hi + pad)
}

/// Blue -> white -> red ramp for velocity coloring, `u` in [0, 1].
fn ramp_color(u: f64) -> RGBColor {
    let u = u.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;
    let (r, g, b) = if u < 0.5 {
        let t = 2.0 * u;
        (lerp(59.0, 221.0, t), lerp(76.0, 221.0, t), lerp(192.0, 221.0, t))
    } else {
        let t = 2.0 * u - 1.0;
        (lerp(221.0, 180.0, t), lerp(221.0, 4.0, t), lerp(221.0, 38.0, t))
    };
    RGBColor(r as u8, g as u8, b as u8)
}

/// Smallest and largest finite-ordered values of a slice.
fn min_max(vals: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in vals {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo, hi)
}
