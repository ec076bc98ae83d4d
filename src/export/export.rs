//! Archive exporter: snapshots → CSV tables
//!
//! Walks every snapshot of a previously written archive and materializes
//! the per-particle state into tabular files:
//!
//! - `sim{X,Y,Z,VX,VY,VZ}data.csv` — one table per coordinate axis,
//!   comma-delimited, no header. The first row holds the snapshot times;
//!   each later row is one particle's value across all snapshots.
//! - `TimestepData/t<frame>.csv` — one file per snapshot, header
//!   `X,Y,Z,Vx,Vy,Vz`, one row per particle.
//! - `THE.csv` — optional merged wide table, one row per particle with the
//!   six axis blocks side by side. Rows containing a non-finite value are
//!   dropped (and counted in a warning). The merge grows as
//!   particles × frames × 6 and is only meant for small runs.
//!
//! The central body occupies row 0 of every table; its values stay zero by
//! the drive loop's re-centering invariant.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::archive::archive::{ArchiveReader, Snapshot};

/// Axis names as they appear in the `sim*data.csv` file names.
const AXIS_NAMES: [&str; 6] = ["X", "Y", "Z", "VX", "VY", "VZ"];

/// Six `[snapshot][particle]` tables plus the snapshot times.
#[derive(Debug, Clone)]
pub struct AxisTables {
    pub times: Vec<f64>,
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
    pub vx: Vec<Vec<f64>>,
    pub vy: Vec<Vec<f64>>,
    pub vz: Vec<Vec<f64>>,
}

impl AxisTables {
    /// Accumulate per-axis tables from snapshots in save order.
    /// Errors if the particle count varies between snapshots.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Result<Self> {
        let n_bodies = snapshots.first().map_or(0, |s| s.bodies.len());
        for (i, s) in snapshots.iter().enumerate() {
            if s.bodies.len() != n_bodies {
                bail!(
                    "snapshot {i} holds {} bodies, expected {n_bodies}",
                    s.bodies.len()
                );
            }
        }

        let mut tables = Self {
            times: Vec::with_capacity(snapshots.len()),
            x: Vec::with_capacity(snapshots.len()),
            y: Vec::with_capacity(snapshots.len()),
            z: Vec::with_capacity(snapshots.len()),
            vx: Vec::with_capacity(snapshots.len()),
            vy: Vec::with_capacity(snapshots.len()),
            vz: Vec::with_capacity(snapshots.len()),
        };

        for snap in snapshots {
            tables.times.push(snap.t);
            // Row 0 (the central body) stays zero; re-centering keeps it
            // at the origin anyway.
            let mut row_x = vec![0.0; n_bodies];
            let mut row_y = vec![0.0; n_bodies];
            let mut row_z = vec![0.0; n_bodies];
            let mut row_vx = vec![0.0; n_bodies];
            let mut row_vy = vec![0.0; n_bodies];
            let mut row_vz = vec![0.0; n_bodies];
            for (j, b) in snap.bodies.iter().enumerate().skip(1) {
                row_x[j] = b.x.x;
                row_y[j] = b.x.y;
                row_z[j] = b.x.z;
                row_vx[j] = b.v.x;
                row_vy[j] = b.v.y;
                row_vz[j] = b.v.z;
            }
            tables.x.push(row_x);
            tables.y.push(row_y);
            tables.z.push(row_z);
            tables.vx.push(row_vx);
            tables.vy.push(row_vy);
            tables.vz.push(row_vz);
        }

        Ok(tables)
    }

    /// Number of snapshots.
    pub fn n_snapshots(&self) -> usize {
        self.times.len()
    }

    /// Number of particles per snapshot (central body included).
    pub fn n_particles(&self) -> usize {
        self.x.first().map_or(0, |row| row.len())
    }

    fn axes(&self) -> [&Vec<Vec<f64>>; 6] {
        [&self.x, &self.y, &self.z, &self.vx, &self.vy, &self.vz]
    }
}

/// Read the archive at `archive_path` and write every export table under
/// `out_dir`.
pub fn export_archive(archive_path: &Path, out_dir: &Path, merged: bool) -> Result<()> {
    let snapshots = ArchiveReader::open(archive_path)?.read_all()?;
    let tables = AxisTables::from_snapshots(&snapshots)?;

    remove_stale_outputs(out_dir)?;
    write_axis_tables(&tables, out_dir)?;
    write_timestep_tables(&tables, out_dir)?;
    if merged {
        write_merged_table(&tables, &out_dir.join("THE.csv"))?;
    }

    log::info!(
        "exported {} snapshots x {} particles to {}",
        tables.n_snapshots(),
        tables.n_particles(),
        out_dir.display()
    );
    Ok(())
}

/// Remove export files left by a previous run. Missing files are fine.
pub fn remove_stale_outputs(out_dir: &Path) -> Result<()> {
    for axis in AXIS_NAMES {
        remove_if_present(&out_dir.join(format!("sim{axis}data.csv")))?;
    }
    remove_if_present(&out_dir.join("THE.csv"))?;
    let timestep_dir = out_dir.join("TimestepData");
    if timestep_dir.is_dir() {
        fs::remove_dir_all(&timestep_dir)
            .with_context(|| format!("removing stale {}", timestep_dir.display()))?;
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing stale {}", path.display())),
    }
}

/// Write the six per-axis CSVs: times row first, then one row per particle
/// holding that particle's value at every snapshot.
pub fn write_axis_tables(tables: &AxisTables, out_dir: &Path) -> Result<()> {
    for (axis, table) in AXIS_NAMES.iter().zip(tables.axes()) {
        let path = out_dir.join(format!("sim{axis}data.csv"));
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        );

        writeln!(out, "{}", join_row(&tables.times))?;
        for p in 0..tables.n_particles() {
            let row: Vec<f64> = table.iter().map(|snap_row| snap_row[p]).collect();
            writeln!(out, "{}", join_row(&row))?;
        }
        out.flush()?;
    }
    Ok(())
}

/// Write `TimestepData/t<frame>.csv` for every snapshot: header
/// `X,Y,Z,Vx,Vy,Vz`, one row per particle.
pub fn write_timestep_tables(tables: &AxisTables, out_dir: &Path) -> Result<()> {
    let dir = out_dir.join("TimestepData");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    for s in 0..tables.n_snapshots() {
        let path = dir.join(format!("t{s}.csv"));
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        );

        writeln!(out, "X,Y,Z,Vx,Vy,Vz")?;
        for p in 0..tables.n_particles() {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                tables.x[s][p],
                tables.y[s][p],
                tables.z[s][p],
                tables.vx[s][p],
                tables.vy[s][p],
                tables.vz[s][p]
            )?;
        }
        out.flush()?;
    }
    Ok(())
}

/// Write the merged wide table: one row per particle, the six axis blocks
/// side by side, dropping rows that contain a non-finite value anywhere.
pub fn write_merged_table(tables: &AxisTables, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );

    // Header: particle index, then one column per (axis, snapshot)
    let mut header = vec!["particle".to_string()];
    for axis in AXIS_NAMES {
        for s in 0..tables.n_snapshots() {
            header.push(format!("{}{s}", axis.to_lowercase()));
        }
    }
    writeln!(out, "{}", header.join(","))?;

    let mut dropped = 0usize;
    for p in 0..tables.n_particles() {
        let mut row = Vec::with_capacity(1 + 6 * tables.n_snapshots());
        let mut finite = true;
        for table in tables.axes() {
            for snap_row in table.iter() {
                let v = snap_row[p];
                finite &= v.is_finite();
                row.push(v);
            }
        }
        if !finite {
            // A single bad frame discards the particle's entire history.
            dropped += 1;
            continue;
        }
        writeln!(out, "{p},{}", join_row(&row))?;
    }
    out.flush()?;

    if dropped > 0 {
        log::warn!(
            "merged table dropped {dropped} particle row(s) containing non-finite values \
             (their full history, not just the bad frames)"
        );
    }
    Ok(())
}

fn join_row(vals: &[f64]) -> String {
    vals.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
