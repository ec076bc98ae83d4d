//! Append-only binary snapshot archive
//!
//! The drive loop appends one [`Snapshot`] per frame; the exporter reads
//! them back in save order. Records are length-prefixed `bincode` blobs:
//!
//! ```text
//! [u64 le record length][bincode Snapshot] ...
//! ```
//!
//! The writer flushes after every append, so an interrupted run leaves at
//! most one truncated trailing record. Reading a truncated record is an
//! error — there is no recovery procedure, the run must be repeated.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::simulation::states::{NVec3, System};

/// Per-body state stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64,   // mass
}

/// An immutable copy of the simulation state at one output frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub t: f64,                // simulation time
    pub bodies: Vec<BodyState>, // all bodies, central body first
}

impl Snapshot {
    pub fn from_system(sys: &System) -> Self {
        Self {
            t: sys.t,
            bodies: sys
                .bodies
                .iter()
                .map(|b| BodyState {
                    x: b.x,
                    v: b.v,
                    m: b.m,
                })
                .collect(),
        }
    }
}

/// Exclusive append-only writer for the simulation phase.
pub struct ArchiveWriter {
    out: BufWriter<File>,
}

impl ArchiveWriter {
    /// Create (or truncate) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("creating archive {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Append one snapshot and flush it to disk.
    pub fn append(&mut self, snap: &Snapshot) -> Result<()> {
        let bytes = bincode::serialize(snap).context("serializing snapshot")?;
        self.out.write_all(&(bytes.len() as u64).to_le_bytes())?;
        self.out.write_all(&bytes)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Read-only view of a previously written archive.
pub struct ArchiveReader {
    buf: Vec<u8>,
}

impl ArchiveReader {
    /// Open the archive at `path`, reading it fully into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)
            .with_context(|| format!("opening archive {}", path.display()))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(Self { buf })
    }

    /// All snapshots in save order.
    pub fn read_all(&self) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut pos = 0usize;
        while pos < self.buf.len() {
            if pos + 8 > self.buf.len() {
                bail!("truncated archive: partial record length at byte {pos}");
            }
            let mut len_bytes = [0u8; 8];
            len_bytes.copy_from_slice(&self.buf[pos..pos + 8]);
            let len = u64::from_le_bytes(len_bytes) as usize;
            pos += 8;

            if pos + len > self.buf.len() {
                bail!("truncated archive: record of {len} bytes at byte {pos} runs past EOF");
            }
            let snap: Snapshot = bincode::deserialize(&self.buf[pos..pos + len])
                .with_context(|| format!("decoding snapshot record at byte {pos}"))?;
            snapshots.push(snap);
            pos += len;
        }
        Ok(snapshots)
    }
}
