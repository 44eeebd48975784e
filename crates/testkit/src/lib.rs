#![warn(missing_docs)]
//! Deterministic testing surfaces: a simulated peer, standard screens and
//! an op stream recorder.

#[allow(missing_docs)]
pub mod fixtures;
mod layout;
mod peer;

use anyhow::Result;
use serde::Serialize;
use stackshift_engine::{ClickKind, ClickOp};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use fixtures::Items;
pub use layout::*;
pub use peer::*;

/// One op as written to the JSONL stream.
#[derive(Debug, Serialize)]
pub struct OpRecord {
    /// Position in the stream.
    pub seq: usize,
    /// Window id the op was aimed at.
    pub sync_id: u32,
    /// Wire slot number (`-999` for outside).
    pub slot: i32,
    /// Button or packed drag stage.
    pub button: u8,
    /// Operation kind.
    pub kind: ClickKind,
}

impl OpRecord {
    /// Record for the `seq`-th op.
    pub fn new(seq: usize, op: &ClickOp) -> Self {
        Self {
            seq,
            sync_id: op.sync_id,
            slot: op.target.wire_slot(),
            button: op.button,
            kind: op.kind,
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Append one record.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Append every op in `ops`, numbered from zero.
    pub fn write_ops(&mut self, ops: &[ClickOp]) -> Result<()> {
        for (seq, op) in ops.iter().enumerate() {
            self.write(&OpRecord::new(seq, op))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_stream_is_one_line_per_op() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ops/stream.jsonl");
        let ops = [ClickOp::take_all(1, 4), ClickOp::drop_cursor(1)];

        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write_ops(&ops).expect("write succeeds");
        drop(sink);

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"slot\":4"));
        assert!(lines[1].contains("-999"));
    }
}
