use std::fs::{self, File};
use std::io::Seek;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use npyz::{NpyWriter, WriteOptions, WriterBuilder};

use crate::report::Reporter;
use crate::schema::{TrainingRow, ROW_BYTES};

/// Appends [`TrainingRow`]s to a structured `.npy` file whose allocation
/// grows ahead of the logical row count.
///
/// Rows land in a `<dest>.npy.tmp` sibling. When a row no longer fits, the
/// file is extended to `2 * capacity + 1` rows worth of space, so a long
/// conversion costs a logarithmic number of resizes instead of one per row.
/// `finish` trims the allocation back to the rows actually written, patches
/// the header and renames the file into place, so a visible output is
/// always a complete dataset.
pub struct DatasetWriter<'r> {
    npy: NpyWriter<TrainingRow, File>,
    /// Second handle to the same file, used for resizing.
    alloc: File,
    /// Offset of the first row, right after the header.
    data_start: u64,
    tmp_path: PathBuf,
    final_path: PathBuf,
    rows: u64,
    capacity: u64,
    report: &'r dyn Reporter,
}

impl<'r> DatasetWriter<'r> {
    pub fn create(path: &Path, report: &'r dyn Reporter) -> Result<Self> {
        let tmp_path = path.with_extension("npy.tmp");
        let file = File::create(&tmp_path)
            .with_context(|| format!("failed to create {}", tmp_path.display()))?;
        let mut alloc = file
            .try_clone()
            .with_context(|| format!("failed to reopen {}", tmp_path.display()))?;

        let npy = WriteOptions::new()
            .dtype(TrainingRow::dtype())
            .writer(file)
            .begin_1d()
            .with_context(|| format!("failed to start {}", tmp_path.display()))?;
        let data_start = alloc.stream_position()?;

        Ok(DatasetWriter {
            npy,
            alloc,
            data_start,
            tmp_path,
            final_path: path.to_path_buf(),
            rows: 0,
            capacity: 0,
            report,
        })
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Rows the file currently has space for.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn append(&mut self, row: &TrainingRow) -> Result<()> {
        if self.rows == self.capacity {
            self.capacity = 2 * self.capacity + 1;
            self.alloc
                .set_len(self.data_start + self.capacity * ROW_BYTES)
                .with_context(|| format!("failed to grow {}", self.tmp_path.display()))?;
            self.report.capacity_grown(self.capacity as usize);
        }

        self.npy
            .push(row)
            .with_context(|| format!("failed to write to {}", self.tmp_path.display()))?;
        self.rows += 1;
        Ok(())
    }

    /// Truncates spare capacity, seals the file and moves it into place.
    /// Returns the number of rows written.
    pub fn finish(self) -> Result<u64> {
        let DatasetWriter {
            npy,
            alloc,
            data_start,
            tmp_path,
            final_path,
            rows,
            ..
        } = self;

        npy.finish()
            .with_context(|| format!("failed to finish {}", tmp_path.display()))?;
        alloc
            .set_len(data_start + rows * ROW_BYTES)
            .with_context(|| format!("failed to truncate {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "failed to rename {} -> {}",
                tmp_path.display(),
                final_path.display()
            )
        })?;

        Ok(rows)
    }
}
