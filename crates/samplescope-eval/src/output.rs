use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::EvalError;
use crate::model::{SweepReport, SweepTable};
use crate::report::render_report;
use crate::series::Field;

/// Paths written by [`write_sweep_outputs`].
#[derive(Debug, Clone)]
pub struct SweepOutputs {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub report_path: PathBuf,
    pub csv_bytes: u64,
}

/// Write `sweep.csv`, `sweep.json` and `report.md` into `out_dir`.
pub fn write_sweep_outputs(report: &SweepReport, out_dir: &Path) -> Result<SweepOutputs, EvalError> {
    fs::create_dir_all(out_dir)?;

    let csv_path = out_dir.join("sweep.csv");
    let csv_bytes = write_sweep_csv(&report.table, fs::File::create(&csv_path)?)?;

    let json_path = out_dir.join("sweep.json");
    fs::write(&json_path, serde_json::to_vec_pretty(report)?)?;

    let report_path = out_dir.join("report.md");
    fs::write(&report_path, render_report(report).as_bytes())?;

    info!(
        run_id = %report.run_id,
        out_dir = %out_dir.display(),
        csv_bytes,
        "sweep outputs written"
    );

    Ok(SweepOutputs {
        csv_path,
        json_path,
        report_path,
        csv_bytes,
    })
}

/// Write the sweep table as one flat CSV row per sweep row.
///
/// Columns are `SampleSize`, `SamplingStrategy`, then
/// `<column>.<metric>.statistic` and `<column>.<metric>.p_value` for every
/// metric seen in the table. Failed outcomes are left empty. Returns the
/// number of bytes written.
pub fn write_sweep_csv<W: Write>(table: &SweepTable, writer: W) -> Result<u64, EvalError> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let keys = table
        .rows()
        .iter()
        .flat_map(|row| {
            row.columns.iter().flat_map(|(column, comparison)| {
                comparison
                    .keys()
                    .map(move |metric| (column.clone(), metric.clone()))
            })
        })
        .collect::<BTreeSet<_>>();

    let mut header = vec!["SampleSize".to_string(), "SamplingStrategy".to_string()];
    for (column, metric) in &keys {
        for field in [Field::Statistic, Field::PValue] {
            header.push(format!("{column}.{metric}.{}", field.as_str()));
        }
    }
    writer.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.sample_size.to_string(), row.sampling_strategy.clone()];
        for (column, metric) in &keys {
            let measurement = row
                .columns
                .get(column)
                .and_then(|comparison| comparison.get(metric))
                .and_then(|outcome| outcome.measurement());
            for field in [Field::Statistic, Field::PValue] {
                record.push(
                    measurement
                        .map(|measurement| field.value(measurement).to_string())
                        .unwrap_or_default(),
                );
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
