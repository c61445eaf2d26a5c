use crate::core::Snapshot;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

pub enum TraceFormat {
    Csv,
    Tsv,
    Json,
}

/// One sampled moment of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    pub elapsed_seconds: f64,
    pub completed_units: f64,
    pub total_units: f64,
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub stabilized_seconds: f64,
}

/// Ordered record of trace points, exportable for offline tuning.
#[derive(Debug, Default)]
pub struct ProgressTrace {
    entries: Vec<TracePoint>,
}

impl ProgressTrace {
    pub fn push(&mut self, point: TracePoint) {
        self.entries.push(point)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<TracePoint> {
        self.entries.last().copied()
    }
    pub fn points(&self) -> &[TracePoint] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: TraceFormat) -> Result<(), Error> {
        match fmt {
            TraceFormat::Csv => self.export_with_delimiter(path, ','),
            TraceFormat::Tsv => self.export_with_delimiter(path, '\t'),
            TraceFormat::Json => self.export_json(path),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(
            w,
            "elapsed_seconds{d}completed_units{d}total_units{d}remaining_seconds{d}percent_complete{d}pace_ema{d}pace_filtered{d}stabilized_seconds",
            d = delimiter
        )?;
        for p in &self.entries {
            let s = &p.snapshot;
            writeln!(
                w,
                "{:.6}{d}{}{d}{}{d}{:.6}{d}{:.4}{d}{:.9}{d}{}{d}{}",
                p.elapsed_seconds,
                p.completed_units,
                p.total_units,
                s.remaining_seconds,
                s.percent_complete,
                s.pace_ema,
                s.pace_filtered
                    .map_or_else(String::new, |v| format!("{v:.9}")),
                p.stabilized_seconds,
                d = delimiter
            )?;
        }
        w.flush()
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, &self.entries)?;
        writeln!(w)?;
        w.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn point(elapsed: f64, done: f64, eta: f64, filtered: Option<f64>, shown: f64) -> TracePoint {
        TracePoint {
            elapsed_seconds: elapsed,
            completed_units: done,
            total_units: 10.0,
            snapshot: Snapshot {
                remaining_seconds: eta,
                percent_complete: done * 10.0,
                pace_ema: 0.5,
                pace_filtered: filtered,
            },
            stabilized_seconds: shown,
        }
    }

    #[test]
    fn default_is_empty_and_latest_none() {
        let t = ProgressTrace::default();
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert!(t.latest().is_none());
    }

    #[test]
    fn push_increases_len_and_latest_returns_copy() {
        let mut t = ProgressTrace::default();
        t.push(point(1.0, 2.0, 4.0, Some(0.5), 4.0));
        t.push(point(2.0, 4.0, 3.0, Some(0.5), 3.0));
        assert_eq!(t.len(), 2);
        let last = t.latest().unwrap();
        assert_eq!(last.completed_units, 4.0);
        assert_eq!(last.snapshot.remaining_seconds, 3.0);
        assert_eq!(t.points()[0].elapsed_seconds, 1.0);
    }

    #[test]
    fn export_csv_with_two_rows() {
        let mut t = ProgressTrace::default();
        t.push(point(0.5, 0.0, f64::INFINITY, None, f64::INFINITY));
        t.push(point(1.5, 2.0, 4.0, Some(0.5), 4.0));

        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TraceFormat::Csv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
elapsed_seconds,completed_units,total_units,remaining_seconds,percent_complete,pace_ema,pace_filtered,stabilized_seconds
0.500000,0,10,inf,0.0000,0.500000000,,inf
1.500000,2,10,4.000000,20.0000,0.500000000,0.500000000,4
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_tsv_uses_tabs() {
        let mut t = ProgressTrace::default();
        t.push(point(1.5, 2.0, 4.0, Some(0.5), 4.0));

        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TraceFormat::Tsv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let mut lines = got.lines();
        assert_eq!(lines.next().unwrap().split('\t').count(), 8);
        assert_eq!(
            lines.next().unwrap(),
            "1.500000\t2\t10\t4.000000\t20.0000\t0.500000000\t0.500000000\t4"
        );
    }

    #[test]
    fn export_json_flattens_snapshot_and_nulls_infinity() {
        let mut t = ProgressTrace::default();
        t.push(point(0.5, 0.0, f64::INFINITY, None, f64::INFINITY));
        t.push(point(1.5, 2.0, 4.0, Some(0.5), 4.0));

        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TraceFormat::Json).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&got).unwrap();
        let rows = v.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0]["remaining_seconds"].is_null());
        assert!(rows[0]["pace_filtered"].is_null());
        assert_eq!(rows[1]["remaining_seconds"], 4.0);
        assert_eq!(rows[1]["percent_complete"], 20.0);
        assert_eq!(rows[1]["stabilized_seconds"], 4.0);
    }

    #[test]
    fn export_empty_csv_and_json() {
        let t = ProgressTrace::default();

        let tf_csv = NamedTempFile::new().unwrap();
        t.export(tf_csv.path(), TraceFormat::Csv).unwrap();
        let got_csv = fs::read_to_string(tf_csv.path()).unwrap();
        assert_eq!(got_csv.lines().count(), 1);

        let tf_json = NamedTempFile::new().unwrap();
        t.export(tf_json.path(), TraceFormat::Json).unwrap();
        let got_json = fs::read_to_string(tf_json.path()).unwrap();
        assert_eq!(got_json, "[]\n");
    }
}
