//! Daily gzip-rotated JSON-line archive of every envelope the Sequencer
//! publishes (spec §2 ambient stack, §5.4), ported from the original
//! implementation's `daily_gzip_json_writer`/`daily_gzip_json_reader`.
//!
//! One file per UTC calendar day, named `{prefix}_{date}.json` while the
//! day is open and rotated to `{prefix}_{date}.json.gz` the moment a
//! later-dated message is written (or the writer is closed). A record is
//! flushed to disk after every write, so a crash loses at most the
//! in-flight gzip of the previous day, never a committed line.

mod error;

pub use error::ArchivalError;

use chrono::{DateTime, NaiveDate};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use types::Envelope;

fn date_of(msg_time_ns: i64) -> NaiveDate {
    let secs = msg_time_ns.div_euclid(1_000_000_000);
    let nsecs = msg_time_ns.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nsecs)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
        .date_naive()
}

fn gzip_and_remove(path: &Path) -> Result<(), ArchivalError> {
    let gz_path = path.with_extension("json.gz");
    let mut input = BufReader::new(File::open(path)?);
    let output = File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    std::io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    std::fs::remove_file(path)?;
    Ok(())
}

/// Appends envelopes to a day-named JSON-line file, gzipping and deleting
/// the plaintext file as soon as the calendar day rolls over.
pub struct DailyGzipJsonWriter {
    directory: PathBuf,
    prefix: String,
    current: Option<(NaiveDate, File, PathBuf)>,
}

impl DailyGzipJsonWriter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self, ArchivalError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            prefix: prefix.into(),
            current: None,
        })
    }

    fn json_path(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(format!("{}_{}.json", self.prefix, date))
    }

    fn rotate_to(&mut self, date: NaiveDate) -> Result<(), ArchivalError> {
        if let Some((_, file, path)) = self.current.take() {
            drop(file);
            gzip_and_remove(&path)?;
        }
        let path = self.json_path(date);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.current = Some((date, file, path));
        Ok(())
    }

    /// Appends one envelope, rotating to a fresh file first if `envelope`'s
    /// `msg_time` falls on a later UTC date than the currently open file.
    /// An envelope with no `msg_time` (a CONNECT/DISCONNECT control
    /// message) is filed under the epoch date and so always lands in
    /// whichever file is already open, or opens the epoch file on first
    /// use.
    pub fn write(&mut self, envelope: &Envelope) -> Result<(), ArchivalError> {
        let date = date_of(envelope.msg_time.unwrap_or(0));
        let needs_rotate = match &self.current {
            Some((current_date, _, _)) => *current_date != date,
            None => true,
        };
        if needs_rotate {
            self.rotate_to(date)?;
        }
        let (_, file, _) = self.current.as_mut().expect("just rotated");
        let line = serde_json::to_string(envelope)?;
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }

    /// Gzips and removes the currently open file, if any. Call on
    /// shutdown so the last partial day isn't left as plaintext.
    pub fn close(mut self) -> Result<(), ArchivalError> {
        if let Some((_, file, path)) = self.current.take() {
            drop(file);
            gzip_and_remove(&path)?;
        }
        Ok(())
    }
}

/// Reads envelopes with `msg_time` in a given range back out of a
/// directory of [`DailyGzipJsonWriter`] output, transparently handling
/// both the still-open plaintext file and gzipped historical ones.
pub struct DailyGzipJsonReader {
    directory: PathBuf,
    prefix: String,
}

impl DailyGzipJsonReader {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Prefers the gzipped file over the plaintext one, matching a day
    /// that has already rotated.
    fn file_for(&self, date: NaiveDate) -> Option<(PathBuf, bool)> {
        let gz = self.directory.join(format!("{}_{}.json.gz", self.prefix, date));
        if gz.exists() {
            return Some((gz, true));
        }
        let plain = self.directory.join(format!("{}_{}.json", self.prefix, date));
        if plain.exists() {
            return Some((plain, false));
        }
        None
    }

    /// Returns every archived envelope whose `msg_time` falls in
    /// `[start_ns, end_ns]`, inclusive, in day order and append order
    /// within each day.
    pub fn read(&self, start_ns: i64, end_ns: i64) -> Result<Vec<Envelope>, ArchivalError> {
        let mut out = Vec::new();
        let mut date = date_of(start_ns);
        let end_date = date_of(end_ns);
        loop {
            if let Some((path, gzipped)) = self.file_for(date) {
                let reader: Box<dyn BufRead> = if gzipped {
                    Box::new(BufReader::new(MultiGzDecoder::new(File::open(&path)?)))
                } else {
                    Box::new(BufReader::new(File::open(&path)?))
                };
                for line in reader.lines() {
                    let line = line?;
                    if line.is_empty() {
                        continue;
                    }
                    let envelope: Envelope = serde_json::from_str(&line)?;
                    if let Some(t) = envelope.msg_time {
                        if t >= start_ns && t <= end_ns {
                            out.push(envelope);
                        }
                    }
                }
            }
            if date >= end_date {
                break;
            }
            date = date.succ_opt().expect("date overflow");
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::MsgType;

    const DAY_NS: i64 = 86_400 * 1_000_000_000;

    #[test]
    fn write_then_close_leaves_only_a_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DailyGzipJsonWriter::new(dir.path(), "sequencer").unwrap();

        let mut envelope = Envelope::connect("strategy-1");
        envelope.msg_time = Some(DAY_NS);
        writer.write(&envelope).unwrap();
        writer.close().unwrap();

        let date = date_of(DAY_NS);
        assert!(!dir.path().join(format!("sequencer_{date}.json")).exists());
        assert!(dir.path().join(format!("sequencer_{date}.json.gz")).exists());
    }

    #[test]
    fn crossing_a_day_boundary_rotates_the_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DailyGzipJsonWriter::new(dir.path(), "sequencer").unwrap();

        let mut first = Envelope::connect("a");
        first.msg_time = Some(DAY_NS);
        writer.write(&first).unwrap();

        let mut second = Envelope::connect("b");
        second.msg_time = Some(DAY_NS * 2);
        writer.write(&second).unwrap();

        let first_date = date_of(DAY_NS);
        assert!(dir
            .path()
            .join(format!("sequencer_{first_date}.json.gz"))
            .exists());

        writer.close().unwrap();
        let second_date = date_of(DAY_NS * 2);
        assert!(dir
            .path()
            .join(format!("sequencer_{second_date}.json.gz"))
            .exists());
    }

    #[test]
    fn reader_filters_by_time_range_across_days() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DailyGzipJsonWriter::new(dir.path(), "sequencer").unwrap();

        for (i, label) in ["a", "b", "c"].iter().enumerate() {
            let mut envelope = Envelope::data_message(
                MsgType::OrderBook,
                Some("coinbase".into()),
                Some("BTC/USD".into()),
                &serde_json::json!({"seq": i}),
            )
            .unwrap();
            envelope.msg_time = Some(DAY_NS * (i as i64 + 1));
            writer.write(&envelope).unwrap();
            let _ = label;
        }
        writer.close().unwrap();

        let reader = DailyGzipJsonReader::new(dir.path(), "sequencer");
        let results = reader.read(DAY_NS * 2, DAY_NS * 3).unwrap();
        assert_eq!(results.len(), 2);
    }
}
