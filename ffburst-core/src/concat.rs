//! Concat demuxer lists that keep the real time between shots.

use std::{io::Write, path::PathBuf};

use crate::{
  error::{Error, Result},
  metadata::MetadataReader,
};


/// Shortest duration a frame is shown for, in seconds.
pub const MIN_FRAME_DURATION: f64 = 1.0 / 60.0;

fn round_micros(secs: f64) -> f64 {
  (secs * 1e6).round() / 1e6
}

/// Renders a concat list from `(path, capture time)` pairs.
///
/// Every file is shown until the next one was taken, but never shorter than
/// [`MIN_FRAME_DURATION`]. Entries with an unknown capture time are skipped.
/// The last file is listed twice, since the concat demuxer ignores the
/// duration of the final entry.
pub fn concat_list<S: AsRef<str>>(entries: &[(S, f64)]) -> String {
  let mut list = String::new();
  let mut last: Option<(&str, f64)> = None;
  let mut last_duration = round_micros(MIN_FRAME_DURATION);

  for (path, time) in entries {
    let (path, time) = (path.as_ref(), *time);
    if time <= 0.0 {
      debug!("Skipping {:?} without capture time", path);
      continue;
    }

    if let Some((_, last_time)) = last {
      last_duration = round_micros((time - last_time).max(MIN_FRAME_DURATION));
      list.push_str(&format!("duration {last_duration}\n"));
    }
    list.push_str(&format!("file '{path}'\n"));
    last = Some((path, time));
  }

  if let Some((path, _)) = last {
    list.push_str(&format!("duration {last_duration}\n"));
    list.push_str(&format!("file '{path}'\n"));
  }

  list
}

/// Writes the concat list for `files` into a temporary file that outlives
/// this process, and returns its path.
pub fn write_concat_list<S: AsRef<str>>(
  files: &[S],
  metadata: &dyn MetadataReader,
) -> Result<PathBuf> {
  let entries: Vec<(&str, f64)> = files
    .iter()
    .map(|f| (f.as_ref(), metadata.capture_time(f.as_ref())))
    .collect();
  let list = concat_list(&entries);

  let dir = std::env::temp_dir();
  let io_err = |source| Error::Io {
    path: dir.clone(),
    source,
  };

  let mut file = tempfile::Builder::new()
    .prefix("ffburst.")
    .suffix(".tmp")
    .tempfile_in(&dir)
    .map_err(io_err)?;
  file.write_all(list.as_bytes()).map_err(io_err)?;

  let (_, path) = file.keep().map_err(|e| io_err(e.error))?;
  debug!("Wrote concat list {:?}", path);

  Ok(path)
}
