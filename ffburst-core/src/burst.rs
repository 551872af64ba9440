//! Grouping burst-mode shots into series.
//!
//! Cameras name burst shots in sequence (`IMG_0101.jpg`, `IMG_0102.jpg`, ...).
//! A series is a maximal run of images that share a file name pattern, have
//! consecutive sequence numbers and were taken at most a second apart.

use std::collections::HashMap;

use crate::{metadata::MetadataReader, regex, util::split_file_name};

#[cfg(test)]
mod tests;

/// Images taken further apart than this (in seconds) never belong to the same
/// series, even when their file names are in sequence.
pub const MAX_GAP_SECS: f64 = 1.0;

/// Marker replacing the sequence number in a path pattern.
pub const SEQUENCE_WILDCARD: &str = "*";

/// Extracts the sequence number of an image file and the path pattern shared
/// by the other images of its sequence.
///
/// The sequence number is the last run of 3 or more digits in the file name,
/// so `IMG_123-1.jpg` is still number 123. Digits in the directory part never
/// count: `/path/to/456/IMG_123.jpg` has pattern `/path/to/456/IMG_*.jpg`.
/// Without such a run the sequence number is `-1` and the pattern is the path
/// itself.
pub fn sequence_and_pattern(path: &str) -> (i64, String) {
  let (dir, name) = split_file_name(path);

  let found = regex!(r"[0-9]{3,}")
    .find_iter(name)
    .last()
    .and_then(|m| Some((m.as_str().parse::<i64>().ok()?, m)));

  match found {
    Some((seq, m)) => (
      seq,
      format!(
        "{dir}{}{SEQUENCE_WILDCARD}{}",
        &name[..m.start()],
        &name[m.end()..]
      ),
    ),
    None => (-1, path.to_owned()),
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
  pub path: String,
  /// `-1` if the file name carries no sequence number.
  pub sequence_number: i64,
  pub path_pattern: String,
  /// Seconds since the epoch, `0.0` if unknown.
  pub capture_time: f64,
}

impl ImageDescriptor {
  pub fn new(path: impl Into<String>, metadata: &dyn MetadataReader) -> Self {
    let path = path.into();
    let (sequence_number, path_pattern) = sequence_and_pattern(&path);
    let capture_time = metadata.capture_time(&path);

    Self {
      path,
      sequence_number,
      path_pattern,
      capture_time,
    }
  }

  /// Whether `next` directly follows this image within the same series.
  fn is_followed_by(&self, next: &Self) -> bool {
    self.sequence_number >= 0
      && self.sequence_number.checked_add(1) == Some(next.sequence_number)
      && next.path_pattern == self.path_pattern
      && next.capture_time - self.capture_time <= MAX_GAP_SECS
  }
}

/// A non-empty run of images sorted by sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstSeries {
  images: Vec<ImageDescriptor>,
  /// The video made from this series, once it was encoded.
  pub video: Option<String>,
}

impl BurstSeries {
  fn new(first: ImageDescriptor) -> Self {
    Self {
      images: vec![first],
      video: None,
    }
  }

  pub fn images(&self) -> &[ImageDescriptor] {
    &self.images
  }

  pub fn paths(&self) -> Vec<String> {
    self.images.iter().map(|img| img.path.clone()).collect()
  }

  pub fn len(&self) -> usize {
    self.images.len()
  }

  pub fn path_pattern(&self) -> &str {
    &self.images[0].path_pattern
  }

  pub fn first_seq(&self) -> i64 {
    self.images[0].sequence_number
  }

  pub fn last_seq(&self) -> i64 {
    self.last_image().sequence_number
  }

  fn last_image(&self) -> &ImageDescriptor {
    &self.images[self.images.len() - 1]
  }
}

/// Splits `images` into burst series, dropping series with fewer than
/// `min_series_len` images.
///
/// Series come out ordered by path pattern, then by first sequence number.
pub fn segment(
  images: impl IntoIterator<Item = ImageDescriptor>,
  min_series_len: usize,
) -> Vec<BurstSeries> {
  let mut images: Vec<ImageDescriptor> = images.into_iter().collect();
  images.sort_by(|a, b| {
    a.path_pattern
      .cmp(&b.path_pattern)
      .then(a.sequence_number.cmp(&b.sequence_number))
  });

  let mut all_series: Vec<BurstSeries> = Vec::new();
  for img in images {
    match all_series.last_mut() {
      Some(series) if series.last_image().is_followed_by(&img) => series.images.push(img),
      _ => all_series.push(BurstSeries::new(img)),
    }
  }

  let found = all_series.len();
  all_series.retain(|series| series.len() >= min_series_len);
  debug!(
    "Found {} series, {} with at least {} images",
    found,
    all_series.len(),
    min_series_len
  );

  all_series
}

/// A still image to attach the video of a burst series to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillPairing {
  pub still: String,
  /// Index into the series the pairing was computed from.
  pub series: usize,
  pub sequence_number: i64,
}

/// Pairs every still with each series containing a burst image of the same
/// sequence number. Stills without a sequence number are never paired.
pub fn pair_stills<S: AsRef<str>>(series: &[BurstSeries], stills: &[S]) -> Vec<StillPairing> {
  let mut by_seq: HashMap<i64, Vec<&str>> = HashMap::new();
  for still in stills {
    let (seq, _) = sequence_and_pattern(still.as_ref());
    if seq >= 0 {
      by_seq.entry(seq).or_default().push(still.as_ref());
    }
  }

  let mut pairings = Vec::new();
  for (idx, s) in series.iter().enumerate() {
    for img in s.images() {
      for still in by_seq.get(&img.sequence_number).into_iter().flatten() {
        pairings.push(StillPairing {
          still: (*still).to_owned(),
          series: idx,
          sequence_number: img.sequence_number,
        });
      }
    }
  }

  pairings
}
