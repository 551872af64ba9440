//! Reading capture times and color profiles of image files.

use std::{
  path::{Path, PathBuf},
  process::Command,
};

use crate::error::{Error, Result};

pub const EXIFTOOL: &str = "exiftool";

/// Source of per-file metadata.
///
/// Lookups never fail: missing or unreadable metadata is reported as
/// `0.0`/`None`.
pub trait MetadataReader {
  /// Time the picture was taken, in seconds since the epoch with sub-second
  /// precision, or `0.0` if unknown.
  fn capture_time(&self, path: &str) -> f64;

  /// Free-text description of the embedded color profile.
  fn color_profile(&self, path: &str) -> Option<String>;
}

/// [`MetadataReader`] backed by the `exiftool` command line tool.
#[derive(Debug, Clone)]
pub struct ExifTool {
  binary: Option<PathBuf>,
}

impl ExifTool {
  /// Locates `exiftool` in `PATH`.
  pub fn locate() -> Result<Self> {
    let binary =
      which::which(EXIFTOOL).map_err(|_| Error::ExternalToolUnavailable(EXIFTOOL.to_owned()))?;
    debug!("Using {:?}", binary);

    Ok(Self {
      binary: Some(binary),
    })
  }

  /// Like [`ExifTool::locate`], but falls back to a reader that knows
  /// nothing if `exiftool` is not installed.
  pub fn new() -> Self {
    Self::locate().unwrap_or_else(|e| {
      warn!("{}; capture times and color profiles will be unknown", e);
      Self { binary: None }
    })
  }

  pub const fn is_available(&self) -> bool {
    self.binary.is_some()
  }

  fn query(&self, args: &[&str], path: &str) -> Option<String> {
    let binary = self.binary.as_deref()?;

    let output = match Command::new(binary).args(args).arg(Path::new(path)).output() {
      Ok(output) => output,
      Err(e) => {
        warn!("Failed to run {}: {}", EXIFTOOL, e);
        return None;
      }
    };

    if !output.status.success() {
      debug!(
        "{} failed on {:?}: {}",
        EXIFTOOL,
        path,
        String::from_utf8_lossy(&output.stderr).trim()
      );
      return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!stdout.is_empty()).then(|| stdout)
  }
}

impl Default for ExifTool {
  fn default() -> Self {
    Self::new()
  }
}

impl MetadataReader for ExifTool {
  fn capture_time(&self, path: &str) -> f64 {
    self
      .query(
        &[
          "-dateFormat",
          "%s",
          "-printFormat",
          "$DateTimeOriginal.$SubSecTimeOriginal",
        ],
        path,
      )
      .and_then(|time| parse_capture_time(&time))
      .unwrap_or(0.0)
  }

  fn color_profile(&self, path: &str) -> Option<String> {
    self.query(&["-q", "-printFormat", "$ProfileDescription"], path)
  }
}

/// Parses `<epoch seconds>.<sub-second digits>` as printed by exiftool.
pub fn parse_capture_time(s: &str) -> Option<f64> {
  let s = s.trim();
  match s.parse::<f64>() {
    Ok(time) if time.is_finite() => Some(time),
    _ => {
      debug!("Unparseable capture time {:?}", s);
      None
    }
  }
}

/// Metadata reader answering from fixed tables.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FakeMetadata {
  pub times: std::collections::HashMap<String, f64>,
  pub profile: Option<String>,
}

#[cfg(test)]
impl FakeMetadata {
  pub fn with_times<'a>(times: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
    Self {
      times: times.into_iter().map(|(p, t)| (p.to_owned(), t)).collect(),
      profile: None,
    }
  }

  pub fn with_profile(profile: &str) -> Self {
    Self {
      profile: Some(profile.to_owned()),
      ..Self::default()
    }
  }
}

#[cfg(test)]
impl MetadataReader for FakeMetadata {
  fn capture_time(&self, path: &str) -> f64 {
    self.times.get(path).copied().unwrap_or(0.0)
  }

  fn color_profile(&self, _path: &str) -> Option<String> {
    self.profile.clone()
  }
}
