//! This module contains the common error type for argument inspection, planning
//! and running encodes.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
  /// The ffmpeg argument vector failed validation.
  #[error("{0}")]
  InvalidArguments(String),
  /// The burst and still file lists are unusable.
  #[error("{0}")]
  FileLists(String),
  /// No files were given to build input flags from.
  #[error("No input files were given")]
  EmptyInput,
  /// Reading or writing a file went wrong.
  #[error("Can't access file {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  /// Spawning an external program went wrong.
  #[error("Failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },
  /// An external tool needed for an operation is not installed.
  #[error("{0} is not installed or not in PATH")]
  ExternalToolUnavailable(String),
  /// A command exited with a non-zero status.
  #[error("{program} exited with status {code}")]
  CommandFailed { program: String, code: i32 },
  /// A command was interrupted by the user.
  #[error("Interrupted")]
  Interrupted,
}

impl Error {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidArguments(msg.into())
  }

  /// Conventional process exit status for this error.
  pub const fn exit_code(&self) -> i32 {
    match self {
      Self::CommandFailed { code, .. } => *code,
      Self::Interrupted => 130,
      Self::FileLists(_) => 2,
      Self::InvalidArguments(_)
      | Self::EmptyInput
      | Self::Io { .. }
      | Self::Spawn { .. }
      | Self::ExternalToolUnavailable(_) => 1,
    }
  }
}
