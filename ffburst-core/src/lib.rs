#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

pub mod args;
pub mod burst;
pub mod concat;
pub mod encoder;
pub mod error;
pub mod input_flags;
pub mod metadata;
pub mod plan;
pub mod runner;
pub mod scan;
pub mod settings;
pub mod util;

pub use crate::{
  args::{find_token_after, Direction, FfmpegArgs, PositionedToken},
  burst::{pair_stills, segment, BurstSeries, ImageDescriptor, StillPairing},
  encoder::VideoEncoder,
  error::{Error, Result},
  input_flags::{build_concat_input_flags, build_input_flags, ColorSpace, InputMethod},
  metadata::{ExifTool, MetadataReader},
  plan::{plan, EncodePlan},
  runner::CommandRunner,
  scan::scan_for_image_files,
  settings::{BurstSettings, EncodeSettings, FileLists},
};

/// Default minimum number of images for a group of shots to count as a burst series.
pub const DEFAULT_MIN_SERIES_LEN: usize = 4;
