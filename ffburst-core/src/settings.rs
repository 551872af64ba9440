use std::collections::HashSet;

use itertools::chain;

use crate::{
  args::FfmpegArgs,
  burst::{segment, BurstSeries, ImageDescriptor},
  error::{Error, Result},
  input_flags::{build_input_flags_with, InputMethod},
  metadata::MetadataReader,
  plan::{plan, EncodePlan},
  runner::CommandRunner,
  scan::scan_for_image_files,
  DEFAULT_MIN_SERIES_LEN,
};


/// Plans and runs a two-pass encode of a raw ffmpeg command line.
#[derive(Debug, Clone, Default)]
pub struct EncodeSettings {
  pub dry_run: bool,
  /// ffmpeg arguments without the program name and without an output file.
  pub ffmpeg_args: Vec<String>,
}

impl EncodeSettings {
  pub fn plan(&self) -> Result<EncodePlan> {
    plan(&FfmpegArgs::new(self.ffmpeg_args.iter()))
  }

  pub fn run(&self) -> Result<EncodePlan> {
    let plan = self.plan()?;
    CommandRunner::new(self.dry_run).run_plan(&plan)?;

    Ok(plan)
  }
}

#[derive(Debug, Clone)]
pub struct BurstSettings {
  /// Files or directories holding the burst shots.
  pub bursts: Vec<String>,
  /// Files or directories holding the stills to pair the videos with.
  pub stills: Vec<String>,
  pub dry_run: bool,
  pub min_series_len: usize,
  pub input_method: InputMethod,
  /// Encoder arguments added after the generated input flags.
  pub ffmpeg_args: Vec<String>,
}

impl Default for BurstSettings {
  fn default() -> Self {
    Self {
      bursts: Vec::new(),
      stills: Vec::new(),
      dry_run: false,
      min_series_len: DEFAULT_MIN_SERIES_LEN,
      input_method: InputMethod::default(),
      ffmpeg_args: Vec::new(),
    }
  }
}

/// Image files found for a [`BurstSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLists {
  pub bursts: Vec<String>,
  pub stills: Vec<String>,
}

impl BurstSettings {
  /// Expands the burst and still paths into image files.
  ///
  /// Fails when either list ends up empty, or when a file is on both.
  pub fn scan(&self) -> Result<FileLists> {
    let bursts = scan_for_image_files(&self.bursts);
    let stills = scan_for_image_files(&self.stills);
    info!("{} burst images, {} stills", bursts.len(), stills.len());

    if bursts.is_empty() {
      return Err(Error::FileLists("No burst images were found".to_owned()));
    }
    if stills.is_empty() {
      return Err(Error::FileLists("No still images were found".to_owned()));
    }

    let burst_set: HashSet<&String> = bursts.iter().collect();
    if let Some(both) = stills.iter().find(|s| burst_set.contains(s)) {
      return Err(Error::FileLists(format!(
        "{both:?} is given both as burst image and as still"
      )));
    }

    Ok(FileLists { bursts, stills })
  }

  /// Groups the burst images into series long enough to encode.
  pub fn segment(&self, bursts: &[String], metadata: &dyn MetadataReader) -> Vec<BurstSeries> {
    segment(
      bursts
        .iter()
        .map(|path| ImageDescriptor::new(path.as_str(), metadata)),
      self.min_series_len,
    )
  }

  /// Encodes `series` into a video, which is then recorded on the series.
  pub fn encode(
    &self,
    series: &mut BurstSeries,
    metadata: &dyn MetadataReader,
    runner: &CommandRunner,
  ) -> Result<EncodePlan> {
    if self.hides_concat_input() {
      warn!(
        "A `-f` in the ffmpeg arguments hides the concat input of {}; the video will be named \
         after the concat list instead of the last image",
        series.path_pattern()
      );
    }

    let input = build_input_flags_with(&series.paths(), metadata, self.input_method)?;
    let args: Vec<String> = chain!(input, self.ffmpeg_args.iter().cloned()).collect();

    let plan = plan(&FfmpegArgs::new(args))?;
    runner.run_plan(&plan)?;
    series.video = Some(plan.output_path.clone());

    Ok(plan)
  }

  /// A `-f` among the ffmpeg arguments comes after the generated `-f concat`,
  /// so the input is no longer recognized as a concat list when planning.
  pub(crate) fn hides_concat_input(&self) -> bool {
    self.input_method == InputMethod::Concat && self.ffmpeg_args.iter().any(|arg| arg == "-f")
  }
}
