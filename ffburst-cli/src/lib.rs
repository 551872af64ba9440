#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

use std::{fmt::Display, path::PathBuf};

use ansi_term::{Color, Style};
use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use ffburst_core::{
  input_flags::build_input_flags_with,
  pair_stills,
  runner::install_interrupt_handler,
  BurstSeries,
  BurstSettings,
  CommandRunner,
  EncodeSettings,
  ExifTool,
  InputMethod,
  DEFAULT_MIN_SERIES_LEN,
};
use flexi_logger::{writers::LogWriter, FileSpec, Level, LevelFilter, LogSpecBuilder, Logger};


/// Plans two-pass ffmpeg encodes and turns burst-mode shots into videos
#[derive(Parser, Debug)]
#[command(name = "ffburst", version, about)]
pub struct CliOpts {
  /// Set log level for stderr output
  ///
  /// error: Designates very serious errors.
  ///
  /// warn: Designates hazardous situations.
  ///
  /// info: Designates useful information.
  ///
  /// debug: Designates lower priority information, including how inputs were resolved.
  #[arg(long, global = true, default_value_t = LevelFilter::Info)]
  pub log_level: LevelFilter,

  /// Also write the log to this file
  #[arg(long, global = true)]
  pub log_file: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Convert burst shots to videos and pair them with still images
  Burst(BurstOpts),
  /// Run a two-pass encode followed by a metadata copy
  ///
  /// The output file name is derived from the input, the encoder and the
  /// bitrate, so it must not be given.
  Encode(EncodeOpts),
  /// Print the ffmpeg input flags for image files, one per line
  InputFlags(InputFlagsOpts),
}

#[derive(Args, Debug)]
pub struct BurstOpts {
  /// Burst-mode shots to convert to videos
  ///
  /// Images whose file names are in sequence are treated as one burst series.
  /// Directories contribute the images directly inside them.
  #[arg(long, num_args = 1..)]
  pub bursts: Vec<String>,

  /// Still images to pair the videos with
  ///
  /// A still belongs to the series containing a shot of the same number.
  #[arg(long, num_args = 1..)]
  pub stills: Vec<String>,

  /// Only print the commands that would be executed
  #[arg(short = 'n', long)]
  pub dry_run: bool,

  /// Minimum number of images for a burst series
  #[arg(long, default_value_t = DEFAULT_MIN_SERIES_LEN)]
  pub min_series_len: usize,

  /// How image sequences are fed to ffmpeg: `framerate` or `concat`
  ///
  /// framerate: a numbered file pattern at a frame rate guessed from the capture times.
  ///
  /// concat: a concat list keeping the real time between shots.
  #[arg(long, default_value_t = InputMethod::FrameRate)]
  pub input_method: InputMethod,

  #[command(flatten)]
  pub ffmpeg: FfmpegOpts,
}

#[derive(Args, Debug)]
pub struct EncodeOpts {
  /// Only print the commands that would be executed
  #[arg(short = 'n', long)]
  pub dry_run: bool,

  #[command(flatten)]
  pub ffmpeg: FfmpegOpts,
}

#[derive(Args, Debug)]
pub struct FfmpegOpts {
  /// Arguments for ffmpeg as a single string
  ///
  /// Example: --ffargs "-c:v libx264 -b:v 2M -preset slow -f mov"
  #[arg(long, allow_hyphen_values = true)]
  pub ffargs: Option<String>,

  /// Arguments for ffmpeg, after `--`
  #[arg(last = true)]
  pub args: Vec<String>,
}

impl FfmpegOpts {
  pub fn to_vec(&self) -> anyhow::Result<Vec<String>> {
    let mut args = match &self.ffargs {
      Some(s) => shlex::split(s).ok_or_else(|| anyhow!("Invalid quoting in --ffargs: {s}"))?,
      None => Vec::new(),
    };
    args.extend(self.args.iter().cloned());

    Ok(args)
  }
}

#[derive(Args, Debug)]
pub struct InputFlagsOpts {
  /// How image sequences are fed to ffmpeg: `framerate` or `concat`
  ///
  /// framerate: a numbered file pattern at a frame rate guessed from the capture times.
  ///
  /// concat: a concat list keeping the real time between shots.
  #[arg(long, default_value_t = InputMethod::FrameRate)]
  pub input_method: InputMethod,

  /// Image files, or a single video
  pub files: Vec<String>,
}

impl BurstOpts {
  pub fn to_settings(&self) -> anyhow::Result<BurstSettings> {
    Ok(BurstSettings {
      bursts: self.bursts.clone(),
      stills: self.stills.clone(),
      dry_run: self.dry_run,
      min_series_len: self.min_series_len,
      input_method: self.input_method,
      ffmpeg_args: self.ffmpeg.to_vec()?,
    })
  }
}

impl EncodeOpts {
  pub fn to_settings(&self) -> anyhow::Result<EncodeSettings> {
    Ok(EncodeSettings {
      dry_run: self.dry_run,
      ffmpeg_args: self.ffmpeg.to_vec()?,
    })
  }
}

fn highlight(msg: impl Display) {
  if atty::is(atty::Stream::Stdout) {
    println!("{}", Style::new().bold().paint(msg.to_string()));
  } else {
    println!("{msg}");
  }
}

pub fn series_summary(series: &BurstSeries) -> String {
  format!(
    "{} - {} images ({} - {})",
    series.path_pattern(),
    series.len(),
    series.first_seq(),
    series.last_seq()
  )
}

fn burst(opts: &BurstOpts) -> anyhow::Result<()> {
  let settings = opts.to_settings()?;
  let lists = settings.scan()?;
  highlight(format!(
    "Specified {} burst shots and {} still images.",
    lists.bursts.len(),
    lists.stills.len()
  ));

  let metadata = ExifTool::new();
  let mut all_series = settings.segment(&lists.bursts, &metadata);
  highlight(format!(
    "\nFound {} burst series. They are: ",
    all_series.len()
  ));
  for series in &all_series {
    println!("{}", series_summary(series));
  }

  let runner = CommandRunner::new(settings.dry_run);
  for series in &mut all_series {
    highlight(format!(
      "\nConverting {} ({} images) to a video...",
      series.path_pattern(),
      series.len()
    ));
    settings
      .encode(series, &metadata, &runner)
      .with_context(|| format!("Failed to encode {}", series.path_pattern()))?;
  }

  for pairing in pair_stills(&all_series, &lists.stills) {
    let series = &all_series[pairing.series];
    highlight(format!(
      "\nPairing {} (from burst shots {} - {}) with {}",
      series.video.as_deref().unwrap_or("<no video>"),
      series.first_seq(),
      series.last_seq(),
      pairing.still
    ));
  }

  Ok(())
}

fn input_flags(opts: &InputFlagsOpts) -> anyhow::Result<()> {
  let flags = build_input_flags_with(&opts.files, &ExifTool::new(), opts.input_method)?;
  for flag in flags {
    println!("{flag}");
  }

  Ok(())
}

pub struct StderrLogger {
  level: Level,
}

impl LogWriter for StderrLogger {
  fn write(
    &self,
    _now: &mut flexi_logger::DeferredNow,
    record: &flexi_logger::Record,
  ) -> std::io::Result<()> {
    if record.level() > self.level {
      return Ok(());
    }

    let style = if atty::is(atty::Stream::Stderr) {
      match record.level() {
        Level::Error => Style::default().fg(Color::Fixed(196)).bold(),
        Level::Warn => Style::default().fg(Color::Fixed(208)).bold(),
        Level::Info => Style::default().bold(),
        Level::Debug => Style::default().dimmed(),
        Level::Trace => Style::default(),
      }
    } else {
      Style::default()
    };

    eprintln!(
      "{} [{}] {}",
      style.paint(record.level().to_string()),
      record.module_path().unwrap_or("<unnamed>"),
      style.paint(record.args().to_string())
    );

    Ok(())
  }

  fn flush(&self) -> std::io::Result<()> {
    Ok(())
  }
}

/// Exit status for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
  err
    .downcast_ref::<ffburst_core::Error>()
    .map_or(1, ffburst_core::Error::exit_code)
}

pub fn run() -> anyhow::Result<()> {
  let cli_args = CliOpts::parse();
  let log_level = cli_args.log_level;

  let log = LogSpecBuilder::new()
    .default(LevelFilter::Error)
    .module("ffburst", log_level)
    .module("ffburst_cli", log_level)
    .module("ffburst_core", log_level)
    .build();

  let stderr = Box::new(StderrLogger {
    level: log_level.to_level().unwrap_or(Level::Error),
  });
  let logger = Logger::with(log);
  // keep the handle alive so buffered log lines get flushed on exit
  let _logger = match &cli_args.log_file {
    Some(path) => logger.log_to_file_and_writer(FileSpec::try_from(path)?, stderr),
    None => logger.log_to_writer(stderr),
  }
  .start()?;

  install_interrupt_handler().context("Failed to install the Ctrl-C handler")?;

  match &cli_args.command {
    Command::Burst(opts) => burst(opts),
    Command::Encode(opts) => {
      let plan = opts.to_settings()?.run()?;
      debug!("Encoded {:?} into {:?}", plan.input, plan.output_path);
      Ok(())
    }
    Command::InputFlags(opts) => input_flags(opts),
  }
}
