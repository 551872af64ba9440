//! ffmpeg input flags for turning image files into a video.

use std::fmt::Display;

use crate::{
  concat::write_concat_list,
  error::{Error, Result},
  into_vec,
  metadata::MetadataReader,
  regex,
};


/// Frame rate used when it can't be derived from capture times.
pub const DEFAULT_FRAME_RATE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
  Unknown,
  Srgb,
  P3,
}

impl ColorSpace {
  /// Classifies the embedded color profile of `path`.
  pub fn guess(path: &str, metadata: &dyn MetadataReader) -> Self {
    Self::from_profile(metadata.color_profile(path).as_deref().unwrap_or_default())
  }

  pub fn from_profile(description: &str) -> Self {
    if description.contains("sRGB") {
      Self::Srgb
    } else if description.contains("P3") {
      Self::P3
    } else {
      Self::Unknown
    }
  }

  fn input_flags(self) -> Vec<String> {
    let primaries = match self {
      Self::Unknown => return Vec::new(),
      Self::Srgb => "bt709",
      Self::P3 => "smpte432",
    };

    into_vec![
      "-colorspace",
      "bt709",
      "-color_primaries",
      primaries,
      "-color_trc",
      "iec61966-2-1",
    ]
  }

  fn output_flags(self) -> Vec<String> {
    match self {
      Self::Unknown => Vec::new(),
      Self::Srgb | Self::P3 => into_vec!["-colorspace", "bt709"],
    }
  }
}

/// How a sequence of several images is fed to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::IntoStaticStr)]
pub enum InputMethod {
  /// A numbered file pattern played at a constant, guessed frame rate.
  #[strum(serialize = "framerate")]
  FrameRate,
  /// A concat list reproducing the real time between shots.
  #[strum(serialize = "concat")]
  Concat,
}

impl Default for InputMethod {
  fn default() -> Self {
    Self::FrameRate
  }
}

impl Display for InputMethod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(<&'static str>::from(self))
  }
}

pub fn is_video(path: &str) -> bool {
  regex!(r"(?i)\.(mp4|m4v|mov|avi|webm)$").is_match(path)
}

/// Maps a measured frame rate onto a common one.
pub fn bucket_frame_rate(raw: f64) -> u32 {
  let fr = raw.round_ties_even() as i64;

  match fr {
    i64::MIN..=1 => 1,
    2..=7 => fr as u32,
    8..=9 => 8,
    10..=11 => 10,
    12..=14 => 12,
    15..=18 => 15,
    19..=23 => 20,
    24..=27 => 25,
    28..=45 => 30,
    _ => 60,
  }
}

/// Guesses the frame rate of a burst from the capture times of its first and
/// last image.
pub fn guess_frame_rate<S: AsRef<str>>(files: &[S], metadata: &dyn MetadataReader) -> u32 {
  let (first, last) = match files {
    [first, .., last] => (first.as_ref(), last.as_ref()),
    _ => return DEFAULT_FRAME_RATE,
  };

  let start = metadata.capture_time(first);
  let end = metadata.capture_time(last);
  if start <= 0.0 || end <= start {
    debug!(
      "No usable capture times for {:?} ({} .. {}), assuming {} fps",
      first, start, end, DEFAULT_FRAME_RATE
    );
    return DEFAULT_FRAME_RATE;
  }

  let raw = (files.len() - 1) as f64 / (end - start);
  let fr = bucket_frame_rate(raw);
  debug!("Measured {:.3} fps, using {}", raw, fr);

  fr
}

/// Turns the first file of a numbered sequence into a printf pattern,
/// returning the pattern and the number of the first file.
///
/// `/a/IMG_0042.jpg` gives `("/a/IMG_%04d.jpg", "0042")`.
pub fn numbered_pattern(first: &str) -> Option<(String, String)> {
  let caps = regex!(r"([0-9]{2,})([^0-9]+)$").captures(first)?;
  let start = caps.get(1)?;
  let pattern = format!(
    "{}%0{}d{}",
    &first[..start.start()],
    start.as_str().len(),
    &caps[2]
  );

  Some((pattern, start.as_str().to_owned()))
}

fn frame_rate_flags<S: AsRef<str>>(
  files: &[S],
  metadata: &dyn MetadataReader,
) -> Result<Vec<String>> {
  let first = files[0].as_ref();
  let (pattern, start) = numbered_pattern(first)
    .ok_or_else(|| Error::invalid(format!("Cannot find a frame number in {first:?}")))?;
  let frame_rate = guess_frame_rate(files, metadata);

  Ok(into_vec![
    "-f",
    "image2",
    "-r",
    frame_rate.to_string(),
    "-start_number",
    start,
    "-i",
    pattern,
  ])
}

/// Builds the ffmpeg input flags for `files`, using a numbered pattern for
/// image sequences.
pub fn build_input_flags<S: AsRef<str>>(
  files: &[S],
  metadata: &dyn MetadataReader,
) -> Result<Vec<String>> {
  build_input_flags_with(files, metadata, InputMethod::FrameRate)
}

/// Like [`build_input_flags`], but feeds image sequences through a concat list
/// so that every frame lasts until the next shot was taken.
pub fn build_concat_input_flags<S: AsRef<str>>(
  files: &[S],
  metadata: &dyn MetadataReader,
) -> Result<Vec<String>> {
  build_input_flags_with(files, metadata, InputMethod::Concat)
}

/// Builds the ffmpeg input flags for `files`.
///
/// A video is passed through as is. Images are tagged with the color space of
/// their embedded profile.
pub fn build_input_flags_with<S: AsRef<str>>(
  files: &[S],
  metadata: &dyn MetadataReader,
  method: InputMethod,
) -> Result<Vec<String>> {
  let first = files.first().ok_or(Error::EmptyInput)?.as_ref();

  if is_video(first) {
    return Ok(into_vec!["-i", first]);
  }

  let space = ColorSpace::guess(first, metadata);
  debug!("Color space of {:?}: {:?}", first, space);

  let mut flags = space.input_flags();
  let input: Vec<String> = if files.len() == 1 {
    into_vec!["-i", first]
  } else {
    match method {
      InputMethod::FrameRate => frame_rate_flags(files, metadata)?,
      InputMethod::Concat => {
        let list = write_concat_list(files, metadata)?;
        into_vec!["-f", "concat", "-safe", "0", "-i", list.to_string_lossy()]
      }
    }
  };
  flags.extend(input);
  flags.extend(space.output_flags());

  Ok(flags)
}
