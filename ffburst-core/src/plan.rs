use std::{path::Path, str::FromStr};

use crate::{
  args::FfmpegArgs,
  encoder::VideoEncoder,
  error::{Error, Result},
  into_vec,
};


pub const DEFAULT_OUTPUT_FORMAT: &str = "mp4";

/// Everything needed to run a two-pass encode, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodePlan {
  /// The file the input resolved to; metadata is copied from it.
  pub input: String,
  pub encoder: VideoEncoder,
  pub bitrate: Option<String>,
  pub output_format: String,
  pub output_path: String,
  /// 1st pass, 2nd pass, then the metadata copy.
  pub pass_commands: Vec<Vec<String>>,
}

/// Derives the output file name from the resolved input, e.g.
/// `/a/b/IMG_001.jpg` becomes `/a/b/IMG_001.x265.2Mbps.mov`.
pub fn output_path(
  input: &str,
  encoder: VideoEncoder,
  bitrate: Option<&str>,
  output_format: &str,
) -> String {
  let mut output = format!(
    "{}.{}",
    Path::new(input).with_extension("").to_string_lossy(),
    encoder.short_name()
  );
  if let Some(bitrate) = bitrate {
    output.push_str(&format!(".{bitrate}bps"));
  }
  output.push('.');
  output.push_str(output_format);

  output
}

/// Validates a user-supplied ffmpeg command line and plans the two-pass encode
/// for it. Nothing is executed.
pub fn plan(args: &FfmpegArgs) -> Result<EncodePlan> {
  let input = args.resolve_input()?.ok_or_else(|| {
    Error::invalid("Cannot find input file/pattern after an `-i` argument.")
  })?;

  if let Some(output) = args.output_spec() {
    return Err(Error::invalid(format!(
      "Output file `{output}` is detected from the arguments. The output file name is \
       determined by the input file, bitrate etc. and must not be specified manually."
    )));
  }

  let encoder = args
    .encoder()
    .and_then(|e| VideoEncoder::from_str(&e).ok())
    .ok_or_else(|| {
      Error::invalid(
        "Cannot find video encoder after a `-c:v` argument, or the encoder specified is \
         neither libx264 nor libx265.",
      )
    })?;

  if let Some(tag) = encoder.required_tag() {
    if args.tag_value("-tag:v").as_deref() != Some(tag) {
      return Err(Error::invalid(format!(
        "{encoder} is specified as video encoder but `-tag:v {tag}` is not specified. \
         The resulting video will have issues playing."
      )));
    }
  }

  let bitrate = args.bitrate();
  let output_format = args
    .output_format()
    .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_owned());
  let output_path = output_path(&input, encoder, bitrate.as_deref(), &output_format);

  let mut base: Vec<String> = into_vec!["ffmpeg", "-nostdin", "-hide_banner"];
  base.extend(args.as_slice().iter().cloned());

  let pass_commands = vec![
    encoder.compose_1_2_pass(base.clone()),
    encoder.compose_2_2_pass(base, output_path.clone()),
    into_vec![
      "exiftool",
      "-tagsFromFile",
      input.as_str(),
      "-overwrite_original",
      output_path.as_str(),
    ],
  ];

  debug!("Planned {} -> {}", input, output_path);

  Ok(EncodePlan {
    input,
    encoder,
    bitrate,
    output_format,
    output_path,
    pass_commands,
  })
}
