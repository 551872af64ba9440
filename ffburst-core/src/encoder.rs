use std::fmt::Display;

use itertools::chain;

use crate::into_array;


pub const NULL: &str = if cfg!(windows) { "nul" } else { "/dev/null" };

/// Video encoders a two-pass encode can be planned for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::EnumString, strum::IntoStaticStr)]
pub enum VideoEncoder {
  #[strum(serialize = "libx264")]
  X264,
  #[strum(serialize = "libx265")]
  X265,
}

impl Display for VideoEncoder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(<&'static str>::from(self))
  }
}

impl VideoEncoder {
  /// Encoder name as used in output file names, e.g. `x265`.
  pub fn short_name(self) -> &'static str {
    let name: &'static str = self.into();
    name.strip_prefix("lib").unwrap_or(name)
  }

  /// The `-tag:v` value the encoder requires, if any.
  ///
  /// HEVC in MP4/MOV has to be tagged `hvc1` for Apple players to accept it.
  pub const fn required_tag(self) -> Option<&'static str> {
    match self {
      Self::X264 => None,
      Self::X265 => Some("hvc1"),
    }
  }

  /// Composes 1st pass command for 2 pass encoding
  pub fn compose_1_2_pass(self, base: Vec<String>) -> Vec<String> {
    match self {
      Self::X264 => chain!(
        base,
        into_array!["-map", "-0?", "-map", "0:v", "-pass", "1", "-f", "null", NULL],
      )
      .collect(),
      Self::X265 => chain!(
        base,
        into_array!["-map", "-0?", "-map", "0:v", "-x265-params", "pass=1", "-f", "null", NULL],
      )
      .collect(),
    }
  }

  /// Composes 2nd pass command for 2 pass encoding
  pub fn compose_2_2_pass(self, base: Vec<String>, output: String) -> Vec<String> {
    match self {
      Self::X264 => chain!(base, into_array!["-pass", "2", output]).collect(),
      Self::X265 => chain!(base, into_array!["-x265-params", "pass=2", output]).collect(),
    }
  }
}
