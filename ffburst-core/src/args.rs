//! Positional inspection of a raw ffmpeg argument vector.
//!
//! The argument vector is never fully parsed. Flags are located by matching a
//! single element against a pattern and taking the element right after it, so
//! the direction of the search decides which occurrence wins when a flag is
//! repeated. These tie-break rules are relied upon by existing invocations and
//! must be kept as they are.

use regex::Regex;

use crate::{
  error::{Error, Result},
  regex,
  util::read_file_to_string,
};

#[cfg(test)]
mod tests;

/// An argument together with its index in the argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
  pub value: String,
  pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Forward,
  Backward,
}

fn scan<S: AsRef<str>>(
  args: &[S],
  direction: Direction,
  is_flag: impl Fn(&str) -> bool,
) -> Option<PositionedToken> {
  // the last element can never be a flag with an argument after it
  let mut candidates = 0..args.len().checked_sub(1)?;
  let hit = |i: &usize| is_flag(args[*i].as_ref());

  let i = match direction {
    Direction::Forward => candidates.find(hit),
    Direction::Backward => candidates.rev().find(hit),
  }?;

  Some(PositionedToken {
    value: args[i + 1].as_ref().to_owned(),
    position: i + 1,
  })
}

/// `pattern` anchored at both ends, so that alternations such as
/// `-f|-fflags` can still match `-fflags` as a whole.
fn anchored(pattern: &Regex) -> Result<Regex> {
  Regex::new(&format!("^(?:{})$", pattern.as_str()))
    .map_err(|e| Error::invalid(format!("Invalid flag pattern {:?}: {e}", pattern.as_str())))
}

/// Finds the argument immediately after the first element (in `direction`)
/// that `pattern` matches in full.
pub fn find_token_after<S: AsRef<str>>(
  args: &[S],
  pattern: &Regex,
  direction: Direction,
) -> Option<PositionedToken> {
  let pattern = match anchored(pattern) {
    Ok(pattern) => pattern,
    Err(e) => {
      warn!("{}", e);
      return None;
    }
  };

  scan(args, direction, |arg| pattern.is_match(arg))
}

/// Converts every `%Nd` placeholder of a printf-style file pattern into `N`
/// single-character wildcards.
pub fn printf_to_glob(pattern: &str) -> String {
  regex!(r"%(\d+)d")
    .replace_all(pattern, |caps: &regex::Captures| {
      let width: usize = caps[1].parse().unwrap_or(0);
      "?".repeat(width)
    })
    .into_owned()
}

/// Expands `pattern` against the filesystem. The matches are returned sorted.
pub fn expand_glob(pattern: &str) -> Result<Vec<String>> {
  let paths = glob::glob(pattern)
    .map_err(|e| Error::invalid(format!("Invalid input pattern {pattern:?}: {e}")))?;

  let mut files: Vec<String> = paths
    .filter_map(|entry| match entry {
      Ok(path) => Some(path.to_string_lossy().into_owned()),
      Err(e) => {
        debug!("Error matching {:?}: {}", pattern, e);
        None
      }
    })
    .collect();
  files.sort();

  Ok(files)
}

/// An ffmpeg argument vector, as given by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegArgs {
  args: Vec<String>,
}

impl FfmpegArgs {
  pub fn new<S: Into<String>>(args: impl IntoIterator<Item = S>) -> Self {
    Self {
      args: args.into_iter().map(Into::into).collect(),
    }
  }

  pub fn as_slice(&self) -> &[String] {
    &self.args
  }

  pub fn into_inner(self) -> Vec<String> {
    self.args
  }

  /// The argument of the first `-i`.
  pub fn input(&self) -> Option<PositionedToken> {
    find_token_after(&self.args, regex!(r"^-i$"), Direction::Forward)
  }

  /// Video bitrate given with `-b:v`.
  pub fn bitrate(&self) -> Option<String> {
    find_token_after(&self.args, regex!(r"^-b:v$"), Direction::Forward).map(|t| t.value)
  }

  /// Video encoder given with `-c:v`.
  pub fn encoder(&self) -> Option<String> {
    find_token_after(&self.args, regex!(r"^-c:v$"), Direction::Forward).map(|t| t.value)
  }

  /// Output container format, i.e. the last `-f` as long as it comes after
  /// the input. A `-f` before the input selects the demuxer instead.
  pub fn output_format(&self) -> Option<String> {
    let format = find_token_after(&self.args, regex!(r"^-f$"), Direction::Backward)?;
    let input = self.input()?;

    (format.position > input.position).then(|| format.value)
  }

  /// Looks for an output file that was specified by mistake.
  ///
  /// Only `.mov` and `.mp4` files are detected. A side input given without
  /// `-i` is reported as an output too.
  pub fn output_spec(&self) -> Option<String> {
    let re = regex!(r"(?i)\.(mov|mp4)$");
    let i = self.args.iter().rposition(|arg| re.is_match(arg))?;

    match i.checked_sub(1).map(|prev| self.args[prev].as_str()) {
      Some("-i") => None,
      _ => Some(self.args[i].clone()),
    }
  }

  /// The argument after the first occurrence of the literal `flag`.
  pub fn tag_value(&self, flag: &str) -> Option<String> {
    scan(&self.args, Direction::Forward, |arg| arg == flag).map(|t| t.value)
  }

  /// Resolves the single file the input of this command line refers to.
  ///
  /// - A printf pattern such as `IMG_%04d.jpg` resolves to the last existing
  ///   file matching `IMG_????.jpg`, or `None` if there is none.
  /// - The list file of a preceding `-f concat` resolves to the last file in
  ///   that list.
  /// - Anything else is returned as is.
  pub fn resolve_input(&self) -> Result<Option<String>> {
    let input = match self.input() {
      Some(input) => input,
      None => return Ok(None),
    };

    if regex!(r"%\d+d").is_match(&input.value) {
      let glob = printf_to_glob(&input.value);
      let last = expand_glob(&glob)?.pop();
      debug!("Input pattern {:?} resolved to {:?}", input.value, last);
      return Ok(last);
    }

    if let Some(format) = find_token_after(&self.args, regex!(r"^-f$"), Direction::Backward) {
      if format.value == "concat" && format.position < input.position {
        let list = read_file_to_string(&input.value)?;
        let last = list
          .lines()
          .rev()
          .find_map(|line| regex!(r"file '(.+)'").captures(line))
          .map(|caps| caps[1].to_owned());

        if let Some(last) = last {
          debug!("Concat list {:?} resolved to {:?}", input.value, last);
          return Ok(Some(last));
        }
      }
    }

    Ok(Some(input.value))
  }
}
