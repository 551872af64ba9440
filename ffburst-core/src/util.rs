use std::{fs, path::Path};

use crate::error::{Error, Result};


#[macro_export]
macro_rules! regex {
  ($re:literal $(,)?) => {{
    static RE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    RE.get_or_init(|| regex::Regex::new($re).unwrap())
  }};
}

#[macro_export]
macro_rules! into_vec {
  ($($x:expr),* $(,)?) => {
    vec![
      $(
        $x.into(),
      )*
    ]
  };
}

#[macro_export]
macro_rules! into_array {
  ($($x:expr),* $(,)?) => {
    [
      $(
        $x.into(),
      )*
    ]
  };
}

pub fn read_file_to_string(file: impl AsRef<Path>) -> Result<String> {
  let file = file.as_ref();
  fs::read_to_string(file).map_err(|source| Error::Io {
    path: file.to_path_buf(),
    source,
  })
}

/// Splits `path` into its directory prefix (including the trailing separator, if
/// any) and its final component, without normalizing anything.
pub(crate) fn split_file_name(path: &str) -> (&str, &str) {
  match path.rfind(is_separator) {
    Some(idx) => path.split_at(idx + 1),
    None => ("", path),
  }
}

const fn is_separator(c: char) -> bool {
  c == '/' || (cfg!(windows) && c == '\\')
}
