//! Collecting image files from the paths given on the command line.

use std::{fs, path::Path};

use crate::regex;


pub fn is_image(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .map_or(false, |name| {
      regex!(r"(?i)\.(jpe?g|png|heic|heif|tiff?)$").is_match(name)
    })
}

/// Expands `paths` into a list of image files.
///
/// Files are kept as given, directories contribute the images directly inside
/// them, sorted by name. Paths that don't exist are skipped with a warning.
pub fn scan_for_image_files<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
  let mut files = Vec::new();

  for path in paths {
    let path = path.as_ref();

    if path.is_file() {
      files.push(path.to_string_lossy().into_owned());
    } else if path.is_dir() {
      let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
          warn!("Cannot read directory {:?}: {}", path, e);
          continue;
        }
      };

      let mut images: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_image(p))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
      images.sort();
      debug!("{} images in {:?}", images.len(), path);

      files.extend(images);
    } else {
      warn!("Invalid path: {:?}", path);
    }
  }

  files
}
