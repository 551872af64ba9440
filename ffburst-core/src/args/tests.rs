use std::fs;

use quickcheck_macros::quickcheck;

use crate::args::*;
use crate::Error;

fn args(s: &str) -> FfmpegArgs {
  FfmpegArgs::new(s.split_ascii_whitespace())
}

#[test]
fn find_token_after_single_occurrence_agrees_in_both_directions() {
  let v = ["a", "-f", "concat", "-i", "x.mov"];
  let re = crate::regex!(r"^-f$");

  let expected = Some(PositionedToken {
    value: "concat".to_owned(),
    position: 2,
  });
  assert_eq!(find_token_after(&v, re, Direction::Forward), expected);
  assert_eq!(find_token_after(&v, re, Direction::Backward), expected);
}

#[test]
fn find_token_after_two_occurrences_diverge() {
  let v = ["-f", "concat", "-i", "list.txt", "-f", "mov"];
  let re = crate::regex!(r"^-f$");

  let forward = find_token_after(&v, re, Direction::Forward).unwrap();
  let backward = find_token_after(&v, re, Direction::Backward).unwrap();
  assert_eq!((forward.value.as_str(), forward.position), ("concat", 1));
  assert_eq!((backward.value.as_str(), backward.position), ("mov", 5));
}

#[test]
fn find_token_after_requires_full_match() {
  let v = ["-fflags", "+genpts", "x-f", "y"];
  assert_eq!(
    find_token_after(&v, &regex::Regex::new("-f").unwrap(), Direction::Forward),
    None
  );
}

#[test]
fn find_token_after_matches_alternations_in_full() {
  let v = ["-fflags", "+genpts", "-i", "in.mov"];
  let re = regex::Regex::new("-f|-fflags").unwrap();

  let found = find_token_after(&v, &re, Direction::Forward).unwrap();
  assert_eq!((found.value.as_str(), found.position), ("+genpts", 1));
  assert_eq!(find_token_after(&v, &re, Direction::Backward), Some(found));
}

#[test]
fn find_token_after_ignores_trailing_flag() {
  let test_cases: [&[&str]; 4] = [&[], &["-i"], &["x", "-i"], &["-b:v"]];

  for v in test_cases {
    assert_eq!(
      find_token_after(v, crate::regex!(r"^-i$"), Direction::Forward),
      None
    );
    assert_eq!(
      find_token_after(v, crate::regex!(r"^-i$"), Direction::Backward),
      None
    );
  }
}

#[quickcheck]
fn find_token_after_never_panics(v: Vec<String>, backwards: bool) -> bool {
  let direction = if backwards {
    Direction::Backward
  } else {
    Direction::Forward
  };
  find_token_after(&v, crate::regex!(r"^-.*$"), direction)
    .map_or(true, |t| t.position >= 1 && t.position < v.len())
}

#[quickcheck]
fn resolve_input_without_input_flag_is_none(v: Vec<String>) -> bool {
  let v: Vec<String> = v.into_iter().filter(|s| s != "-i").collect();
  matches!(FfmpegArgs::new(v).resolve_input(), Ok(None))
}

#[test]
fn simple_fields() {
  let a = args("-i in.jpg -c:v libx264 -b:v 2M -preset slow -tag:v avc1");
  assert_eq!(a.encoder().as_deref(), Some("libx264"));
  assert_eq!(a.bitrate().as_deref(), Some("2M"));
  assert_eq!(a.tag_value("-tag:v").as_deref(), Some("avc1"));
  assert_eq!(a.tag_value("-crf"), None);
  assert_eq!(a.output_format(), None);

  let a = args("-c:v libx265");
  assert_eq!(a.bitrate(), None);
}

#[test]
fn output_format_must_follow_input() {
  let test_cases = [
    ("-f image2 -i x%03d.jpg -c:v libx264", None),
    ("-f image2 -i x%03d.jpg -c:v libx264 -f mov", Some("mov")),
    ("-i x.jpg -f mp4", Some("mp4")),
    ("-c:v libx264 -f mov", None),
  ];

  for (s, ans) in test_cases {
    assert_eq!(args(s).output_format().as_deref(), ans, "{s}");
  }
}

#[test]
fn output_spec_detection() {
  let test_cases = [
    ("-i in.jpg -c:v libx264 out.mp4", Some("out.mp4")),
    ("-i in.jpg -c:v libx264 OUT.MOV", Some("OUT.MOV")),
    ("-i in.mov -c:v libx264", None),
    ("-i in.jpg -c:v libx264", None),
    // the last match decides, even if an earlier one looks like an output
    ("stray.mp4 -i in.mov -c:v libx264", None),
    ("-i in.mov -c:v libx264 out.mp4", Some("out.mp4")),
    ("out.mp4", Some("out.mp4")),
  ];

  for (s, ans) in test_cases {
    assert_eq!(args(s).output_spec().as_deref(), ans, "{s}");
  }
}

#[test]
fn printf_pattern_to_glob() {
  let test_cases = [
    ("IMG%03d.jpg", "IMG???.jpg"),
    ("/a/b/IMG_%04d.JPG", "/a/b/IMG_????.JPG"),
    ("x%2d_%3d.png", "x??_???.png"),
    ("plain.jpg", "plain.jpg"),
  ];

  for (s, ans) in test_cases {
    assert_eq!(printf_to_glob(s), ans);
  }
}

#[test]
fn resolve_input_printf_pattern_picks_last_file() -> anyhow::Result<()> {
  let dir = tempfile::tempdir()?;
  for name in ["IMG001.jpg", "IMG003.jpg", "IMG002.jpg", "IMG0004.jpg", "IMG004.png"] {
    fs::write(dir.path().join(name), b"")?;
  }
  let dir = dir.path().to_str().unwrap().to_owned();

  let a = FfmpegArgs::new(["-f", "image2", "-i", &format!("{dir}/IMG%03d.jpg")]);
  assert_eq!(a.resolve_input()?, Some(format!("{dir}/IMG003.jpg")));

  let matched = expand_glob(&format!("{dir}/IMG???.jpg"))?;
  assert_eq!(
    matched,
    ["IMG001.jpg", "IMG002.jpg", "IMG003.jpg"]
      .map(|f| format!("{dir}/{f}"))
      .to_vec()
  );

  let a = FfmpegArgs::new(["-i", &format!("{dir}/DSC%03d.jpg")]);
  assert_eq!(a.resolve_input()?, None);

  Ok(())
}

#[test]
fn resolve_input_printf_pattern_in_directory_name() -> anyhow::Result<()> {
  let dir = tempfile::tempdir()?;
  for shot in ["shot_01", "shot_02", "shot_3"] {
    fs::create_dir(dir.path().join(shot))?;
    fs::write(dir.path().join(shot).join("IMG.jpg"), b"")?;
  }
  let dir = dir.path().to_str().unwrap().to_owned();

  let a = FfmpegArgs::new(["-i", &format!("{dir}/shot_%02d/IMG.jpg")]);
  assert_eq!(a.resolve_input()?, Some(format!("{dir}/shot_02/IMG.jpg")));

  let a = FfmpegArgs::new(["-i", &format!("{dir}/missing_%02d/IMG.jpg")]);
  assert_eq!(a.resolve_input()?, None);

  Ok(())
}

#[test]
fn resolve_input_concat_list() -> anyhow::Result<()> {
  let dir = tempfile::tempdir()?;
  let list = dir.path().join("list.txt");
  fs::write(
    &list,
    "file '/p/IMG_001.jpg'\nduration 0.1\nfile '/p/IMG_002.jpg'\nduration 0.1\n",
  )?;
  let list = list.to_str().unwrap();

  let a = FfmpegArgs::new(["-f", "concat", "-safe", "0", "-i", list, "-c:v", "libx264"]);
  assert_eq!(a.resolve_input()?.as_deref(), Some("/p/IMG_002.jpg"));

  // a `-f concat` after the input does not describe it
  let a = FfmpegArgs::new(["-i", list, "-f", "concat"]);
  assert_eq!(a.resolve_input()?.as_deref(), Some(list));

  Ok(())
}

#[test]
fn resolve_input_concat_list_without_files_falls_through() -> anyhow::Result<()> {
  let dir = tempfile::tempdir()?;
  let list = dir.path().join("list.txt");
  fs::write(&list, "# nothing here\n")?;
  let list = list.to_str().unwrap();

  let a = FfmpegArgs::new(["-f", "concat", "-i", list]);
  assert_eq!(a.resolve_input()?.as_deref(), Some(list));

  Ok(())
}

#[test]
fn resolve_input_missing_concat_list_is_io_error() {
  let a = FfmpegArgs::new(["-f", "concat", "-i", "/no/such/list.txt"]);
  assert!(matches!(a.resolve_input(), Err(Error::Io { .. })));
}

#[test]
fn resolve_input_media_path_is_returned_as_is() {
  let a = args("-i /a/b/clip.mov -c:v libx264");
  assert_eq!(a.resolve_input().unwrap().as_deref(), Some("/a/b/clip.mov"));
}
