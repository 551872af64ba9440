use crate::burst::*;
use crate::metadata::FakeMetadata;

fn image(pattern: &str, seq: i64, time: f64) -> ImageDescriptor {
  ImageDescriptor {
    path: pattern.replace('*', &format!("{seq:04}")),
    sequence_number: seq,
    path_pattern: pattern.to_owned(),
    capture_time: time,
  }
}

fn ranges(series: &[BurstSeries]) -> Vec<(i64, i64)> {
  series.iter().map(|s| (s.first_seq(), s.last_seq())).collect()
}

#[test]
fn sequence_and_pattern_extraction() {
  let test_cases = [
    ("IMG_0001.jpg", (1, "IMG_*.jpg")),
    ("IMG_002.jpg", (2, "IMG_*.jpg")),
    ("IMG_002-1.jpg", (2, "IMG_*-1.jpg")),
    ("folder_005/IMG_002.jpg", (2, "folder_005/IMG_*.jpg")),
    ("IMG_01.jpg", (-1, "IMG_01.jpg")),
    ("folder_005/IMG_01.jpg", (-1, "folder_005/IMG_01.jpg")),
    ("/photos/2023/DSC_100_0042.JPG", (42, "/photos/2023/DSC_100_*.JPG")),
    ("/photos/123/", (-1, "/photos/123/")),
  ];

  for (path, (seq, pattern)) in test_cases {
    assert_eq!(
      sequence_and_pattern(path),
      (seq, pattern.to_owned()),
      "{path}"
    );
  }
}

#[test]
fn image_descriptor_reads_capture_time() {
  let metadata = FakeMetadata::with_times([("/b/IMG_0100.jpg", 12.5)]);

  let img = ImageDescriptor::new("/b/IMG_0100.jpg", &metadata);
  assert_eq!(img.sequence_number, 100);
  assert_eq!(img.path_pattern, "/b/IMG_*.jpg");
  assert_eq!(img.capture_time, 12.5);

  let img = ImageDescriptor::new("/b/IMG_0101.jpg", &metadata);
  assert_eq!(img.capture_time, 0.0);
}

#[test]
fn segment_simple() {
  let images = [1, 2, 3, 5, 6].map(|seq| image("IMG_*.jpg", seq, 0.0));

  let series = segment(images, 1);
  assert_eq!(ranges(&series), [(1, 3), (5, 6)]);
  assert_eq!(series[0].len(), 3);
  assert_eq!(series[0].path_pattern(), "IMG_*.jpg");
  assert_eq!(series[1].video, None);
}

#[test]
fn segment_new_series_by_sequence_number() {
  let images = [1, 3, 5].map(|seq| image("IMG_*.jpg", seq, 0.0));
  assert_eq!(segment(images, 1).len(), 3);
}

#[test]
fn segment_new_series_by_image_time() {
  let images = [
    image("IMG_*.jpg", 1, 0.0),
    image("IMG_*.jpg", 2, 0.5),
    image("IMG_*.jpg", 3, 2.0),
  ];
  assert_eq!(ranges(&segment(images, 1)), [(1, 2), (3, 3)]);
}

#[test]
fn segment_gap_of_exactly_one_second_continues() {
  let images = [
    image("IMG_*.jpg", 1, 10.0),
    image("IMG_*.jpg", 2, 11.0),
    image("IMG_*.jpg", 3, 12.0),
  ];
  assert_eq!(ranges(&segment(images, 1)), [(1, 3)]);
}

#[test]
fn segment_new_series_by_pattern() {
  let images = [
    image("DSC_*.jpg", 1, 0.0),
    image("IMA_*.jpg", 2, 0.0),
    image("IMA_*.jpg", 3, 0.0),
  ];
  let series = segment(images, 1);
  assert_eq!(ranges(&series), [(1, 1), (2, 3)]);
  assert_eq!(series[1].path_pattern(), "IMA_*.jpg");
}

#[test]
fn segment_min_number_of_images() {
  let images = [
    image("DSC_*.jpg", 1, 0.0),
    image("IMA_*.jpg", 2, 0.0),
    image("IMA_*.jpg", 3, 0.0),
  ];
  assert_eq!(ranges(&segment(images.clone(), 2)), [(2, 3)]);
  assert!(segment(images, crate::DEFAULT_MIN_SERIES_LEN).is_empty());
}

#[test]
fn segment_sorts_unordered_input() {
  let images = [
    image("IMG_*.jpg", 7, 0.0),
    image("DSC_*.jpg", 3, 0.0),
    image("IMG_*.jpg", 5, 0.0),
    image("DSC_*.jpg", 2, 0.0),
    image("IMG_*.jpg", 6, 0.0),
  ];
  let series = segment(images, 1);

  assert_eq!(ranges(&series), [(2, 3), (5, 7)]);
  assert_eq!(series[0].path_pattern(), "DSC_*.jpg");
  let seqs: Vec<i64> = series[1].images().iter().map(|i| i.sequence_number).collect();
  assert_eq!(seqs, [5, 6, 7]);
}

#[test]
fn segment_images_without_sequence_stand_alone() {
  let images = [
    ImageDescriptor {
      path: "a.jpg".to_owned(),
      sequence_number: -1,
      path_pattern: "a.jpg".to_owned(),
      capture_time: 0.0,
    },
    ImageDescriptor {
      path: "a.jpg".to_owned(),
      sequence_number: -1,
      path_pattern: "a.jpg".to_owned(),
      capture_time: 0.0,
    },
    image("a.jpg", 0, 0.0),
  ];

  assert_eq!(segment(images.clone(), 1).len(), 3);
  assert!(segment(images, 2).is_empty());
}

#[test]
fn segment_largest_sequence_number_does_not_overflow() {
  let metadata = FakeMetadata::default();
  let images = ["IMG_9223372036854775806.jpg", "IMG_9223372036854775807.jpg"]
    .map(|path| ImageDescriptor::new(path, &metadata));
  assert_eq!(images[1].sequence_number, i64::MAX);

  let series = segment(images.clone(), 1);
  assert_eq!(ranges(&series), [(i64::MAX - 1, i64::MAX)]);

  let twice = [images[1].clone(), images[1].clone()];
  assert_eq!(segment(twice, 1).len(), 2);
}

#[test]
fn pair_stills_by_sequence_number() {
  let series = segment(
    [10, 11, 12, 13, 20, 21, 22, 23].map(|seq| image("/b/IMG_*.jpg", seq, 0.0)),
    4,
  );
  assert_eq!(series.len(), 2);

  let stills = [
    "/s/IMG_0021.heic",
    "/s/IMG_0011.jpg",
    "/s/IMG_0011-edit.jpg",
    "/s/IMG_0099.jpg",
    "/s/cover.jpg",
  ];
  let pairings = pair_stills(&series, &stills);

  let got: Vec<(&str, usize, i64)> = pairings
    .iter()
    .map(|p| (p.still.as_str(), p.series, p.sequence_number))
    .collect();
  assert_eq!(
    got,
    [
      ("/s/IMG_0011.jpg", 0, 11),
      ("/s/IMG_0011-edit.jpg", 0, 11),
      ("/s/IMG_0021.heic", 1, 21),
    ]
  );
}
