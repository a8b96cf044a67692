use std::io::Write;

use chrono::{DateTime, Duration, TimeZone, Utc};
use plays_topk::comparison::TimeWindow;
use plays_topk::source::{Play, PlayLog, PlayLogError};
use plays_topk::types::{ChannelId, ItemKey};
use tempfile::NamedTempFile;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn play(on: &str, title: &str, performer: &str, start: DateTime<Utc>) -> Play {
    Play {
        channel: ChannelId::new(on).unwrap(),
        item: ItemKey::new(title, performer).unwrap(),
        start,
        end: start + Duration::minutes(4),
    }
}

#[test]
fn window_bounds_are_inclusive() {
    let mut log = PlayLog::new();
    log.record(play("bbc1", "Edge", "E", at(8, 0))).unwrap();
    log.record(play("bbc1", "Inside", "I", at(10, 0))).unwrap();
    log.record(play("bbc1", "Last", "L", at(15, 0))).unwrap();
    log.record(play("bbc1", "After", "A", at(15, 1))).unwrap();

    let window = TimeWindow::new(at(8, 0), at(15, 0)).unwrap();
    let titles: Vec<&str> = log
        .channel_plays(&ChannelId::new("bbc1").unwrap(), &window)
        .iter()
        .map(|p| p.item.title())
        .collect();

    assert_eq!(titles, vec!["Edge", "Inside", "Last"]);
}

#[test]
fn channel_plays_are_ordered_by_start_regardless_of_insertion() {
    let mut log = PlayLog::new();
    log.record(play("bbc1", "Third", "x", at(12, 0))).unwrap();
    log.record(play("bbc1", "First", "x", at(9, 0))).unwrap();
    log.record(play("bbc1", "Second", "x", at(10, 0))).unwrap();

    let window = TimeWindow::new(at(1, 0), at(31, 0)).unwrap();
    let titles: Vec<&str> = log
        .channel_plays(&ChannelId::new("bbc1").unwrap(), &window)
        .iter()
        .map(|p| p.item.title())
        .collect();

    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn song_plays_span_channels() {
    let mut log = PlayLog::new();
    log.record(play("kiss", "Hit", "Star", at(11, 0))).unwrap();
    log.record(play("bbc1", "Hit", "Star", at(10, 0))).unwrap();
    log.record(play("bbc1", "Hit", "Cover Band", at(9, 0))).unwrap();

    let window = TimeWindow::new(at(1, 0), at(31, 0)).unwrap();
    let channels: Vec<&str> = log
        .song_plays(&ItemKey::new("Hit", "Star").unwrap(), &window)
        .iter()
        .map(|p| p.channel.as_str())
        .collect();

    assert_eq!(channels, vec!["bbc1", "kiss"]);
}

#[test]
fn counts_group_by_title_and_performer() {
    let mut log = PlayLog::new();
    log.record(play("bbc1", "Hit", "Star", at(10, 0))).unwrap();
    log.record(play("bbc1", "Hit", "Star", at(10, 1))).unwrap();
    log.record(play("bbc1", "Hit", "Cover Band", at(10, 2))).unwrap();
    log.record(play("kiss", "Hit", "Star", at(10, 3))).unwrap();

    let window = TimeWindow::new(at(1, 0), at(31, 0)).unwrap();
    let counts = log.counts(&ChannelId::new("bbc1").unwrap(), &window);

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&ItemKey::new("Hit", "Star").unwrap()], 2);
    assert_eq!(counts[&ItemKey::new("Hit", "Cover Band").unwrap()], 1);
    assert!(log.counts(&ChannelId::new("absent").unwrap(), &window).is_empty());
}

#[test]
fn play_ending_before_it_starts_is_rejected() {
    let mut log = PlayLog::new();
    let mut bad = play("bbc1", "Hit", "Star", at(10, 0));
    bad.end = at(9, 0);

    assert!(matches!(log.record(bad), Err(PlayLogError::EndBeforeStart { .. })));
    assert!(log.is_empty());
}

#[test]
fn loads_plays_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
  {{"channel": "bbc1", "title": "Hit", "performer": "Star",
    "start": "2024-01-10T10:00:00Z", "end": "2024-01-10T10:03:00Z"}},
  {{"channel": "kiss", "title": "Hit", "performer": "Star",
    "start": "2024-01-10T11:00:00+01:00", "end": "2024-01-10T11:03:00+01:00"}}
]"#
    )
    .unwrap();

    let log = PlayLog::from_path(file.path()).unwrap();

    assert_eq!(log.len(), 2);
    let window = TimeWindow::new(at(10, 10), at(10, 10)).unwrap();
    // 11:00+01:00 is 10:00 UTC.
    assert_eq!(
        log.song_plays(&ItemKey::new("Hit", "Star").unwrap(), &window).len(),
        2
    );
}

#[test]
fn json_with_empty_performer_is_rejected() {
    let raw = r#"[{"channel": "bbc1", "title": "Hit", "performer": "",
        "start": "2024-01-10T10:00:00Z", "end": "2024-01-10T10:03:00Z"}]"#;

    assert!(matches!(
        PlayLog::from_json_reader(raw.as_bytes()),
        Err(PlayLogError::Serialization(_))
    ));
}
