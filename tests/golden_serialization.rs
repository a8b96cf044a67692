use std::collections::BTreeMap;

use plays_topk::comparison::merge_rankings;
use plays_topk::topk::{FaginAggregator, SortedListBuilder};
use plays_topk::types::{ChannelId, ComparisonEntry, ComparisonResult, ItemKey, RankedResult};

fn ranked(raw: &[(&str, &[(&str, &str, i64)])], k: usize) -> RankedResult {
    let counts: BTreeMap<ChannelId, BTreeMap<ItemKey, i64>> = raw
        .iter()
        .map(|(channel, entries)| {
            let counts = entries
                .iter()
                .map(|(title, performer, score)| (ItemKey::new(*title, *performer).unwrap(), *score))
                .collect();
            (ChannelId::new(*channel).unwrap(), counts)
        })
        .collect();
    let lists = SortedListBuilder.build_all(counts).unwrap();
    FaginAggregator.aggregate(&lists, k).unwrap()
}

#[test]
fn golden_ranked_result_serialization() {
    let result = ranked(
        &[
            ("A", &[("t1", "p1", 10), ("t2", "p2", 6)]),
            ("B", &[("t3", "p3", 15), ("t1", "p1", 2)]),
        ],
        2,
    );

    let json_str = serde_json::to_string_pretty(&result).unwrap();

    let expected = r#"[
  {
    "key": {
      "title": "t3",
      "performer": "p3"
    },
    "score": 15
  },
  {
    "key": {
      "title": "t1",
      "performer": "p1"
    },
    "score": 12
  }
]"#;

    assert_eq!(json_str, expected, "Golden snapshot mismatch");

    let roundtrip: RankedResult = serde_json::from_str(&json_str).unwrap();
    assert_eq!(roundtrip, result);
}

#[test]
fn golden_comparison_serialization() {
    let current = ranked(
        &[
            ("bbc1", &[("Alpha", "Ann", 3), ("Beta", "Bob", 1)]),
            ("kiss", &[("Gamma", "Cat", 5), ("Alpha", "Ann", 1)]),
        ],
        3,
    );
    let previous = ranked(
        &[
            ("bbc1", &[("Alpha", "Ann", 6), ("Delta", "Dan", 2)]),
            ("kiss", &[("Beta", "Bob", 3)]),
        ],
        3,
    );

    let comparison = merge_rankings(&current, &previous);
    let json_str = serde_json::to_string_pretty(&comparison).unwrap();

    // Field order is part of the contract.
    let rank_pos = json_str.find("\"rank\":").unwrap();
    let plays_pos = json_str.find("\"plays\":").unwrap();
    let previous_rank_pos = json_str.find("\"previous_rank\":").unwrap();
    assert!(rank_pos < plays_pos);
    assert!(plays_pos < previous_rank_pos);

    const EXPECTED_JSON: &str = r#"[
      {"rank": 0, "title": "Gamma", "performer": "Cat", "plays": 5, "previous_plays": 0, "previous_rank": null},
      {"rank": 1, "title": "Alpha", "performer": "Ann", "plays": 4, "previous_plays": 6, "previous_rank": 0},
      {"rank": 2, "title": "Beta", "performer": "Bob", "plays": 1, "previous_plays": 3, "previous_rank": 1}
    ]"#;

    let normalized_actual: String = json_str.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized_expected: String = EXPECTED_JSON.chars().filter(|c| !c.is_whitespace()).collect();

    assert_eq!(normalized_actual, normalized_expected, "JSON structure mismatch against golden snapshot");

    let deserialized: ComparisonResult = serde_json::from_str(&json_str).unwrap();
    assert_eq!(deserialized, comparison);
    assert_eq!(
        deserialized.entries[0],
        ComparisonEntry {
            rank: 0,
            title: "Gamma".into(),
            performer: "Cat".into(),
            plays: 5,
            previous_plays: 0,
            previous_rank: None,
        }
    );
}

#[test]
fn empty_comparison_serializes_as_empty_list() {
    let empty = merge_rankings(&RankedResult::default(), &RankedResult::default());
    assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");
}
