//! Change detection between the current feed and the persisted snapshot.
//!
//! Classifies every record of the de-duplicated feed as new, updated, or
//! unchanged for notification dispatch. Records that left the feed are not
//! events; `expired` names them separately for the optional removal
//! announcements.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::{PromotionRecord, Snapshot};

/// Classification of one current-feed record against the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Not tracked before; announce it.
    New(PromotionRecord),
    /// Tracked before, but the offer changed (end time or discount price).
    Updated {
        record: PromotionRecord,
        previous_end_time: DateTime<Utc>,
    },
    /// Tracked before with an identical offer; suppressed.
    Unchanged,
}

impl ChangeEvent {
    /// The record carried by this event, if it needs announcing.
    pub fn record(&self) -> Option<&PromotionRecord> {
        match self {
            ChangeEvent::New(record) => Some(record),
            ChangeEvent::Updated { record, .. } => Some(record),
            ChangeEvent::Unchanged => None,
        }
    }
}

/// De-duplicate a feed by record id, keeping the last occurrence.
///
/// Surviving entries keep their feed position, so a feed that lists the same
/// promotion twice behaves exactly as if only the later listing existed.
pub fn dedupe_by_id(records: Vec<PromotionRecord>) -> Vec<PromotionRecord> {
    let mut last_index: HashMap<String, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        last_index.insert(record.id.clone(), index);
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(index, record)| last_index.get(record.id.as_str()) == Some(index))
        .map(|(_, record)| record)
        .collect()
}

/// Classify the current feed against the previously persisted snapshot.
///
/// The feed is de-duplicated first (last occurrence wins); events come back
/// in feed order, one per surviving record. Only the promotion end time and
/// the discount price count as changes.
pub fn detect(current: &[PromotionRecord], previous: &Snapshot) -> Vec<ChangeEvent> {
    dedupe_by_id(current.to_vec())
        .into_iter()
        .map(|record| match previous.get(&record.id) {
            None => ChangeEvent::New(record),
            Some(known) if record.same_offer(known) => ChangeEvent::Unchanged,
            Some(known) => ChangeEvent::Updated {
                previous_end_time: known.end_time,
                record,
            },
        })
        .collect()
}

/// Records tracked in the snapshot but absent from the current feed.
///
/// Returned in snapshot (id) order. These never become change events; they
/// simply drop out of the snapshot at the next save, unless removal
/// announcements are enabled.
pub fn expired(current: &[PromotionRecord], previous: &Snapshot) -> Vec<PromotionRecord> {
    let current_ids: HashSet<&str> = current.iter().map(|r| r.id.as_str()).collect();

    previous
        .records()
        .filter(|record| !current_ids.contains(record.id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_ending(id: &str, end_day: u32) -> PromotionRecord {
        PromotionRecord {
            id: id.to_string(),
            title: format!("Game {id}"),
            start_time: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 1, end_day, 16, 0, 0).unwrap(),
            original_price: 2999,
            discount_price: 0,
            currency_code: "USD".to_string(),
            image_url: "https://example.com/wide.jpg".to_string(),
            claim_url: format!("https://store.example.com/p/{id}"),
        }
    }

    fn record(id: &str) -> PromotionRecord {
        record_ending(id, 8)
    }

    #[test]
    fn test_cold_start_all_new() {
        let current = vec![record("game-a"), record("game-b")];
        let events = detect(&current, &Snapshot::new());

        assert_eq!(
            events,
            vec![
                ChangeEvent::New(record("game-a")),
                ChangeEvent::New(record("game-b")),
            ]
        );
    }

    #[test]
    fn test_identical_records_unchanged() {
        let current = vec![record("game-a"), record("game-b")];
        let previous = Snapshot::from_records(current.clone());

        let events = detect(&current, &previous);
        assert_eq!(events, vec![ChangeEvent::Unchanged, ChangeEvent::Unchanged]);
    }

    #[test]
    fn test_end_time_change_yields_updated() {
        let previous = Snapshot::from_records(vec![record_ending("game-a", 8)]);
        let current = vec![record_ending("game-a", 15)];

        let events = detect(&current, &previous);
        assert_eq!(
            events,
            vec![ChangeEvent::Updated {
                record: record_ending("game-a", 15),
                previous_end_time: Utc.with_ymd_and_hms(2025, 1, 8, 16, 0, 0).unwrap(),
            }]
        );
    }

    #[test]
    fn test_price_change_yields_updated() {
        let previous = Snapshot::from_records(vec![record("game-a")]);
        let mut relisted = record("game-a");
        relisted.discount_price = 499;

        let events = detect(&[relisted.clone()], &previous);
        assert_eq!(
            events,
            vec![ChangeEvent::Updated {
                record: relisted,
                previous_end_time: Utc.with_ymd_and_hms(2025, 1, 8, 16, 0, 0).unwrap(),
            }]
        );
    }

    #[test]
    fn test_title_change_is_not_significant() {
        let previous = Snapshot::from_records(vec![record("game-a")]);
        let mut renamed = record("game-a");
        renamed.title = "Game of the Year Edition".to_string();

        let events = detect(&[renamed], &previous);
        assert_eq!(events, vec![ChangeEvent::Unchanged]);
    }

    #[test]
    fn test_dedupe_keeps_last_occurrence_in_place() {
        let feed = vec![
            record_ending("game-a", 8),
            record("game-b"),
            record_ending("game-a", 15),
            record("game-c"),
        ];

        let deduped = dedupe_by_id(feed);
        let ids: Vec<&str> = deduped.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["game-b", "game-a", "game-c"]);
        assert_eq!(
            deduped[1].end_time,
            Utc.with_ymd_and_hms(2025, 1, 15, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_duplicate_feed_equals_later_entry_only() {
        let previous = Snapshot::from_records(vec![record_ending("game-a", 8)]);

        let duplicated = vec![
            record_ending("game-a", 8),
            record("game-b"),
            record_ending("game-a", 15),
        ];
        let collapsed = vec![record("game-b"), record_ending("game-a", 15)];

        assert_eq!(detect(&duplicated, &previous), detect(&collapsed, &previous));
    }

    #[test]
    fn test_detect_after_merge_is_all_unchanged() {
        let current = vec![record("game-a"), record_ending("game-b", 12)];
        let events = detect(&current, &Snapshot::new());
        assert!(events.iter().all(|e| e.record().is_some()));

        // Merge exactly what was fetched, then detect again.
        let merged = Snapshot::from_records(dedupe_by_id(current.clone()));
        let replay = detect(&current, &merged);
        assert_eq!(replay, vec![ChangeEvent::Unchanged, ChangeEvent::Unchanged]);
    }

    #[test]
    fn test_removed_records_are_not_events() {
        let previous = Snapshot::from_records(vec![record("game-a"), record("game-b")]);
        let current = vec![record("game-a")];

        let events = detect(&current, &previous);
        assert_eq!(events, vec![ChangeEvent::Unchanged]);

        let gone = expired(&current, &previous);
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].id, "game-b");
    }

    #[test]
    fn test_expired_empty_when_feed_covers_snapshot() {
        let previous = Snapshot::from_records(vec![record("game-a")]);
        let current = vec![record("game-a"), record("game-b")];

        assert!(expired(&current, &previous).is_empty());
    }

    #[test]
    fn test_mixed_changes() {
        let previous = Snapshot::from_records(vec![
            record_ending("keep", 8),
            record_ending("extend", 8),
            record_ending("leave", 8),
        ]);
        let current = vec![
            record_ending("keep", 8),
            record_ending("extend", 15),
            record_ending("arrive", 20),
        ];

        let events = detect(&current, &previous);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ChangeEvent::Unchanged);
        assert!(matches!(&events[1], ChangeEvent::Updated { record, .. } if record.id == "extend"));
        assert!(matches!(&events[2], ChangeEvent::New(record) if record.id == "arrive"));

        let gone = expired(&current, &previous);
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].id, "leave");
    }

    #[test]
    fn test_empty_feed_yields_no_events() {
        let previous = Snapshot::from_records(vec![record("game-a")]);
        let events = detect(&[], &previous);
        assert!(events.is_empty());

        let gone = expired(&[], &previous);
        assert_eq!(gone.len(), 1);
    }
}
