use chrono::{DateTime, Days, Duration, NaiveTime, Utc};

use super::presenter::StudioClock;
use crate::error::StoreResult;
use crate::models::NewClass;
use crate::store::StudioStore;

/// (name, instructor, days ahead, studio-local hour, slots)
const SAMPLE_CLASSES: [(&str, &str, u64, i64, i32); 3] = [
    ("Yoga", "Alice", 1, 9, 10),
    ("Zumba", "Bob", 2, 18, 15),
    ("HIIT", "Charlie", 3, 7, 12),
];

/// Fills an empty catalog with the sample classes, scheduled relative to
/// `now` in the studio zone. Returns how many classes were inserted.
pub async fn seed_if_empty(
    store: &dyn StudioStore,
    clock: &StudioClock,
    now: DateTime<Utc>,
) -> StoreResult<usize> {
    if store.count_classes().await? > 0 {
        return Ok(0);
    }

    let today = now.with_timezone(&clock.zone()).date_naive();
    let mut inserted = 0;
    for (name, instructor, days_ahead, hour, slots) in SAMPLE_CLASSES {
        let day = today + Days::new(days_ahead);
        store
            .insert_class(NewClass {
                name: name.to_string(),
                scheduled_at: day.and_time(NaiveTime::MIN) + Duration::hours(hour),
                instructor: instructor.to_string(),
                available_slots: slots,
            })
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Timelike};

    #[tokio::test]
    async fn test_seeds_three_classes_ahead_of_now() {
        let store = MemoryStore::new();
        let clock = StudioClock::default();
        // 20:00 UTC is already the next day in Kolkata
        let now = Utc.with_ymd_and_hms(2025, 6, 9, 20, 0, 0).unwrap();

        assert_eq!(seed_if_empty(&store, &clock, now).await.unwrap(), 3);

        let classes = store.list_classes().await.unwrap();
        let summary: Vec<_> = classes
            .iter()
            .map(|c| (c.name.as_str(), c.scheduled_at.date(), c.scheduled_at.hour(), c.available_slots))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Yoga", NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(), 9, 10),
                ("Zumba", NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(), 18, 15),
                ("HIIT", NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(), 7, 12),
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_catalog_is_left_alone() {
        let store = MemoryStore::new();
        let clock = StudioClock::default();
        let now = Utc::now();

        seed_if_empty(&store, &clock, now).await.unwrap();
        assert_eq!(seed_if_empty(&store, &clock, now).await.unwrap(), 0);
        assert_eq!(store.count_classes().await.unwrap(), 3);
    }
}
