//! Free-slot suggestion over the working day.
//!
//! Walks the day's bookings in start order with a moving cursor and proposes
//! fixed-length slots into the gaps. A gap qualifies once it is at least
//! [`MIN_GAP`] long, but only a full [`SLOT_LEN`] slot is ever proposed, so a
//! 45-minute gap yields nothing. That asymmetry is long-standing scheduling
//! behavior and is kept as-is.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{CalendarEventFilter, CalendarEventRecord, CalendarStore};
use crate::error::DatabaseError;

/// Working window bounds, 09:00-17:00 UTC.
pub const WORK_DAY_START_HOUR: u32 = 9;
pub const WORK_DAY_END_HOUR: u32 = 17;

/// Minimum gap, in minutes, before a slot is considered.
pub const MIN_GAP_MINUTES: i64 = 30;
/// Length, in minutes, of every proposed slot.
pub const SLOT_LEN_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedSlot {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// The 09:00-17:00 UTC window for a calendar date.
pub fn working_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date
        .and_hms_opt(WORK_DAY_START_HOUR, 0, 0)
        .expect("valid window start")
        .and_utc();
    let end = date
        .and_hms_opt(WORK_DAY_END_HOUR, 0, 0)
        .expect("valid window end")
        .and_utc();
    (start, end)
}

/// Propose open slots between `window_start` and `window_end` given the
/// day's events ordered ascending by start time.
///
/// Events without an end time never advance the cursor.
pub fn propose_slots(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    events: &[CalendarEventRecord],
) -> Vec<SuggestedSlot> {
    let min_gap = Duration::minutes(MIN_GAP_MINUTES);
    let slot_len = Duration::minutes(SLOT_LEN_MINUTES);
    let mut slots = Vec::new();
    let mut cursor = window_start;

    for event in events {
        if event.start_at - cursor >= min_gap {
            let slot_end = cursor + slot_len;
            if slot_end <= event.start_at {
                slots.push(SuggestedSlot {
                    start_at: cursor,
                    end_at: slot_end,
                });
            }
        }
        if let Some(end_at) = event.end_at
            && end_at > cursor
        {
            cursor = end_at;
        }
    }

    if window_end - cursor >= min_gap {
        let slot_end = cursor + slot_len;
        if slot_end <= window_end {
            slots.push(SuggestedSlot {
                start_at: cursor,
                end_at: slot_end,
            });
        }
    }

    slots
}

/// Suggest open slots on `date`, optionally restricted to one assignee's
/// bookings.
pub async fn suggest_slots(
    db: &dyn CalendarStore,
    date: NaiveDate,
    assigned_to_id: Option<Uuid>,
) -> Result<Vec<SuggestedSlot>, DatabaseError> {
    let (window_start, window_end) = working_window(date);
    let events = db
        .list_events(&CalendarEventFilter {
            from: Some(window_start),
            to: Some(window_end),
            assigned_to_id,
            ..CalendarEventFilter::default()
        })
        .await?;
    Ok(propose_slots(window_start, window_end, &events))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::db::{CalendarEventRecord, CalendarEventType};

    use super::{SuggestedSlot, propose_slots, working_window};

    fn event(start: (u32, u32), end: Option<(u32, u32)>) -> CalendarEventRecord {
        let at = |(h, m): (u32, u32)| Utc.with_ymd_and_hms(2026, 6, 15, h, m, 0).unwrap();
        CalendarEventRecord {
            id: Uuid::new_v4(),
            title: "hearing".to_string(),
            event_type: CalendarEventType::Session,
            start_at: at(start),
            end_at: end.map(at),
            is_all_day: false,
            location: None,
            description: None,
            client_id: None,
            case_id: None,
            assigned_to_id: None,
            created_at: at((8, 0)),
            updated_at: at((8, 0)),
        }
    }

    fn window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
        working_window(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap())
    }

    fn slot((sh, sm): (u32, u32), (eh, em): (u32, u32)) -> SuggestedSlot {
        SuggestedSlot {
            start_at: Utc.with_ymd_and_hms(2026, 6, 15, sh, sm, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2026, 6, 15, eh, em, 0).unwrap(),
        }
    }

    #[test]
    fn empty_day_yields_one_opening_slot() {
        let (start, end) = window();
        assert_eq!(propose_slots(start, end, &[]), vec![slot((9, 0), (10, 0))]);
    }

    #[test]
    fn slot_may_end_exactly_at_event_start() {
        // One booking 10:00-11:00: the hour before it fits exactly, and one
        // more slot opens after it.
        let (start, end) = window();
        let events = [event((10, 0), Some((11, 0)))];
        assert_eq!(
            propose_slots(start, end, &events),
            vec![slot((9, 0), (10, 0)), slot((11, 0), (12, 0))]
        );
    }

    #[test]
    fn forty_five_minute_gap_yields_no_slot() {
        // Gap 09:00-09:45 passes the 30-minute check but cannot hold a full
        // hour, so nothing is proposed before the event.
        let (start, end) = window();
        let events = [event((9, 45), Some((10, 30)))];
        assert_eq!(propose_slots(start, end, &events), vec![slot((10, 30), (11, 30))]);
    }

    #[test]
    fn short_gap_is_skipped_entirely() {
        let (start, end) = window();
        let events = [event((9, 20), Some((16, 45)))];
        assert!(propose_slots(start, end, &events).is_empty());
    }

    #[test]
    fn open_ended_event_does_not_advance_cursor() {
        let (start, end) = window();
        let events = [event((12, 0), None)];
        // Cursor never moves, so the trailing check re-proposes the 09:00
        // slot; end-less bookings never block anything.
        assert_eq!(
            propose_slots(start, end, &events),
            vec![slot((9, 0), (10, 0)), slot((9, 0), (10, 0))]
        );
    }

    #[test]
    fn event_end_before_cursor_is_ignored() {
        let (start, end) = window();
        // Second event is nested inside the first; its earlier end must not
        // pull the cursor backwards.
        let events = [event((9, 0), Some((13, 0))), event((10, 0), Some((11, 0)))];
        assert_eq!(propose_slots(start, end, &events), vec![slot((13, 0), (14, 0))]);
    }

    #[test]
    fn slots_stay_inside_the_window() {
        let (start, end) = window();
        let events = [event((9, 0), Some((16, 20)))];
        // 40 minutes remain: gap check passes but a full hour does not fit.
        assert!(propose_slots(start, end, &events).is_empty());

        let events = [event((9, 0), Some((16, 0)))];
        assert_eq!(propose_slots(start, end, &events), vec![slot((16, 0), (17, 0))]);
    }
}
