use crate::event::ReplayEvent;

/// Index of the latest event whose timestamp is at or before `time_ms`.
///
/// Events must be sorted by timestamp. Among events sharing a timestamp the
/// highest index wins. Returns `None` for an empty slice or when `time_ms`
/// precedes the first event; times past the end resolve to the last index.
pub fn find_event_index_at_time(events: &[ReplayEvent], time_ms: f64) -> Option<usize> {
    events
        .partition_point(|e| e.timestamp as f64 <= time_ms)
        .checked_sub(1)
}

/// Event resolved at `time_ms`, see [`find_event_index_at_time`].
pub fn event_at_time(events: &[ReplayEvent], time_ms: f64) -> Option<&ReplayEvent> {
    find_event_index_at_time(events, time_ms).map(|i| &events[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn events_at(stamps: &[u64]) -> Vec<ReplayEvent> {
        stamps
            .iter()
            .map(|&t| ReplayEvent::new(EventKind::Move, 0.0, 0.0, t))
            .collect()
    }

    /// Linear reference: last index with timestamp <= t
    fn linear(events: &[ReplayEvent], t: f64) -> Option<usize> {
        events.iter().rposition(|e| e.timestamp as f64 <= t)
    }

    #[test]
    fn test_empty_events() {
        assert_eq!(find_event_index_at_time(&[], 0.0), None);
        assert_eq!(find_event_index_at_time(&[], 1000.0), None);
    }

    #[test]
    fn test_before_first_event() {
        let events = events_at(&[100, 200]);
        assert_eq!(find_event_index_at_time(&events, 99.9), None);
        assert_eq!(find_event_index_at_time(&events, -5.0), None);
    }

    #[test]
    fn test_exact_and_between() {
        let events = events_at(&[0, 500, 1000]);
        assert_eq!(find_event_index_at_time(&events, 0.0), Some(0));
        assert_eq!(find_event_index_at_time(&events, 499.0), Some(0));
        assert_eq!(find_event_index_at_time(&events, 500.0), Some(1));
        assert_eq!(find_event_index_at_time(&events, 999.99), Some(1));
        assert_eq!(find_event_index_at_time(&events, 1000.0), Some(2));
    }

    #[test]
    fn test_past_end_clamps_to_last() {
        let events = events_at(&[0, 500, 1000]);
        assert_eq!(find_event_index_at_time(&events, 50_000.0), Some(2));
    }

    #[test]
    fn test_ties_resolve_to_highest_index() {
        let events = events_at(&[0, 300, 300, 300, 900]);
        assert_eq!(find_event_index_at_time(&events, 300.0), Some(3));
        assert_eq!(find_event_index_at_time(&events, 899.0), Some(3));
    }

    #[test]
    fn test_matches_linear_scan() {
        let events = events_at(&[0, 0, 40, 90, 90, 150, 151, 400, 400, 1200]);
        let mut t = -10.0;
        while t < 1300.0 {
            assert_eq!(
                find_event_index_at_time(&events, t),
                linear(&events, t),
                "mismatch at t={t}"
            );
            t += 2.5;
        }
    }

    #[test]
    fn test_event_at_time() {
        let events = vec![
            ReplayEvent::new(EventKind::Move, 1.0, 1.0, 0),
            ReplayEvent::new(EventKind::Click, 2.0, 2.0, 500),
            ReplayEvent::new(EventKind::Move, 3.0, 3.0, 1000),
        ];
        assert_eq!(event_at_time(&events, 500.0).map(|e| e.kind), Some(EventKind::Click));
    }
}
