//! Unit tests for trip state and the trip manager.

use super::*;
use crate::domain::{Location, Place, PlaceId};
use crate::persist::{MemoryTripStore, PersistenceError, TripStore};
use std::time::Duration;

fn id(s: &str) -> PlaceId {
    PlaceId::new(s).unwrap()
}

fn place(s: &str) -> Place {
    Place::new(
        id(s),
        format!("Place {s}"),
        format!("{s} Street"),
        Location::new(40.74, -74.03).unwrap(),
    )
}

fn ids(trip: &Trip) -> Vec<&str> {
    trip.stops().iter().map(|p| p.place_id.as_str()).collect()
}

fn trip_of(names: &[&str]) -> Trip {
    let mut trip = Trip::new();
    for name in names {
        trip.add_stop(place(name)).unwrap();
    }
    trip
}

// ============================================================================
// Trip: add / remove
// ============================================================================

#[test]
fn new_trip_is_clean_and_empty() {
    let trip = Trip::new();
    assert!(trip.is_empty());
    assert!(!trip.has_changes());
    assert!(!trip.is_saving());
    assert_eq!(trip.active_info(), None);
}

#[test]
fn add_preserves_call_order_and_marks_dirty() {
    let trip = trip_of(&["a", "b", "c"]);
    assert_eq!(ids(&trip), ["a", "b", "c"]);
    assert!(trip.has_changes());
}

#[test]
fn duplicate_add_fails_and_changes_nothing() {
    let mut trip = trip_of(&["a", "b"]);
    trip.set_active_info(Some(1)).unwrap();
    let before = trip.snapshot();

    let err = trip.add_stop(place("a")).unwrap_err();
    assert_eq!(err.place_id, id("a"));
    assert_eq!(trip.snapshot(), before);
}

#[test]
fn duplicate_detection_uses_place_id_only() {
    let mut trip = trip_of(&["a"]);
    let mut renamed = place("a");
    renamed.title = "Something else".to_string();
    assert!(trip.add_stop(renamed).is_err());
}

#[test]
fn add_does_not_touch_active_info() {
    let mut trip = trip_of(&["a", "b"]);
    trip.set_active_info(Some(1)).unwrap();
    trip.add_stop(place("c")).unwrap();
    assert_eq!(trip.active_info(), Some(1));
}

#[test]
fn remove_preserves_relative_order() {
    let mut trip = trip_of(&["a", "b", "c", "d"]);
    let removed = trip.remove_stop(&id("b")).unwrap();
    assert_eq!(removed.place_id, id("b"));
    assert_eq!(ids(&trip), ["a", "c", "d"]);
}

#[test]
fn remove_absent_fails_and_changes_nothing() {
    let mut trip = trip_of(&["a", "b"]);
    let before = trip.snapshot();

    let err = trip.remove_stop(&id("zzz")).unwrap_err();
    assert_eq!(err.place_id, id("zzz"));
    assert_eq!(trip.snapshot(), before);
}

#[test]
fn remove_active_stop_clears_active_info() {
    let mut trip = trip_of(&["a", "b", "c"]);
    trip.set_active_info(Some(1)).unwrap();
    trip.remove_stop(&id("b")).unwrap();
    assert_eq!(trip.active_info(), None);
}

#[test]
fn remove_before_active_stop_shifts_it_down() {
    let mut trip = trip_of(&["a", "b", "c"]);
    trip.set_active_info(Some(2)).unwrap();
    trip.remove_stop(&id("a")).unwrap();
    assert_eq!(trip.active_info(), Some(1));
    assert_eq!(trip.stops()[1].place_id, id("c"));
}

#[test]
fn remove_after_active_stop_keeps_it() {
    let mut trip = trip_of(&["a", "b", "c"]);
    trip.set_active_info(Some(0)).unwrap();
    trip.remove_stop(&id("c")).unwrap();
    assert_eq!(trip.active_info(), Some(0));
}

#[test]
fn remove_last_remaining_active_stop() {
    let mut trip = trip_of(&["a"]);
    trip.set_active_info(Some(0)).unwrap();
    trip.remove_stop(&id("a")).unwrap();
    assert!(trip.is_empty());
    assert_eq!(trip.active_info(), None);
}

// ============================================================================
// Trip: reorder / active info
// ============================================================================

#[test]
fn reorder_is_a_move_not_a_swap() {
    let mut trip = trip_of(&["A", "B", "C", "D"]);
    trip.reorder(0, 2).unwrap();
    assert_eq!(ids(&trip), ["B", "C", "A", "D"]);
}

#[test]
fn reorder_backwards() {
    let mut trip = trip_of(&["A", "B", "C", "D"]);
    trip.reorder(3, 1).unwrap();
    assert_eq!(ids(&trip), ["A", "D", "B", "C"]);
}

#[test]
fn reorder_marks_dirty() {
    let mut trip = Trip::from_persisted(vec![place("a"), place("b")]);
    assert!(!trip.has_changes());
    trip.reorder(1, 0).unwrap();
    assert!(trip.has_changes());
}

#[test]
fn reorder_out_of_range_fails_and_changes_nothing() {
    let mut trip = trip_of(&["a", "b"]);
    let before = trip.snapshot();

    let err = trip.reorder(0, 2).unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.len, 2);

    let err = trip.reorder(5, 0).unwrap_err();
    assert_eq!(err.index, 5);

    assert_eq!(trip.snapshot(), before);
}

#[test]
fn reorder_on_empty_trip_fails() {
    let mut trip = Trip::new();
    assert!(trip.reorder(0, 0).is_err());
}

#[test]
fn reorder_tracks_active_stop() {
    // Active stop is the one being moved
    let mut trip = trip_of(&["A", "B", "C", "D"]);
    trip.set_active_info(Some(0)).unwrap();
    trip.reorder(0, 3).unwrap();
    assert_eq!(trip.active_info(), Some(3));

    // Active stop is shifted by a move across it
    let mut trip = trip_of(&["A", "B", "C", "D"]);
    trip.set_active_info(Some(2)).unwrap();
    trip.reorder(0, 3).unwrap();
    assert_eq!(trip.active_info(), Some(1));
    assert_eq!(trip.stops()[1].place_id, id("C"));

    // Active stop outside the moved span stays put
    let mut trip = trip_of(&["A", "B", "C", "D"]);
    trip.set_active_info(Some(3)).unwrap();
    trip.reorder(0, 1).unwrap();
    assert_eq!(trip.active_info(), Some(3));
}

#[test]
fn set_active_info_validates_range() {
    let mut trip = trip_of(&["a", "b"]);
    assert!(trip.set_active_info(Some(1)).is_ok());
    assert_eq!(trip.active_info(), Some(1));

    let err = trip.set_active_info(Some(2)).unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(trip.active_info(), Some(1));

    assert!(trip.set_active_info(None).is_ok());
    assert_eq!(trip.active_info(), None);
}

#[test]
fn set_active_info_replaces_previous() {
    let mut trip = trip_of(&["a", "b", "c"]);
    trip.set_active_info(Some(0)).unwrap();
    trip.set_active_info(Some(2)).unwrap();
    assert_eq!(trip.active_info(), Some(2));
}

#[test]
fn set_active_info_is_not_a_stop_mutation() {
    let mut trip = Trip::from_persisted(vec![place("a")]);
    trip.set_active_info(Some(0)).unwrap();
    assert!(!trip.has_changes());
}

#[test]
fn set_active_info_on_empty_trip() {
    let mut trip = Trip::new();
    assert!(trip.set_active_info(Some(0)).is_err());
    assert!(trip.set_active_info(None).is_ok());
}

// ============================================================================
// Trip: hydrate / persisted / save bookkeeping
// ============================================================================

#[test]
fn from_persisted_is_clean_and_deduplicated() {
    let trip = Trip::from_persisted(vec![place("a"), place("b"), place("a")]);
    assert_eq!(ids(&trip), ["a", "b"]);
    assert!(!trip.has_changes());
}

#[test]
fn hydrate_replaces_stops_and_closes_popup() {
    let mut trip = trip_of(&["x", "y"]);
    trip.set_active_info(Some(1)).unwrap();

    trip.hydrate(vec![place("p2"), place("p1"), place("p2")]);
    assert_eq!(ids(&trip), ["p2", "p1"]);
    assert_eq!(trip.active_info(), None);
    assert!(trip.has_changes());
}

#[test]
fn hydrate_into_fresh_session_is_dirty() {
    let mut trip = Trip::new();
    trip.hydrate(vec![place("p1")]);
    assert!(trip.has_changes());
}

#[test]
fn hydrate_with_same_order_is_not_a_mutation() {
    let mut trip = Trip::from_persisted(vec![place("a"), place("b")]);
    trip.hydrate(vec![place("a"), place("b")]);
    assert!(!trip.has_changes());

    let mut empty = Trip::new();
    empty.hydrate(vec![]);
    assert!(!empty.has_changes());
}

#[test]
fn second_begin_save_is_refused() {
    let mut trip = trip_of(&["a"]);
    let ticket = trip.begin_save().unwrap();
    assert!(trip.is_saving());
    assert!(trip.begin_save().is_none());

    trip.finish_save(ticket.revision, true);
    assert!(!trip.is_saving());
    assert!(!trip.has_changes());
}

#[test]
fn failed_save_keeps_trip_dirty() {
    let mut trip = trip_of(&["a"]);
    let ticket = trip.begin_save().unwrap();
    trip.finish_save(ticket.revision, false);
    assert!(!trip.is_saving());
    assert!(trip.has_changes());
}

#[test]
fn edits_during_save_stay_dirty() {
    let mut trip = trip_of(&["a"]);
    let ticket = trip.begin_save().unwrap();
    trip.add_stop(place("b")).unwrap();
    trip.finish_save(ticket.revision, true);
    assert!(trip.has_changes());
    assert_eq!(ticket.stops.len(), 1);
}

#[test]
fn trip_links() {
    let trip = trip_of(&["p1", "p2"]);
    assert_eq!(
        trip.share_link("https://x/"),
        "https://x/?places[]=p1&places[]=p2"
    );
    assert!(trip.external_route_link().contains("origin_place_id=p1"));
}

// ============================================================================
// TripManager
// ============================================================================

#[test]
fn manager_operations_update_snapshot() {
    let manager = TripManager::new(MemoryTripStore::new());
    manager.add_stop(place("a")).unwrap();
    manager.add_stop(place("b")).unwrap();
    manager.add_stop(place("c")).unwrap();
    manager.reorder(2, 0).unwrap();
    manager.set_active_info(Some(1)).unwrap();
    manager.remove_stop(&id("b")).unwrap();

    let snapshot = manager.snapshot();
    let order: Vec<&str> = snapshot.stops.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(order, ["c", "a"]);
    assert_eq!(snapshot.active_info, Some(1));
    assert!(snapshot.has_changes);
    assert!(!snapshot.is_saving);
}

#[test]
fn mutators_return_the_published_snapshot() {
    let manager = TripManager::new(MemoryTripStore::new());
    let rx = manager.subscribe();

    let added = manager.add_stop(place("a")).unwrap();
    assert_eq!(added, *rx.borrow());
    assert_eq!(added.revision, 1);

    manager.add_stop(place("b")).unwrap();
    let reordered = manager.reorder(1, 0).unwrap();
    assert_eq!(reordered, *rx.borrow());
    assert_eq!(reordered.stops[0].place_id, id("b"));

    let active = manager.set_active_info(Some(0)).unwrap();
    assert_eq!(active.active_info, Some(0));

    let removed = manager.remove_stop(&id("a")).unwrap();
    assert_eq!(removed, *rx.borrow());
    assert_eq!(removed.stops, vec![place("b")]);

    let hydrated = manager.hydrate(vec![place("c")]);
    assert_eq!(hydrated, manager.snapshot());
    assert_eq!(hydrated.stops, vec![place("c")]);
}

#[test]
fn manager_errors_propagate() {
    let manager = TripManager::new(MemoryTripStore::new());
    manager.add_stop(place("a")).unwrap();

    assert!(manager.add_stop(place("a")).is_err());
    assert!(manager.remove_stop(&id("b")).is_err());
    assert!(manager.reorder(0, 1).is_err());
    assert!(manager.set_active_info(Some(1)).is_err());
    assert_eq!(manager.snapshot().stops.len(), 1);
}

#[test]
fn subscribers_see_every_mutation_in_order() {
    let manager = TripManager::new(MemoryTripStore::new());
    let mut rx = manager.subscribe();
    assert!(!rx.has_changed().unwrap());

    manager.add_stop(place("a")).unwrap();
    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.stops.len(), 1);
    assert_eq!(seen.revision, 1);

    manager.add_stop(place("b")).unwrap();
    manager.reorder(1, 0).unwrap();
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.revision, 3);
    assert_eq!(seen.stops[0].place_id, id("b"));
}

#[test]
fn failed_operations_do_not_notify() {
    let manager = TripManager::new(MemoryTripStore::new());
    manager.add_stop(place("a")).unwrap();
    let mut rx = manager.subscribe();
    let _ = rx.borrow_and_update();

    assert!(manager.add_stop(place("a")).is_err());
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn manager_links() {
    let manager = TripManager::new(MemoryTripStore::new());
    assert_eq!(manager.build_share_link("https://x/"), "https://x/");
    assert_eq!(manager.build_external_route_link(), links::ROUTE_BASE_URL);

    manager.add_stop(place("p1")).unwrap();
    manager.add_stop(place("p2")).unwrap();
    assert_eq!(
        manager.build_share_link("https://x/"),
        "https://x/?places[]=p1&places[]=p2"
    );
}

#[tokio::test]
async fn save_clears_dirty_flag() {
    let store = MemoryTripStore::new();
    let manager = TripManager::new(store.clone());
    manager.add_stop(place("a")).unwrap();
    manager.add_stop(place("b")).unwrap();

    let report = manager.save().await.unwrap();
    assert_eq!(report.outcome, SaveOutcome::Saved);
    assert!(!report.trip.has_changes);

    let snapshot = manager.snapshot();
    assert!(!snapshot.has_changes);
    assert!(!snapshot.is_saving);
    assert_eq!(store.saved().await, vec![place("a"), place("b")]);
}

#[tokio::test]
async fn failed_save_surfaces_error_and_stays_dirty() {
    let store = MemoryTripStore::new();
    store.set_failing(true);
    let manager = TripManager::new(store.clone());
    manager.add_stop(place("a")).unwrap();

    let result = manager.save().await;
    assert!(matches!(result, Err(PersistenceError::Rejected(_))));

    let snapshot = manager.snapshot();
    assert!(snapshot.has_changes);
    assert!(!snapshot.is_saving);
    assert_eq!(store.save_count(), 1);

    // Manual retry
    store.set_failing(false);
    assert_eq!(manager.save().await.unwrap().outcome, SaveOutcome::Saved);
    assert!(!manager.snapshot().has_changes);
    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn concurrent_save_issues_one_persistence_call() {
    let store = MemoryTripStore::new().with_delay(Duration::from_millis(50));
    let manager = TripManager::new(store.clone());
    manager.add_stop(place("a")).unwrap();

    let (first, second) = tokio::join!(manager.save(), manager.save());

    assert_eq!(first.unwrap().outcome, SaveOutcome::Saved);
    let second = second.unwrap();
    assert_eq!(second.outcome, SaveOutcome::AlreadySaving);
    assert!(second.trip.is_saving);
    assert_eq!(store.save_count(), 1);
    assert!(!manager.snapshot().has_changes);
}

#[tokio::test]
async fn is_saving_visible_while_in_flight() {
    let store = MemoryTripStore::new().with_delay(Duration::from_millis(50));
    let manager = TripManager::new(store);
    manager.add_stop(place("a")).unwrap();

    let observe = async {
        tokio::task::yield_now().await;
        manager.snapshot()
    };
    let (saved, during) = tokio::join!(manager.save(), observe);

    assert!(saved.is_ok());
    assert!(during.is_saving);
    assert!(!manager.snapshot().is_saving);
}

#[tokio::test]
async fn edit_during_save_stays_dirty() {
    let store = MemoryTripStore::new().with_delay(Duration::from_millis(50));
    let manager = TripManager::new(store.clone());
    manager.add_stop(place("a")).unwrap();

    let edit = async {
        tokio::task::yield_now().await;
        manager.add_stop(place("b")).unwrap();
    };
    let (saved, ()) = tokio::join!(manager.save(), edit);

    let report = saved.unwrap();
    assert_eq!(report.outcome, SaveOutcome::Saved);
    assert!(report.trip.has_changes);
    assert_eq!(report.trip.stops.len(), 2);
    assert_eq!(store.saved().await, vec![place("a")]);
    assert!(manager.snapshot().has_changes);
}

#[tokio::test]
async fn cancelled_save_releases_saving_flag() {
    let store = MemoryTripStore::new().with_delay(Duration::from_secs(10));
    let manager = TripManager::new(store);
    manager.add_stop(place("a")).unwrap();

    let result = tokio::time::timeout(Duration::from_millis(20), manager.save()).await;
    assert!(result.is_err());

    let snapshot = manager.snapshot();
    assert!(!snapshot.is_saving);
    assert!(snapshot.has_changes);
}

#[tokio::test]
async fn subscribers_see_save_progress() {
    let manager = TripManager::new(MemoryTripStore::new());
    manager.add_stop(place("a")).unwrap();
    let mut rx = manager.subscribe();
    let _ = rx.borrow_and_update();

    manager.save().await.unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert!(!seen.is_saving);
    assert!(!seen.has_changes);
}

#[tokio::test]
async fn resume_loads_saved_trip_clean() {
    let store = MemoryTripStore::with_saved(vec![place("a"), place("b")]);
    let manager = TripManager::resume(store).await.unwrap();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.stops.len(), 2);
    assert!(!snapshot.has_changes);
}

#[tokio::test]
async fn resume_then_edit_then_save_roundtrip() {
    let store = MemoryTripStore::with_saved(vec![place("a"), place("b"), place("c")]);
    let manager = TripManager::resume(store.clone()).await.unwrap();

    manager.reorder(0, 2).unwrap();
    manager.save().await.unwrap();

    let reloaded = store.load().await.unwrap();
    let order: Vec<&str> = reloaded.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(order, ["b", "c", "a"]);
}

// ============================================================================
// Properties
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a trip size plus two valid indices into it.
    fn size_and_moves() -> impl Strategy<Value = (usize, usize, usize)> {
        (1usize..12).prop_flat_map(|n| (Just(n), 0..n, 0..n))
    }

    fn trip_n(n: usize) -> Trip {
        let names: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
        let names: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        trip_of(&names)
    }

    proptest! {
        /// Reorder matches a remove-then-insert model and keeps every place
        #[test]
        fn reorder_is_list_move((n, from, to) in size_and_moves()) {
            let mut trip = trip_n(n);
            let mut model: Vec<String> = ids(&trip).iter().map(|s| s.to_string()).collect();

            trip.reorder(from, to).unwrap();
            let moved = model.remove(from);
            model.insert(to, moved);

            let actual: Vec<String> = ids(&trip).iter().map(|s| s.to_string()).collect();
            prop_assert_eq!(&actual, &model);

            let mut sorted_actual = actual.clone();
            sorted_actual.sort();
            let mut sorted_expected: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
            sorted_expected.sort();
            prop_assert_eq!(sorted_actual, sorted_expected);
        }

        /// The open popup follows its place through any move
        #[test]
        fn reorder_keeps_active_place((n, from, to) in size_and_moves(), active in 0usize..12) {
            let active = active % n;
            let mut trip = trip_n(n);
            trip.set_active_info(Some(active)).unwrap();
            let active_id = trip.stops()[active].place_id.clone();

            trip.reorder(from, to).unwrap();

            let now = trip.active_info().unwrap();
            prop_assert_eq!(&trip.stops()[now].place_id, &active_id);
        }

        /// Removing any stop keeps the popup valid and on the same place
        #[test]
        fn remove_keeps_active_valid(n in 1usize..12, remove in 0usize..12, active in 0usize..12) {
            let remove = remove % n;
            let active = active % n;
            let mut trip = trip_n(n);
            trip.set_active_info(Some(active)).unwrap();
            let active_id = trip.stops()[active].place_id.clone();
            let removed_id = trip.stops()[remove].place_id.clone();

            trip.remove_stop(&removed_id).unwrap();
            prop_assert_eq!(trip.len(), n - 1);

            match trip.active_info() {
                None => prop_assert_eq!(&removed_id, &active_id),
                Some(now) => {
                    prop_assert!(now < trip.len());
                    prop_assert_eq!(&trip.stops()[now].place_id, &active_id);
                }
            }
        }

        /// Any add sequence leaves the trip free of duplicate IDs
        #[test]
        fn adds_never_duplicate(picks in proptest::collection::vec(0u8..6, 0..30)) {
            let mut trip = Trip::new();
            let mut distinct = Vec::new();
            for pick in picks {
                let name = format!("p{pick}");
                let added = trip.add_stop(place(&name)).is_ok();
                prop_assert_eq!(added, !distinct.contains(&name));
                if added {
                    distinct.push(name);
                }
            }
            let actual: Vec<String> = ids(&trip).iter().map(|s| s.to_string()).collect();
            prop_assert_eq!(actual, distinct);
        }
    }
}
