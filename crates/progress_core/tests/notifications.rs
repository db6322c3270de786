use progress_core::db::open_db_in_memory;
use progress_core::{
    starter_tracks, ManualClock, NotificationEmitter, SqliteKvStore, TrackRepository,
    NOTIFICATION_LIFETIME_MS,
};

#[test]
fn milestone_notification_is_shown_then_superseded_then_cleared() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(0);
    let mut seed = starter_tracks();
    seed[0].progress = 20;
    let mut repo = TrackRepository::open_with(SqliteKvStore::new(&conn), &clock, seed);
    let mut emitter = NotificationEmitter::with_clock(&clock);

    let planning = repo.advance_progress(1).notification.unwrap();
    let first = emitter.emit(planning);
    assert_eq!(
        emitter.active().map(|n| n.message.as_str()),
        Some("Project 1: Reached Planning!")
    );

    // No milestone between 25 and 45.
    for _ in 0..4 {
        assert!(repo.advance_progress(1).notification.is_none());
    }

    clock.advance(NOTIFICATION_LIFETIME_MS - 500);
    let development = repo.advance_progress(1).notification.unwrap();
    emitter.emit(development);

    clock.advance(500);
    assert!(!emitter.expire(first));
    assert!(!emitter.tick());
    assert_eq!(
        emitter.active().map(|n| n.message.as_str()),
        Some("Project 1: Reached Development!")
    );

    clock.advance(NOTIFICATION_LIFETIME_MS);
    assert!(emitter.tick());
    assert!(emitter.active().is_none());
}
