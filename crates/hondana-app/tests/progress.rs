mod common;

use std::time::Duration;

use common::TestStore;
use hondana_app::session::{
    Activate, ControllerError, Library, LibraryCounts, MutationPhase, ReadingProgressController,
};
use hondana_dal::{PreferenceStore, ProgressUpdate};
use hondana_types::{AuthUser, Identity, Patch, ReadingStatus};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_activate_absent_record() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;
    let state = progress.state();
    assert_eq!(state.status, None);
    assert_eq!(state.progress, 0);
    assert!(!state.is_loading);
}

#[tokio::test]
#[traced_test]
async fn test_progress_is_clamped() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;

    progress.update_progress(150).await.unwrap();
    assert_eq!(progress.state().progress, 100);
    progress.update_progress(-5).await.unwrap();
    assert_eq!(progress.state().progress, 0);

    assert_eq!(
        store.writes(),
        [ProgressUpdate::progress(100), ProgressUpdate::progress(0)]
    );
    let record = store.get_reading_progress("u1", "B1").await.unwrap().unwrap();
    assert_eq!(record.progress, 0);
    assert_eq!(record.status, ReadingStatus::Reading);
    assert_eq!(progress.state().status, Some(ReadingStatus::Reading));
}

#[tokio::test]
#[traced_test]
async fn test_finish_in_one_write() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;
    progress.update_progress(30).await.unwrap();

    progress.update_status(ReadingStatus::Finished).await.unwrap();
    let state = progress.state();
    assert_eq!(state.status, Some(ReadingStatus::Finished));
    assert_eq!(state.progress, 100);
    assert_eq!(state.phase, MutationPhase::Reconciled);

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes[1],
        ProgressUpdate {
            status: Patch::Set(ReadingStatus::Finished),
            progress: Some(100),
        }
    );
    let record = store.get_reading_progress("u1", "B1").await.unwrap().unwrap();
    assert_eq!(record.status, ReadingStatus::Finished);
    assert_eq!(record.progress, 100);
    assert!(record.finished_at.is_some());
}

#[tokio::test]
#[traced_test]
async fn test_status_keeps_progress() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;
    progress.update_progress(30).await.unwrap();
    progress
        .update_status(ReadingStatus::WantToRead)
        .await
        .unwrap();
    assert_eq!(progress.state().progress, 30);
    assert_eq!(
        store.writes()[1],
        ProgressUpdate::status(ReadingStatus::WantToRead)
    );
}

#[tokio::test]
#[traced_test]
async fn test_remove_from_library() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    store
        .update_reading_progress("u1", "B1", ProgressUpdate::progress(60))
        .await
        .unwrap();
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;
    assert_eq!(progress.state().progress, 60);

    progress.remove_from_library().await.unwrap();
    let state = progress.state();
    assert_eq!(state.status, None);
    assert_eq!(state.progress, 0);
    assert!(store.get_reading_progress("u1", "B1").await.unwrap().is_none());
}

#[tokio::test]
#[traced_test]
async fn test_failed_update_rolls_back_both_fields() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;
    progress.update_progress(40).await.unwrap();

    store.set_failing(true);
    let err = progress
        .update_status(ReadingStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Store(_)));
    let state = progress.state();
    assert_eq!(state.status, Some(ReadingStatus::Reading));
    assert_eq!(state.progress, 40);
    assert_eq!(state.phase, MutationPhase::RolledBack);
    assert!(state.error.is_some());

    let err = progress.remove_from_library().await.unwrap_err();
    assert!(matches!(err, ControllerError::Store(_)));
    assert_eq!(progress.state().status, Some(ReadingStatus::Reading));
}

#[tokio::test]
#[traced_test]
async fn test_mutations_require_user() {
    let store = TestStore::new().await;
    let identity = Identity::new();
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    let err = progress.update_progress(10).await.unwrap_err();
    assert!(matches!(err, ControllerError::AuthRequired));
    let err = progress
        .update_status(ReadingStatus::Reading)
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::AuthRequired));
    let err = progress.remove_from_library().await.unwrap_err();
    assert!(matches!(err, ControllerError::AuthRequired));
    assert!(store.writes().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_overlapping_update_rejected() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;

    store.hold();
    let second = async {
        tokio::task::yield_now().await;
        let res = progress.update_progress(80).await;
        store.release();
        res
    };
    let (first, second) = tokio::join!(progress.update_progress(20), second);
    first.unwrap();
    assert!(matches!(second, Err(ControllerError::MutationPending)));
    assert_eq!(progress.state().progress, 20);
    assert_eq!(store.writes().len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_timed_out_update_rolls_back() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let progress = ReadingProgressController::new(&store, identity.subscribe(), "B1");
    progress.activate().await;

    store.hold();
    let res = tokio::time::timeout(Duration::from_millis(50), progress.update_progress(40)).await;
    assert!(res.is_err());
    let state = progress.state();
    assert_eq!(state.status, None);
    assert_eq!(state.progress, 0);
    assert_eq!(state.phase, MutationPhase::RolledBack);
    store.release();

    progress.update_progress(60).await.unwrap();
    let state = progress.state();
    assert_eq!(state.progress, 60);
    assert_eq!(state.status, Some(ReadingStatus::Reading));
    assert_eq!(state.phase, MutationPhase::Reconciled);
    let record = store.get_reading_progress("u1", "B1").await.unwrap().unwrap();
    assert_eq!(record.progress, 60);
}

#[tokio::test]
#[traced_test]
async fn test_library_views() {
    let store = TestStore::new().await;
    let identity = Identity::signed_in(AuthUser::new("u1"));
    let updates = [
        ("B1", ProgressUpdate::status(ReadingStatus::Reading)),
        ("B2", ProgressUpdate::status(ReadingStatus::Finished).with_progress(100)),
        ("B3", ProgressUpdate::status(ReadingStatus::WantToRead)),
        ("B4", ProgressUpdate::progress(10)),
    ];
    for (book, update) in updates {
        store.update_reading_progress("u1", book, update).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let library = Library::new(&store, identity.subscribe());
    library.activate().await;
    let state = library.state();
    assert_eq!(
        state.counts,
        LibraryCounts {
            total: 4,
            reading: 2,
            finished: 1,
            want_to_read: 1,
        }
    );
    let reading = state
        .reading
        .iter()
        .map(|b| b.book_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(reading, ["B4", "B1"]);
    assert_eq!(state.finished[0].book_id, "B2");
    assert_eq!(state.want_to_read[0].book_id, "B3");

    store.update_reading_progress("u1", "B2", ProgressUpdate::remove()).await.unwrap();
    library.refetch().await;
    assert_eq!(library.state().counts.finished, 0);
    assert_eq!(library.state().counts.total, 3);

    store.set_failing(true);
    library.refetch().await;
    let state = library.state();
    assert!(state.books.is_empty());
    assert_eq!(state.counts, LibraryCounts::default());
    assert!(state.error.is_some());
}
