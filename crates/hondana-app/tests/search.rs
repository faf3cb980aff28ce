mod common;

use common::FakeCatalog;
use hondana_app::session::{SearchOptions, SearchSession};
use hondana_catalog::OrderBy;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_blank_query_does_not_call_catalog() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);
    session.search("").await;
    session.search("   ").await;
    assert_eq!(catalog.calls(), 0);
    let state = session.state();
    assert!(state.books.is_empty());
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

#[tokio::test]
#[traced_test]
async fn test_paging_to_the_end() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);

    session.search("  soseki ").await;
    let state = session.state();
    assert_eq!(state.query, "soseki");
    assert_eq!(state.books.len(), 10);
    assert_eq!(state.total_items, 50);
    assert!(state.has_more);
    assert!(!state.is_loading);

    for _ in 0..4 {
        session.load_more().await;
    }
    let state = session.state();
    assert_eq!(state.books.len(), 50);
    assert!(!state.has_more);
    assert_eq!(state.books[49].id, "soseki-49");
    assert_eq!(catalog.calls(), 5);

    session.load_more().await;
    assert_eq!(catalog.calls(), 5);

    let starts = catalog
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|p| p.start_index)
        .collect::<Vec<_>>();
    assert_eq!(starts, [0, 10, 20, 30, 40]);
}

#[tokio::test]
#[traced_test]
async fn test_concurrent_load_more_makes_one_call() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);
    session.search("soseki").await;
    assert_eq!(catalog.calls(), 1);

    tokio::join!(session.load_more(), session.load_more());
    assert_eq!(catalog.calls(), 2);
    assert_eq!(session.state().books.len(), 20);
}

#[tokio::test]
#[traced_test]
async fn test_search_while_loading_is_ignored() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);
    tokio::join!(session.search("first"), session.search("second"));
    assert_eq!(catalog.calls(), 1);
    assert_eq!(session.state().query, "first");
}

#[tokio::test]
#[traced_test]
async fn test_search_failure() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);
    session.search("soseki").await;
    assert_eq!(session.state().books.len(), 10);

    catalog.set_failing(true);
    session.search("kokoro").await;
    let state = session.state();
    assert!(state.books.is_empty());
    assert!(!state.is_loading);
    assert!(!state.has_more);
    assert_eq!(
        state.error.as_deref(),
        Some("Catalog API error: 503 Service Unavailable")
    );

    catalog.set_failing(false);
    session.search("kokoro").await;
    let state = session.state();
    assert!(state.error.is_none());
    assert_eq!(state.books[0].id, "kokoro-0");
}

#[tokio::test]
#[traced_test]
async fn test_load_more_failure_keeps_books() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);
    session.search("soseki").await;
    catalog.set_failing(true);
    session.load_more().await;
    let state = session.state();
    assert_eq!(state.books.len(), 10);
    assert!(state.error.is_some());
    assert!(state.has_more);

    catalog.set_failing(false);
    session.load_more().await;
    let state = session.state();
    assert_eq!(state.books.len(), 20);
    assert_eq!(state.books[10].id, "soseki-10");
}

#[tokio::test]
#[traced_test]
async fn test_reset_and_new_search() {
    let catalog = FakeCatalog::new(5);
    let session = SearchSession::new(&catalog);
    session.search("soseki").await;
    let state = session.state();
    assert_eq!(state.books.len(), 5);
    assert!(!state.has_more);

    session.reset();
    assert_eq!(session.state(), Default::default());
    session.load_more().await;
    assert_eq!(catalog.calls(), 1);

    session.search("kokoro").await;
    assert_eq!(session.state().books[0].id, "kokoro-0");
}

#[tokio::test]
#[traced_test]
async fn test_search_after_reset_during_slow_request() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);

    catalog.hold();
    let user = async {
        while catalog.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.state().is_loading);
        session.reset();
        assert!(!session.state().is_loading);
        catalog.release();
        session.search("kokoro").await;
    };
    tokio::join!(session.search("slow"), user);

    assert_eq!(catalog.calls(), 2);
    let state = session.state();
    assert_eq!(state.query, "kokoro");
    assert_eq!(state.books.len(), 10);
    assert!(state.books.iter().all(|b| b.id.starts_with("kokoro-")));
    assert!(!state.is_loading);

    session.load_more().await;
    assert_eq!(catalog.calls(), 3);
    assert_eq!(session.state().books.len(), 20);
}

#[tokio::test]
#[traced_test]
async fn test_blank_search_frees_session() {
    let catalog = FakeCatalog::new(50);
    let session = SearchSession::new(&catalog);

    catalog.hold();
    let user = async {
        while catalog.calls() == 0 {
            tokio::task::yield_now().await;
        }
        session.search("  ").await;
        catalog.release();
        session.search("kokoro").await;
    };
    tokio::join!(session.search("slow"), user);

    assert_eq!(catalog.calls(), 2);
    assert_eq!(session.state().books[0].id, "kokoro-0");
}

#[tokio::test]
#[traced_test]
async fn test_search_options() {
    let catalog = FakeCatalog::new(100);
    let options = SearchOptions::default()
        .page_size(100)
        .order_by(OrderBy::Newest)
        .lang_restrict("ja")
        .country("JP");
    let session = SearchSession::with_options(&catalog, options);
    session.search("soseki").await;
    assert_eq!(session.state().books.len(), 40);

    let params = catalog.requests.lock().unwrap()[0].clone();
    assert_eq!(params.max_results, 40);
    assert_eq!(params.order_by, Some(OrderBy::Newest));
    assert_eq!(params.lang_restrict.as_deref(), Some("ja"));
    assert_eq!(params.country.as_deref(), Some("JP"));
}
