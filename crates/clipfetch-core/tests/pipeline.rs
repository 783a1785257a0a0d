//! End-to-end pipeline behaviour over the fixture catalogue.

#![allow(clippy::unwrap_used, clippy::panic)]

use clipfetch_core::collate::compare;
use clipfetch_core::{
    DownloadLink, Error, FixtureDetail, FixturePageSource, FixtureSound, NavigationAction,
    Outcome, PageSource, Paginator, PaginatorState, Query, ResultExtractor, RetryTarget,
};
use std::cmp::Ordering;

fn assert_sorted(labels: &[&str]) {
    for pair in labels.windows(2) {
        assert_ne!(
            compare(pair[0], pair[1]),
            Ordering::Greater,
            "{} sorted after {}",
            pair[0],
            pair[1]
        );
    }
}

#[tokio::test]
async fn first_page_resolves_every_clip() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    let page = paginator.submit("wilhelm scream").await.unwrap();

    assert_eq!(page.records.len(), 6);
    assert!(page.records.iter().all(|r| r.download.is_resolved()));
    assert_eq!(page.current_page, 1);
    assert!(!page.has_previous_page);
    assert!(page.has_next_page);

    let labels: Vec<_> = page.records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Test Sound 1",
            "Test Sound 2",
            "Test Sound 3",
            "Test Sound 4",
            "THX Deep Note",
            "Wilhelm Scream"
        ]
    );
    assert_eq!(
        page.records[5].download.as_str(),
        "https://www.myinstants.com/media/sounds/wilhelm-scream.mp3"
    );
}

#[tokio::test]
async fn last_page_has_no_next() {
    let mut paginator = Paginator::new(FixturePageSource::generated(13 * 6));
    let mut page = paginator.submit("clip").await.unwrap();
    while page.has_next_page {
        page = paginator.next().await.unwrap();
    }

    assert_eq!(page.current_page, 13);
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);
    assert_eq!(page.records.len(), 6);
}

#[tokio::test]
async fn missing_download_anchor_keeps_record() {
    let source = FixturePageSource::new(vec![
        FixtureSound::new("Air Horn"),
        FixtureSound::new("Sad Trombone").with_detail(FixtureDetail::NoDownloadAnchor),
        FixtureSound::new("Vine Boom").with_detail(FixtureDetail::Unavailable),
    ]);
    let mut paginator = Paginator::new(source);
    let page = paginator.submit("meme").await.unwrap();

    assert_eq!(page.records.len(), 3);
    assert!(page.records[0].download.is_resolved());
    assert_eq!(page.records[1].download, DownloadLink::NotFound);
    assert_eq!(page.records[1].download.as_str(), "not-found");
    assert_eq!(page.records[2].download, DownloadLink::NotFound);
}

#[tokio::test]
async fn clip_without_reference_makes_no_detail_request() {
    let source = FixturePageSource::new(vec![
        FixtureSound::new("Orphan").without_detail_ref(),
        FixtureSound::new("Bruh"),
    ]);
    let mut paginator = Paginator::new(source);
    let page = paginator.submit("bruh").await.unwrap();

    assert_eq!(page.records.len(), 2);
    let orphan = page.records.iter().find(|r| r.label == "Orphan").unwrap();
    assert_eq!(orphan.download, DownloadLink::NotFound);
    assert_eq!(paginator.source().detail_fetches(), 1);
}

#[tokio::test]
async fn record_count_matches_extracted_stubs() {
    let mut sounds: Vec<FixtureSound> = (1..=17)
        .map(|n| FixtureSound::new(&format!("Clip {n}")))
        .collect();
    sounds[2] = sounds[2].clone().with_detail(FixtureDetail::Unavailable);
    sounds[8] = sounds[8].clone().without_detail_ref();
    let reference = FixturePageSource::new(sounds.clone());
    let extractor = ResultExtractor::default();

    let mut paginator = Paginator::new(FixturePageSource::new(sounds));
    let mut page = paginator.submit("clip").await.unwrap();
    loop {
        let raw = reference
            .fetch_page(&Query::with_page("clip", page.current_page).unwrap())
            .await
            .unwrap();
        assert_eq!(page.records.len(), extractor.extract(&raw).len());
        if !page.has_next_page {
            break;
        }
        page = paginator.next().await.unwrap();
    }
    assert_eq!(page.current_page, 3);
}

#[tokio::test]
async fn revisited_pages_come_from_cache() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    paginator.submit("scream").await.unwrap();
    paginator.next().await.unwrap();
    let back = paginator.prev().await.unwrap();

    assert_eq!(back.current_page, 1);
    assert_eq!(paginator.source().page_fetches(), 2);

    let first = paginator.cache().get("scream", 1).unwrap();
    let again = paginator.cache().get("scream", 1).unwrap();
    assert!(first.same_buffer(&again));
}

#[tokio::test]
async fn new_search_replaces_cached_term() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    paginator.submit("old term").await.unwrap();
    paginator.next().await.unwrap();
    assert!(paginator.cache().contains("old term", 2));

    paginator.new_search().unwrap();
    paginator.submit("new term").await.unwrap();

    assert!(!paginator.cache().contains("old term", 1));
    assert!(!paginator.cache().contains("old term", 2));
    assert!(paginator.cache().contains("new term", 1));
    assert_eq!(paginator.cache().len(), 1);
    assert_eq!(paginator.search_term(), Some("new term"));
}

#[tokio::test]
async fn exhaustive_run_returns_one_sorted_sequence() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    let records = paginator.fetch_all("anything").await.unwrap();

    assert_eq!(records.len(), 14);
    assert!(records.iter().all(|r| r.download.is_resolved()));
    let labels: Vec<_> = records.iter().map(|r| r.label.as_str()).collect();
    assert_sorted(&labels);

    let mut distinct = records.clone();
    distinct.dedup();
    assert_eq!(distinct.len(), 14);

    assert_eq!(paginator.source().page_fetches(), 3);
    assert!(paginator.cache().is_empty());
    assert!(matches!(paginator.state(), PaginatorState::Done(_)));
}

#[tokio::test]
async fn exhaustive_run_keeps_duplicate_labels() {
    let source = FixturePageSource::new(vec![
        FixtureSound::new("Bruh"),
        FixtureSound::new("Oof"),
        FixtureSound {
            detail_ref: Some("/en/instant/bruh-2/".into()),
            detail: FixtureDetail::Download("/media/sounds/bruh-2.mp3".into()),
            ..FixtureSound::new("Bruh")
        },
    ]);
    let mut paginator = Paginator::new(source);
    let records = paginator.fetch_all("bruh").await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records.iter().filter(|r| r.label == "Bruh").count(), 2);
}

#[tokio::test]
async fn show_all_reuses_browsed_pages() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    paginator.submit("scream").await.unwrap();
    paginator.next().await.unwrap();

    let outcome = paginator.navigate(NavigationAction::ShowAll).await.unwrap();
    let Outcome::All(records) = outcome else {
        panic!("expected every record, got {outcome:?}");
    };
    assert_eq!(records.len(), 14);
    assert_eq!(paginator.source().page_fetches(), 3);
}

#[tokio::test]
async fn empty_catalogue_finishes_without_probing() {
    let mut paginator = Paginator::new(FixturePageSource::new(Vec::new()));
    let records = paginator.fetch_all("nothing").await.unwrap();

    assert!(records.is_empty());
    assert_eq!(paginator.source().page_fetches(), 1);
    assert_eq!(paginator.source().probes(), 0);
}

#[tokio::test]
async fn failed_page_can_be_retried() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    paginator.submit("scream").await.unwrap();
    paginator.source().set_page_failure(2, true);

    let err = paginator.next().await.unwrap_err();
    assert!(matches!(err, Error::Fetch { status: 503, .. }));
    assert!(err.is_recoverable());
    match paginator.state() {
        PaginatorState::Failed { message, retry } => {
            assert!(message.contains("503"));
            assert_eq!(
                retry,
                &RetryTarget::Page(Query::with_page("scream", 2).unwrap())
            );
        },
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(paginator.next().await.is_err());

    paginator.source().set_page_failure(2, false);
    let Outcome::Page(page) = paginator.retry().await.unwrap() else {
        panic!("expected a page");
    };
    assert_eq!(page.current_page, 2);
    assert!(matches!(paginator.state(), PaginatorState::PageReady(_)));
}

#[tokio::test]
async fn failed_exhaustive_run_retries_exhaustively() {
    let mut paginator = Paginator::new(FixturePageSource::default());
    paginator.source().set_page_failure(3, true);

    assert!(paginator.fetch_all("scream").await.is_err());
    assert!(matches!(
        paginator.state(),
        PaginatorState::Failed {
            retry: RetryTarget::Exhaustive(_),
            ..
        }
    ));

    paginator.source().set_page_failure(3, false);
    let Outcome::All(records) = paginator.retry().await.unwrap() else {
        panic!("expected every record");
    };
    assert_eq!(records.len(), 14);
    // Pages 1 and 2 were cached by the failed run.
    assert_eq!(paginator.source().page_fetches(), 4);
}

#[tokio::test]
async fn failed_session_can_start_over() {
    let source = FixturePageSource::default();
    source.set_page_failure(1, true);
    let mut paginator = Paginator::new(source);

    assert!(paginator.submit("scream").await.is_err());
    paginator.navigate(NavigationAction::NewSearch).await.unwrap();
    assert_eq!(paginator.state(), &PaginatorState::Idle);
    assert!(paginator.cache().is_empty());
}
