use shoedb_core::{Price, ProductRecord, SelectorConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::collect::sink::memory::MemoryStore;

fn item(brand: &str, name: &str, discounted: &str) -> String {
    format!(
        r#"<div class="css-f4s3gt">
             <div class="css-wfg91f"><span>{brand}</span></div>
             <a class="aqa-item-name">{name}</a>
             <span class="css-1hu3vxw">5,000 ₽</span>
             <span class="css-1yjzpb2">10%</span>
             <span class="css-1xczz6l">{discounted}</span>
             <span class="reviews-count">42</span>
             <ul><li class="e1i0l88z7">Sale</li></ul>
           </div>"#
    )
}

fn page(items: &[String]) -> String {
    format!(
        "<html><body><main>{}</main></body></html>",
        items.concat()
    )
}

fn settings(server: &MockServer, total_pages: u32) -> PipelineSettings {
    PipelineSettings {
        catalog_base_url: format!("{}/catalog/", server.uri()),
        total_pages,
        page_delay: Duration::ZERO,
        max_concurrent_items: 4,
        writer_queue_depth: 8,
        db_max_retries: 0,
    }
}

fn client() -> CatalogClient {
    CatalogClient::new(5, "shoedb-test/0.1", 0, 0).expect("failed to build test CatalogClient")
}

fn selectors() -> Arc<CatalogSelectors> {
    Arc::new(CatalogSelectors::compile(&SelectorConfig::default()).unwrap())
}

async fn mount_page(server: &MockServer, n: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .and(query_param("page", n.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn well_formed_and_malformed_items_yield_one_record() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        page(&[
            item("Acme", "Runner X", "4,500 ₽"),
            item("Acme", "Broken Y", "call us"),
        ]),
    )
    .await;

    let store = MemoryStore::default();
    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings(&server, 1),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        store.records(),
        vec![ProductRecord {
            brand: "Acme".to_owned(),
            name: "Runner X".to_owned(),
            price: Price {
                original: 5000,
                discount_percent: 10,
                discounted: 4500,
            },
            reviews_count: 42,
            promotions: vec!["Sale".to_owned()],
        }]
    );
    assert_eq!(report.items_dispatched, 2);
    assert_eq!(report.extraction_failures, 1);
    assert_eq!(report.inserted, 1);
    assert!(store.is_closed());
}

#[tokio::test]
async fn zero_pages_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings(&server, 0),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report, RunReport::default());
    assert!(store.records().is_empty());
    assert!(store.is_closed());
}

#[tokio::test]
async fn failed_page_does_not_stop_later_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page(&[item("Acme", "Runner X", "4,500 ₽")])).await;
    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 3, page(&[item("Acme", "Trail Z", "4,000 ₽")])).await;

    let store = MemoryStore::default();
    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings(&server, 3),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.inserted, 2);
    let mut names: Vec<String> = store.records().into_iter().map(|r| r.name).collect();
    names.sort();
    assert_eq!(names, vec!["Runner X", "Trail Z"]);
}

#[tokio::test]
async fn timed_out_page_is_skipped_and_next_page_still_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(&[item("Acme", "Slow Z", "4,500 ₽")]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(&server, 2, page(&[item("Acme", "Runner X", "4,500 ₽")])).await;

    let store = MemoryStore::default();
    let client = CatalogClient::new(1, "shoedb-test/0.1", 0, 0).unwrap();
    let report = run_pipeline(
        store.clone(),
        &client,
        selectors(),
        &settings(&server, 2),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(store.records()[0].name, "Runner X");
}

#[tokio::test]
async fn page_without_items_is_not_a_failure() {
    let server = MockServer::start().await;
    mount_page(&server, 1, "<html><body>empty</body></html>".to_owned()).await;

    let report = run_pipeline(
        MemoryStore::default(),
        &client(),
        selectors(),
        &settings(&server, 1),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.items_dispatched, 0);
}

#[tokio::test]
async fn repeated_item_across_pages_is_stored_once() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page(&[item("Acme", "Runner X", "4,500 ₽")])).await;
    mount_page(&server, 2, page(&[item("Acme", "Runner X", "4,500 ₽")])).await;

    let store = MemoryStore::default();
    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings(&server, 2),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn single_permit_still_processes_every_item() {
    let server = MockServer::start().await;
    let items: Vec<String> = (0..10)
        .map(|i| item("Acme", &format!("Model {i}"), "4,500 ₽"))
        .collect();
    mount_page(&server, 1, page(&items)).await;

    let store = MemoryStore::default();
    let mut settings = settings(&server, 1);
    settings.max_concurrent_items = 1;
    settings.writer_queue_depth = 1;

    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.items_dispatched, 10);
    assert_eq!(report.inserted, 10);
    assert_eq!(store.records().len(), 10);
}

#[tokio::test]
async fn cancelled_before_start_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let store = MemoryStore::default();
    let report = run_pipeline(
        store.clone(),
        &client(),
        selectors(),
        &settings(&server, 5),
        &cancel,
    )
    .await
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.pages_fetched, 0);
    assert!(store.is_closed());
}

#[tokio::test]
async fn cancellation_during_delay_stops_loop_but_drains_dispatched_items() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page(&[item("Acme", "Runner X", "4,500 ₽")])).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let store = MemoryStore::default();
    let mut settings = settings(&server, 2);
    settings.page_delay = Duration::from_secs(3600);

    let report = run_pipeline(store.clone(), &client(), selectors(), &settings, &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(store.records()[0].name, "Runner X");
    assert!(store.is_closed());
}
