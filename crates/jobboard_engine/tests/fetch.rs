use std::time::Duration;

use jobboard_engine::{FailureKind, FetchSettings, Fetcher, JobRecord, ReqwestFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer, settings: FetchSettings) -> ReqwestFetcher {
    let settings = FetchSettings {
        base_url: format!("{}/v0", server.uri()),
        ..settings
    };
    ReqwestFetcher::new(settings).expect("fetcher")
}

async fn mount_json(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn job_ids_keep_listing_order() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/jobstories.json", "[39, 7, 1024, 3]").await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let ids = fetcher.fetch_job_ids().await.expect("ids");

    assert_eq!(ids, vec![39, 7, 1024, 3]);
}

#[tokio::test]
async fn job_detail_decodes_with_and_without_url() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/v0/item/1.json",
        r#"{"by":"acme","id":1,"score":1,"time":1704467045,"title":"Acme is hiring","type":"job","url":"https://acme.example/jobs"}"#,
    )
    .await;
    mount_json(
        &server,
        "/v0/item/2.json",
        r#"{"by":"beta","id":2,"text":"Email us","time":1704467000,"title":"Beta (YC W24) is hiring","type":"job"}"#,
    )
    .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());

    assert_eq!(
        fetcher.fetch_job(1).await.expect("job 1"),
        JobRecord {
            id: 1,
            title: "Acme is hiring".to_string(),
            url: Some("https://acme.example/jobs".to_string()),
            by: "acme".to_string(),
            time: 1_704_467_045,
        }
    );
    let second = fetcher.fetch_job(2).await.expect("job 2");
    assert_eq!(second.url, None);
    assert_eq!(second.by, "beta");
}

#[tokio::test]
async fn null_item_is_missing() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/item/5.json", "null").await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch_job(5).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Missing);
}

#[tokio::test]
async fn malformed_item_is_decode_failure() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/item/6.json", r#"{"id":6,"title":"no author"}"#).await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch_job(6).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn listing_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/jobstories.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch_job_ids().await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn unknown_item_path_is_http_404() {
    let server = MockServer::start().await;

    let fetcher = fetcher_for(&server, FetchSettings::default());
    let err = fetcher.fetch_job(404).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_item_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/9.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("null"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings);
    let err = fetcher.fetch_job(9).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_listing_is_rejected() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/jobstories.json", "[1,2,3,4,5,6,7,8,9,10]").await;

    let settings = FetchSettings {
        max_bytes: 8,
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings);
    let err = fetcher.fetch_job_ids().await.unwrap_err();

    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 8, .. }
    ));
}
