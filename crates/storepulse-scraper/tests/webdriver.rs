//! Browser source tests against a scripted WebDriver server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storepulse_core::{CollectPlan, GeoPoint, WorkUnit};
use storepulse_scraper::{
    BrowserOptions, BrowserSource, SourceAdapter, SourceError, WebDriverClient,
};

const PAGE: &str = r#"
<html><body>
  <div role="feed">
    <a class="hfpxzc" aria-label="Intersport Part-Dieu" href="https://maps.test/place/part-dieu"></a>
    <a class="hfpxzc" aria-label="Decathlon Lyon" href="https://maps.test/place/decathlon"></a>
  </div>
  <h1>Intersport Part-Dieu</h1>
  <button data-item-id="address">CC Part-Dieu, 69003 Lyon</button>
  <div class="m6QErb DxyBCb">
    <div class="jftiEf">
      <div class="d4r55">Marie M.</div>
      <span class="kvMYJc" aria-label="5 étoiles"></span>
      <span class="rsqaWe">il y a 2 semaines</span>
      <span class="wiI7pd">Vendeur au top, très bons conseils.</span>
    </div>
    <div class="jftiEf">
      <div class="d4r55">Paul</div>
      <span class="kvMYJc" aria-label="4 étoiles"></span>
      <span class="wiI7pd">ok</span>
    </div>
    <div class="jftiEf">
      <div class="d4r55">Anne</div>
      <span class="wiI7pd">Pas de note pour celui-ci</span>
    </div>
  </div>
</body></html>
"#;

fn plan() -> CollectPlan {
    CollectPlan::from_yaml_str(
        "brand_token: intersport\nsearch_query: Intersport\ncountry: France\nwork_units:\n  - name: Lyon\n",
    )
    .expect("plan parses")
}

fn lyon() -> WorkUnit {
    WorkUnit {
        name: "Lyon".into(),
        center: GeoPoint::new(45.764, 4.8357),
    }
}

fn browser(server: &MockServer) -> SourceAdapter {
    let client = WebDriverClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds");
    SourceAdapter::Browser(BrowserSource::new(
        client,
        BrowserOptions::immediate("https://maps.test"),
    ))
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {"sessionId": "s1", "capabilities": {}}
        })))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": "https://maps.test/place/part-dieu/@45.7604,4.859,17z"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s1/source"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": PAGE})))
        .mount(server)
        .await;
}

async fn mount_scripts(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("button[role=tab]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": true})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("scrollTop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 2})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_unit_flow_collects_complete_reviews() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    mount_page(&server).await;
    mount_scripts(&server).await;

    let mut adapter = browser(&server);
    adapter.open_unit(&lyon()).await.expect("session opens");

    let stores = adapter.find_stores(&plan(), &lyon()).await;
    assert_eq!(stores.len(), 1, "non-brand results are filtered");
    assert_eq!(stores[0].search_area, "Lyon");

    let fetched = adapter.fetch_reviews(&stores[0], 10).await.expect("fetch ok");
    assert_eq!(fetched.store.address.as_deref(), Some("CC Part-Dieu, 69003 Lyon"));
    assert_eq!(fetched.store.latitude, Some(45.7604));
    assert_eq!(fetched.store.longitude, Some(4.859));

    assert_eq!(fetched.reviews.len(), 1, "short and unrated reviews are dropped");
    assert_eq!(fetched.reviews[0].reviewer_name, "Marie M.");
    assert_eq!(fetched.reviews[0].rating, 5);
    assert!(fetched.reviews[0].date.is_some());

    adapter.close_unit().await;
}

#[tokio::test]
async fn dead_session_surfaces_as_session_fault() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": {"error": "invalid session id", "message": "invalid session id", "stacktrace": ""}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .mount(&server)
        .await;

    let mut adapter = browser(&server);
    adapter.open_unit(&lyon()).await.expect("session opens");

    let store = storepulse_scraper::RawStore {
        name: "Intersport Part-Dieu".into(),
        detail_url: Some("https://maps.test/place/part-dieu".into()),
        search_area: "Lyon".into(),
        ..Default::default()
    };
    let err = adapter.fetch_reviews(&store, 10).await.unwrap_err();
    assert!(err.is_session_fault(), "got {err:?}");
    assert!(matches!(err, SourceError::WebDriver { .. }));

    adapter.close_unit().await;
}

#[tokio::test]
async fn script_errors_that_are_not_session_faults_are_absorbed() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {"error": "timeout", "message": "timeout: Timed out receiving message from renderer"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .mount(&server)
        .await;

    let mut adapter = browser(&server);
    adapter.open_unit(&lyon()).await.expect("session opens");
    let store = storepulse_scraper::RawStore {
        name: "Intersport Part-Dieu".into(),
        detail_url: Some("https://maps.test/place/part-dieu".into()),
        search_area: "Lyon".into(),
        ..Default::default()
    };
    let fetched = adapter.fetch_reviews(&store, 10).await.expect("absorbed");
    assert!(fetched.reviews.is_empty());
    adapter.close_unit().await;
}

#[tokio::test]
async fn unreachable_driver_cannot_open_a_session() {
    let client = WebDriverClient::new("http://127.0.0.1:1", Duration::from_secs(2)).expect("builds");
    let err = client.new_session(true).await.unwrap_err();
    assert!(matches!(err, SourceError::SessionUnavailable(_)));
    assert!(err.is_session_fault());
}

#[tokio::test]
async fn find_stores_without_session_is_empty() {
    let server = MockServer::start().await;
    let mut adapter = browser(&server);
    assert!(adapter.find_stores(&plan(), &lyon()).await.is_empty());
}

#[tokio::test]
async fn new_session_sends_headless_chrome_capabilities() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_string_contains("--headless=new"))
        .and(body_string_contains("goog:chromeOptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {"sessionId": "abc", "capabilities": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebDriverClient::new(&server.uri(), Duration::from_secs(5)).expect("builds");
    let session = client.new_session(true).await.expect("session");
    assert_eq!(session.id(), "abc");
}
