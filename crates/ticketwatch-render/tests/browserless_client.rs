//! Integration tests for `BrowserlessRenderer`.
//!
//! Uses `wiremock` to stand in for the browser engine so no real browser or
//! network traffic is involved.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketwatch_render::{BrowserlessRenderer, NavigationPolicy, PageRenderer, RenderError};

const TARGET: &str = "https://www.ticketone.it/event/456";

fn renderer(server: &MockServer) -> BrowserlessRenderer {
    BrowserlessRenderer::new(&server.uri(), None).expect("failed to build test renderer")
}

#[tokio::test]
async fn render_returns_html_text_and_decoded_screenshot() {
    let server = MockServer::start().await;

    // "PNG" in base64
    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<html><body>Biglietti disponibili</body></html>",
            "text": "Biglietti disponibili",
            "screenshot": "UE5H",
            "consentDismissed": true
        })))
        .mount(&server)
        .await;

    let result = renderer(&server)
        .render(TARGET, &NavigationPolicy::default())
        .await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let page = result.unwrap();
    assert_eq!(page.html, "<html><body>Biglietti disponibili</body></html>");
    assert_eq!(page.text, "Biglietti disponibili");
    assert_eq!(page.screenshot.as_deref(), Some(b"PNG".as_slice()));
    assert!(page.consent_dismissed);
}

#[tokio::test]
async fn render_sends_target_url_and_policy_in_context() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .and(body_partial_json(json!({
            "context": {
                "url": TARGET,
                "timeoutMs": 60000,
                "waitUntil": "domcontentloaded",
                "captureScreenshot": false
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<html></html>",
            "text": "",
            "screenshot": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = NavigationPolicy {
        capture_screenshot: false,
        ..NavigationPolicy::default()
    };
    let page = renderer(&server).render(TARGET, &policy).await.unwrap();

    assert!(page.screenshot.is_none());
    assert!(!page.consent_dismissed);
}

#[tokio::test]
async fn render_passes_token_as_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .and(query_param("token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "html": "<html></html>" })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = BrowserlessRenderer::new(&server.uri(), Some("secret-token")).unwrap();
    let result = renderer.render(TARGET, &NavigationPolicy::default()).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn engine_gateway_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let err = renderer(&server)
        .render(TARGET, &NavigationPolicy::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert!(matches!(err, RenderError::Timeout { ref url, timeout_secs: 60 } if url == TARGET));
}

#[tokio::test]
async fn engine_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(500).set_body_string("net::ERR_NAME_NOT_RESOLVED"))
        .mount(&server)
        .await;

    let err = renderer(&server)
        .render(TARGET, &NavigationPolicy::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, RenderError::Engine { status: 500, ref body, .. } if body.contains("ERR_NAME_NOT_RESOLVED")),
        "expected Engine error, got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_engine_response_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = renderer(&server)
        .render(TARGET, &NavigationPolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn invalid_screenshot_encoding_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<html></html>",
            "screenshot": "!!!not-base64!!!"
        })))
        .mount(&server)
        .await;

    let err = renderer(&server)
        .render(TARGET, &NavigationPolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Screenshot { .. }), "got: {err:?}");
}

#[tokio::test]
async fn invalid_target_url_never_reaches_engine() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = renderer(&server)
        .render("javascript:alert(1)", &NavigationPolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::InvalidUrl { .. }));
}

#[tokio::test]
async fn retries_overloaded_engine_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/function"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "html": "<html>ok</html>" })))
        .mount(&server)
        .await;

    let renderer = BrowserlessRenderer::with_retries(&server.uri(), None, 2, 0).unwrap();
    let page = renderer
        .render(TARGET, &NavigationPolicy::default())
        .await
        .unwrap();
    assert_eq!(page.html, "<html>ok</html>");
}
