#![allow(clippy::unwrap_used)]
// End-to-end tests for `Router` against a wiremock router.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zyxctl_core::{CoreError, CycleOutcome, PageKind, Router, RouterConfig, RouterEvent};

// ── Helpers ─────────────────────────────────────────────────────────

const LOGIN_PATH: &str = "/login/login-page.cgi";

async fn setup() -> (MockServer, Router) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SESSION=tok; path=/")
                .set_body_string("<script>top.location='/index.html';</script>"),
        )
        .mount(&server)
        .await;

    let config = RouterConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("secret".to_string()),
    );
    let router = Router::new(config).unwrap();
    (server, router)
}

fn network_map(wired: &str, wireless: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<html><script>\nvar wiredActiveUsers = '{wired}';\nvar wlActiveUsers = '{wireless}';\n</script></html>"
    ))
}

const LAPTOP: &str = "PC/Laptop1/24h/AA:BB:CC:DD:EE:FF/x/192.168.0.10";
const PHONE: &str = "Phone/pixel/1h/11:22:33:44:55:66/x/192.168.0.11";

// ── One-shot reads ──────────────────────────────────────────────────

#[tokio::test]
async fn test_traffic_status_wan() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path(PageKind::TrafficStatus.path()))
        .and(header("cookie", "SESSION=tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("var txTotal = '12345';\nvar rxTotal = '678';"),
        )
        .mount(&server)
        .await;

    let counters = router.traffic_status_wan().await.unwrap();

    assert_eq!(counters.transmitted_total, 12345);
    assert_eq!(counters.received_total, 678);
    assert!(router.is_authenticated());
}

#[tokio::test]
async fn test_connected_clients() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(network_map(LAPTOP, PHONE))
        .mount(&server)
        .await;

    let clients = router.connected_clients().await.unwrap();

    assert_eq!(clients.len(), 2);
    let laptop = clients.get("AA:BB:CC:DD:EE:FF").unwrap();
    assert_eq!(laptop.name, "Laptop1");
    assert_eq!(laptop.ip, "192.168.0.10");
    assert_eq!(laptop.connection.to_string(), "wired");
    // One-shot reads do not seed the poll baseline.
    assert!(router.client_snapshot().is_none());
}

#[tokio::test]
async fn test_unexpected_markup_is_parse_error() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path(PageKind::TrafficStatus.path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>new firmware</html>"))
        .mount(&server)
        .await;

    let err = router.traffic_status_wan().await.unwrap_err();

    assert!(
        matches!(err, CoreError::Parse { page: PageKind::TrafficStatus, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_rejected_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("bad password"))
        .mount(&server)
        .await;

    let router = Router::new(RouterConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("wrong".to_string()),
    ))
    .unwrap();

    let err = router.login().await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidCredentials), "got: {err:?}");
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_failed_relogin_drops_previous_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SESSION=tok; path=/")
                .set_body_string("<script>top.location='/index.html';</script>"),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("bad password"))
        .mount(&server)
        .await;

    let router = Router::new(RouterConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("secret".to_string()),
    ))
    .unwrap();

    router.login().await.unwrap();
    assert!(router.is_authenticated());

    let err = router.login().await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidCredentials), "got: {err:?}");
    assert!(!router.is_authenticated());
}

#[test]
fn test_https_router_is_rejected() {
    let config = RouterConfig::new(
        Url::parse("https://192.168.0.1").unwrap(),
        "admin",
        SecretString::from("pw".to_string()),
    );
    assert!(matches!(Router::new(config), Err(CoreError::Config { .. })));
}

// ── Client poll ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_cycles_emit_diff_events() {
    let (server, router) = setup().await;
    let mut events = router.events();

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(network_map(LAPTOP, ""))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(network_map("", PHONE))
        .mount(&server)
        .await;

    assert_eq!(
        router.poll_clients_once().await,
        CycleOutcome::Baseline { clients: 1 }
    );
    assert!(events.try_recv().is_err());

    assert_eq!(
        router.poll_clients_once().await,
        CycleOutcome::Diffed {
            connected: 1,
            disconnected: 1
        }
    );

    let first = events.try_recv().unwrap();
    let second = events.try_recv().unwrap();
    assert_eq!(first.name(), "client_connect");
    assert_eq!(first.client().unwrap().mac, "11:22:33:44:55:66");
    assert_eq!(second.name(), "client_disconnect");
    assert_eq!(second.client().unwrap().name, "Laptop1");

    let baseline = router.client_snapshot().unwrap();
    assert!(baseline.contains("11:22:33:44:55:66"));
    assert!(!baseline.contains("AA:BB:CC:DD:EE:FF"));
}

#[tokio::test]
async fn test_poll_failure_is_reported_as_event() {
    let (server, router) = setup().await;
    let mut events = router.events();

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .mount(&server)
        .await;

    let outcome = router.poll_clients_once().await;

    assert!(matches!(outcome, CycleOutcome::Failed { .. }), "got: {outcome:?}");
    assert!(matches!(events.try_recv().unwrap(), RouterEvent::PollError { .. }));
    assert!(router.client_snapshot().is_none());
}

#[tokio::test]
async fn test_enabled_poll_emits_connect() {
    let (server, router) = setup().await;
    let mut events = router.events();

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(network_map(LAPTOP, ""))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PageKind::NetworkMap.path()))
        .respond_with(network_map(LAPTOP, PHONE))
        .mount(&server)
        .await;

    router
        .enable_client_poll(Some(Duration::from_millis(50)))
        .unwrap();
    assert!(router.is_client_poll_enabled());

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("no event within 5s")
        .unwrap();

    router.disable_client_poll();
    assert!(!router.is_client_poll_enabled());
    assert_eq!(
        event,
        RouterEvent::ClientConnect(
            router
                .client_snapshot()
                .unwrap()
                .get("11:22:33:44:55:66")
                .unwrap()
                .clone()
        )
    );
}
