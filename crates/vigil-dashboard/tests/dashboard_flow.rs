//! End-to-end flows through the app shell

use std::time::Duration;
use vigil_auth::LoginRequest;
use vigil_config::{load_str, AuthMode, Config, ConfigFormat};
use vigil_dashboard::{App, ExportFormat, Panel, ReportKind, View};

fn seeded() -> Config {
    let mut config = Config::default();
    config.simulation.seed = Some(42);
    config
}

async fn signed_in(config: Config) -> App {
    let mut app = App::new(config);
    app.login(LoginRequest::new("ops@example.com", "secret1", Some("token")))
        .await
        .unwrap();
    app
}

#[tokio::test(start_paused = true)]
async fn test_every_view_mounts_and_releases() {
    let mut app = signed_in(seeded()).await;
    let dashboard = app.dashboard_mut().unwrap();

    for view in View::ALL.into_iter().rev() {
        dashboard.select(view).unwrap();
        assert_eq!(dashboard.panel().view(), view);
    }
    assert_eq!(dashboard.view(), View::Dashboard);
    assert_eq!(dashboard.active_tasks(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_logout_stops_every_timer() {
    let mut app = signed_in(seeded()).await;
    let mut receivers = match app.dashboard().unwrap().panel() {
        Panel::Overview(p) => (p.metrics.subscribe(), p.fleet.subscribe(), p.alerts.subscribe()),
        other => panic!("unexpected panel {other:?}"),
    };

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert!(receivers.0.has_changed().unwrap());
    receivers.0.borrow_and_update();
    receivers.1.borrow_and_update();

    app.logout();
    assert!(receivers.0.changed().await.is_err());
    assert!(receivers.1.changed().await.is_err());
    assert!(receivers.2.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_live_panel_values_stay_in_range() {
    let app = signed_in(seeded()).await;
    let Panel::Overview(overview) = app.dashboard().unwrap().panel() else {
        panic!("expected overview");
    };

    tokio::time::sleep(Duration::from_millis(61_000)).await;
    let health = overview.health.latest();
    assert_eq!(overview.health.ticks(), 20);
    let network = health.get("network").unwrap();
    assert!((80.0..=100.0).contains(&network));

    let fleet = overview.fleet.latest();
    assert!(fleet.components.iter().all(|c| c.risk_score() <= 100));
}

#[tokio::test(start_paused = true)]
async fn test_demo_mode_from_config_file() {
    let config = load_str(
        "auth:\n  mode: demo\n  login_delay: 500ms\nsimulation:\n  seed: 9\n",
        ConfigFormat::Yaml,
    )
    .unwrap();
    assert_eq!(config.auth.mode, AuthMode::Demo);

    let mut app = App::new(config);
    let err = app
        .login(LoginRequest::new("ops@example.com", "password1", Some("token")))
        .await
        .unwrap_err();
    assert_eq!(
        err.inline_message(),
        "Invalid demo credentials. Please use the demo account."
    );
    assert!(app.dashboard().is_none());

    app.login(LoginRequest::new("demo@coretechitplc.com", "Demo@12345", Some("token")))
        .await
        .unwrap();
    assert!(app.dashboard().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_exports_written_to_disk() {
    let mut app = signed_in(seeded()).await;
    let dir = tempfile::tempdir().unwrap();
    let now = chrono::Utc::now();
    let dashboard = app.dashboard_mut().unwrap();

    let system = dashboard
        .export(ReportKind::SystemReport, ExportFormat::Csv, now)
        .unwrap();
    let path = system.write_to(dir.path()).unwrap();
    let written = std::fs::read_to_string(path).unwrap();
    assert_eq!(written.lines().count(), 7);

    dashboard.set_view("analytics").unwrap();
    let analytics = dashboard
        .export(ReportKind::AnalyticsReport, ExportFormat::Json, now)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&analytics.contents).unwrap();
    assert_eq!(value["timeframe"], "7d");
}
