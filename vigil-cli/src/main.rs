//! Vigil CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vigil_alerts::AlertFeedSnapshot;
use vigil_auth::LoginRequest;
use vigil_config::{load_config, Config, LogFormat};
use vigil_core::ComponentStatus;
use vigil_dashboard::{App, Dashboard, ExportFormat, Panel, ReportKind, View};
use vigil_telemetry::{FleetSnapshot, InventorySnapshot, InventoryStatus, MetricSnapshot};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil monitoring dashboard simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, mount a view and log its snapshots
    Simulate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Login email
        #[arg(long, env = "VIGIL_EMAIL", default_value = "admin@coretech.com")]
        email: String,

        /// Login password
        #[arg(long, env = "VIGIL_PASSWORD", default_value = "secret1")]
        password: String,

        /// CAPTCHA token
        #[arg(long, default_value = "cli")]
        captcha: String,

        /// View to mount (dashboard, components, analytics, reports, alerts, settings)
        #[arg(long, default_value = "dashboard")]
        view: String,

        /// Seconds to run before logging out
        #[arg(short, long, default_value_t = 15)]
        duration: u64,

        /// Log level override (trace, debug, info, warn, error)
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Write a report file
    Export {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report kind (system-report, analytics-report, settings)
        #[arg(short, long)]
        kind: ReportKind,

        /// Output format (csv, json); defaults to the report's usual format
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "vigil.yaml")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            email,
            password,
            captcha,
            view,
            duration,
            log_level,
        } => {
            let config = load_config(config.as_ref())?;
            init_tracing(&config, log_level.as_deref())?;

            tracing::info!(
                mode = ?config.auth.mode,
                seed = ?config.simulation.seed,
                "Starting Vigil"
            );

            let mut app = App::new(config);
            let session = app
                .login(LoginRequest::new(email, password, Some(captcha.as_str())))
                .await?;
            tracing::info!(
                user = %session.user.name,
                role = %session.user.role,
                session_id = %session.id,
                "Signed in"
            );

            if let Some(dashboard) = app.dashboard_mut() {
                dashboard.set_view(&view)?;
                watch_panel(dashboard.panel());
                tracing::info!(
                    view = %dashboard.view(),
                    tasks = dashboard.active_tasks(),
                    "View mounted"
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(duration)) => {}
                _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
            }

            app.logout();
            tracing::info!("Signed out");
            Ok(())
        }

        Commands::Export {
            config,
            kind,
            format,
            out,
        } => {
            let config = load_config(config.as_ref())?;
            init_tracing(&config, None)?;

            let mut dashboard = Dashboard::new(config)?;
            if kind == ReportKind::AnalyticsReport {
                dashboard.select(View::Analytics)?;
            }

            let format = format.unwrap_or_else(|| kind.default_format());
            let file = dashboard.export(kind, format, chrono::Utc::now())?;
            let path = file.write_to(&out)?;
            println!("{}", path.display());
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating configuration: {}", config.display());

            match load_config(Some(&config)) {
                Ok(cfg) => {
                    tracing::info!("✓ Configuration is valid");
                    tracing::info!("  Auth mode: {:?}", cfg.auth.mode);
                    tracing::info!("  Alert interval: {:?}", cfg.alerts.interval);
                    tracing::info!("  Max alerts: {}", cfg.alerts.max_alerts);
                    tracing::info!("  Mobile breakpoint: {}px", cfg.layout.mobile_breakpoint);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Vigil monitoring dashboard");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

/// Log every snapshot the mounted panel publishes until its timers stop
fn watch_panel(panel: &Panel) {
    match panel {
        Panel::Overview(p) => {
            log_updates(p.metrics.subscribe(), log_metrics);
            log_updates(p.health.subscribe(), log_metrics);
            log_updates(p.fleet.subscribe(), log_fleet);
            log_updates(p.alerts.subscribe(), log_alerts);
        }
        Panel::Components(p) => {
            log_updates(p.fleet.subscribe(), log_fleet);
            log_updates(p.inventory.subscribe(), log_inventory);
        }
        Panel::Analytics(p) => log_updates(p.metrics.subscribe(), log_metrics),
        Panel::Alerts(p) => log_updates(p.alerts.subscribe(), log_alerts),
        Panel::Reports | Panel::Settings => {}
    }
}

fn log_updates<T>(mut rx: watch::Receiver<T>, log: fn(&T))
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            log(&rx.borrow_and_update());
        }
    });
}

fn log_metrics(snapshot: &MetricSnapshot) {
    let values = snapshot
        .readings
        .iter()
        .map(|r| format!("{}={:.1}", r.name, r.value))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(generator = %snapshot.label, tick = snapshot.tick, "{values}");
}

fn log_fleet(snapshot: &FleetSnapshot) {
    tracing::info!(
        tick = snapshot.tick,
        healthy = snapshot.count(ComponentStatus::Healthy),
        warning = snapshot.count(ComponentStatus::Warning),
        critical = snapshot.count(ComponentStatus::Critical),
        average_risk = %format!("{:.1}", snapshot.average_risk()),
        "Fleet updated"
    );
}

fn log_inventory(snapshot: &InventorySnapshot) {
    tracing::info!(
        tick = snapshot.tick,
        online = snapshot.count(InventoryStatus::Online),
        warning = snapshot.count(InventoryStatus::Warning),
        offline = snapshot.count(InventoryStatus::Offline),
        maintenance = snapshot.count(InventoryStatus::Maintenance),
        "Inventory updated"
    );
}

fn log_alerts(snapshot: &AlertFeedSnapshot) {
    if let Some(newest) = snapshot.alerts.first() {
        tracing::info!(
            alerts = snapshot.alerts.len(),
            unacknowledged = snapshot.unacknowledged,
            newest = %newest.title,
            severity = %newest.severity,
            "Alert feed updated"
        );
    }
}

fn init_tracing(config: &Config, level_override: Option<&str>) -> Result<()> {
    let logging = &config.observability.logging;
    let level = level_override.unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init(),
    }

    Ok(())
}
