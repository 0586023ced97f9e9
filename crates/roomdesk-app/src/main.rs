use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use roomdesk_app::host::{CommandWriter, DisplayCache, HostRegistrar, StdioHost};
use roomdesk_app::install::ProcessInstaller;
use roomdesk_app::run::{self, LoopInputs};
use roomdesk_app::{cli, Coordinator};
use roomdesk_config::RoomdeskConfig;
use roomdesk_updater::{Completion, HttpFeed, UpdateController, UpdaterSettings};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "roomdesk=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/roomdesk-app/
        manifest_dir.join("..").join("..").join(".env"),
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// A bare level such as `debug` applies to our crates only.
fn log_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("roomdesk={level}")
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_directive(level)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Build the update controller, or `None` when updates are off.
///
/// Unpacked runs only check when a feed was configured explicitly.
fn build_updater(
    config: &RoomdeskConfig,
) -> Option<(UpdateController, mpsc::UnboundedReceiver<Completion>)> {
    if !config.updates.enabled {
        tracing::info!("Automatic updates disabled");
        return None;
    }
    if !config.app.packaged && config.updates.feed_url.is_none() {
        tracing::info!("Unpacked run without an update feed; updates disabled");
        return None;
    }

    let settings = UpdaterSettings {
        feed_url: config.feed_url().to_string(),
        channel: config.updates.channel.clone(),
        allow_prerelease: config.updates.allow_prerelease,
        platform: config.updates.platform.clone(),
        cache_dir_name: config.updates.cache_dir_name.clone(),
        current_version: env!("CARGO_PKG_VERSION").to_string(),
        startup_delay: Duration::from_secs(config.updates.startup_delay_secs),
        check_interval: Duration::from_secs(config.updates.check_interval_secs),
    };
    tracing::info!(feed = %settings.manifest_url(), "Update feed configured");

    match HttpFeed::new(settings.clone()) {
        Ok(feed) => Some(UpdateController::new(
            settings,
            Arc::new(feed),
            Box::new(ProcessInstaller),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build update client; updates disabled");
            None
        }
    }
}

fn main() {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    let loaded = roomdesk_config::load_config(args.config.as_deref().map(Path::new));
    let level = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.clone(),
        (None, Err(_)) => DEFAULT_DIRECTIVE.to_string(),
    };
    init_logging(&level);

    tracing::info!("Roomdesk v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        RoomdeskConfig::default()
    });
    if args.packaged {
        config.app.packaged = true;
    }
    tracing::info!(
        environment = %config.app.environment,
        scheme = %config.scheme(),
        packaged = config.app.packaged,
        "Config loaded"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        let writer = CommandWriter::stdout();
        let displays = DisplayCache::default();

        let (updater, completions) = match build_updater(&config) {
            Some((controller, rx)) => (Some(controller), Some(rx)),
            None => (None, None),
        };

        let mut coordinator = Coordinator::new(
            &config,
            Box::new(StdioHost::new(writer.clone(), displays.clone())),
            Box::new(HostRegistrar::new(writer.clone())),
            updater,
        );
        coordinator.start(&args.launch_args());

        let inputs = LoopInputs {
            events: run::spawn_event_reader(tokio::io::stdin()),
            completions,
            displays,
            writer,
        };
        run::run(coordinator, inputs).await;
    });

    tracing::info!("Shutdown complete");
}
