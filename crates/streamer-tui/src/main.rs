mod action;
mod app;
mod app_state;
mod component;
mod components;
mod logging;
mod theme;
mod widgets;

use tracing::{info, warn};

use streamer_core::config::Config;
use streamer_core::platform::find_player_binary;
use streamer_core::RadioCore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load();
    let config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => Config::default(),
    };

    let log_rx = logging::init(&config.paths.log_file)?;

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("playradio log: {}", config.paths.log_file.display());
    info!("playradio starting…");

    match loaded {
        Ok(_) => info!("Config loaded from: {:?}", Config::config_path()),
        Err(e) => warn!("Config unreadable, using defaults: {:#}", e),
    }

    let program = if cfg!(windows) {
        config.player.windows_path.to_string_lossy().into_owned()
    } else {
        config.player.command.clone()
    };
    if find_player_binary(&program).is_none() {
        warn!("player {:?} not found; playback will fail until it is installed", program);
    }

    // An unsupported platform has no invocation form, so there is nothing to run.
    let (core, load_error) = RadioCore::open(&config)?;

    let mut app = app::App::new(core, config.ui.native_dialogs);
    if let Some(e) = load_error {
        app.report_load_error(&e);
    }
    app.run(log_rx).await?;

    info!("playradio exited");
    Ok(())
}
