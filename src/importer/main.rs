mod app;

use app::ImporterApp;
use tracing_subscriber::{EnvFilter, fmt};
use uvtt_import::config::AppConfig;

fn main() -> eframe::Result<()> {
    let config = AppConfig::discover().unwrap_or_else(|err| {
        eprintln!("Warning: {}; using default configuration", err);
        AppConfig::default()
    });
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 480.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "UVTT Importer",
        options,
        Box::new(|cc| Ok(Box::new(ImporterApp::new(cc, config)))),
    )
}
