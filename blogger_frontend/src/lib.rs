pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod form;
pub mod models;
pub mod notify;
pub mod route;
pub mod runtime;

use anyhow::{anyhow, Result};
use eframe::{self, egui};

pub use app::BloggerApp;

use crate::api::ApiClient;
use crate::config::FrontendConfig;

/// Launches the egui application against the API configured in the
/// environment, with default window options.
pub fn run_frontend() -> Result<()> {
    run_frontend_with_options(FrontendConfig::from_env()?, default_native_options())
}

/// Launches the egui app with caller-provided configuration and options.
pub fn run_frontend_with_options(
    config: FrontendConfig,
    options: eframe::NativeOptions,
) -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();
    let api = ApiClient::new(&config)?;
    log::info!("using API at {}", api.base_url());
    eframe::run_native(
        "Blogger Box",
        options,
        Box::new(move |cc| Ok(Box::new(BloggerApp::new(cc, api)))),
    )
    .map_err(|err| anyhow!("frontend exited with error: {err}"))
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    }
}
