// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod analysis;
mod config;
mod gui;
mod state;
mod types;
use analysis::{AnalysisPipeline, PdfTableExtractor, PlotStyle};
use config::AppConfig;
use eframe::egui;
use state::Services;
// 入口函数
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = AppConfig::load().unwrap_or_else(|err| {
        log::warn!("{err:#}; falling back to defaults");
        AppConfig::default()
    });
    // 命令行第一个参数作为预填的 PDF 路径
    let initial_path = std::env::args().nth(1);
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.window_width, config.window_height])
        .with_min_inner_size([640.0, 420.0])
        .with_title("Analizador de Voltaje");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let services = Services {
        pipeline: AnalysisPipeline::new(
            PdfTableExtractor,
            PlotStyle::with_size(config.chart_width, config.chart_height),
        ),
        output_dir: config.output_dir(),
        report_rows: config.report_rows,
        open_report: |path| open::that(path),
    };
    log::info!("reports go to {}", services.output_dir.display());
    eframe::run_native(
        "Analizador de Voltaje",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(gui::VoltageAnalyzerApp::new(services, initial_path))
        }),
    )
    .map_err(|err| anyhow::anyhow!("window loop failed: {err}"))
}
