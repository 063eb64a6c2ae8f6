// src/gui.rs
use eframe::egui;
use egui::{Align2, Color32, RichText};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoints};
use crate::analysis::{PdfTableExtractor, NOMINAL_VOLTAGE};
use crate::state::{transition, Services, Transition};
use crate::types::*;

pub struct VoltageAnalyzerApp {
    screen: Screen,
    services: Services<PdfTableExtractor>,
    // 直方图纹理，进入结果页时按需生成
    histogram_texture: Option<egui::TextureHandle>,
}

impl VoltageAnalyzerApp {
    pub fn new(services: Services<PdfTableExtractor>, initial_path: Option<String>) -> Self {
        let screen = Screen::FileSelect(FileSelectState {
            path_input: initial_path.unwrap_or_default(),
            notice: None,
        });
        Self {
            screen,
            services,
            histogram_texture: None,
        }
    }

    fn apply(&mut self, ctx: &egui::Context, event: AppEvent) {
        if matches!(event, AppEvent::Process(_) | AppEvent::Back) {
            self.histogram_texture = None;
        }
        let screen = std::mem::take(&mut self.screen);
        match transition(screen, event, &self.services) {
            Transition::Stay(next) => self.screen = next,
            Transition::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

fn load_histogram_texture(ctx: &egui::Context, png: &[u8]) -> Option<egui::TextureHandle> {
    let decoded = match image::load_from_memory(png) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            log::error!("histogram decode failed: {err}");
            return None;
        }
    };
    let size = [decoded.width() as usize, decoded.height() as usize];
    let color = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
    Some(ctx.load_texture("histogram", color, egui::TextureOptions::LINEAR))
}

fn file_select_ui(ctx: &egui::Context, state: &mut FileSelectState, events: &mut Vec<AppEvent>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.heading("Analizador de Voltaje ISC8 Inc.");
            ui.separator();
            ui.add_space(20.0);
            ui.label(RichText::new("Seleccione el archivo PDF con las lecturas:").strong());
            ui.add_space(8.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.path_input)
                    .hint_text("ruta/al/archivo.pdf")
                    .desired_width(420.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.label(RichText::new("(o arrastre el archivo a esta ventana)").small());
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Examinar").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Seleccionar archivo PDF")
                        .add_filter("PDF", &["pdf"])
                        .pick_file()
                    {
                        events.push(AppEvent::PathChosen(path.display().to_string()));
                    }
                }
                if ui.button("Procesar").clicked() || submitted {
                    events.push(AppEvent::Process(state.path_input.clone()));
                }
                if ui.button("Salir").clicked() {
                    events.push(AppEvent::Close);
                }
            });
        });
    });
}

fn data_tab(ui: &mut egui::Ui, results: &ResultsState) {
    ui.label(RichText::new("Lecturas de Voltaje").strong());
    let points: Vec<[f64; 2]> = results
        .analysis
        .readings
        .iter()
        .enumerate()
        .map(|(i, r)| [i as f64 + 1.0, r.voltage])
        .collect();
    Plot::new("voltage_trace")
        .height(160.0)
        .legend(Legend::default())
        .include_y(NOMINAL_VOLTAGE)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::new(points)).name("Voltaje"));
            plot_ui.hline(
                HLine::new(NOMINAL_VOLTAGE)
                    .name("Valor Nominal")
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose()),
            );
        });
    ui.add_space(6.0);
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("readings_table")
            .striped(true)
            .num_columns(4)
            .min_col_width(90.0)
            .show(ui, |ui| {
                for header in ["Hora", "Voltaje (V)", "Error Abs. (V)", "Error Rel. (%)"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for r in results.analysis.readings.iter() {
                    ui.label(&r.timestamp);
                    ui.monospace(format!("{:.2}", r.voltage));
                    ui.monospace(format!("{:.4}", r.absolute_error));
                    ui.monospace(format!("{:.4}", r.relative_error_pct));
                    ui.end_row();
                }
            });
    });
}

fn statistics_tab(ui: &mut egui::Ui, results: &ResultsState) {
    ui.label(RichText::new("Estadísticas Principales").strong());
    ui.add_space(6.0);
    egui::ScrollArea::vertical().show(ui, |ui| {
        for group in results.analysis.stats.groups() {
            ui.group(|ui| {
                ui.label(RichText::new(group.title).strong());
                egui::Grid::new(group.title)
                    .num_columns(2)
                    .min_col_width(160.0)
                    .show(ui, |ui| {
                        for (label, value) in &group.rows {
                            ui.label(*label);
                            ui.monospace(value);
                            ui.end_row();
                        }
                    });
            });
            ui.add_space(4.0);
        }
        ui.label(format!(
            "Lecturas: {}   Mín: {:.4} V   Máx: {:.4} V",
            results.analysis.stats.count, results.analysis.stats.min, results.analysis.stats.max
        ));
    });
}

fn chart_tab(ui: &mut egui::Ui, texture: Option<&egui::TextureHandle>) {
    ui.label(RichText::new("Distribución de Voltajes").strong());
    match texture {
        Some(texture) => {
            ui.add(
                egui::Image::new((texture.id(), texture.size_vec2()))
                    .max_width(ui.available_width()),
            );
        }
        None => {
            ui.label("No se pudo mostrar el histograma.");
        }
    }
}

fn results_ui(
    ctx: &egui::Context,
    results: &mut ResultsState,
    texture: Option<&egui::TextureHandle>,
    events: &mut Vec<AppEvent>,
) {
    egui::TopBottomPanel::top("results_title").show(ctx, |ui| {
        ui.heading("Resultados del Análisis");
        ui.label(format!("Archivo: {}", results.analysis.source_name()));
    });
    egui::TopBottomPanel::bottom("results_actions").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Generar Reporte").clicked() {
                events.push(AppEvent::GenerateReport);
            }
            if ui.button("Otro archivo").clicked() {
                events.push(AppEvent::Back);
            }
            if ui.button("Cerrar").clicked() {
                events.push(AppEvent::Close);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Valor Nominal: {NOMINAL_VOLTAGE:.2} V"));
            });
        });
    });
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut results.tab, ResultsTab::Data, "Datos");
            ui.selectable_value(&mut results.tab, ResultsTab::Statistics, "Estadísticas");
            ui.selectable_value(&mut results.tab, ResultsTab::Chart, "Gráfica");
        });
        ui.separator();
        match results.tab {
            ResultsTab::Data => data_tab(ui, results),
            ResultsTab::Statistics => statistics_tab(ui, results),
            ResultsTab::Chart => chart_tab(ui, texture),
        }
    });
}

fn notice_ui(ctx: &egui::Context, notice: &Notice, events: &mut Vec<AppEvent>) {
    let (title, text, color) = match notice {
        Notice::Info(text) => ("Información", text, Color32::DARK_GREEN),
        Notice::Error(text) => ("Error", text, Color32::DARK_RED),
    };
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(text.as_str()).color(color));
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                events.push(AppEvent::Dismiss);
            }
        });
}

impl eframe::App for VoltageAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        // 1. 拖放文件 -> 填入路径
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            events.push(AppEvent::PathChosen(path.display().to_string()));
        }

        // 2. 界面绘制，只收集事件
        match &mut self.screen {
            Screen::FileSelect(state) => file_select_ui(ctx, state, &mut events),
            Screen::Results(results) => {
                if self.histogram_texture.is_none() {
                    self.histogram_texture = load_histogram_texture(ctx, &results.histogram_png);
                }
                results_ui(ctx, results, self.histogram_texture.as_ref(), &mut events);
            }
        }
        if let Some(notice) = self.screen.notice() {
            notice_ui(ctx, notice, &mut events);
        }

        // 3. 状态机
        for event in events {
            self.apply(ctx, event);
        }
    }
}
