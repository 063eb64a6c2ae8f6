// src/state.rs
use std::io;
use std::path::{Path, PathBuf};
use crate::analysis::{AnalysisPipeline, TableExtractor};
use crate::types::*;

// 状态机依赖的外部协作者
pub struct Services<E: TableExtractor> {
    pub pipeline: AnalysisPipeline<E>,
    pub output_dir: PathBuf,
    pub report_rows: usize,
    // 用系统默认程序打开生成的报告
    pub open_report: fn(&Path) -> io::Result<()>,
}

#[derive(Debug)]
pub enum Transition {
    Stay(Screen),
    Exit,
}

pub fn transition<E: TableExtractor>(
    screen: Screen,
    event: AppEvent,
    services: &Services<E>,
) -> Transition {
    let next = match (screen, event) {
        (_, AppEvent::Close) => return Transition::Exit,
        (Screen::FileSelect(state), AppEvent::Process(path)) => process(state, &path, services),
        (Screen::FileSelect(mut state), AppEvent::PathChosen(path)) => {
            state.path_input = path;
            state.notice = None;
            Screen::FileSelect(state)
        }
        (Screen::Results(mut results), AppEvent::GenerateReport) => {
            let outcome = services.pipeline.export_report(
                &results.analysis,
                &results.histogram_png,
                &services.output_dir,
                services.report_rows,
            );
            match outcome {
                Ok(files) => {
                    let mut message =
                        format!("Reporte generado exitosamente:\n{}", files.report.display());
                    if let Err(err) = (services.open_report)(&files.report) {
                        log::warn!("could not open {}: {err}", files.report.display());
                        message.push_str(&format!("\nNo se pudo abrir el reporte: {err}"));
                    }
                    results.notice = Some(Notice::Info(message));
                    results.last_report = Some(files);
                }
                Err(err) => {
                    log::error!("report export failed: {err}");
                    results.notice = Some(Notice::Error(format!("Error generando reporte:\n{err}")));
                }
            }
            Screen::Results(results)
        }
        (Screen::Results(results), AppEvent::Back) => Screen::FileSelect(FileSelectState {
            path_input: results.analysis.source.display().to_string(),
            notice: None,
        }),
        (Screen::FileSelect(mut state), AppEvent::Dismiss) => {
            state.notice = None;
            Screen::FileSelect(state)
        }
        (Screen::Results(mut results), AppEvent::Dismiss) => {
            results.notice = None;
            Screen::Results(results)
        }
        (screen, event) => {
            log::debug!("ignoring {event:?} on this screen");
            screen
        }
    };
    Transition::Stay(next)
}

fn process<E: TableExtractor>(
    mut state: FileSelectState,
    path: &str,
    services: &Services<E>,
) -> Screen {
    let path = path.trim();
    state.path_input = path.to_owned();
    if path.is_empty() {
        state.notice = Some(Notice::Error("Seleccione un archivo PDF primero".into()));
        return Screen::FileSelect(state);
    }
    let analysis = match services.pipeline.process(Path::new(path)) {
        Ok(analysis) => analysis,
        Err(err) => {
            state.notice = Some(Notice::Error(format!("Error procesando PDF:\n{err}")));
            return Screen::FileSelect(state);
        }
    };
    match services.pipeline.render_chart(&analysis) {
        Ok(histogram_png) => Screen::Results(Box::new(ResultsState {
            analysis,
            histogram_png,
            tab: ResultsTab::default(),
            last_report: None,
            notice: None,
        })),
        Err(err) => {
            log::error!("histogram rendering failed: {err}");
            state.notice = Some(Notice::Error(format!("Error procesando PDF:\n{err}")));
            Screen::FileSelect(state)
        }
    }
}
