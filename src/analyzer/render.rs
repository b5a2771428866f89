use crate::analyzer::core::{Model, Msg, Phase, ToastKind};
use crate::analyzer::main::Analyzer;
use crate::config::Config;
use crate::locale::Locale;
use crate::predictor::interface::{DiagnosisClass, PredictionSet};
use crate::upload::file_input::FileInput;
use crate::upload::image_meta::{format_bytes, FileMeta};
use eframe::egui;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 70.0 {
            ConfidenceLevel::High
        } else if confidence >= 40.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            ConfidenceLevel::High => egui::Color32::from_rgb(239, 68, 68),
            ConfidenceLevel::Medium => egui::Color32::from_rgb(234, 179, 8),
            ConfidenceLevel::Low => egui::Color32::from_rgb(16, 185, 129),
        }
    }
}

fn diagnosis_color(diagnosis: DiagnosisClass) -> egui::Color32 {
    match diagnosis {
        DiagnosisClass::Normal => egui::Color32::from_rgb(4, 120, 87),
        DiagnosisClass::Pneumonia => egui::Color32::from_rgb(194, 65, 12),
        DiagnosisClass::Tuberculosis => egui::Color32::from_rgb(185, 28, 28),
    }
}

fn toast_color(kind: ToastKind) -> egui::Color32 {
    match kind {
        ToastKind::Success => egui::Color32::from_rgb(5, 150, 105),
        ToastKind::Error => egui::Color32::from_rgb(220, 38, 38),
        ToastKind::Info => egui::Color32::from_rgb(15, 23, 42),
    }
}

/// Things the user asked for while the frame was being drawn. They are
/// applied once drawing is done.
enum UiAction {
    Dispatch(Msg),
    PickFile,
    ToggleTheme,
}

pub struct AnalyzerApp {
    analyzer: Analyzer,
    config: Config,
    locale: &'static Locale,
    dark: bool,
    preview_texture: Option<(u64, egui::TextureHandle)>,
}

impl AnalyzerApp {
    pub fn new(config: Config, analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            locale: Locale::for_language(config.language),
            config,
            dark: false,
            preview_texture: None,
        }
    }

    fn select_path(&mut self, path: &Path) {
        let msg = match FileInput::from_path(path) {
            Ok(input) => Msg::FileSelected(input),
            Err(error) => Msg::FileUnreadable(error),
        };
        self.analyzer.dispatch(msg);
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the first file counts, like the picker.
        let Some(file) = dropped_files.into_iter().next() else {
            return;
        };

        if let Some(path) = file.path.as_ref() {
            self.select_path(path);
        } else if let Some(bytes) = file.bytes {
            let input = FileInput::from_bytes(&file.name, &file.mime, bytes);
            self.analyzer.dispatch(Msg::FileSelected(input));
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        {
            self.select_path(&path);
        }
    }

    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let model = self.analyzer.model();
        let Some(preview) = model.image.as_ref().and_then(|image| image.preview.as_ref()) else {
            self.preview_texture = None;
            return;
        };

        let upload_id = model.upload_id;
        if matches!(&self.preview_texture, Some((id, _)) if *id == upload_id) {
            return;
        }

        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [preview.width as usize, preview.height as usize],
            &preview.rgba,
        );
        let texture = ctx.load_texture(
            format!("preview-{}", upload_id),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.preview_texture = Some((upload_id, texture));
    }

    fn apply(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Dispatch(msg) => self.analyzer.dispatch(msg),
                UiAction::PickFile => self.pick_file(),
                UiAction::ToggleTheme => self.dark = !self.dark,
            }
        }
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.analyzer.poll();
        self.handle_dropped_files(ctx);
        self.sync_preview_texture(ctx);

        ctx.set_visuals(if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let model = self.analyzer.model().clone();
        let locale = self.locale;
        let drag_active = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let texture = self.preview_texture.as_ref().map(|(_, texture)| texture.clone());
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            render_header(ui, locale, self.dark, &self.config, &mut actions);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.small(locale.footer));
        });

        egui::SidePanel::right("history")
            .min_width(240.0)
            .show(ctx, |ui| render_history(ui, locale, &model, &mut actions));

        egui::CentralPanel::default().show(ctx, |ui| {
            let show_dropzone = model.image.is_none() && model.result().is_none();
            if show_dropzone {
                render_dropzone(ui, locale, &self.config, &model, drag_active, &mut actions);
            } else {
                render_analysis(ui, locale, &model, texture.as_ref(), &mut actions);
            }
        });

        if let Some(toast) = &model.toast {
            render_toast(ctx, toast.kind, &toast.message);
        }

        self.apply(actions);

        let repaint_after = if self.analyzer.model().is_busy() {
            Duration::from_millis(50)
        } else {
            self.config.tick_rate
        };
        ctx.request_repaint_after(repaint_after);
    }
}

fn render_header(
    ui: &mut egui::Ui,
    locale: &Locale,
    dark: bool,
    config: &Config,
    actions: &mut Vec<UiAction>,
) {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(egui::RichText::new(locale.title).size(32.0).strong());
            ui.label(locale.subtitle);
            ui.small(locale.max_size_hint(config.max_upload_size_bytes));
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            let label = if dark {
                format!("☀ {}", locale.theme_light)
            } else {
                format!("🌙 {}", locale.theme_dark)
            };
            if ui.button(label).clicked() {
                actions.push(UiAction::ToggleTheme);
            }
        });
    });
    ui.add_space(8.0);
}

fn render_dropzone(
    ui: &mut egui::Ui,
    locale: &Locale,
    config: &Config,
    model: &Model,
    drag_active: bool,
    actions: &mut Vec<UiAction>,
) {
    let stroke_color = if drag_active {
        egui::Color32::from_rgb(99, 102, 241)
    } else {
        egui::Color32::GRAY
    };

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, stroke_color))
        .inner_margin(egui::Margin::same(40.0))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("⬆").size(40.0));
                ui.label(egui::RichText::new(locale.drop_prompt).size(20.0).strong());
                ui.label(locale.max_size_hint(config.max_upload_size_bytes));
                ui.add_space(12.0);

                if matches!(model.phase, Phase::Loading) {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(locale.loading);
                    });
                } else if ui.button(locale.browse).clicked() {
                    actions.push(UiAction::PickFile);
                }

                if let Some(error) = model.error() {
                    ui.add_space(12.0);
                    ui.colored_label(
                        toast_color(ToastKind::Error),
                        format!("⚠ {}", locale.error_message(error)),
                    );
                }
            });
        });
}

fn render_analysis(
    ui: &mut egui::Ui,
    locale: &Locale,
    model: &Model,
    texture: Option<&egui::TextureHandle>,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new(locale.analysis).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(format!("✖ {}", locale.new_image)).clicked() {
                actions.push(UiAction::Dispatch(Msg::Reset));
            }
            let download = egui::Button::new(format!("⬇ {}", locale.download_report));
            if ui.add_enabled(model.result().is_some(), download).clicked() {
                actions.push(UiAction::Dispatch(Msg::ExportRequested));
            }
        });
    });
    ui.separator();

    let meta = match &model.phase {
        Phase::Result { meta, .. } => meta.clone(),
        _ => model.image.as_ref().map(|image| image.meta.clone()),
    };
    if let Some(meta) = &meta {
        render_meta(ui, locale, meta, model.result());
        ui.add_space(8.0);
    }

    ui.columns(2, |columns| {
        columns[0].label(locale.image);
        match texture {
            Some(texture) => {
                let width = columns[0].available_width();
                columns[0].add(
                    egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                        .max_width(width),
                );
            }
            None => {
                columns[0].label("—");
            }
        }

        render_results(&mut columns[1], locale, model, actions);
    });
}

fn render_meta(
    ui: &mut egui::Ui,
    locale: &Locale,
    meta: &FileMeta,
    result: Option<&PredictionSet>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&meta.name).strong());
                ui.small(meta.summary());
            });
            if let Some(top) = result.and_then(|r| r.top()) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}: {} ({:.1}%)",
                            locale.top,
                            locale.class_label(top.class),
                            top.confidence
                        ))
                        .strong(),
                    );
                });
            }
        });
    });
}

fn render_results(ui: &mut egui::Ui, locale: &Locale, model: &Model, actions: &mut Vec<UiAction>) {
    ui.label(locale.results);

    match &model.phase {
        Phase::Analyzing { .. } => {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(locale.analyzing).strong());
                        ui.small(locale.analyzing_detail);
                    });
                    ui.label(format!("{}%", model.progress.round()));
                });
                ui.add(egui::ProgressBar::new(model.progress / 100.0));
            });
        }
        Phase::Result { result, .. } => render_prediction_set(ui, locale, result),
        Phase::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(locale.loading);
            });
        }
        Phase::Idle | Phase::Previewing | Phase::Error { .. } => {
            if model.image.is_some() {
                let button = egui::Button::new(egui::RichText::new(locale.start_analysis).strong())
                    .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add(button).clicked() {
                    actions.push(UiAction::Dispatch(Msg::AnalyzeRequested(Instant::now())));
                }
            }
        }
    }

    if let Some(error) = model.error() {
        ui.add_space(8.0);
        ui.colored_label(
            toast_color(ToastKind::Error),
            format!("⚠ {}", locale.error_message(error)),
        );
    }
}

fn render_prediction_set(ui: &mut egui::Ui, locale: &Locale, result: &PredictionSet) {
    let color = diagnosis_color(result.diagnosis);
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, color))
        .show(ui, |ui| {
            let icon = if result.diagnosis == DiagnosisClass::Normal {
                "✔"
            } else {
                "⚠"
            };
            ui.colored_label(color, egui::RichText::new(format!("{} {}", icon, locale.assessment)).strong());
            ui.colored_label(
                color,
                egui::RichText::new(locale.class_label(result.diagnosis))
                    .size(28.0)
                    .strong(),
            );
        });

    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(egui::RichText::new(locale.confidence).strong());
        for prediction in &result.predictions {
            ui.horizontal(|ui| {
                ui.label(locale.class_label(prediction.class));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.1}%", prediction.confidence));
                });
            });
            let level = ConfidenceLevel::from_confidence(prediction.confidence);
            ui.add(egui::ProgressBar::new(prediction.confidence / 100.0).fill(level.color()));
        }
    });

    ui.add_space(8.0);
    ui.small(locale.disclaimer);
}

fn render_history(ui: &mut egui::Ui, locale: &Locale, model: &Model, actions: &mut Vec<UiAction>) {
    ui.add_space(8.0);
    ui.heading(format!("🕘 {}", locale.history));
    ui.separator();

    if model.history.is_empty() {
        ui.label(locale.history_empty);
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for entry in model.history.entries() {
            let date = entry
                .date
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S");
            let dimensions = entry
                .meta
                .as_ref()
                .and_then(|meta| meta.dimensions())
                .map(|(w, h)| format!("{}×{}", w, h))
                .unwrap_or_else(|| "—".to_string());
            let size = entry
                .meta
                .as_ref()
                .map(|meta| format_bytes(meta.size))
                .unwrap_or_default();

            let text = format!(
                "{}\n{} • {} {}",
                locale.class_label(entry.result.diagnosis),
                date,
                dimensions,
                size
            );
            let button = egui::Button::new(text).min_size(egui::vec2(ui.available_width(), 0.0));
            if ui.add(button).clicked() {
                actions.push(UiAction::Dispatch(Msg::HistorySelected(entry.id)));
            }
        }
    });
}

fn render_toast(ctx: &egui::Context, kind: ToastKind, message: &str) {
    egui::Area::new("toast")
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 20.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(toast_color(kind))
                .show(ui, |ui| {
                    ui.colored_label(egui::Color32::WHITE, message);
                });
        });
}
