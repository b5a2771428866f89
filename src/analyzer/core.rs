use crate::analyzer::progress::next_progress;
use crate::config::Config;
use crate::error::AppError;
use crate::export::Report;
use crate::history::History;
use crate::locale::Locale;
use crate::predictor::interface::PredictionSet;
use crate::upload::file_input::FileInput;
use crate::upload::image_meta::{FileMeta, UploadedImage};
use crate::upload::validation::validate;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// Validated, waiting for the file read and decode.
    Loading,
    Previewing,
    Analyzing {
        started_at: Instant,
    },
    Result {
        meta: Option<FileMeta>,
        result: PredictionSet,
    },
    Error {
        error: AppError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// Stamped by the first `Tick` after the toast appears.
    pub shown_at: Option<Instant>,
}

impl Toast {
    fn new(kind: ToastKind, message: impl Into<String>) -> Option<Self> {
        Some(Self {
            kind,
            message: message.into(),
            shown_at: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub phase: Phase,
    pub image: Option<UploadedImage>,
    pub progress: f32,
    /// Bumped on every upload and reset, so a late file load can be recognised.
    pub upload_id: u64,
    /// Bumped on every analysis start, so a late result can be recognised.
    pub analysis_id: u64,
    pub history: History,
    pub toast: Option<Toast>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: Phase::Idle,
            image: None,
            progress: 0.0,
            upload_id: 0,
            analysis_id: 0,
            history: History::new(config.history_capacity),
            toast: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Analyzing { .. })
    }

    pub fn result(&self) -> Option<&PredictionSet> {
        match &self.phase {
            Phase::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.phase {
            Phase::Error { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    Tick(Instant),
    FileSelected(FileInput),
    /// The picked or dropped file could not even be inspected.
    FileUnreadable(AppError),
    FileLoaded {
        upload_id: u64,
        result: Result<UploadedImage, AppError>,
    },
    AnalyzeRequested(Instant),
    ProgressTick {
        analysis_id: u64,
        now: Instant,
    },
    AnalysisDone {
        analysis_id: u64,
        completed_at: DateTime<Utc>,
        result: Result<PredictionSet, AppError>,
    },
    HistorySelected(u64),
    ExportRequested,
    ExportDone(Result<PathBuf, AppError>),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeTick,
    LoadImage { upload_id: u64, input: FileInput },
    StartAnalysis { analysis_id: u64, image: UploadedImage },
    CancelAnalysis { analysis_id: u64 },
    ExportReport { file_name: String, report: Report },
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (Model::new(config), vec![Effect::SubscribeTick])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    let locale = Locale::for_language(config.language);

    match (model.phase.clone(), msg) {
        (_, Msg::Tick(now)) => {
            let mut model = model;
            model.toast = match model.toast.take() {
                Some(Toast {
                    shown_at: Some(shown_at),
                    ..
                }) if now.saturating_duration_since(shown_at) >= config.toast_duration => None,
                Some(toast) => Some(Toast {
                    shown_at: toast.shown_at.or(Some(now)),
                    ..toast
                }),
                None => None,
            };
            (model, vec![])
        }

        // Upload
        (phase, Msg::FileSelected(input)) => match validate(config, &input) {
            Ok(()) => {
                let (mut model, mut effects) = begin_upload(&phase, model);
                model.phase = Phase::Loading;
                effects.push(Effect::LoadImage {
                    upload_id: model.upload_id,
                    input,
                });
                (model, effects)
            }
            Err(error) => (reject_upload(locale, model, error), vec![]),
        },
        (_, Msg::FileUnreadable(error)) => (reject_upload(locale, model, error), vec![]),
        (Phase::Loading, Msg::FileLoaded { upload_id, result }) if upload_id == model.upload_id => {
            let mut model = model;
            match result {
                Ok(image) => {
                    model.image = Some(image);
                    model.phase = Phase::Previewing;
                    model.toast = Toast::new(ToastKind::Success, locale.toast_uploaded);
                }
                Err(error) => {
                    model.toast = Toast::new(ToastKind::Error, locale.error_message(&error));
                    model.phase = Phase::Error { error };
                }
            }
            (model, vec![])
        }

        // Analysis
        (
            Phase::Previewing | Phase::Result { .. } | Phase::Error { .. },
            Msg::AnalyzeRequested(now),
        ) => match model.image.clone() {
            Some(image) => {
                let mut model = model;
                model.analysis_id += 1;
                model.progress = 0.0;
                model.phase = Phase::Analyzing { started_at: now };
                let effects = vec![Effect::StartAnalysis {
                    analysis_id: model.analysis_id,
                    image,
                }];
                (model, effects)
            }
            None => (model, vec![]),
        },
        (Phase::Analyzing { started_at }, Msg::ProgressTick { analysis_id, now })
            if analysis_id == model.analysis_id =>
        {
            let mut model = model;
            model.progress = next_progress(
                model.progress,
                now.saturating_duration_since(started_at),
                config.progress_time_constant,
                config.progress_ceiling,
            );
            (model, vec![])
        }
        (
            Phase::Analyzing { .. },
            Msg::AnalysisDone {
                analysis_id,
                completed_at,
                result,
            },
        ) if analysis_id == model.analysis_id => {
            let mut model = model;
            match result {
                Ok(result) => {
                    let meta = model.image.as_ref().map(|image| image.meta.clone());
                    model.progress = 100.0;
                    model.history.push(completed_at, meta.clone(), result.clone());
                    model.phase = Phase::Result { meta, result };
                    model.toast = Toast::new(ToastKind::Success, locale.toast_analysis_done);
                }
                Err(error) => {
                    let error = match error {
                        AppError::AnalysisFailed(reason) => AppError::AnalysisFailed(reason),
                        other => AppError::AnalysisFailed(other.to_string()),
                    };
                    model.progress = 0.0;
                    model.toast = Toast::new(ToastKind::Error, locale.error_message(&error));
                    model.phase = Phase::Error { error };
                }
            }
            (model, vec![])
        }

        // History
        (
            Phase::Idle | Phase::Previewing | Phase::Result { .. } | Phase::Error { .. },
            Msg::HistorySelected(id),
        ) => match model.history.get(id).cloned() {
            Some(entry) => {
                let mut model = model;
                model.phase = Phase::Result {
                    meta: entry.meta,
                    result: entry.result,
                };
                model.toast = Toast::new(ToastKind::Info, locale.toast_restored);
                (model, vec![])
            }
            None => (model, vec![]),
        },

        // Export
        (Phase::Result { meta, result }, Msg::ExportRequested) => {
            let effects = vec![Effect::ExportReport {
                file_name: locale.report_file_name.to_string(),
                report: Report { meta, result },
            }];
            (model, effects)
        }
        (_, Msg::ExportDone(result)) => {
            let mut model = model;
            model.toast = match result {
                Ok(path) => Toast::new(ToastKind::Success, locale.report_saved(&path.display().to_string())),
                Err(error) => Toast::new(ToastKind::Error, locale.error_message(&error)),
            };
            (model, vec![])
        }

        (phase, Msg::Reset) => {
            let mut model = model;
            let effects = cancel_in_flight(&phase, model.analysis_id);

            model.upload_id += 1;
            model.image = None;
            model.progress = 0.0;
            model.phase = Phase::Idle;
            model.toast = Toast::new(ToastKind::Info, locale.toast_reset);

            (model, effects)
        }

        // Stale or out of place messages
        _ => (model, vec![]),
    }
}

/// A rejected file never replaces the current image. Work in progress keeps
/// running and only the toast reports the rejection.
fn reject_upload(locale: &Locale, model: Model, error: AppError) -> Model {
    let mut model = model;
    model.toast = Toast::new(ToastKind::Error, locale.error_message(&error));
    if !model.is_busy() {
        model.phase = Phase::Error { error };
    }
    model
}

/// A new upload replaces the current image and invalidates anything still
/// running for the old one.
fn begin_upload(phase: &Phase, model: Model) -> (Model, Vec<Effect>) {
    let mut model = model;
    let effects = cancel_in_flight(phase, model.analysis_id);
    model.upload_id += 1;
    model.image = None;
    model.progress = 0.0;
    (model, effects)
}

fn cancel_in_flight(phase: &Phase, analysis_id: u64) -> Vec<Effect> {
    match phase {
        Phase::Analyzing { .. } => vec![Effect::CancelAnalysis { analysis_id }],
        _ => vec![],
    }
}
