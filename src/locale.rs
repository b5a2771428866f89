use crate::error::{bytes_to_mb, display_mime, AppError};
use crate::predictor::interface::DiagnosisClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    French,
}

/// User facing strings. One static table per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub language: Language,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub supported_formats: &'static str,
    pub drop_prompt: &'static str,
    pub browse: &'static str,
    pub analysis: &'static str,
    pub image: &'static str,
    pub results: &'static str,
    pub start_analysis: &'static str,
    pub analyzing: &'static str,
    pub analyzing_detail: &'static str,
    pub loading: &'static str,
    pub assessment: &'static str,
    pub confidence: &'static str,
    pub top: &'static str,
    pub disclaimer: &'static str,
    pub download_report: &'static str,
    pub new_image: &'static str,
    pub history: &'static str,
    pub history_empty: &'static str,
    pub theme_dark: &'static str,
    pub theme_light: &'static str,
    pub footer: &'static str,
    pub toast_uploaded: &'static str,
    pub toast_reset: &'static str,
    pub toast_analysis_done: &'static str,
    pub toast_restored: &'static str,
    pub report_file_name: &'static str,
}

const ENGLISH: Locale = Locale {
    language: Language::English,
    title: "Medical Vision Lab",
    subtitle: "AI-powered image classification (Pneumonia / Tuberculosis).",
    supported_formats: "PNG / JPG / WEBP",
    drop_prompt: "Drag & drop an image here, or click to upload",
    browse: "Choose a file…",
    analysis: "Analysis",
    image: "Image",
    results: "Results",
    start_analysis: "Start analysis",
    analyzing: "Analyzing…",
    analyzing_detail: "Optimization + feature extraction + prediction",
    loading: "Loading image…",
    assessment: "AI assessment",
    confidence: "Confidence",
    top: "Top",
    disclaimer: "This AI result is informational only and does not replace a medical diagnosis.",
    download_report: "Download report",
    new_image: "New image",
    history: "History",
    history_empty: "No analyses yet. Run an analysis to populate your history.",
    theme_dark: "Dark",
    theme_light: "Light",
    footer: "Medical Vision Lab — Demo interface. AI results are indicative only.",
    toast_uploaded: "Image uploaded ✅",
    toast_reset: "Reset complete.",
    toast_analysis_done: "Analysis completed ✅",
    toast_restored: "Result restored from history.",
    report_file_name: "analysis_report.json",
};

const FRENCH: Locale = Locale {
    language: Language::French,
    title: "Medical Vision Lab",
    subtitle: "Classification d'images par IA (Pneumonie / Tuberculose).",
    supported_formats: "PNG / JPG / WEBP",
    drop_prompt: "Glissez-déposez une image ici, ou cliquez pour importer",
    browse: "Choisir un fichier…",
    analysis: "Analyse",
    image: "Image",
    results: "Résultats",
    start_analysis: "Lancer l'analyse",
    analyzing: "Analyse en cours…",
    analyzing_detail: "Optimisation + extraction de caractéristiques + prédiction",
    loading: "Chargement de l'image…",
    assessment: "Évaluation IA",
    confidence: "Confiance",
    top: "Top",
    disclaimer: "Ce résultat IA est purement informatif et ne remplace pas un diagnostic médical.",
    download_report: "Télécharger le rapport",
    new_image: "Nouvelle image",
    history: "Historique",
    history_empty: "Aucune analyse pour le moment. Lancez une analyse pour remplir l'historique.",
    theme_dark: "Sombre",
    theme_light: "Clair",
    footer: "Medical Vision Lab — Interface de démonstration. Résultats IA indicatifs.",
    toast_uploaded: "Image importée ✅",
    toast_reset: "Réinitialisation effectuée.",
    toast_analysis_done: "Analyse terminée ✅",
    toast_restored: "Résultat restauré depuis l'historique.",
    report_file_name: "rapport_analyse.json",
};

impl Locale {
    pub fn for_language(language: Language) -> &'static Locale {
        match language {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
        }
    }

    pub fn class_label(&self, class: DiagnosisClass) -> &'static str {
        match (self.language, class) {
            (_, DiagnosisClass::Normal) => "Normal",
            (Language::English, DiagnosisClass::Pneumonia) => "Pneumonia",
            (Language::English, DiagnosisClass::Tuberculosis) => "Tuberculosis",
            (Language::French, DiagnosisClass::Pneumonia) => "Pneumonie",
            (Language::French, DiagnosisClass::Tuberculosis) => "Tuberculose",
        }
    }

    pub fn error_message(&self, error: &AppError) -> String {
        match self.language {
            Language::English => error.to_string(),
            Language::French => match error {
                AppError::InvalidFormat { mime_type } => format!(
                    "Format non supporté ({}). Formats acceptés : PNG, JPG, JPEG, WEBP.",
                    display_mime(mime_type)
                ),
                AppError::FileTooLarge {
                    size_bytes,
                    max_bytes,
                } => format!(
                    "Fichier trop volumineux ({:.1} Mo). Max : {} Mo.",
                    bytes_to_mb(*size_bytes),
                    bytes_to_mb(*max_bytes)
                ),
                AppError::ReadFailed(reason) => format!("Lecture du fichier impossible : {}", reason),
                AppError::AnalysisFailed(_) => {
                    "Erreur lors de l'analyse. Veuillez réessayer.".to_string()
                }
                AppError::ExportFailed(reason) => {
                    format!("Enregistrement du rapport impossible : {}", reason)
                }
            },
        }
    }

    pub fn report_saved(&self, path: &str) -> String {
        match self.language {
            Language::English => format!("Report saved to {}", path),
            Language::French => format!("Rapport enregistré : {}", path),
        }
    }

    pub fn max_size_hint(&self, max_bytes: u64) -> String {
        match self.language {
            Language::English => format!("{} — up to {}MB", self.supported_formats, bytes_to_mb(max_bytes)),
            Language::French => format!("{} — jusqu'à {} Mo", self.supported_formats, bytes_to_mb(max_bytes)),
        }
    }
}
