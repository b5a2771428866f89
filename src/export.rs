use crate::error::AppError;
use crate::predictor::interface::PredictionSet;
use crate::upload::image_meta::FileMeta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What "download report" writes: the file metadata next to the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: Option<FileMeta>,
    pub result: PredictionSet,
}

impl Report {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::ExportFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::ExportFailed(e.to_string()))
    }
}

pub fn write_report(dir: &Path, file_name: &str, report: &Report) -> Result<PathBuf, AppError> {
    let path = dir.join(file_name);
    let json = report.to_json()?;
    std::fs::write(&path, json).map_err(|e| AppError::ExportFailed(e.to_string()))?;
    Ok(path)
}
