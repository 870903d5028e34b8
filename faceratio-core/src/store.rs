use crate::compare::MatchResult;
use crate::score::ScoreBreakdown;
use crate::shape::FaceTypeResult;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Result not found: {0}")]
    NotFound(String),
    #[error("Invalid result id: {0}")]
    InvalidId(String),
}

const ID_PREFIX: &str = "fv_";
const ID_RANDOM_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Everything produced for one analyzed photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: String,
    pub score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub celebrity_matches: MatchResult,
    pub face_type: FaceTypeResult,
    pub created_at: DateTime<Utc>,
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `fv_` + base-36 millisecond timestamp + random base-36 suffix
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_RANDOM_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}{}", ID_PREFIX, to_base36(millis), suffix)
}

fn validate_id(id: &str) -> Result<(), StorageError> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidId(id.to_string()))
    }
}

/// Directory of JSON analysis reports, one file per id
pub struct ResultStore {
    base_path: PathBuf,
}

impl ResultStore {
    /// Create a new result store at the given path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn report_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.base_path, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }

    /// Persist a report under its id
    pub fn save(&self, report: &AnalysisReport) -> Result<String, StorageError> {
        validate_id(&report.id)?;
        self.ensure_dir()?;

        let path = self.report_path(&report.id);
        let data = serde_json::to_vec_pretty(report)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, data)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        log::info!("Saved analysis {} to {}", report.id, path.display());
        Ok(report.id.clone())
    }

    pub fn load(&self, id: &str) -> Result<AnalysisReport, StorageError> {
        validate_id(id)?;
        let path = self.report_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let data = fs::read(&path)?;
        serde_json::from_slice(&data).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// All stored ids, sorted
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        validate_id(id)?;
        let path = self.report_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}
