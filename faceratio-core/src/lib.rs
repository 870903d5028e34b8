//! Face-ratio analysis: golden-ratio scoring, face-shape classification and
//! celebrity look-alike matching from detector landmarks.
//!
//! The four building blocks are pure functions and can be used directly:
//!
//! * [`extract_ratios`] turns 27 landmarks and the face rectangle into a
//!   6-dimensional [`FaceRatios`] vector,
//! * [`calculate_score`] scores the face against fixed ideal proportions,
//! * [`classify_face_type`] runs the face-shape decision tree,
//! * [`match_celebrities`] ranks a reference dataset by similarity.
//!
//! [`FaceAnalyzer`] wires them together with configuration, the shared
//! celebrity dataset and the on-disk result store.

pub mod celebrity;
pub mod compare;
pub mod config;
pub mod detect;
pub mod landmarks;
pub mod ratios;
pub mod score;
pub mod shape;
pub mod store;

pub use celebrity::{Celebrity, CelebrityDb, Gender, Region};
pub use compare::{match_celebrities, CelebrityMatch, MatchResult};
pub use detect::DetectedFace;
pub use landmarks::{FaceLandmarks, FaceRectangle, Point};
pub use ratios::{extract_ratios, FaceRatios};
pub use score::{calculate_score, ScoreBreakdown};
pub use shape::{classify_face_type, FaceShape, FaceTypeResult};
pub use store::AnalysisReport;

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Detection error: {0}")]
    Detection(#[from] detect::DetectionError),
    #[error("Celebrity dataset error: {0}")]
    Celebrity(#[from] celebrity::CelebrityError),
    #[error("Storage error: {0}")]
    Storage(#[from] store::StorageError),
}

pub struct FaceAnalyzer {
    config: config::Config,
    celebrities: Arc<CelebrityDb>,
    store: store::ResultStore,
}

impl FaceAnalyzer {
    /// Create an analyzer, loading the dataset named in the config or the
    /// built-in one
    pub fn new(config: config::Config) -> Result<Self, Error> {
        config.validate()?;
        let celebrities = match &config.dataset.path {
            Some(path) => Arc::new(CelebrityDb::load_from_path(path)?),
            None => {
                let db = CelebrityDb::builtin();
                log::debug!("Using built-in dataset with {} celebrities", db.len());
                db
            }
        };
        Ok(Self::with_dataset(config, celebrities))
    }

    /// Create an analyzer around an already loaded dataset
    pub fn with_dataset(config: config::Config, celebrities: Arc<CelebrityDb>) -> Self {
        let store = store::ResultStore::new(&config.storage.results_path);
        Self {
            config,
            celebrities,
            store,
        }
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn celebrities(&self) -> &Arc<CelebrityDb> {
        &self.celebrities
    }

    pub fn store(&self) -> &store::ResultStore {
        &self.store
    }

    /// Score, classify and match a single face
    pub fn analyze_face(&self, face: &DetectedFace) -> Result<AnalysisReport, Error> {
        self.analyze_face_with_top_n(face, self.config.matching.top_n)
    }

    /// Like [`analyze_face`](Self::analyze_face) with an explicit match count
    pub fn analyze_face_with_top_n(
        &self,
        face: &DetectedFace,
        top_n: usize,
    ) -> Result<AnalysisReport, Error> {
        face.validate()?;
        let landmarks = &face.face_landmarks;
        let rect = &face.face_rectangle;

        let score = calculate_score(landmarks, rect);
        let ratios = extract_ratios(landmarks, rect);
        log::debug!("Face ratios: {:?}", ratios);

        let matches = match_celebrities(&ratios, self.celebrities.entries(), top_n);
        let face_type = classify_face_type(landmarks, rect);

        Ok(AnalysisReport {
            id: store::generate_id(),
            score: score.total,
            score_breakdown: score,
            celebrity_matches: matches,
            face_type,
            created_at: Utc::now(),
        })
    }

    /// Analyze the main face of a detector response
    pub fn analyze_detections(&self, json: &str, top_n: usize) -> Result<AnalysisReport, Error> {
        let faces = detect::parse_detections(json)?;
        let face = detect::select_main_face(&faces)?;
        self.analyze_face_with_top_n(face, top_n)
    }

    /// Persist a report when result storage is enabled.
    ///
    /// Returns whether the report was written.
    pub fn save_report(&self, report: &AnalysisReport) -> Result<bool, Error> {
        if !self.config.storage.save_results {
            log::debug!("Result storage disabled, not saving {}", report.id);
            return Ok(false);
        }
        self.store.save(report)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures::symmetric_face;

    fn make_analyzer(save: bool) -> (FaceAnalyzer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config::Config::default();
        config.storage.results_path = dir.path().to_path_buf();
        config.storage.save_results = save;
        (FaceAnalyzer::new(config).unwrap(), dir)
    }

    fn detected(width: f64, height: f64) -> DetectedFace {
        let (landmarks, _) = symmetric_face();
        DetectedFace {
            face_id: None,
            face_rectangle: FaceRectangle::new(0.0, 0.0, width, height),
            face_landmarks: landmarks,
            face_attributes: None,
        }
    }

    #[test]
    fn analyze_face_fills_every_section() {
        let (analyzer, _dir) = make_analyzer(false);
        let report = analyzer.analyze_face(&detected(200.0, 230.0)).unwrap();

        assert!(report.id.starts_with("fv_"));
        assert_eq!(report.score, report.score_breakdown.total);
        assert_eq!(report.score, 80);
        // 230/200 is wide, outer eye corners 130px over a 90px mouth
        assert_eq!(report.face_type.shape, FaceShape::Square);
        assert_eq!(
            report.celebrity_matches.top_matches.len(),
            compare::DEFAULT_TOP_N
        );
    }

    #[test]
    fn builtin_dataset_is_not_copied() {
        let (analyzer, _dir) = make_analyzer(false);
        assert!(Arc::ptr_eq(analyzer.celebrities(), &CelebrityDb::builtin()));

        let (other, _dir) = make_analyzer(false);
        assert!(Arc::ptr_eq(analyzer.celebrities(), other.celebrities()));
    }

    #[test]
    fn invalid_rectangle_is_rejected_before_math() {
        let (analyzer, _dir) = make_analyzer(false);
        let result = analyzer.analyze_face(&detected(200.0, 0.0));
        assert!(matches!(
            result,
            Err(Error::Detection(detect::DetectionError::InvalidGeometry(_)))
        ));
    }

    #[test]
    fn save_report_respects_config() {
        let (analyzer, _dir) = make_analyzer(false);
        let report = analyzer.analyze_face(&detected(200.0, 230.0)).unwrap();
        assert!(!analyzer.save_report(&report).unwrap());
        assert!(analyzer.store().list().unwrap().is_empty());

        let (analyzer, _dir) = make_analyzer(true);
        let report = analyzer.analyze_face(&detected(200.0, 230.0)).unwrap();
        assert!(analyzer.save_report(&report).unwrap());
        assert_eq!(analyzer.store().load(&report.id).unwrap(), report);
    }

    #[test]
    fn custom_dataset_is_used() {
        let (landmarks, rect) = symmetric_face();
        let ratios = extract_ratios(&landmarks, &rect);
        let twin = Celebrity {
            name: "Twin".to_string(),
            name_ko: "쌍둥이".to_string(),
            description: "identical proportions".to_string(),
            gender: Gender::Female,
            region: Region::Europe,
            ratios,
        };
        let db = Arc::new(CelebrityDb::new(vec![twin]).unwrap());
        let analyzer = FaceAnalyzer::with_dataset(config::Config::default(), db);

        let report = analyzer.analyze_face(&detected(200.0, 230.0)).unwrap();
        let top = &report.celebrity_matches.top_matches;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Twin");
        assert_eq!(top[0].similarity, 100);
        assert!(report.celebrity_matches.surprise_match.is_none());
    }
}
