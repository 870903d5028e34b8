use crate::ratios::FaceRatios;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CelebrityError {
    #[error("Failed to read celebrity dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse celebrity dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid celebrity dataset: {0}")]
    Validation(String),
}

/// Compiled-in reference dataset
const BUILTIN_DATASET: &str = include_str!("../data/celebrities.json");

lazy_static! {
    static ref BUILTIN: Arc<CelebrityDb> = Arc::new(
        CelebrityDb::from_json_str(BUILTIN_DATASET)
            .unwrap_or_else(|e| panic!("built-in celebrity dataset is invalid: {}", e))
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Korea,
    Japan,
    China,
    SoutheastAsia,
    NorthAmerica,
    Europe,
    LatinAmerica,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Korea,
        Region::Japan,
        Region::China,
        Region::SoutheastAsia,
        Region::NorthAmerica,
        Region::Europe,
        Region::LatinAmerica,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Korea => "korea",
            Self::Japan => "japan",
            Self::China => "china",
            Self::SoutheastAsia => "southeast_asia",
            Self::NorthAmerica => "north_america",
            Self::Europe => "europe",
            Self::LatinAmerica => "latin_america",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Region::ALL.iter().map(Region::as_str).collect();
                format!("unknown region '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// One entry of the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Celebrity {
    pub name: String,
    /// Localized display name
    pub name_ko: String,
    pub description: String,
    pub gender: Gender,
    pub region: Region,
    pub ratios: FaceRatios,
}

/// Read-only celebrity table, loaded once and shared across requests.
#[derive(Debug, Clone, Default)]
pub struct CelebrityDb {
    entries: Vec<Celebrity>,
}

impl CelebrityDb {
    /// Build a dataset from entries, rejecting duplicates and bad ratios
    pub fn new(entries: Vec<Celebrity>) -> Result<Self, CelebrityError> {
        let db = Self { entries };
        db.validate()?;
        Ok(db)
    }

    /// The dataset compiled into the binary, parsed once and shared
    pub fn builtin() -> Arc<CelebrityDb> {
        Arc::clone(&BUILTIN)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CelebrityError> {
        let entries: Vec<Celebrity> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CelebrityError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let db = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded {} celebrities from {}",
            db.len(),
            path.display()
        );
        Ok(db)
    }

    pub fn validate(&self) -> Result<(), CelebrityError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for celeb in &self.entries {
            if !seen.insert(celeb.name.as_str()) {
                return Err(CelebrityError::Validation(format!(
                    "duplicate celebrity name: {}",
                    celeb.name
                )));
            }
            if !celeb.ratios.is_valid() {
                return Err(CelebrityError::Validation(format!(
                    "ratios for {} must be finite and positive",
                    celeb.name
                )));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[Celebrity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_region(&self, region: Region) -> impl Iterator<Item = &Celebrity> {
        self.entries.iter().filter(move |c| c.region == region)
    }

    pub fn find(&self, name: &str) -> Option<&Celebrity> {
        self.entries.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratios(eye: f64) -> FaceRatios {
        FaceRatios {
            eye_spacing_ratio: eye,
            nose_lip_ratio: 0.07,
            lip_chin_ratio: 0.18,
            mouth_width_ratio: 0.47,
            face_height_width_ratio: 1.35,
            eyebrow_eye_ratio: 0.06,
        }
    }

    fn celeb(name: &str, region: Region) -> Celebrity {
        Celebrity {
            name: name.to_string(),
            name_ko: name.to_string(),
            description: String::new(),
            gender: Gender::Female,
            region,
            ratios: ratios(0.45),
        }
    }

    #[test]
    fn builtin_dataset_covers_every_region() {
        let db = CelebrityDb::builtin();
        assert!(!db.is_empty());
        for region in Region::ALL {
            assert!(db.by_region(region).count() >= 10, "too few entries for {}", region);
            for gender in [Gender::Male, Gender::Female] {
                let count = db.by_region(region).filter(|c| c.gender == gender).count();
                assert!(count >= 5, "{} has {} {:?} entries", region, count, gender);
            }
        }
    }

    #[test]
    fn builtin_dataset_is_shared() {
        let a = CelebrityDb::builtin();
        let b = CelebrityDb::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = CelebrityDb::new(vec![
            celeb("IU", Region::Korea),
            celeb("IU", Region::Japan),
        ]);
        assert!(matches!(result, Err(CelebrityError::Validation(_))));
    }

    #[test]
    fn non_positive_ratios_are_rejected() {
        let mut bad = celeb("Nobody", Region::Europe);
        bad.ratios = ratios(0.0);
        assert!(CelebrityDb::new(vec![bad]).is_err());
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"[{
            "name": "Test Person",
            "nameKo": "테스트",
            "description": "desc",
            "gender": "male",
            "region": "southeast_asia",
            "ratios": {
                "eyeSpacingRatio": 0.44, "noseLipRatio": 0.07, "lipChinRatio": 0.18,
                "mouthWidthRatio": 0.47, "faceHeightWidthRatio": 1.35, "eyebrowEyeRatio": 0.06
            }
        }]"#;

        let db = CelebrityDb::from_json_str(json).unwrap();
        assert_eq!(db.len(), 1);
        let entry = db.find("Test Person").unwrap();
        assert_eq!(entry.region, Region::SoutheastAsia);
        assert_eq!(entry.gender, Gender::Male);
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let result = CelebrityDb::load_from_path("/nonexistent/celebrities.json");
        assert!(matches!(result, Err(CelebrityError::Io(_))));
    }

    #[test]
    fn region_round_trips_through_str() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
        assert!("atlantis".parse::<Region>().is_err());
    }
}
