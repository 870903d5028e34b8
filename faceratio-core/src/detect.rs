//! Input side of the pipeline: the face detector's JSON response.

use crate::landmarks::{FaceLandmarks, FaceRectangle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("No faces detected")]
    NoFaces,
    #[error("Invalid face geometry: {0}")]
    InvalidGeometry(String),
    #[error("Failed to parse detection response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read detection response: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAttributes {
    pub head_pose: HeadPose,
}

/// One face as reported by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_id: Option<String>,
    pub face_rectangle: FaceRectangle,
    pub face_landmarks: FaceLandmarks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_attributes: Option<FaceAttributes>,
}

impl DetectedFace {
    /// Reject faces the ratio math cannot handle
    pub fn validate(&self) -> Result<(), DetectionError> {
        self.face_rectangle
            .validate()
            .map_err(DetectionError::InvalidGeometry)?;
        self.face_landmarks
            .validate()
            .map_err(DetectionError::InvalidGeometry)?;
        Ok(())
    }
}

/// The detector returns a list, but a bare face object is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionPayload {
    Many(Vec<DetectedFace>),
    One(Box<DetectedFace>),
}

pub fn parse_detections(json: &str) -> Result<Vec<DetectedFace>, DetectionError> {
    let faces = match serde_json::from_str::<DetectionPayload>(json) {
        Ok(DetectionPayload::Many(faces)) => faces,
        Ok(DetectionPayload::One(face)) => vec![*face],
        // Untagged errors are opaque, so re-parse as a list for a useful message
        Err(_) => serde_json::from_str::<Vec<DetectedFace>>(json)?,
    };
    log::debug!("Detector reported {} face(s)", faces.len());
    Ok(faces)
}

pub fn load_detections<P: AsRef<Path>>(path: P) -> Result<Vec<DetectedFace>, DetectionError> {
    let contents = fs::read_to_string(path)?;
    parse_detections(&contents)
}

/// Pick the face with the largest bounding box; the first one wins on ties.
pub fn select_main_face(faces: &[DetectedFace]) -> Result<&DetectedFace, DetectionError> {
    let mut main = faces.first().ok_or(DetectionError::NoFaces)?;
    for face in &faces[1..] {
        if face.face_rectangle.area() > main.face_rectangle.area() {
            main = face;
        }
    }

    if faces.len() > 1 {
        log::debug!(
            "Selected face {}x{} at ({}, {}) out of {}",
            main.face_rectangle.width,
            main.face_rectangle.height,
            main.face_rectangle.left,
            main.face_rectangle.top,
            faces.len()
        );
    }

    main.validate()?;
    Ok(main)
}
