//! Scale-invariant facial proportions.
//!
//! Raw pixel distances between landmarks are divided by the face rectangle's
//! width or height so that the same face photographed at different sizes
//! yields the same vector. The vector is shared by scoring and celebrity
//! matching.

use crate::landmarks::{FaceLandmarks, FaceRectangle};
use ndarray::{arr1, Array1};
use serde::{Deserialize, Serialize};

/// Number of dimensions in a [`RatioVector`]
pub const RATIO_DIM: usize = 6;

/// Ratios in fixed dimension order:
/// `[eye spacing, nose-lip, lip-chin, mouth width, height/width, eyebrow-eye]`
pub type RatioVector = Array1<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceRatios {
    /// Inter-pupil distance / face width
    pub eye_spacing_ratio: f64,
    /// Nose tip to upper lip / face height
    pub nose_lip_ratio: f64,
    /// Lower lip to bottom of the face box / face height
    pub lip_chin_ratio: f64,
    /// Mouth corner distance / face width
    pub mouth_width_ratio: f64,
    /// Face height / face width
    pub face_height_width_ratio: f64,
    /// Left eyebrow centre to left eye centre / face height
    pub eyebrow_eye_ratio: f64,
}

impl FaceRatios {
    pub fn to_vector(&self) -> RatioVector {
        arr1(&[
            self.eye_spacing_ratio,
            self.nose_lip_ratio,
            self.lip_chin_ratio,
            self.mouth_width_ratio,
            self.face_height_width_ratio,
            self.eyebrow_eye_ratio,
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.to_vector().iter().all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Derive the ratio vector for one face.
///
/// The caller must have validated `rect` (positive width and height).
pub fn extract_ratios(landmarks: &FaceLandmarks, rect: &FaceRectangle) -> FaceRatios {
    let face_width = rect.width;
    let face_height = rect.height;

    let eye_distance = landmarks.pupil_left.distance(&landmarks.pupil_right);
    let nose_to_lip = landmarks.nose_tip.distance(&landmarks.upper_lip_top);
    let lip_to_chin = face_height - (landmarks.under_lip_bottom.y - rect.top);
    let mouth_width = landmarks.mouth_left.distance(&landmarks.mouth_right);

    let eyebrow_mid = landmarks
        .eyebrow_left_outer
        .midpoint(&landmarks.eyebrow_left_inner);
    let eye_mid = landmarks.eye_left_outer.midpoint(&landmarks.eye_left_inner);
    let eyebrow_to_eye = eyebrow_mid.distance(&eye_mid);

    FaceRatios {
        eye_spacing_ratio: eye_distance / face_width,
        nose_lip_ratio: nose_to_lip / face_height,
        lip_chin_ratio: lip_to_chin / face_height,
        mouth_width_ratio: mouth_width / face_width,
        face_height_width_ratio: face_height / face_width,
        eyebrow_eye_ratio: eyebrow_to_eye / face_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures::symmetric_face;

    #[test]
    fn ratios_of_synthetic_face() {
        let (landmarks, rect) = symmetric_face();
        let ratios = extract_ratios(&landmarks, &rect);

        assert!((ratios.eye_spacing_ratio - 0.44).abs() < 1e-9);
        assert!((ratios.nose_lip_ratio - 20.0 / 230.0).abs() < 1e-9);
        assert!((ratios.lip_chin_ratio - 50.0 / 230.0).abs() < 1e-9);
        assert!((ratios.mouth_width_ratio - 0.45).abs() < 1e-9);
        assert!((ratios.face_height_width_ratio - 1.15).abs() < 1e-9);

        let expected_brow = (1.5f64 * 1.5 + 20.0 * 20.0).sqrt() / 230.0;
        assert!((ratios.eyebrow_eye_ratio - expected_brow).abs() < 1e-9);
    }

    #[test]
    fn ratios_are_scale_invariant() {
        let (landmarks, rect) = symmetric_face();
        let base = extract_ratios(&landmarks, &rect);

        let scale = |p: crate::landmarks::Point| crate::landmarks::Point::new(p.x * 2.5, p.y * 2.5);
        let mut json = serde_json::to_value(&landmarks).unwrap();
        for (_, value) in json.as_object_mut().unwrap() {
            let p: crate::landmarks::Point = serde_json::from_value(value.clone()).unwrap();
            *value = serde_json::to_value(scale(p)).unwrap();
        }
        let scaled: FaceLandmarks = serde_json::from_value(json).unwrap();
        let scaled_rect = FaceRectangle::new(0.0, 0.0, 500.0, 575.0);

        let ratios = extract_ratios(&scaled, &scaled_rect);
        for (a, b) in base.to_vector().iter().zip(ratios.to_vector().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn lip_chin_uses_rectangle_top() {
        let (landmarks, rect) = symmetric_face();
        let shifted = FaceRectangle::new(-30.0, rect.left, rect.width, rect.height);
        let ratios = extract_ratios(&landmarks, &shifted);

        // underLipBottom is now 210px below the top of a 230px box
        assert!((ratios.lip_chin_ratio - 20.0 / 230.0).abs() < 1e-9);
    }

    #[test]
    fn vector_order_is_fixed() {
        let ratios = FaceRatios {
            eye_spacing_ratio: 1.0,
            nose_lip_ratio: 2.0,
            lip_chin_ratio: 3.0,
            mouth_width_ratio: 4.0,
            face_height_width_ratio: 5.0,
            eyebrow_eye_ratio: 6.0,
        };
        assert_eq!(ratios.to_vector(), arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(ratios.to_vector().len(), RATIO_DIM);
    }
}
