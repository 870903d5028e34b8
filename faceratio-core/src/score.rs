//! Golden-ratio attractiveness score.
//!
//! Five proportions are compared against fixed ideal values with a tent
//! function, bilateral symmetry is measured around the nose tip, and the six
//! sub-scores are folded into a 0-100 total with fixed weights.

use crate::landmarks::{FaceLandmarks, FaceRectangle};
use crate::ratios::extract_ratios;
use serde::{Deserialize, Serialize};

pub const IDEAL_EYE_SPACING: f64 = 0.44;
pub const IDEAL_NOSE_TO_LIP: f64 = 0.16;
pub const IDEAL_LIP_TO_CHIN: f64 = 0.18;
pub const IDEAL_FACE_THIRDS: f64 = 1.15;
pub const IDEAL_MOUTH_WIDTH: f64 = 0.45;

/// Sub-score weights. They sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub eye_spacing: f64,
    pub nose_to_lip: f64,
    pub lip_to_chin: f64,
    pub symmetry: f64,
    pub face_thirds: f64,
    pub mouth_width: f64,
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    eye_spacing: 0.20,
    nose_to_lip: 0.15,
    lip_to_chin: 0.15,
    symmetry: 0.25,
    face_thirds: 0.15,
    mouth_width: 0.10,
};

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.eye_spacing
            + self.nose_to_lip
            + self.lip_to_chin
            + self.symmetry
            + self.face_thirds
            + self.mouth_width
    }
}

/// Score tiers, highest threshold first
const COMMENT_TIERS: [(u8, &str); 5] = [
    (90, "완벽에 가까운 황금비율! 셀럽급 얼굴입니다."),
    (80, "뛰어난 얼굴 균형미를 가지고 있어요!"),
    (70, "매력적인 비율이에요. 자신감을 가지세요!"),
    (60, "균형 잡힌 인상이에요. 좋은 매력 포인트가 있어요."),
    (50, "개성 있는 매력이 돋보여요!"),
];
const DEFAULT_COMMENT: &str = "독특한 개성이 매력인 얼굴이에요!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total: u8,
    pub eye_spacing: u8,
    pub nose_to_lip_ratio: u8,
    pub lip_to_chin_ratio: u8,
    pub symmetry: u8,
    pub face_thirds: u8,
    pub mouth_width: u8,
    pub comment: String,
}

/// Tent function around `ideal`: 100 on an exact match, 0 once the deviation
/// reaches half of `ideal`.
pub fn ratio_score(actual: f64, ideal: f64) -> f64 {
    let diff = (actual - ideal).abs() / ideal;
    clamp_score(100.0 * (1.0 - diff * 2.0))
}

/// Left/right symmetry around the nose tip, 0-100.
pub fn symmetry_score(landmarks: &FaceLandmarks) -> f64 {
    let center_x = landmarks.nose_tip.x;
    let pairs = landmarks.bilateral_pairs();

    let total_diff: f64 = pairs
        .iter()
        .map(|(left, right)| {
            let left_dist = (left.x - center_x).abs();
            let right_dist = (right.x - center_x).abs();
            let avg = (left_dist + right_dist) / 2.0;
            if avg > 0.0 {
                (left_dist - right_dist).abs() / avg
            } else {
                0.0
            }
        })
        .sum();

    let avg_diff = total_diff / pairs.len() as f64;
    clamp_score(100.0 * (1.0 - avg_diff * 1.5))
}

/// Comment for a total score
pub fn comment_for(total: u8) -> &'static str {
    COMMENT_TIERS
        .iter()
        .find(|(threshold, _)| total >= *threshold)
        .map(|(_, comment)| *comment)
        .unwrap_or(DEFAULT_COMMENT)
}

pub fn calculate_score(landmarks: &FaceLandmarks, rect: &FaceRectangle) -> ScoreBreakdown {
    let ratios = extract_ratios(landmarks, rect);

    let eye_spacing = ratio_score(ratios.eye_spacing_ratio, IDEAL_EYE_SPACING);
    let nose_to_lip = ratio_score(ratios.nose_lip_ratio, IDEAL_NOSE_TO_LIP);
    let lip_to_chin = ratio_score(ratios.lip_chin_ratio, IDEAL_LIP_TO_CHIN);
    let symmetry = symmetry_score(landmarks);
    let face_thirds = ratio_score(ratios.face_height_width_ratio, IDEAL_FACE_THIRDS);
    let mouth_width = ratio_score(ratios.mouth_width_ratio, IDEAL_MOUTH_WIDTH);

    let weighted = eye_spacing * WEIGHTS.eye_spacing
        + nose_to_lip * WEIGHTS.nose_to_lip
        + lip_to_chin * WEIGHTS.lip_to_chin
        + symmetry * WEIGHTS.symmetry
        + face_thirds * WEIGHTS.face_thirds
        + mouth_width * WEIGHTS.mouth_width;
    let total = to_score(weighted);

    log::debug!(
        "Score: total={} eye={:.1} noseLip={:.1} lipChin={:.1} sym={:.1} thirds={:.1} mouth={:.1}",
        total,
        eye_spacing,
        nose_to_lip,
        lip_to_chin,
        symmetry,
        face_thirds,
        mouth_width
    );

    ScoreBreakdown {
        total,
        eye_spacing: to_score(eye_spacing),
        nose_to_lip_ratio: to_score(nose_to_lip),
        lip_to_chin_ratio: to_score(lip_to_chin),
        symmetry: to_score(symmetry),
        face_thirds: to_score(face_thirds),
        mouth_width: to_score(mouth_width),
        comment: comment_for(total).to_string(),
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Round and clamp into an integer score
pub(crate) fn to_score(value: f64) -> u8 {
    clamp_score(value.round()) as u8
}
