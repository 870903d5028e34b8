use crate::landmarks::{FaceLandmarks, FaceRectangle};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OBLONG_MIN_RATIO: f64 = 1.5;
pub const WIDE_MAX_RATIO: f64 = 1.25;
pub const ROUND_MAX_CHEEK_TO_JAW: f64 = 1.3;
pub const HEART_MIN_FOREHEAD_TO_JAW: f64 = 1.4;
pub const SQUARE_MIN_CHEEK_TO_JAW: f64 = 1.35;
pub const SQUARE_MAX_FOREHEAD_TO_JAW: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceShape {
    Oval,
    Round,
    Heart,
    Square,
    Oblong,
}

impl FaceShape {
    pub const ALL: [FaceShape; 5] = [
        FaceShape::Oval,
        FaceShape::Round,
        FaceShape::Heart,
        FaceShape::Square,
        FaceShape::Oblong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oval => "oval",
            Self::Round => "round",
            Self::Heart => "heart",
            Self::Square => "square",
            Self::Oblong => "oblong",
        }
    }

    pub fn name_ko(&self) -> &'static str {
        match self {
            Self::Oval => "계란형",
            Self::Round => "둥근형",
            Self::Heart => "하트형",
            Self::Square => "각진형",
            Self::Oblong => "긴형",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Oval => "이상적인 균형 잡힌 얼굴형으로, 어떤 헤어스타일도 잘 어울려요.",
            Self::Round => "부드럽고 친근한 인상을 주며, 동안의 상징이에요.",
            Self::Heart => "이마가 넓고 턱이 갸름해서 사랑스러운 인상을 줘요.",
            Self::Square => "강인하고 세련된 인상을 주며, 카리스마가 넘쳐요.",
            Self::Oblong => "세로로 긴 얼굴형으로, 성숙하고 지적인 분위기를 줘요.",
        }
    }
}

impl fmt::Display for FaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceTypeResult {
    pub shape: FaceShape,
    pub name_ko: String,
    pub description: String,
}

impl From<FaceShape> for FaceTypeResult {
    fn from(shape: FaceShape) -> Self {
        Self {
            shape,
            name_ko: shape.name_ko().to_string(),
            description: shape.description().to_string(),
        }
    }
}

/// Width proportions the decision tree runs on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceProportions {
    /// Face height / face width
    pub ratio: f64,
    /// Outer eye corners distance / mouth width
    pub cheek_to_jaw: f64,
    /// Outer eyebrow distance / mouth width
    pub forehead_to_jaw: f64,
}

impl FaceProportions {
    pub fn measure(landmarks: &FaceLandmarks, rect: &FaceRectangle) -> Self {
        let cheek_width = landmarks.eye_left_outer.distance(&landmarks.eye_right_outer);
        let forehead_width = landmarks
            .eyebrow_left_outer
            .distance(&landmarks.eyebrow_right_outer);
        let jaw_width = landmarks.mouth_left.distance(&landmarks.mouth_right);

        Self {
            ratio: rect.height / rect.width,
            cheek_to_jaw: cheek_width / jaw_width,
            forehead_to_jaw: forehead_width / jaw_width,
        }
    }

    /// Ordered decision tree. Later branches can also hold for earlier
    /// inputs, so the first matching branch wins.
    pub fn classify(&self) -> FaceShape {
        if self.ratio > OBLONG_MIN_RATIO {
            FaceShape::Oblong
        } else if self.ratio < WIDE_MAX_RATIO {
            if self.cheek_to_jaw < ROUND_MAX_CHEEK_TO_JAW {
                FaceShape::Round
            } else {
                FaceShape::Square
            }
        } else if self.forehead_to_jaw > HEART_MIN_FOREHEAD_TO_JAW {
            FaceShape::Heart
        } else if self.cheek_to_jaw > SQUARE_MIN_CHEEK_TO_JAW
            && self.forehead_to_jaw < SQUARE_MAX_FOREHEAD_TO_JAW
        {
            FaceShape::Square
        } else {
            FaceShape::Oval
        }
    }
}

/// Classify from the three derived proportions alone
pub fn classify_proportions(ratio: f64, cheek_to_jaw: f64, forehead_to_jaw: f64) -> FaceShape {
    FaceProportions {
        ratio,
        cheek_to_jaw,
        forehead_to_jaw,
    }
    .classify()
}

pub fn classify_face_type(landmarks: &FaceLandmarks, rect: &FaceRectangle) -> FaceTypeResult {
    let proportions = FaceProportions::measure(landmarks, rect);
    let shape = proportions.classify();
    log::debug!(
        "Face shape {} (ratio={:.3}, cheekToJaw={:.3}, foreheadToJaw={:.3})",
        shape,
        proportions.ratio,
        proportions.cheek_to_jaw,
        proportions.forehead_to_jaw
    );
    shape.into()
}
