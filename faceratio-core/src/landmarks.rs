use serde::{Deserialize, Serialize};

/// A 2D point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Face bounding box as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceRectangle {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check the rectangle can be used to normalize distances.
    ///
    /// Every ratio divides by `width` or `height`, so both must be finite and
    /// strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [self.top, self.left, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err("face rectangle has non-finite coordinates".to_string());
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!(
                "face rectangle must have positive dimensions, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

/// The 27 named landmarks returned by the detector for a single face.
///
/// Every field is required; a detector payload missing any point fails to
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLandmarks {
    pub pupil_left: Point,
    pub pupil_right: Point,
    pub nose_tip: Point,
    pub mouth_left: Point,
    pub mouth_right: Point,
    pub eyebrow_left_outer: Point,
    pub eyebrow_left_inner: Point,
    pub eye_left_outer: Point,
    pub eye_left_top: Point,
    pub eye_left_bottom: Point,
    pub eye_left_inner: Point,
    pub eyebrow_right_inner: Point,
    pub eyebrow_right_outer: Point,
    pub eye_right_inner: Point,
    pub eye_right_top: Point,
    pub eye_right_bottom: Point,
    pub eye_right_outer: Point,
    pub nose_root_left: Point,
    pub nose_root_right: Point,
    pub nose_left_alar_top: Point,
    pub nose_right_alar_top: Point,
    pub nose_left_alar_out_tip: Point,
    pub nose_right_alar_out_tip: Point,
    pub upper_lip_top: Point,
    pub upper_lip_bottom: Point,
    pub under_lip_top: Point,
    pub under_lip_bottom: Point,
}

impl FaceLandmarks {
    pub const COUNT: usize = 27;

    /// All landmarks in declaration order
    pub fn points(&self) -> [Point; Self::COUNT] {
        [
            self.pupil_left,
            self.pupil_right,
            self.nose_tip,
            self.mouth_left,
            self.mouth_right,
            self.eyebrow_left_outer,
            self.eyebrow_left_inner,
            self.eye_left_outer,
            self.eye_left_top,
            self.eye_left_bottom,
            self.eye_left_inner,
            self.eyebrow_right_inner,
            self.eyebrow_right_outer,
            self.eye_right_inner,
            self.eye_right_top,
            self.eye_right_bottom,
            self.eye_right_outer,
            self.nose_root_left,
            self.nose_root_right,
            self.nose_left_alar_top,
            self.nose_right_alar_top,
            self.nose_left_alar_out_tip,
            self.nose_right_alar_out_tip,
            self.upper_lip_top,
            self.upper_lip_bottom,
            self.under_lip_top,
            self.under_lip_bottom,
        ]
    }

    /// Left/right landmark pairs mirrored around the nose tip.
    ///
    /// Order: eye outer, eye inner, eyebrow outer, eyebrow inner, mouth
    /// corners, nose alar out tips.
    pub fn bilateral_pairs(&self) -> [(Point, Point); 6] {
        [
            (self.eye_left_outer, self.eye_right_outer),
            (self.eye_left_inner, self.eye_right_inner),
            (self.eyebrow_left_outer, self.eyebrow_right_outer),
            (self.eyebrow_left_inner, self.eyebrow_right_inner),
            (self.mouth_left, self.mouth_right),
            (self.nose_left_alar_out_tip, self.nose_right_alar_out_tip),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.points().iter().all(Point::is_finite) {
            Ok(())
        } else {
            Err("face landmarks contain non-finite coordinates".to_string())
        }
    }
}
