use crate::celebrity::{Celebrity, Gender, Region};
use crate::ratios::{FaceRatios, RatioVector, RATIO_DIM};
use ndarray::{arr1, Array1};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_TOP_N: usize = 3;

/// Typical spread of each ratio dimension, used to normalize differences so
/// that height/width (spans ~0.3) does not drown out eyebrow-eye (~0.03).
pub const DIMENSION_RANGES: [f64; RATIO_DIM] = [0.10, 0.04, 0.08, 0.10, 0.30, 0.03];

/// Normalized distance at which similarity reaches 0
pub const MAX_DISTANCE: f64 = 3.0;

/// Phrases per dimension, same order as [`DIMENSION_RANGES`]
const MATCH_REASONS: [&[&str]; RATIO_DIM] = [
    &["눈매가 특히 닮았어요!", "눈 간격 비율이 거의 같아요!"],
    &["코에서 입까지 라인이 닮았어요!", "코-입 비율이 거의 같아요!"],
    &["턱선 비율이 매우 비슷해요!", "입-턱 라인이 닮았어요!"],
    &["입매가 특히 비슷해요!", "입 모양 비율이 닮았어요!"],
    &["얼굴 전체 비율이 거의 같아요!", "얼굴형이 닮았어요!"],
    &["눈썹-눈 라인이 비슷해요!", "눈썹 간격이 닮았어요!"],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityMatch {
    pub name: String,
    pub name_ko: String,
    pub description: String,
    pub region: Region,
    pub gender: Gender,
    /// 0-100
    pub similarity: u8,
    pub match_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub top_matches: Vec<CelebrityMatch>,
    pub surprise_match: Option<CelebrityMatch>,
}

fn normalized_diff(a: &RatioVector, b: &RatioVector) -> Array1<f64> {
    (a - b) / &arr1(&DIMENSION_RANGES)
}

/// Similarity (0-100) from the range-normalized Euclidean distance.
///
/// The square-root curve keeps near matches high and falls off gently.
pub fn euclidean_similarity(a: &RatioVector, b: &RatioVector) -> u8 {
    let diff = normalized_diff(a, b);
    let distance = diff.dot(&diff).sqrt();
    let raw = (1.0 - distance / MAX_DISTANCE).max(0.0);
    let similarity = (100.0 * raw.sqrt()).round();
    similarity.clamp(0.0, 100.0) as u8
}

/// Dimension whose normalized difference is smallest; lowest index on ties
pub fn closest_dimension(user: &RatioVector, celeb: &RatioVector) -> usize {
    let diff = normalized_diff(user, celeb);
    let mut best_dim = 0;
    let mut min_diff = f64::INFINITY;
    for (dim, d) in diff.iter().enumerate() {
        let d = d.abs();
        if d < min_diff {
            min_diff = d;
            best_dim = dim;
        }
    }
    best_dim
}

/// Human-readable reason for a match.
///
/// The phrase index is derived from the celebrity's first ratio so the same
/// celebrity always gets the same phrase.
pub fn match_reason(user: &RatioVector, celeb: &RatioVector) -> &'static str {
    let reasons = MATCH_REASONS[closest_dimension(user, celeb)];
    let hash = (celeb[0] * 1000.0).round().abs() as usize;
    reasons[hash % reasons.len()]
}

fn to_match(celeb: &Celebrity, similarity: u8, reason: &str) -> CelebrityMatch {
    CelebrityMatch {
        name: celeb.name.clone(),
        name_ko: celeb.name_ko.clone(),
        description: celeb.description.clone(),
        region: celeb.region,
        gender: celeb.gender,
        similarity,
        match_reason: reason.to_string(),
        match_count: None,
    }
}

/// Rank every celebrity against the user's ratios.
///
/// Returns the `top_n` most similar entries plus the best entry from a region
/// the top matches do not cover.
pub fn match_celebrities(
    user_ratios: &FaceRatios,
    celebrities: &[Celebrity],
    top_n: usize,
) -> MatchResult {
    let user = user_ratios.to_vector();

    let mut scored: Vec<(&Celebrity, u8, &'static str)> = celebrities
        .iter()
        .map(|celeb| {
            let vector = celeb.ratios.to_vector();
            (
                celeb,
                euclidean_similarity(&user, &vector),
                match_reason(&user, &vector),
            )
        })
        .collect();

    // Stable, so dataset order breaks ties
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let top_matches: Vec<CelebrityMatch> = scored
        .iter()
        .take(top_n)
        .map(|(celeb, similarity, reason)| to_match(celeb, *similarity, reason))
        .collect();

    let top_regions: HashSet<Region> = top_matches.iter().map(|m| m.region).collect();
    let top_names: HashSet<&str> = top_matches.iter().map(|m| m.name.as_str()).collect();

    let surprise_match = scored
        .iter()
        .find(|(celeb, _, _)| {
            !top_regions.contains(&celeb.region) && !top_names.contains(celeb.name.as_str())
        })
        .map(|(celeb, similarity, reason)| to_match(celeb, *similarity, reason));

    log::debug!(
        "Matched {} celebrities: top={:?} surprise={:?}",
        celebrities.len(),
        top_matches
            .iter()
            .map(|m| (m.name.as_str(), m.similarity))
            .collect::<Vec<_>>(),
        surprise_match.as_ref().map(|m| (m.name.as_str(), m.similarity))
    );

    MatchResult {
        top_matches,
        surprise_match,
    }
}
