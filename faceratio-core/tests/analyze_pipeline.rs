use faceratio_core::config::Config;
use faceratio_core::detect::{load_detections, parse_detections, select_main_face};
use faceratio_core::{
    extract_ratios, match_celebrities, CelebrityDb, FaceAnalyzer, FaceShape, Region,
};
use std::collections::HashSet;

const TWO_FACES: &str = include_str!("fixtures/two_faces.json");

fn analyzer(dir: &tempfile::TempDir) -> FaceAnalyzer {
    let mut config = Config::default();
    config.storage.results_path = dir.path().join("results");
    FaceAnalyzer::new(config).unwrap()
}

#[test]
fn main_face_is_the_largest() {
    let faces = parse_detections(TWO_FACES).unwrap();
    assert_eq!(faces.len(), 2);

    let main = select_main_face(&faces).unwrap();
    assert_eq!(main.face_id.as_deref(), Some("main-face"));
}

#[test]
fn detections_load_from_file() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("two_faces.json");
    let faces = load_detections(&path).unwrap();
    assert_eq!(faces, parse_detections(TWO_FACES).unwrap());
    assert!(faces.iter().all(|f| f.face_attributes.is_some()));
}

#[test]
fn full_analysis_from_detector_json() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = analyzer(&dir);

    let report = analyzer.analyze_detections(TWO_FACES, 3).unwrap();

    assert_eq!(report.score, 80);
    assert_eq!(report.score_breakdown.symmetry, 100);
    assert_eq!(report.face_type.shape, FaceShape::Square);

    let matches = &report.celebrity_matches;
    assert_eq!(matches.top_matches.len(), 3);
    for pair in matches.top_matches.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    if let Some(surprise) = &matches.surprise_match {
        let regions: HashSet<Region> = matches.top_matches.iter().map(|m| m.region).collect();
        assert!(!regions.contains(&surprise.region));
    }
}

#[test]
fn report_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = analyzer(&dir);

    let report = analyzer.analyze_detections(TWO_FACES, 5).unwrap();
    assert!(analyzer.save_report(&report).unwrap());

    let ids = analyzer.store().list().unwrap();
    assert_eq!(ids, vec![report.id.clone()]);
    assert_eq!(analyzer.store().load(&report.id).unwrap(), report);
}

#[test]
fn report_json_uses_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    let report = analyzer(&dir).analyze_detections(TWO_FACES, 3).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["scoreBreakdown"]["noseToLipRatio"].is_u64());
    assert!(json["celebrityMatches"]["topMatches"].is_array());
    assert_eq!(json["faceType"]["shape"], "square");
    assert_eq!(json["faceType"]["nameKo"], "각진형");
    assert!(json["createdAt"].is_string());
}

#[test]
fn each_builtin_celebrity_finds_itself() {
    let db = CelebrityDb::builtin();
    for celeb in db.entries() {
        let result = match_celebrities(&celeb.ratios, db.entries(), 3);
        assert_eq!(result.top_matches[0].similarity, 100, "{}", celeb.name);
    }
}

#[test]
fn empty_detection_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = analyzer(&dir).analyze_detections("[]", 3);
    assert!(result.is_err());
}

#[test]
fn ratios_match_between_scales() {
    let faces = parse_detections(TWO_FACES).unwrap();
    let a = extract_ratios(&faces[0].face_landmarks, &faces[0].face_rectangle);
    let b = extract_ratios(&faces[1].face_landmarks, &faces[1].face_rectangle);
    for (x, y) in a.to_vector().iter().zip(b.to_vector().iter()) {
        assert!((x - y).abs() < 1e-9);
    }
}
