mod common;

use assert_cmd::Command;
use common::{four_fingers, open_hand, skin_interval};
use handmark::{HandmarkConfig, PipelineParams, SegmentParams};
use predicates::prelude::*;
use std::fs;

fn handmark() -> Command {
    Command::cargo_bin("handmark").expect("handmark binary is built")
}

#[test]
fn init_config_writes_a_loadable_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("handmark.json");

    handmark()
        .args(["init-config", path.to_str().unwrap(), "--input-dir", "captures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote config"));

    let cfg = HandmarkConfig::load_json(&path).unwrap();
    assert_eq!(cfg.input_dir, "captures");
    assert_eq!(cfg.pipeline, PipelineParams::default());
}

#[test]
fn run_replays_frames_and_writes_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("frames");
    fs::create_dir(&frames).unwrap();
    four_fingers().save(frames.join("000.png")).unwrap();
    open_hand().save(frames.join("001.png")).unwrap();
    fs::write(frames.join("002.png"), b"truncated").unwrap();
    open_hand().save(frames.join("003.png")).unwrap();

    let report_path = dir.path().join("report.json");
    let annotated = dir.path().join("annotated");
    let cfg = HandmarkConfig {
        input_dir: frames.to_string_lossy().into_owned(),
        output_path: Some(report_path.to_string_lossy().into_owned()),
        annotated_dir: Some(annotated.to_string_lossy().into_owned()),
        interval: Some(skin_interval()),
        pipeline: PipelineParams {
            segment: SegmentParams {
                morph_radius: 0,
                ..SegmentParams::default()
            },
            ..PipelineParams::default()
        },
        texture_count: 2,
        model_count: 2,
        ..HandmarkConfig::default()
    };
    let cfg_path = dir.path().join("cfg.json");
    cfg.write_json(&cfg_path).unwrap();

    handmark()
        .args(["--log-level", "warn", "run", "--config"])
        .arg(&cfg_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("processed 3 frames, 1 advance events"))
        .stdout(predicate::str::contains("wrote report JSON"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["frames_processed"], 3);
    assert_eq!(report["frames_skipped"], 1);
    assert_eq!(report["advances"], 1);
    assert_eq!(report["active_texture"], 1);

    let records = report["frames"].as_array().unwrap();
    let counts: Vec<u64> = records
        .iter()
        .map(|r| r["finger_count"].as_u64().unwrap())
        .collect();
    assert_eq!(counts, vec![4, 5, 5]);
    assert_eq!(records[2]["index"], 3);
    assert_eq!(records[1]["correspondence"]["kind"], "ready");
    assert_eq!(records[1]["view_matrix"].as_array().map(|m| m.len()), Some(16));
    assert_eq!(records[0]["correspondence"]["kind"], "unsupported");
    assert_eq!(records[0]["correspondence"]["count"], "nine");

    assert!(annotated.join("frame_00001.png").is_file());
    assert!(!annotated.join("frame_00002.png").exists());
}

#[test]
fn run_with_missing_config_fails() {
    handmark()
        .args(["run", "--config", "/definitely/not/here.json"])
        .assert()
        .failure();
}
