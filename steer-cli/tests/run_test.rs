use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use steer_cli::{
    apply_overrides, load_scene, load_settings, run, Mode, RunOptions, TargetScript, Toggle,
};
use steer_core::{SingleBehavior, Vector2D};
use steer_shared::{CombinationMode, FrameReport, RunSummary, SceneDescription, SteeringSettings};

/// Writes `contents` to a file unique to this test process
fn temp_json(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("steer-{}-{}.json", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

/// Splits output into frames and the trailing summary
fn parse_output(out: Vec<u8>) -> Result<(Vec<FrameReport>, RunSummary)> {
    let text = String::from_utf8(out)?;
    let mut lines: Vec<&str> = text.lines().collect();
    let summary = serde_json::from_str(lines.pop().unwrap())?;
    let frames = lines
        .into_iter()
        .map(serde_json::from_str)
        .collect::<Result<Vec<FrameReport>, _>>()?;
    Ok((frames, summary))
}

fn crowd_options(ticks: u64, seed: u64) -> RunOptions {
    RunOptions {
        mode: Mode::Crowd,
        ticks,
        every: 1,
        seed,
        target: TargetScript::Fixed(Vector2D::new(900.0, 500.0)),
    }
}

#[test]
fn crowd_run_streams_every_frame() -> Result<()> {
    let mut out = Vec::new();
    let summary = run(
        &SceneDescription::default(),
        &SteeringSettings::default(),
        &crowd_options(120, 9),
        &mut out,
    )?;

    let (frames, parsed_summary) = parse_output(out)?;
    assert_eq!(frames.len(), 120);
    assert_eq!(parsed_summary, summary);
    assert_eq!(summary.agent_count, 12);
    assert_eq!(summary.combination, Some(CombinationMode::Priority));

    for frame in &frames {
        assert_eq!(frame.agents.len(), 12);
        assert!(frame.target.is_none());
        for agent in &frame.agents {
            assert!(agent.position.is_finite());
            assert!(agent.path_index < 8);
        }
    }
    Ok(())
}

#[test]
fn same_seed_same_run() -> Result<()> {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let scene = SceneDescription::default();
    let settings = SteeringSettings::default();

    run(&scene, &settings, &crowd_options(60, 77), &mut first)?;
    run(&scene, &settings, &crowd_options(60, 77), &mut second)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn pilot_seeks_scripted_target() -> Result<()> {
    let options = RunOptions {
        mode: Mode::Single {
            behavior: SingleBehavior::Arrive,
            blend: false,
        },
        ticks: 1_500,
        every: 500,
        seed: 1,
        target: TargetScript::Fixed(Vector2D::new(700.0, 500.0)),
    };
    let mut out = Vec::new();
    run(
        &SceneDescription::default(),
        &SteeringSettings::default(),
        &options,
        &mut out,
    )?;

    let (frames, summary) = parse_output(out)?;
    assert_eq!(frames.len(), 3);
    assert_eq!(summary.mode, "single");
    assert_eq!(summary.combination, None);

    let last = frames.last().unwrap();
    let agent = last.agents[0];
    let target = last.target.unwrap();
    assert!(agent.position.distance_to(&target) < 2.0);
    Ok(())
}

#[test]
fn settings_file_and_overrides() -> Result<()> {
    let path = temp_json(
        "settings",
        r#"{"combination": "weighted", "switches": {"wall_avoidance": false}}"#,
    );
    let mut settings = load_settings(Some(path.as_path()))?;
    fs::remove_file(&path)?;

    assert_eq!(settings.combination, CombinationMode::Weighted);
    assert!(!settings.switches.wall_avoidance);

    apply_overrides(&mut settings, Some(CombinationMode::Priority), &[Toggle::Separation]);
    assert_eq!(settings.combination, CombinationMode::Priority);
    assert!(!settings.switches.separation);
    Ok(())
}

#[test]
fn invalid_scene_file_is_reported() {
    let path = temp_json(
        "scene-bad",
        r#"{"obstacles": [{"center": {"x": 1, "y": 1}, "radius": -3}]}"#,
    );
    let result = load_scene(Some(path.as_path()));
    fs::remove_file(&path).unwrap();

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("positive radius"));
}

#[test]
fn malformed_json_is_reported() {
    let path = temp_json("scene-garbage", "{ not json");
    let result = load_scene(Some(path.as_path()));
    fs::remove_file(&path).unwrap();

    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse scene file"));
}

#[test]
fn small_custom_scene() -> Result<()> {
    let path = temp_json(
        "scene-small",
        r#"{
            "width": 400, "height": 300, "agent_count": 3,
            "path": [{"x": 100, "y": 100}, {"x": 300, "y": 200}],
            "obstacles": []
        }"#,
    );
    let scene = load_scene(Some(path.as_path()))?;
    fs::remove_file(&path)?;

    let mut out = Vec::new();
    let summary = run(&scene, &SteeringSettings::default(), &crowd_options(300, 4), &mut out)?;
    assert_eq!(summary.agent_count, 3);
    assert_eq!(summary.ticks, 300);
    Ok(())
}
