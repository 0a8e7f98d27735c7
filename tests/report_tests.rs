use exptracker::config::Config;
use exptracker::core::notify::{self, DIGEST_LIMIT};
use exptracker::core::report::{self, render, summarize};
use exptracker::models::{ResultRow, SessionRecord};
use exptracker::store::Store;
use std::fs;
use std::time::Duration;

mod common;
use common::{stub_server, temp_root};

fn session(id: &str, started_at: &str, location: &str, spot: &str) -> SessionRecord {
    SessionRecord {
        session_id: id.into(),
        started_at: started_at.into(),
        ended_at: started_at.into(),
        location: location.into(),
        stage: 1,
        difficulty: "Hard".into(),
        party_type: "duo".into(),
        duration_minutes: 60,
        note: String::new(),
        spot: spot.into(),
    }
}

fn result(id: &str, character: &str, gain: Option<f64>) -> ResultRow {
    ResultRow {
        session_id: id.into(),
        server: "Netherworld".into(),
        character: character.into(),
        level_start: gain.map(|_| 10),
        exp_start_percent: gain.map(|_| 10.0),
        level_end: gain.map(|_| 10),
        exp_end_percent: gain.map(|g| 10.0 + g),
        gain_percent: gain,
    }
}

#[test]
fn test_spot_average_over_two_sessions() {
    let sessions = vec![
        session("R1", "2025-09-03 20:00:00", "Abyss", "Gate"),
        session("R2", "2025-09-17 20:00:00", "Abyss", "Gate"),
    ];
    let results = vec![result("R1", "Alice", Some(5.0)), result("R2", "Alice", Some(3.0))];

    let summary = summarize(&sessions, &results, 2025, 9).expect("month has sessions");

    assert_eq!(summary.session_count, 2);
    assert_eq!(summary.spot_avg.len(), 1);
    let spot = &summary.spot_avg[0];
    assert_eq!(spot.key, ("Gate".to_string(), "Hard".to_string(), "duo".to_string()));
    assert_eq!(spot.mean, 4.0);
    assert_eq!(spot.samples, 2);

    assert_eq!(summary.dungeon_avg[0].key, ("Abyss".to_string(), "Hard".to_string()));
    assert_eq!(summary.character_avg[0].key, "Alice");
    assert_eq!(summary.character_avg[0].mean, 4.0);
    assert_eq!(summary.top_sessions[0].gain, 5.0);
    assert_eq!(summary.top_sessions[1].gain, 3.0);
}

#[test]
fn test_join_and_month_filter() {
    let sessions = vec![
        session("R1", "2025-09-03 20:00:00", "Abyss", "Gate"),
        session("R_AUG", "2025-08-31 23:59:00", "Abyss", "Gate"),
        // older log format
        session("R_LEGACY", "2025-09-20 21 Uhr 15", "Crypt", "Stairs"),
        session("R_BAD", "not a date", "Abyss", "Gate"),
    ];
    let results = vec![
        result("R1", "Alice", Some(2.0)),
        result("R1", "Bob", None),
        result("R_AUG", "Alice", Some(50.0)),
        result("R_LEGACY", "Carol", Some(1.0)),
        result("R_ORPHAN", "Alice", Some(99.0)),
        result("R_BAD", "Alice", Some(77.0)),
    ];

    let summary = summarize(&sessions, &results, 2025, 9).expect("month has sessions");

    assert_eq!(summary.session_count, 2);
    let characters: Vec<&str> = summary.character_avg.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(characters, vec!["Alice", "Carol"]);
    assert_eq!(summary.character_avg[0].mean, 2.0);
    assert_eq!(summary.top_sessions.len(), 2);
    assert!(summary.top_sessions.iter().all(|t| t.gain < 10.0));
}

#[test]
fn test_rankings_sorted_with_stable_ties() {
    let mut sessions = Vec::new();
    let mut results = Vec::new();
    for i in 0..12 {
        let id = format!("R{i:02}");
        sessions.push(session(&id, "2025-09-05 10:00:00", "Abyss", "Gate"));
        results.push(result(&id, &format!("C{i:02}"), Some((i % 4) as f64)));
    }

    let summary = summarize(&sessions, &results, 2025, 9).expect("month has sessions");

    assert_eq!(summary.top_sessions.len(), 10);
    let top: Vec<(&str, f64)> = summary
        .top_sessions
        .iter()
        .map(|t| (t.character.as_str(), t.gain))
        .collect();
    assert_eq!(&top[..3], &[("C03", 3.0), ("C07", 3.0), ("C11", 3.0)]);
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));

    let chars: Vec<&str> = summary.character_avg.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(&chars[..4], &["C03", "C07", "C11", "C02"]);
}

#[test]
fn test_empty_month_renders_no_data() {
    let sessions = vec![session("R1", "2025-09-03 20:00:00", "Abyss", "Gate")];
    let results = vec![result("R1", "Alice", Some(5.0))];

    assert!(summarize(&sessions, &results, 2024, 2).is_none());
    let doc = render::render_no_data("Netherworld", 2024, 2);
    assert!(doc.starts_with("# Netherworld EXP monthly report 2024-02"));
    assert!(doc.contains(render::NO_DATA));
}

#[test]
fn test_generate_writes_report_file() {
    let (_dir, paths) = temp_root();
    let store = Store::open(&paths.data_dir()).expect("store");
    store
        .append_session(&session("R1", "2025-09-03 20:00:00", "Abyss", "Gate|West"))
        .expect("session");
    store
        .append_result(&result("R1", "Alice", Some(5.25)))
        .expect("result");

    let artifact =
        report::generate(&store, &paths, &Config::default(), 2025, 9, false).expect("report");

    assert_eq!(artifact.path, paths.report_file(2025, 9));
    assert!(!artifact.notified);
    let written = fs::read_to_string(&artifact.path).expect("report file");
    assert_eq!(written, artifact.markdown);
    assert!(written.contains("**Alice** with **5.2500%**"));
    assert!(written.contains("## Spot averages"));
    assert!(written.contains("Gate\\|West"));
    assert!(written.contains("## Top 10 sessions"));
}

#[test]
fn test_generate_empty_month_does_not_fail() {
    let (_dir, paths) = temp_root();
    let store = Store::open(&paths.data_dir()).expect("store");

    let artifact =
        report::generate(&store, &paths, &Config::default(), 2023, 1, true).expect("report");

    assert!(artifact.summary.is_none());
    assert!(artifact.markdown.contains(render::NO_DATA));
    assert!(!artifact.notified, "no webhook configured");
}

#[test]
fn test_month_without_gains_renders_empty_tables() {
    let sessions = vec![session("R1", "2025-09-03 20:00:00", "Abyss", "Gate")];
    let results = vec![result("R1", "Alice", None)];

    let summary = summarize(&sessions, &results, 2025, 9).expect("month has sessions");
    let md = render::render_markdown("Netherworld", &summary);

    assert!(md.contains("No sessions with a measured gain."));
    assert_eq!(md.matches("_No data._").count(), 4);
}

#[test]
fn test_digest_payload_is_truncated() {
    let long = "x".repeat(5000);
    let payload = notify::payload(&long);
    let content = payload["content"].as_str().expect("content field");
    assert_eq!(content.chars().count(), DIGEST_LIMIT);

    let short = notify::payload("hello");
    assert_eq!(short["content"], "hello");
}

#[test]
fn test_notify_failure_is_swallowed() {
    // nothing listens on port 9 of localhost in the test environment
    let delivered = notify::notify(
        Some("http://127.0.0.1:9/webhook"),
        "digest",
        Duration::from_secs(2),
    );
    assert!(!delivered);
    assert!(!notify::notify(None, "digest", Duration::from_secs(2)));
}

#[test]
fn test_generate_pushes_digest_to_webhook() {
    let (_dir, paths) = temp_root();
    let store = Store::open(&paths.data_dir()).expect("store");
    store
        .append_session(&session("R1", "2025-09-03 20:00:00", "Abyss", "Gate"))
        .expect("session");
    store
        .append_result(&result("R1", "Alice", Some(2.5)))
        .expect("result");

    let (url, server) = stub_server(vec![(204, String::new())]);
    let cfg = Config {
        webhook_url: Some(url),
        ..Config::default()
    };

    let artifact = report::generate(&store, &paths, &cfg, 2025, 9, true).expect("report");
    assert!(artifact.notified);

    let requests = server.join().expect("server thread");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("POST "));
    assert!(requests[0].contains("\"content\""));
    assert!(requests[0].contains("Netherworld EXP monthly report 2025-09"));
}
