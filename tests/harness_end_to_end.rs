//! End-to-end run through the public crate API: artifacts on disk, both
//! reference protocols, one complete drive, and the report written to disk.

use ballot_bench::config::{ConfigDocument, EnvOverrides, SimulationConfig};
use ballot_bench::{
    run_simulation, write_report, ArtifactStore, PeriodClock, PrivateVoting, PublicVoting, Roster,
};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn scratch_dir(tag: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("ballot_bench_e2e_{tag}_{unique}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_artifacts(dir: &PathBuf, yes: usize, no: usize) {
    for i in 0..yes {
        fs::write(dir.join(format!("vote_{i:03}_YES.bin")), format!("yes-{i}")).unwrap();
    }
    for i in yes..yes + no {
        fs::write(dir.join(format!("vote_{i:03}_NO.bin")), format!("no-{i}")).unwrap();
    }
    fs::write(dir.join("final_tally.bin"), b"aggregate-bytes").unwrap();
    fs::write(
        dir.join("metadata.json"),
        format!(
            r#"{{
                "configuration": {{"total_voters": {}, "yes_votes": {yes}, "no_votes": {no}}},
                "performance": {{"tally_time_ms": 128.5}}
            }}"#,
            yes + no
        ),
    )
    .unwrap();
}

fn config(total: usize, yes: u64, no: u64) -> SimulationConfig {
    let doc: ConfigDocument = serde_json::from_str(&format!(
        r#"{{
            "seed": 42,
            "question": "Adopt the proposal?",
            "voters": {{
                "total": {total},
                "yes": {yes},
                "no": {no},
                "simulate_partial": false,
                "all_must_vote": true,
                "participation_rate": 1.0
            }},
            "voting": {{"period_days": 7, "quorum_bps": 1000}}
        }}"#
    ))
    .unwrap();
    SimulationConfig::compose(doc, EnvOverrides::default()).unwrap()
}

#[test]
fn test_full_run_writes_report_to_disk() {
    let artifact_dir = scratch_dir("artifacts");
    write_artifacts(&artifact_dir, 6, 4);
    let config = config(10, 6, 4);

    let roster = Roster::synthetic(10);
    let store = ArtifactStore::new(&artifact_dir);
    let clock = PeriodClock::new();
    let mut private = PrivateVoting::new(
        config.question.clone(),
        roster.coordinator.clone(),
        &roster.voters,
        config.quorum_bps,
        clock.clone(),
    );
    let mut public = PublicVoting::new(config.question.clone(), &roster.voters, clock.clone());

    let outcome = run_simulation(&config, &roster, &store, &mut private, &mut public, || {
        clock.advance()
    })
    .unwrap();

    let report_dir = scratch_dir("report");
    let path = report_dir.join("simulation_report.json");
    write_report(&path, &outcome.report).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["mode"], "simulation");
    assert_eq!(parsed["seed"], 42);
    assert_eq!(parsed["question"], "Adopt the proposal?");
    assert_eq!(parsed["voters"]["active"], 10);
    assert_eq!(parsed["results"]["private"]["yes"], 6);
    assert_eq!(parsed["results"]["private"]["no"], 4);
    assert_eq!(parsed["results"]["private"]["revealed"], true);
    assert_eq!(parsed["results"]["public"]["yes"], 6);
    assert_eq!(parsed["results"]["decision"], "approved");
    assert_eq!(parsed["participation"]["percentage"], 100);
    assert_eq!(parsed["offchain_tally"]["duration_ms"], 128.5);
    assert_eq!(parsed["verification"]["consistent"], true);
    assert!(parsed["verification"]["tally_digest"]
        .as_str()
        .unwrap()
        .starts_with("0x"));
    // The private path carries the two coordinator operations on top of the
    // per-vote submissions.
    let votes = parsed["cost"]["private_votes_total"].as_u64().unwrap();
    let tally = parsed["cost"]["private_tally"].as_u64().unwrap();
    let reveal = parsed["cost"]["private_reveal"].as_u64().unwrap();
    assert_eq!(
        parsed["cost"]["private_total"].as_u64().unwrap(),
        votes + tally + reveal
    );

    fs::remove_dir_all(&artifact_dir).unwrap();
    fs::remove_dir_all(&report_dir).unwrap();
}

#[test]
fn test_identical_seeds_produce_identical_reports() {
    let dir_a = scratch_dir("seed_a");
    let dir_b = scratch_dir("seed_b");
    write_artifacts(&dir_a, 3, 2);
    write_artifacts(&dir_b, 3, 2);
    let config = config(5, 3, 2);

    let run = |dir: &PathBuf| {
        let roster = Roster::synthetic(5);
        let store = ArtifactStore::new(dir);
        let clock = PeriodClock::new();
        let mut private = PrivateVoting::new(
            config.question.clone(),
            roster.coordinator.clone(),
            &roster.voters,
            config.quorum_bps,
            clock.clone(),
        );
        let mut public = PublicVoting::new(config.question.clone(), &roster.voters, clock.clone());
        run_simulation(&config, &roster, &store, &mut private, &mut public, || {
            clock.advance()
        })
        .unwrap()
    };

    let first = run(&dir_a);
    let second = run(&dir_b);

    assert_eq!(first.sampling, second.sampling);
    assert_eq!(first.report.cost.public_total, second.report.cost.public_total);
    assert_eq!(
        first.report.cost.private_total,
        second.report.cost.private_total
    );
    assert_eq!(
        first.report.verification.tally_digest,
        second.report.verification.tally_digest
    );

    fs::remove_dir_all(&dir_a).unwrap();
    fs::remove_dir_all(&dir_b).unwrap();
}
