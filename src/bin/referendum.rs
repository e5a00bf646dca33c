//! CLI entry point for the deterministic voting benchmark.
//!
//! Loads the configuration document (environment overrides applied), builds
//! a synthetic identity roster and the in-memory reference protocols, runs
//! one complete benchmark pass, prints the comparison summary and writes the
//! JSON report.

use ballot_bench::{
    run_simulation, write_report, ArtifactStore, EnvOverrides, HarnessError, PeriodClock,
    PrivateVoting, ProtocolAdapter, PublicVoting, Roster, SimulationConfig,
};
use std::env;
use std::process;

const DEFAULT_ARTIFACT_DIR: &str = "fhe_artifacts";
const DEFAULT_REPORT_PATH: &str = "simulation_report.json";
const DEFAULT_ACCOUNTS: usize = 128;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn print_usage() {
    println!("Usage: referendum [flags]");
    println!("  --config <path>     configuration document (default: $VOTE_CONF or {})",
        ballot_bench::config::DEFAULT_CONFIG_PATH);
    println!("  --artifacts <dir>   committed-vote artifact directory (default: {DEFAULT_ARTIFACT_DIR})");
    println!("  --output <file>     report destination (default: {DEFAULT_REPORT_PATH})");
    println!("  --accounts <n>      identities available in the environment (default: {DEFAULT_ACCOUNTS})");
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(70));
    println!(" {title}");
    println!("{}", "=".repeat(70));
}

struct CliOptions {
    config_path: String,
    artifact_dir: String,
    output_path: String,
    accounts: usize,
}

fn parse_args() -> CliOptions {
    let mut options = CliOptions {
        config_path: env::var(ballot_bench::config::CONFIG_PATH_VAR)
            .unwrap_or_else(|_| ballot_bench::config::DEFAULT_CONFIG_PATH.to_string()),
        artifact_dir: DEFAULT_ARTIFACT_DIR.to_string(),
        output_path: DEFAULT_REPORT_PATH.to_string(),
        accounts: DEFAULT_ACCOUNTS,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(value) => options.config_path = value,
                None => fatal("--config requires a path"),
            },
            "--artifacts" => match args.next() {
                Some(value) => options.artifact_dir = value,
                None => fatal("--artifacts requires a directory"),
            },
            "--output" => match args.next() {
                Some(value) => options.output_path = value,
                None => fatal("--output requires a file path"),
            },
            "--accounts" => match args.next().and_then(|v| v.parse().ok()) {
                Some(value) => options.accounts = value,
                None => fatal("--accounts requires an integer"),
            },
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => fatal(&format!("unknown flag: {other}")),
        }
    }
    options
}

fn run(options: &CliOptions) -> Result<(), HarnessError> {
    let overrides = EnvOverrides::from_env()?;
    let config = SimulationConfig::load(&options.config_path, overrides)?;

    banner("BENCHMARK: PRIVATE (commitment) vs PUBLIC (plaintext) VOTING");
    println!("MODE: deterministic simulation (not a production election)");
    println!(
        "Assumptions: voters={}, participation_rate={}, simulate_partial={}, \
         all_must_vote={}, period_days={}, seed={}, quorum_bps={}",
        config.eligible_voters,
        config.participation_rate,
        config.simulate_partial,
        config.all_must_vote,
        config.voting_period_days,
        config.seed,
        config.quorum_bps
    );

    let store = ArtifactStore::new(&options.artifact_dir);
    let metadata = store.load_metadata()?;
    println!("\n[*] Artifact metadata loaded:");
    println!(
        "    - Total votes (target): {}",
        metadata.configuration.total_voters
    );
    println!("    - YES (target): {}", metadata.configuration.yes_votes);
    println!("    - NO (target):  {}", metadata.configuration.no_votes);
    println!(
        "    - Offline tally time: {:.2} ms",
        metadata.performance.tally_time_ms
    );

    let roster = Roster::synthetic(options.accounts);
    let clock = PeriodClock::new();
    let mut private = PrivateVoting::new(
        config.question.clone(),
        roster.coordinator.clone(),
        &roster.voters[..config.eligible_voters.min(roster.voters.len())],
        config.quorum_bps,
        clock.clone(),
    );
    let mut public = PublicVoting::new(
        config.question.clone(),
        &roster.voters[..config.eligible_voters.min(roster.voters.len())],
        clock.clone(),
    );

    banner("RUN");
    println!("\n[*] Driving both protocols sequentially...");
    let outcome = run_simulation(&config, &roster, &store, &mut private, &mut public, || {
        clock.advance()
    })?;
    let report = &outcome.report;
    println!("[+] Run completed");

    banner("FINAL RESULTS");
    println!("\nQuestion: \"{}\"", report.question);
    println!("\nPRIVATE protocol:");
    println!("  YES votes: {}", report.results.private.yes);
    println!("  NO votes:  {}", report.results.private.no);
    println!("  Total:     {}", report.results.private.total);
    println!(
        "  Status:    {}",
        if report.results.private.revealed {
            "revealed"
        } else {
            "pending"
        }
    );
    println!("\nPUBLIC protocol:");
    println!("  YES votes: {}", report.results.public.yes);
    println!("  NO votes:  {}", report.results.public.no);
    println!("  Total:     {}", report.results.public.total);
    println!(
        "\nParticipation: {}/{} ({}%)",
        report.participation.voted, report.participation.total, report.participation.percentage
    );
    println!("Decision: {}", report.results.decision);

    banner("COMPARISON: PRIVATE vs PUBLIC");
    println!("\nPUBLIC protocol (baseline):");
    println!("  Submission cost total:  {}", report.cost.public_total);
    println!("  Average cost per vote:  {}", report.cost.avg_per_vote_public);
    println!("  Drive time:             {} ms", report.latency_ms.public.total);
    println!("  Latency p50:            {} ms", report.latency_ms.public.p50);
    println!("  Latency p95:            {} ms", report.latency_ms.public.p95);
    println!("\nPRIVATE protocol:");
    println!("  Submission cost total:  {}", report.cost.private_votes_total);
    println!("  Aggregate publication:  {}", report.cost.private_tally);
    println!("  Result reveal:          {}", report.cost.private_reveal);
    println!("  Cost TOTAL:             {}", report.cost.private_total);
    println!("  Average cost per vote:  {}", report.cost.avg_per_vote_private);
    println!("  Drive time:             {} ms", report.latency_ms.private.total);
    println!("  Latency p50:            {} ms", report.latency_ms.private.p50);
    println!("  Latency p95:            {} ms", report.latency_ms.private.p95);
    println!(
        "  Offline tally:          {:.2} ms",
        report.offchain_tally.duration_ms
    );
    let sign = if report.cost.diff >= 0 { "+" } else { "" };
    println!("\nPrivacy {}:", report.cost.label);
    println!("  Cost difference: {sign}{}", report.cost.diff);
    println!("  Percentage:      {sign}{:.1}%", report.cost.overhead_pct);

    if let Some(&probe) = outcome.sampling.active.first() {
        let identity = &roster.voters[probe];
        let record = public.query_voter_record(identity);
        println!("\nExample - voter {}...", &identity[..10]);
        if let Some(choice) = record.choice {
            println!(
                "  Public protocol:  voted {} (visible to everyone)",
                if choice { "YES" } else { "NO" }
            );
        }
        if let Some(commitment) = private.commitment_of(identity) {
            println!(
                "  Private protocol: commitment {}... (choice hidden)",
                &commitment[..12]
            );
        }
    }

    write_report(&options.output_path, report)?;
    println!("\n[+] JSON report written to: {}", options.output_path);

    banner("SUMMARY");
    println!(
        "\nParticipation: {}% ({}/{})",
        report.participation.percentage, report.participation.voted, report.participation.total
    );
    println!("Decision: {}", report.results.decision);
    println!(
        "Cost {}: {sign}{:.1}%",
        report.cost.label, report.cost.overhead_pct
    );
    println!("Tally digest verified: {}", report.verification.tally_digest);
    Ok(())
}

fn main() {
    let options = parse_args();
    if let Err(err) = run(&options) {
        fatal(&format!("error: {err}"));
    }
}
