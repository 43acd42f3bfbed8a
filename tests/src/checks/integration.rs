#![cfg(test)]
use std::time::Duration;

use reachr_common::command::CommandResult;
use reachr_common::environment::{BootState, Environment};
use reachr_common::feature::Feature;
use reachr_common::outcome::{Outcome, OutcomeKind};
use reachr_core::shell::SystemShell;
use reachr_core::suite::{CaseReport, Suite};

use crate::utils::{FixedProbe, ScriptedShell, PING_OK};

fn everywhere() -> Environment {
    Environment::new([Feature::Cloud, Feature::Azure], BootState::Booted)
}

fn healthy_shell() -> ScriptedShell {
    ScriptedShell::new()
        .respond("ping -c 1", CommandResult::new(0, PING_OK, ""))
        .respond("ping6 -c 1 -w 5", CommandResult::new(0, PING_OK, ""))
        .respond("dig", CommandResult::new(0, "93.184.215.14\n", ""))
        .respond(
            "nslookup",
            CommandResult::new(0, "Name:\tvm-01\nAddress: 10.0.0.4\n", ""),
        )
}

fn kinds(reports: &[CaseReport]) -> Vec<OutcomeKind> {
    reports.iter().map(|r| r.outcome.kind()).collect()
}

fn outcome_of<'a>(reports: &'a [CaseReport], name: &str) -> &'a Outcome {
    &reports
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no report for {name}"))
        .outcome
}

/// With every tool answering and every capability present, the whole suite passes.
#[tokio::test]
async fn healthy_host_passes_every_case() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard().run(&everywhere(), &shell, &probe).await;

    assert_eq!(reports.len(), 10);
    for report in &reports {
        assert_eq!(report.outcome, Outcome::Passed, "{} did not pass", report.name);
    }
}

#[tokio::test]
async fn dns_cases_skip_when_udp_probe_fails() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(false, true);
    let suite = Suite::standard().filter("dns[");

    let reports = suite.run(&everywhere(), &shell, &probe).await;

    assert_eq!(reports.len(), 4);
    for report in &reports {
        match &report.outcome {
            Outcome::Skipped { reason } => {
                assert!(reason.contains("UDP port 53 unreachable"), "{reason}")
            }
            other => panic!("{} should be skipped, got {other:?}", report.name),
        }
    }
    assert!(shell.calls().is_empty(), "dig must not run without network");
}

#[tokio::test]
async fn external_probe_runs_once_per_session() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, true);
    let suite = Suite::standard().filter("dns[");

    suite.run(&everywhere(), &shell, &probe).await;
    assert_eq!(probe.external_calls(), 1);

    suite.run(&everywhere(), &shell, &probe).await;
    assert_eq!(probe.external_calls(), 2);
}

#[tokio::test]
async fn ping6_skipped_without_ipv6() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, false);
    let suite = Suite::standard().filter("ping");

    let reports = suite.run(&everywhere(), &shell, &probe).await;

    assert_eq!(
        kinds(&reports),
        vec![
            OutcomeKind::Passed,
            OutcomeKind::Passed,
            OutcomeKind::Passed,
            OutcomeKind::Skipped,
            OutcomeKind::Skipped,
        ]
    );
    assert_eq!(probe.ipv6_calls(), 1);
    assert!(shell.calls().iter().all(|c| !c.starts_with("ping6")));
}

#[tokio::test]
async fn dig_uses_ipv6_flag_only_for_ipv6_literals() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, true);

    Suite::standard()
        .filter("dns[")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(
        shell.calls(),
        vec![
            "dig @8.8.8.8 example.com +short",
            "dig @dns.google.com example.com +short",
            "dig @heise.de example.com +short",
            "dig -6 @2001:4860:4860::8888 example.com +short",
        ]
    );
}

#[tokio::test]
async fn empty_dig_answer_fails_with_no_response() {
    let shell = ScriptedShell::new().respond("dig", CommandResult::new(0, "\n", ""));
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("dns[heise.de]")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(
        reports[0].outcome,
        Outcome::failed("No response from heise.de")
    );
}

#[tokio::test]
async fn ping_failure_carries_stderr() {
    let shell = ScriptedShell::new().respond(
        "ping -c 1",
        CommandResult::new(2, "", "ping: connect: Network is unreachable\n"),
    );
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("ping4[8.8.8.8]")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(
        outcome_of(&reports, "ping4[8.8.8.8]"),
        &Outcome::failed("Host 8.8.8.8 unreachable: ping: connect: Network is unreachable")
    );
}

#[tokio::test]
async fn missing_binary_is_a_failure_not_a_panic() {
    let shell = ScriptedShell::new();
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("ping4[heise.de]")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(reports[0].outcome.kind(), OutcomeKind::Failed);
}

#[tokio::test(start_paused = true)]
async fn hostname_lookup_passes_when_nslookup_returns_immediately() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("hostname_lookup")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(reports[0].outcome, Outcome::Passed);
    assert_eq!(shell.calls(), vec!["nslookup $(hostname)"]);
}

#[tokio::test(start_paused = true)]
async fn hostname_lookup_fails_when_nslookup_takes_eleven_seconds() {
    let shell = ScriptedShell::new().respond_after(
        "nslookup",
        Duration::from_secs(11),
        CommandResult::new(0, "Name:\tvm-01\nAddress: 10.0.0.4\n", ""),
    );
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("hostname_lookup")
        .run(&everywhere(), &shell, &probe)
        .await;

    match &reports[0].outcome {
        Outcome::Failed { message } => {
            assert!(message.contains("should not run into timeout"), "{message}");
            assert!(message.contains("11.0s"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn hostname_lookup_tolerates_ten_seconds() {
    let shell = ScriptedShell::new().respond_after(
        "nslookup",
        Duration::from_millis(10_400),
        CommandResult::new(0, "Name:\tvm-01\n", ""),
    );
    let probe = FixedProbe::new(true, true);

    let reports = Suite::standard()
        .filter("hostname_lookup")
        .run(&everywhere(), &shell, &probe)
        .await;

    assert_eq!(reports[0].outcome, Outcome::Passed);
}

#[tokio::test]
async fn hostname_lookup_deselected_before_boot_and_off_azure() {
    let shell = healthy_shell();
    let probe = FixedProbe::new(true, true);
    let suite = Suite::standard().filter("hostname_lookup");

    let offline = Environment::new([Feature::Azure], BootState::NotBooted);
    let gcp = Environment::new([Feature::Cloud, Feature::Gcp], BootState::Booted);

    for env in [offline, gcp] {
        let reports = suite.run(&env, &shell, &probe).await;
        assert_eq!(reports[0].outcome.kind(), OutcomeKind::Skipped);
    }
    assert!(shell.calls().is_empty());
}

#[tokio::test]
async fn running_twice_gives_the_same_outcomes() {
    let shell = ScriptedShell::new()
        .respond("ping -c 1 8.8.8.8", CommandResult::new(0, PING_OK, ""))
        .respond("ping -c 1", CommandResult::new(1, "", "unknown host"))
        .respond("dig", CommandResult::new(0, "93.184.215.14\n", ""));
    let probe = FixedProbe::new(true, false);
    let env = Environment::new([Feature::Metal], BootState::NotBooted);
    let suite = Suite::standard();

    let first = suite.run(&env, &shell, &probe).await;
    let second = suite.run(&env, &shell, &probe).await;

    assert_eq!(kinds(&first), kinds(&second));
    assert!(kinds(&first).contains(&OutcomeKind::Failed));
    assert!(kinds(&first).contains(&OutcomeKind::Skipped));
    assert!(kinds(&first).contains(&OutcomeKind::Passed));
}

#[tokio::test]
#[ignore]
async fn real_ping_reaches_ipv4_targets() {
    let probe = FixedProbe::new(true, false);
    let reports = Suite::standard()
        .filter("ping4")
        .run(&everywhere(), &SystemShell, &probe)
        .await;

    for report in &reports {
        assert_eq!(report.outcome, Outcome::Passed, "{}", report.name);
    }
}

#[tokio::test]
#[ignore]
async fn real_dig_gets_an_answer_from_public_resolvers() {
    let probe = FixedProbe::new(true, false);
    let reports = Suite::standard()
        .filter("dns[8.8.8.8]")
        .run(&everywhere(), &SystemShell, &probe)
        .await;

    assert_eq!(reports[0].outcome, Outcome::Passed);
}
