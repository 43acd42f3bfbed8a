//! # Reachability Suite
//!
//! Holds the fixed list of cases and runs them one after another.
//!
//! For every case the runner:
//! 1. evaluates the case's [`Gate`]s against the [`Environment`]; a closed gate
//!    deselects the case, which is reported as skipped.
//! 2. resolves the case's [`Requirement`]s through the capability probes.
//!    Each probe runs at most once per [`Suite::run`] call.
//! 3. runs the [`Check`] through the shell and maps its result to an [`Outcome`].

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use reachr_common::environment::{Environment, Gate};
use reachr_common::feature::{Feature, FeatureExpr};
use reachr_common::network::target::HostTarget;
use reachr_common::outcome::{Outcome, OutcomeKind};
use reachr_common::{debug, warn};
use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::checks::{Check, IpFamily};
use crate::probe::CapabilityProbe;
use crate::shell::Shell;

const EXTERNAL_NETWORK_SKIP: &str = "UDP port 53 unreachable; no external network available";
const IPV6_SKIP: &str = "IPv6 not available on this host";
const BOOTED_REASON: &str = "nslookup requires fully booted system";

/// A capability a case needs from the host, checked through a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    ExternalNetwork,
    Ipv6,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Requirement::ExternalNetwork => "external_network",
            Requirement::Ipv6 => "ipv6",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub check: Check,
    pub gates: Vec<Gate>,
    pub requires: Vec<Requirement>,
}

impl Case {
    pub fn new(check: Check) -> Self {
        Self {
            name: check.to_string(),
            check,
            gates: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    /// First closed gate, if any.
    fn deselection_reason(&self, env: &Environment) -> Option<String> {
        self.gates.iter().find_map(|gate| gate.evaluate(env))
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_reports(reports: &[CaseReport]) -> Self {
        reports
            .iter()
            .fold(Summary::default(), |mut summary, report| {
                match report.outcome.kind() {
                    OutcomeKind::Passed => summary.passed += 1,
                    OutcomeKind::Skipped => summary.skipped += 1,
                    OutcomeKind::Failed => summary.failed += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failed
    }
}

/// Probe results for the lifetime of one run.
struct Session<'a> {
    probe: &'a dyn CapabilityProbe,
    external_network: OnceCell<bool>,
    ipv6: OnceCell<bool>,
}

impl<'a> Session<'a> {
    fn new(probe: &'a dyn CapabilityProbe) -> Self {
        Self {
            probe,
            external_network: OnceCell::new(),
            ipv6: OnceCell::new(),
        }
    }

    /// Returns the skip reason for the first requirement the host lacks.
    async fn unmet(&self, requires: &[Requirement]) -> Option<&'static str> {
        for requirement in requires {
            let available = match requirement {
                Requirement::ExternalNetwork => {
                    *self
                        .external_network
                        .get_or_init(|| async {
                            match self.probe.external_network().await {
                                Ok(()) => true,
                                Err(e) => {
                                    debug!("external network probe failed: {e}");
                                    false
                                }
                            }
                        })
                        .await
                }
                Requirement::Ipv6 => *self.ipv6.get_or_init(|| self.probe.has_ipv6()).await,
            };

            if !available {
                return Some(match requirement {
                    Requirement::ExternalNetwork => EXTERNAL_NETWORK_SKIP,
                    Requirement::Ipv6 => IPV6_SKIP,
                });
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    cases: Vec<Case>,
}

impl Suite {
    pub fn new(cases: Vec<Case>) -> Self {
        Self { cases }
    }

    /// The built-in cases: IPv4 ping, IPv6 ping, DNS queries, hostname lookup.
    pub fn standard() -> Self {
        let ping4_targets = [google_v4(), google_dns_name(), heise()];
        let ping6_targets = [google_v6(), google_dns_name()];
        let dns_targets = [google_v4(), google_dns_name(), heise(), google_v6()];

        let cloud_or_metal = FeatureExpr::Or(
            Box::new(FeatureExpr::Tag(Feature::Cloud)),
            Box::new(FeatureExpr::Tag(Feature::Metal)),
        );

        let mut cases: Vec<Case> = Vec::new();

        cases.extend(ping4_targets.into_iter().map(|host| {
            Case::new(Check::Ping {
                family: IpFamily::V4,
                host,
            })
        }));

        cases.extend(ping6_targets.into_iter().map(|host| {
            Case::new(Check::Ping {
                family: IpFamily::V6,
                host,
            })
            .require(Requirement::Ipv6)
        }));

        cases.extend(dns_targets.into_iter().map(|resolver| {
            Case::new(Check::Dns { resolver })
                .gate(Gate::Feature(cloud_or_metal.clone()))
                .require(Requirement::ExternalNetwork)
        }));

        cases.push(
            Case::new(Check::HostnameLookup)
                .gate(Gate::Booted {
                    reason: BOOTED_REASON,
                })
                .gate(Gate::Feature(FeatureExpr::Tag(Feature::Azure))),
        );

        Self { cases }
    }

    /// Keeps only the cases whose name contains `pattern`.
    pub fn filter(mut self, pattern: &str) -> Self {
        self.cases.retain(|case| case.name.contains(pattern));
        self
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub async fn run(
        &self,
        env: &Environment,
        shell: &dyn Shell,
        probe: &dyn CapabilityProbe,
    ) -> Vec<CaseReport> {
        self.run_with_progress(env, shell, probe, |_| {}).await
    }

    /// Like [`Suite::run`], calling `on_case` before each case starts.
    pub async fn run_with_progress<F>(
        &self,
        env: &Environment,
        shell: &dyn Shell,
        probe: &dyn CapabilityProbe,
        mut on_case: F,
    ) -> Vec<CaseReport>
    where
        F: FnMut(&Case),
    {
        let session = Session::new(probe);
        let mut reports: Vec<CaseReport> = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            on_case(case);
            let start_time = Instant::now();
            let outcome = run_case(case, env, shell, &session).await;
            reports.push(CaseReport {
                name: case.name.clone(),
                outcome,
                elapsed: start_time.elapsed(),
            });
        }

        reports
    }
}

async fn run_case(
    case: &Case,
    env: &Environment,
    shell: &dyn Shell,
    session: &Session<'_>,
) -> Outcome {
    if let Some(reason) = case.deselection_reason(env) {
        debug!("{} deselected: {reason}", case.name);
        return Outcome::skipped(reason);
    }

    if let Some(reason) = session.unmet(&case.requires).await {
        debug!("{} skipped: {reason}", case.name);
        return Outcome::skipped(reason);
    }

    match case.check.run(shell).await {
        Ok(()) => Outcome::Passed,
        Err(e) => {
            warn!("{} failed: {e}", case.name);
            Outcome::failed(e.to_string())
        }
    }
}

fn google_v4() -> HostTarget {
    HostTarget::V4(Ipv4Addr::new(8, 8, 8, 8))
}

fn google_v6() -> HostTarget {
    HostTarget::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888))
}

fn google_dns_name() -> HostTarget {
    HostTarget::Hostname("dns.google.com".to_string())
}

fn heise() -> HostTarget {
    HostTarget::Hostname("heise.de".to_string())
}
