use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reachr_common::command::{CommandResult, RunOptions};
use reachr_core::probe::{CapabilityProbe, ProbeError};
use reachr_core::shell::{Shell, ShellError};

pub const PING_OK: &str = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=9.81 ms

--- 8.8.8.8 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
";

const COMMAND_NOT_FOUND: i32 = 127;

struct Script {
    prefix: String,
    result: CommandResult,
    delay: Duration,
}

/// A shell that answers from a script instead of running anything.
///
/// Responses are matched by command prefix, first match wins. Delays are
/// slept on the tokio clock, so tests can pause time.
#[derive(Default)]
pub struct ScriptedShell {
    scripts: Vec<Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, prefix: &str, result: CommandResult) -> Self {
        self.respond_after(prefix, Duration::ZERO, result)
    }

    pub fn respond_after(mut self, prefix: &str, delay: Duration, result: CommandResult) -> Self {
        self.scripts.push(Script {
            prefix: prefix.to_string(),
            result,
            delay,
        });
        self
    }

    /// Every command line seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Shell for ScriptedShell {
    async fn run(&self, command: &str, opts: RunOptions) -> Result<CommandResult, ShellError> {
        self.calls.lock().unwrap().push(command.to_string());

        let (result, delay) = match self.scripts.iter().find(|s| command.starts_with(&s.prefix)) {
            Some(script) => (script.result.clone(), script.delay),
            None => (
                CommandResult::new(COMMAND_NOT_FOUND, "", format!("sh: {command}: not found")),
                Duration::ZERO,
            ),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if !opts.ignore_exit_code && !result.success() {
            return Err(ShellError::NonZeroExit {
                command: command.to_string(),
                returncode: result.returncode,
                stderr: result.stderr.clone(),
            });
        }
        Ok(result)
    }
}

/// Probe with fixed answers that counts how often it was asked.
pub struct FixedProbe {
    external_network: bool,
    ipv6: bool,
    external_calls: AtomicUsize,
    ipv6_calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(external_network: bool, ipv6: bool) -> Self {
        Self {
            external_network,
            ipv6,
            external_calls: AtomicUsize::new(0),
            ipv6_calls: AtomicUsize::new(0),
        }
    }

    pub fn external_calls(&self) -> usize {
        self.external_calls.load(Ordering::Relaxed)
    }

    pub fn ipv6_calls(&self) -> usize {
        self.ipv6_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CapabilityProbe for FixedProbe {
    async fn external_network(&self) -> Result<(), ProbeError> {
        self.external_calls.fetch_add(1, Ordering::Relaxed);
        if self.external_network {
            Ok(())
        } else {
            Err(ProbeError::TimedOut {
                target: "8.8.8.8:53".parse().unwrap(),
                timeout: Duration::from_secs(1),
            })
        }
    }

    async fn has_ipv6(&self) -> bool {
        self.ipv6_calls.fetch_add(1, Ordering::Relaxed);
        self.ipv6
    }
}

/// An empty network namespace with only loopback up. Removed on drop.
///
/// Needs root and iproute2; `new` returns `None` otherwise.
pub struct NetnsContext {
    name: String,
}

impl NetnsContext {
    pub fn new(name: &str) -> Option<Self> {
        if !is_root() {
            return None;
        }

        let name = format!("reachr-{name}");
        let _ = Command::new("ip").args(["netns", "del", &name]).output();
        ip(&["netns", "add", &name])?;
        let ctx = Self { name };
        ip(&["netns", "exec", &ctx.name, "ip", "link", "set", "lo", "up"])?;
        Some(ctx)
    }

    /// Prefixes `command` so it runs inside the namespace.
    pub fn wrap(&self, command: &str) -> String {
        format!("ip netns exec {} {}", self.name, command)
    }
}

impl Drop for NetnsContext {
    fn drop(&mut self) {
        let _ = Command::new("ip").args(["netns", "del", &self.name]).output();
    }
}

fn ip(args: &[&str]) -> Option<()> {
    let output = Command::new("ip").args(args).output().ok()?;
    output.status.success().then_some(())
}

fn is_root() -> bool {
    Command::new("id")
        .arg("-u")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim() == "0")
        .unwrap_or(false)
}
