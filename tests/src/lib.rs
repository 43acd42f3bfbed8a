//! Suite-level tests for reachr, run against scripted doubles of the shell
//! and the capability probes. Tests that need the real network are ignored.

pub mod utils;

#[cfg(test)]
mod checks {
    mod integration;
}

#[cfg(test)]
mod probes {
    mod integration;
}
