//! # Reachr Core
//!
//! Everything that touches the host: the [`shell`] collaborator that runs
//! diagnostic tools, the capability [`probe`]s, the [`checks`] themselves,
//! the [`suite`] runner that ties them together, and [`system`] inspection.
//!
//! High-level callers should go through [`suite::Suite`] and pass in the
//! [`shell::Shell`] and [`probe::CapabilityProbe`] implementations to use.

pub mod checks;
pub mod probe;
pub mod shell;
pub mod suite;
pub mod system;
