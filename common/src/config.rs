use crate::environment::Environment;

pub struct Config {
    /// Quiet level. `1` hides headers and passing cases, `2` prints only the summary.
    pub quiet: u8,
    pub no_color: bool,
    /// Where the suite is running. Gates are evaluated against this.
    pub environment: Environment,
    /// Only run cases whose name contains this pattern.
    pub filter: Option<String>,
}
