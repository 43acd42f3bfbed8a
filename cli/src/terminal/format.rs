use std::time::Duration;

use colored::*;
use reachr_common::outcome::{Outcome, OutcomeKind};
use reachr_core::suite::Case;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn outcome_label(kind: OutcomeKind) -> ColoredString {
    let label: String = format!("{:<7}", kind.to_string());
    match kind {
        OutcomeKind::Passed => label.color(colors::PASSED).bold(),
        OutcomeKind::Skipped => label.color(colors::SKIPPED),
        OutcomeKind::Failed => label.color(colors::FAILED).bold(),
    }
}

/// The reason or message carried by an outcome, if any.
pub fn outcome_detail(outcome: &Outcome) -> Option<ColoredString> {
    match outcome {
        Outcome::Passed => None,
        Outcome::Skipped { reason } => Some(reason.as_str().dimmed()),
        Outcome::Failed { message } => Some(message.as_str().color(colors::FAILED)),
    }
}

pub fn seconds(elapsed: Duration) -> ColoredString {
    format!("{:.2}s", elapsed.as_secs_f64()).color(colors::SEPARATOR)
}

pub fn case_to_details(case: &Case) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("Command"),
        case.check.command().color(colors::ACCENT),
    )];

    if !case.gates.is_empty() {
        let joined: String = case
            .gates
            .iter()
            .map(|gate| gate.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        details.push((String::from("Markers"), joined.normal()));
    }

    if !case.requires.is_empty() {
        let joined: String = case
            .requires
            .iter()
            .map(|req| req.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        details.push((String::from("Requires"), joined.normal()));
    }

    details
}
