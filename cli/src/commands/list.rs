use reachr_core::suite::Suite;

use crate::mprint;
use crate::terminal::{format, print};

pub fn list() {
    let suite = Suite::standard();
    let cases = suite.cases();

    for (idx, case) in cases.iter().enumerate() {
        print::tree_head(idx, &case.name);
        print::as_tree_one_level(format::case_to_details(case));
        if idx + 1 != cases.len() {
            mprint!();
        }
    }
}
