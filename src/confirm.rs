//! Operator confirmation before the destination database gets cleared.
use std::io::{BufRead, Write};

/// the only answer which lets the copy go on.
const CONFIRM_ANSWER: &str = "yes";

/// Ask the operator on `output` whether database `db_name` may be cleared, read the answer
/// from `input`.
///
/// Returns true only when the answer is exactly `yes`.  Any other answer, an empty input or
/// an io error means no.
pub fn confirm_clear<R: BufRead, W: Write>(db_name: &str, mut input: R, mut output: W) -> bool {
    if write!(output, "database {} will be cleared\nContinue? yes/No ", db_name)
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => answer.trim() == CONFIRM_ANSWER,
    }
}
