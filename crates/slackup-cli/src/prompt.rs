//! Interactive confirmation prompt.

use std::io::{self, BufRead, Write};

/// Asks a y/N question on the terminal. Anything but an explicit `y`
/// (including EOF or a read error) answers no.
pub fn confirm(message: &str) -> bool {
    print!("{message} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}
