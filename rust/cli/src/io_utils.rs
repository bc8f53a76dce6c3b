//! Input helpers for interactive commands.

use std::io::BufRead;

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Trims whitespace from the input and returns `None` on EOF or read errors.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// # use monkeybet_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("bet red\n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("bet red"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_lines_are_empty_not_eof() {
        let mut input = Cursor::new("   \npass\n");
        assert_eq!(read_stdin_line(&mut input).as_deref(), Some(""));
        assert_eq!(read_stdin_line(&mut input).as_deref(), Some("pass"));
        assert_eq!(read_stdin_line(&mut input), None);
    }
}
