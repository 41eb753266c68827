//! # Go Formatter
//!
//! Shells out to `gofmt` to pretty-print emitted Go source. A dedicated
//! pretty-printer pass after template execution, in the same spirit as a
//! `prettyplease`-based formatting stage, but since the emitted target
//! language here is Go text rather than a `syn`/`proc-macro2` AST, there is
//! no in-process formatter available, so this shells out. Fails open: if
//! `gofmt` is absent or exits non-zero, the unformatted text is returned
//! unchanged so generation never blocks on tooling the caller's environment
//! may not have installed.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs `gofmt` over `source`, returning the formatted text on success and
/// the original, unformatted text on any failure (missing binary, I/O
/// error, non-UTF8 output, or a non-zero exit status).
pub fn format_go(source: &str) -> String {
    let Ok(mut child) = Command::new("gofmt")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    else {
        return source.to_string();
    };

    let Some(mut stdin) = child.stdin.take() else {
        return source.to_string();
    };
    if stdin.write_all(source.as_bytes()).is_err() {
        return source.to_string();
    }
    drop(stdin);

    match child.wait_with_output() {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| source.to_string())
        }
        _ => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_panics_when_gofmt_is_absent_or_input_is_garbage() {
        let source = "package main\nfunc main() {\n";
        let formatted = format_go(source);
        assert!(!formatted.is_empty());
    }
}
