//! Argument string → argv.
//!
//! The configured argument string is a single command line in the
//! `ProcessStartInfo.Arguments` / `CommandLineToArgvW` convention: only double
//! quotes group, and nothing is expanded.

use std::{iter::Peekable, str::Chars};

/// Split `input` into arguments.
///
/// - spaces and tabs separate arguments outside double quotes;
/// - `"` toggles grouping; inside a group `""` is a literal quote;
/// - `'` is an ordinary character;
/// - `\` is literal unless a run of backslashes ends at `"`: then `2n`
///   backslashes give `n` and the quote still toggles, `2n+1` give `n` and a
///   literal quote.
///
/// An unterminated group runs to the end of the input.
pub fn split_arguments(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| is_separator(*c)).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        args.push(next_argument(&mut chars));
    }
    args
}

fn next_argument(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut arg = String::new();
    let mut quoted = false;

    while let Some(&c) = chars.peek() {
        match c {
            '\\' => {
                let mut backslashes = 0;
                while chars.next_if_eq(&'\\').is_some() {
                    backslashes += 1;
                }
                if chars.peek() == Some(&'"') {
                    arg.extend(std::iter::repeat_n('\\', backslashes / 2));
                    if backslashes % 2 == 1 {
                        chars.next();
                        arg.push('"');
                    }
                } else {
                    arg.extend(std::iter::repeat_n('\\', backslashes));
                }
            }
            '"' => {
                chars.next();
                if quoted && chars.next_if_eq(&'"').is_some() {
                    arg.push('"');
                } else {
                    quoted = !quoted;
                }
            }
            c if is_separator(c) && !quoted => break,
            c => {
                chars.next();
                arg.push(c);
            }
        }
    }
    arg
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// `-c "<script>"` for `/bin/sh`, with the script's own double quotes escaped.
#[cfg(test)]
pub(crate) fn sh_args(script: &str) -> String {
    format!(r#"-c "{}""#, script.replace('"', r#"\""#))
}
