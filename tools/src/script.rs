//! Key script parsing for compose-replay.
//!
//! A script is plain text where every character is one key, plus brace
//! escapes for keys and engine operations that are awkward to type:
//! `{bs}`, `{enter}`, `{esc}`, `{tab}`, `{space}`, `{sel:N}`, `{commit}`,
//! `{cancel}`, `{reset}`. `{{` is a literal `{`.

use anyhow::{bail, Result};
use libcompose_core::{BACKSPACE, ESCAPE};

/// One replay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Key(char),
    Select(usize),
    Commit,
    Cancel,
    Reset,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Key(BACKSPACE) => write!(f, "{{bs}}"),
            Step::Key(ESCAPE) => write!(f, "{{esc}}"),
            Step::Key('\n') => write!(f, "{{enter}}"),
            Step::Key('\t') => write!(f, "{{tab}}"),
            Step::Key(' ') => write!(f, "{{space}}"),
            Step::Key(key) => write!(f, "{}", key),
            Step::Select(index) => write!(f, "{{sel:{}}}", index),
            Step::Commit => write!(f, "{{commit}}"),
            Step::Cancel => write!(f, "{{cancel}}"),
            Step::Reset => write!(f, "{{reset}}"),
        }
    }
}

/// Parse a script into steps.
pub fn parse(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut chars = script.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            steps.push(Step::Key(ch));
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for next in chars.by_ref() {
            if next == '{' && name.is_empty() {
                // "{{" escapes a literal brace
                steps.push(Step::Key('{'));
                closed = true;
                break;
            }
            if next == '}' {
                steps.push(parse_escape(&name)?);
                closed = true;
                break;
            }
            name.push(next);
        }
        if !closed {
            bail!("unterminated escape '{{{}'", name);
        }
    }
    Ok(steps)
}

fn parse_escape(name: &str) -> Result<Step> {
    let step = match name {
        "bs" => Step::Key(BACKSPACE),
        "enter" => Step::Key('\n'),
        "esc" => Step::Key(ESCAPE),
        "tab" => Step::Key('\t'),
        "space" => Step::Key(' '),
        "commit" => Step::Commit,
        "cancel" => Step::Cancel,
        "reset" => Step::Reset,
        _ => match name.strip_prefix("sel:") {
            Some(index) => match index.parse() {
                Ok(index) => Step::Select(index),
                Err(_) => bail!("invalid candidate index in '{{{}}}'", name),
            },
            None => bail!("unknown escape '{{{}}}'", name),
        },
    };
    Ok(step)
}
