use std::fmt;

use crate::process::Mode;

const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    pub args: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub background: bool,
}

impl Command {
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn mode(&self) -> Mode {
        if self.background {
            Mode::Background
        } else {
            Mode::Foreground
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line held only redirections and/or `&`.
    Empty,
    MissingRedirectTarget(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::MissingRedirectTarget(op) => {
                write!(f, "syntax error: expected a path after `{}`", op)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Blank lines and comments never reach [`parse`].
pub fn is_ignorable(line: &str) -> bool {
    let line = line.trim_start_matches(DELIMITERS);
    line.is_empty() || line.starts_with('#')
}

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut command = Command::default();
    let mut tokens = line.split(DELIMITERS).filter(|t| !t.is_empty());

    while let Some(token) = tokens.next() {
        match token {
            "<" => {
                let path = tokens.next().ok_or(ParseError::MissingRedirectTarget('<'))?;
                command.input = Some(path.to_string());
            }
            ">" => {
                let path = tokens.next().ok_or(ParseError::MissingRedirectTarget('>'))?;
                command.output = Some(path.to_string());
            }
            // TODO: only honour `&` as the last token once the product decision lands.
            "&" => command.background = true,
            arg => command.args.push(arg.to_string()),
        }
    }

    if command.args.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(command)
}
