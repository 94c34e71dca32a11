use std::io::{BufRead, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::ShellError;

/// Source of input lines. `Ok(None)` means end of input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Interactive input through rustyline, with in-memory history.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> Result<Self, ShellError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        log::warn!("couldn't add to history: {}", e);
                    }
                }
                Ok(Some(line))
            }
            // ^C at the prompt abandons the line; the shell itself is never interrupted.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads lines of any length from a byte stream, echoing the prompt to `out`.
pub struct StreamReader<R, W> {
    input: R,
    out: W,
    buf: Vec<u8>,
}

impl<R: BufRead, W: Write> StreamReader<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead, W: Write> LineReader for StreamReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        self.buf.clear();
        if self.input.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
