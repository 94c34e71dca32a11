mod reader;

pub use reader::{EditorReader, LineReader, StreamReader};

use crate::error::ShellError;
use std::io::IsTerminal;

/// Pick the line editor for terminals and plain line reads for pipes/files.
pub fn stdin_reader() -> Result<Box<dyn LineReader>, ShellError> {
    if std::io::stdin().is_terminal() {
        Ok(Box::new(EditorReader::new()?))
    } else {
        Ok(Box::new(StreamReader::new(
            std::io::stdin().lock(),
            std::io::stdout(),
        )))
    }
}
