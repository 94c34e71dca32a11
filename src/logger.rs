use std::io::{IsTerminal, Write};

use inksac::prelude::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes `smallsh: <level>: <message>` lines to a stream, stderr by default.
pub struct ShellLogger<W: Send + Sync>
where
    for<'a> &'a W: Write,
{
    target: W,
    prefix: &'static str,
    colored: bool,
    level: LevelFilter,
}

impl<W: Send + Sync> ShellLogger<W>
where
    for<'a> &'a W: Write,
{
    pub fn new(target: W, prefix: &'static str, colored: bool, level: LevelFilter) -> Self {
        Self {
            target,
            prefix,
            colored,
            level,
        }
    }

    fn level_tag(&self, level: Level) -> String {
        let tag = level.as_str().to_lowercase();
        if !self.colored {
            return tag;
        }

        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug | Level::Trace => Color::RGB(128, 128, 128),
        };
        let style = Style::builder().foreground(color).bold().build();
        tag.style(style).to_string()
    }
}

impl ShellLogger<std::io::Stderr> {
    pub fn to_stderr(prefix: &'static str, level: LevelFilter) -> Self {
        let colored = std::io::stderr().is_terminal()
            && !matches!(
                check_color_support().unwrap_or(ColorSupport::NoColor),
                ColorSupport::NoColor
            );
        Self::new(std::io::stderr(), prefix, colored, level)
    }
}

impl<W: Send + Sync> Log for ShellLogger<W>
where
    for<'a> &'a W: Write,
{
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                &self.target,
                "{}{}: {}",
                self.prefix,
                self.level_tag(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = (&self.target).flush();
    }
}

/// Install the stderr logger. Only the first call has any effect.
pub fn init(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(ShellLogger::to_stderr("smallsh: ", level))).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, RwLock};

    struct Buffer(Arc<RwLock<Vec<u8>>>);

    impl Write for &Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.write().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_lines_carry_prefix_and_level() {
        let data = Arc::new(RwLock::new(Vec::new()));
        let logger = ShellLogger::new(Buffer(data.clone()), "smallsh: ", false, LevelFilter::Warn);

        logger.log(
            &Record::builder()
                .args(format_args!("background pid 42 vanished"))
                .level(Level::Warn)
                .build(),
        );

        assert_eq!(
            String::from_utf8(data.read().unwrap().clone()).unwrap(),
            "smallsh: warn: background pid 42 vanished\n"
        );
    }

    #[test]
    fn records_above_the_level_are_dropped() {
        let data = Arc::new(RwLock::new(Vec::new()));
        let logger = ShellLogger::new(Buffer(data.clone()), "smallsh: ", false, LevelFilter::Warn);

        logger.log(
            &Record::builder()
                .args(format_args!("spawned pid 7"))
                .level(Level::Debug)
                .build(),
        );

        assert!(data.read().unwrap().is_empty());
    }
}
