//! Development log format: `HH:MM:SS.mmm LEVEL [target] span: fields`

use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, format};
use tracing_subscriber::registry::LookupSpan;

/// Readable single-line formatter, colored when `ansi` is set
#[derive(Debug, Clone, Copy)]
pub struct DevelopmentFormatter {
    ansi: bool,
}

impl DevelopmentFormatter {
    /// Create a formatter
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    fn level_label(&self, level: tracing::Level) -> &'static str {
        match (level, self.ansi) {
            (tracing::Level::TRACE, true) => "\x1b[36mTRACE\x1b[0m",
            (tracing::Level::DEBUG, true) => "\x1b[34mDEBUG\x1b[0m",
            (tracing::Level::INFO, true) => "\x1b[32mINFO \x1b[0m",
            (tracing::Level::WARN, true) => "\x1b[33mWARN \x1b[0m",
            (tracing::Level::ERROR, true) => "\x1b[31mERROR\x1b[0m",
            (tracing::Level::TRACE, false) => "TRACE",
            (tracing::Level::DEBUG, false) => "DEBUG",
            (tracing::Level::INFO, false) => "INFO ",
            (tracing::Level::WARN, false) => "WARN ",
            (tracing::Level::ERROR, false) => "ERROR",
        }
    }
}

impl Default for DevelopmentFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Wall-clock time of day with milliseconds, local when the offset is known
fn clock() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[hour]:[minute]:[second].[subsecond digits:3]"))
        .unwrap_or_default()
}

impl<S, N> FormatEvent<S, N> for DevelopmentFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "{} {} [{}] ",
            clock(),
            self.level_label(*metadata.level()),
            metadata.target()
        )?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}: ", span.name())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels() {
        let plain = DevelopmentFormatter::new(false);
        assert_eq!(plain.level_label(tracing::Level::WARN), "WARN ");

        let colored = DevelopmentFormatter::default();
        assert!(colored.level_label(tracing::Level::ERROR).contains("ERROR"));
        assert!(colored.level_label(tracing::Level::ERROR).starts_with("\x1b[31m"));
    }

    #[test]
    fn test_clock_shape() {
        let time = clock();
        assert_eq!(time.len(), "12:34:56.789".len());
        assert_eq!(time.matches(':').count(), 2);
    }
}
