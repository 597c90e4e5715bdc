/// Receives the session's human-readable status lines.
pub trait Logger {
    fn line(&mut self, text: &str);

    /// A line reporting a fatal failure.
    fn error(&mut self, text: &str) {
        self.line(text);
    }
}

/// Forwards status lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn line(&mut self, text: &str) {
        tracing::info!("{text}");
    }

    fn error(&mut self, text: &str) {
        tracing::error!("{text}");
    }
}

/// Keeps every status line in memory, one entry per call.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    lines: Vec<String>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines, each line terminated.
    pub fn text(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }
}

impl Logger for MemoryLogger {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn line(&mut self, text: &str) {
        (**self).line(text);
    }

    fn error(&mut self, text: &str) {
        (**self).error(text);
    }
}
