//! Human readable trace of a smoke-test run.
//!
//! Everything the operator is meant to read goes through a [`Reporter`];
//! diagnostics go through `tracing` instead.

use serde_json::Value;
use std::io::Write;
use std::sync::{Arc, Mutex};

const SECTION_WIDTH: usize = 50;
const STAGE_WIDTH: usize = 60;
const SUBSECTION_WIDTH: usize = 40;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct Reporter {
    sink: Sink,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

/// In-memory copy of everything a [`Reporter`] printed.
#[derive(Clone, Default, Debug)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut buffer) => buffer.write(buf),
            Err(_) => Err(std::io::Error::other("captured output poisoned")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Reporter {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// A reporter writing into memory, for tests.
    pub fn captured() -> (Self, CapturedOutput) {
        let output = CapturedOutput::default();
        (Self::new(output.clone()), output)
    }

    pub fn line(&self, message: impl AsRef<str>) {
        let Ok(mut sink) = self.sink.lock() else {
            tracing::warn!("Report sink lock is poisoned, dropping line: {}", message.as_ref());
            return;
        };
        if let Err(e) = writeln!(sink, "{}", message.as_ref()).and_then(|_| sink.flush()) {
            tracing::warn!("Failed to write report line: {}", e);
        }
    }

    /// `####` banner around a top level stage of a run.
    pub fn stage(&self, title: impl AsRef<str>) {
        self.banner('#', STAGE_WIDTH, title.as_ref());
    }

    /// `====` banner around a single step.
    pub fn section(&self, title: impl AsRef<str>) {
        self.banner('=', SECTION_WIDTH, title.as_ref());
    }

    /// `****` banner around a group of steps.
    pub fn subsection(&self, title: impl AsRef<str>) {
        self.banner('*', SUBSECTION_WIDTH, title.as_ref());
    }

    pub fn rule(&self) {
        self.line("=".repeat(STAGE_WIDTH));
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.line(format!("✅ {}", message.as_ref()));
    }

    pub fn failure(&self, message: impl AsRef<str>) {
        self.line(format!("❌ {}", message.as_ref()));
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.line(format!("ℹ️ {}", message.as_ref()));
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.line(format!("⚠️ {}", message.as_ref()));
    }

    pub fn request(&self, service: &str, method: &str, endpoint: &str) {
        self.line(format!("\n🔄 [{}] {} {}", service, method, endpoint));
    }

    pub fn request_body(&self, body: &Value) {
        self.line(format!("📤 Request: {}", pretty(body)));
    }

    pub fn request_params(&self, params: &Value) {
        self.line(format!("📋 Params: {}", pretty(params)));
    }

    pub fn status(&self, status: u16) {
        self.line(format!("📊 Status: {}", status));
    }

    pub fn response_json(&self, body: &Value) {
        self.line(format!("📥 Response: {}", pretty(body)));
    }

    pub fn response_text(&self, text: &str) {
        self.line(format!("📥 Response: {}", text));
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.line(format!("❌ Error: {}", message.as_ref()));
    }

    fn banner(&self, fill: char, width: usize, title: &str) {
        let rule: String = std::iter::repeat_n(fill, width).collect();
        self.line(format!("\n{}\n{}\n{}", rule, title, rule));
    }
}

/// Indented JSON with non-ASCII characters left as they are.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
