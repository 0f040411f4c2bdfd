//! Diagnostic sinks: where the sweep reports progress and failures.

use std::sync::Mutex;

/// Ordered, human-readable messages from a sweep.
pub trait DiagnosticSink: Send + Sync {
    fn write(&self, message: &str);

    /// A message describing why the sweep stopped.
    fn fail(&self, message: &str) {
        self.write(message);
    }
}

/// Forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn write(&self, message: &str) {
        tracing::info!(target: "foldsweep::diagnostics", "{message}");
    }

    fn fail(&self, message: &str) {
        tracing::error!(target: "foldsweep::diagnostics", "{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn write(&self, message: &str) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(message.to_string());
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<T> {
    fn write(&self, message: &str) {
        (**self).write(message);
    }

    fn fail(&self, message: &str) {
        (**self).fail(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_keeps_order() {
        let sink = MemoryDiagnostics::new();
        sink.write("first");
        sink.fail("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_shared_sink_sees_writes() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let boxed: Box<dyn DiagnosticSink> = Box::new(Arc::clone(&sink));
        boxed.write("through the box");
        assert_eq!(sink.messages(), vec!["through the box"]);
    }
}
