//! Shared collection point for routing diagnostics.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::renderer::DiagnosticRenderer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Diagnostics gathered from one or more routing calls.
///
/// The compiler itself returns its errors by value. A sink is for callers
/// that merge the results of several compilations of one circuit, e.g. one
/// per editor view, and may do so from several threads.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a diagnostic. Errors are also counted.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.lock().push(diag);
    }

    /// Returns `true` once any error has been emitted, even if drained since.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors emitted over the lifetime of the sink.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Number of pending diagnostics carrying `code`.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.lock().iter().filter(|d| d.code == code).count()
    }

    /// Drains the pending diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Copies the pending diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Renders every pending diagnostic, one block after another.
    pub fn render(&self, renderer: &dyn DiagnosticRenderer) -> String {
        self.lock().iter().map(|d| renderer.render(d)).collect()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
