mod client_evaluator;

pub use client_evaluator::{discard_sink, ClientEvaluator, DiagnosticSink};
