//! Webhook message pipeline.
//!
//! Inbound GroupMe callbacks flow through:
//! 1. `RulesEngine::evaluate()` classifies the message
//! 2. `MessageProcessor::process()` runs the matching action and reports an `Outcome`

pub mod processor;
pub mod rules;
pub mod types;

pub use processor::{MessageProcessor, ProcessorSettings};
pub use rules::RulesEngine;
pub use types::{Classification, InboundMessage, Outcome};
