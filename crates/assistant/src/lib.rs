//! Assistant flows backed by an external text-generation service.
//!
//! The service is modeled as a single capability: hand it an instruction
//! block plus the JSON shape the answer must take, get back a value in that
//! shape or an error. Two flows sit on top:
//!
//! - `NegotiationAssistant` — drafts the next message (and optionally a new
//!   price) for an ongoing buyer/seller negotiation.
//! - `MarketAnalyst` — produces a descriptive market report for a
//!   brand/model/trim/location query.
//!
//! Both flows validate their input before the service is contacted, validate
//! the output shape strictly, and otherwise pass the generated content
//! through untouched. The generator decides prices and wording; nothing here
//! second-guesses it.

pub mod client;
pub mod generate;
pub mod insight;
pub mod negotiation;
pub mod prompts;

pub use client::GenerationClient;
pub use generate::{GenerationError, GenerationRequest, StructuredGenerator};
pub use insight::MarketAnalyst;
pub use negotiation::NegotiationAssistant;
pub use prompts::PromptLibrary;
