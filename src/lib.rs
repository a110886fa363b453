//! Business email drafting with signature, CTA and subject policy enforcement.

pub mod composer;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod request;
