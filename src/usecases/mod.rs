//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates the stage ports into the purchase workflow.
//!
//! Use cases:
//! - `PurchasePipeline`: fiat conversion -> crypto buy -> NFT ticket buy

pub mod purchase_pipeline;

pub use purchase_pipeline::{PipelineSettings, PipelineState, PurchasePipeline};
