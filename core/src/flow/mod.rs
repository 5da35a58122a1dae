// bazaar/src/flow/mod.rs

//! A small step-ordered workflow engine.
//!
//! A `Flow<TData, Err>` is an ordered list of named steps. Each step may carry
//! `before`, `on` and `after` handlers which receive a shared
//! `FlowContext<TData>` and decide whether the flow continues or stops.
//! The dashboard pages express their multi-step submit and delete sequences
//! (session check, validation, confirmation, permission check, persistence,
//! reload) as flows so that every halting point is explicit.

pub mod context;
pub mod control;
pub mod definition;
pub mod error;
pub mod execution;
pub mod hooks;
pub mod step;

pub use context::FlowContext;
pub use control::{FlowOutcome, StepControl};
pub use definition::Flow;
pub use error::FlowError;
pub use hooks::Handler;
pub use step::{SkipCondition, StepDef};
