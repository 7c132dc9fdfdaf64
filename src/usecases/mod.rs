//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `ProxyService`: Collect → Sign → Forward pipeline for every route

pub mod proxy;

pub use proxy::{ParamSource, ProxyService};
