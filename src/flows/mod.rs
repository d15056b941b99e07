//! Built-in donation scripts.
//!
//! Real deployments ship their own inspection scripts; the engine treats
//! them as opaque. [`demo::DemoFlow`] is a small built-in flow used by
//! the CLI and the integration tests.

pub mod demo;

pub use demo::DemoFlow;
