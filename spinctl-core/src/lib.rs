//! spinctl Core
//!
//! Core types for the spinctl Gate client.
//!
//! This crate contains the domain types decoded from and sent to the Gate
//! API (pipeline executions and pipeline configs). It has no knowledge of
//! HTTP; the transport lives in `spinctl-client`.

pub mod domain;
