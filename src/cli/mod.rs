//! CLI infrastructure for the qsteer toolkit
//!
//! This module provides the command-line interface for creating, training,
//! evaluating and inspecting steering models.

pub mod commands;
pub mod config;
pub mod output;
