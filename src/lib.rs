//! # sysreport
//!
//! A cross-platform host telemetry and package inventory reporting tool
//! written in Rust.
//!
//! ## Overview
//!
//! sysreport ships two standalone command-line reporters built on one shared
//! library:
//!
//! - `host-report` queries the operating system for identity, CPU, memory,
//!   disk, network, boot time, process and service information and prints a
//!   sectioned plain-text report.
//! - `package-report` lists the packages installed through the host package
//!   manager and, through a pluggable registry lookup, reports packages whose
//!   installed version lags behind the latest published one.
//!
//! ## Features
//!
//! - **Cross-platform support**: Windows, macOS, and Linux
//! - **Injectable OS layer**: every host query goes through the
//!   [`facts::HostFacts`] trait so tests can substitute fixed snapshots
//! - **Soft failure model**: individual query failures surface as inline
//!   report text and never abort the remaining sections
//! - **Human-readable sizes**: every byte counter is rendered through one
//!   binary (base-1024) size formatter
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use sysreport::facts::LiveHostFacts;
//! use sysreport::report::HostReport;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut facts = LiveHostFacts::new();
//! let mut buf = Vec::new();
//! HostReport::new(&mut facts, &mut buf, Duration::from_millis(500)).run()?;
//! print!("{}", String::from_utf8_lossy(&buf));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Core data models for both reports
//! - [`facts`]: OS facilities provider trait and the live implementation
//! - [`packages`]: Package inventory collection and registry comparison
//! - [`report`]: Plain-text report assembly for both binaries
//! - [`utils`]: Size and timestamp formatting helpers
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Application constants and configuration values
pub mod constants;

/// OS facilities provider abstraction and live implementation
pub mod facts;

/// Core data models for host and package reports
pub mod models;

/// Package inventory collection and registry version comparison
pub mod packages;

/// Plain-text report assembly
pub mod report;

/// Formatting utilities shared by both reporters
pub mod utils;
