//! Pipeline orchestration and artifact metadata.
//!
//! # Example
//!
//! ```no_run
//! use planner_bundler::bundler::{Pipeline, PipelineReport, Settings};
//!
//! # async fn example(settings: Settings) -> planner_bundler::bundler::Result<()> {
//! let pipeline = Pipeline::new(settings);
//! let prepared = pipeline.prepare_environment().await?;
//! let bundle = pipeline.bundle(&prepared).await?;
//! let installer = pipeline.build_installer(false).await;
//!
//! let report = PipelineReport::new(pipeline.settings(), &prepared, bundle, installer);
//! pipeline.write_report(&report).await?;
//! println!("{}", report.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - [`Pipeline`] and its report types

pub mod checksum;
mod orchestrator;

pub use orchestrator::{Pipeline, PipelineReport, RunStatus, Stage};
