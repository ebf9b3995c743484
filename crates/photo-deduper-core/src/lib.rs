//! Core functionality for removing byte-identical duplicate photos.
//!
//! A run over one directory goes through three phases:
//! - Discovery: the images directly inside the directory
//! - Fingerprinting: a Blake3 digest of each file's full content
//! - Deduplication: group by digest, keep one file per group, delete the rest
//!
//! The deletion plan is built before anything is removed, so a dry run
//! exercises the same path without touching the disk.

// -- External Dependencies --
use log::info;

// -- Standard Library --
use std::path::Path;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use action::{GroupOutcome, Removal, RunReport};
pub use config::*;
pub use deduplication::{DedupPlan, GroupPlan};
pub use error::{Error, Result};
pub use report::{format_size, write_report};
pub use types::*;

// -- Public Modules --
pub mod action;
pub mod config;
pub mod deduplication;
pub mod discovery;
pub mod logging;
pub mod processing;
pub mod report;
pub mod safety;
pub mod types;

/// Main entry point for the deduplication process
pub struct PhotoDeduper {
    config: Config,
    safety_manager: safety::SafetyManager,
}

impl PhotoDeduper {
    /// Create a new PhotoDeduper after validating the configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            safety_manager: safety::SafetyManager::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover all images in the configured directory
    pub fn discover_images(&self) -> Result<Vec<ImageFile>> {
        discovery::discover_images(&self.config.directory)
    }

    /// Scan, fingerprint and group without touching the disk
    pub fn plan(&self) -> Result<DedupPlan> {
        let directory: &Path = &self.config.directory;

        info!("Discovering photos in {}", directory.display());
        let images = self.discover_images()?;
        let files_scanned = images.len();
        info!("Found {} photos", files_scanned);

        let fingerprints = processing::fingerprint_images(
            images,
            self.config.effective_threads(),
            self.config.show_progress,
        )?;

        let plan = deduplication::build_plan(
            files_scanned,
            fingerprints.entries,
            fingerprints.failures,
            self.config.keeper_rule,
        );
        info!(
            "{} duplicate group(s), {} file(s) to remove",
            plan.groups.len(),
            plan.candidate_count()
        );

        Ok(plan)
    }

    /// Run the full deduplication pipeline
    ///
    /// Fails only when the directory itself is missing or unreadable; every
    /// per-file problem ends up in the returned report.
    pub fn run(&self) -> Result<RunReport> {
        let plan = self.plan()?;

        Ok(action::execute_plan(
            self.config.directory.clone(),
            plan,
            &self.safety_manager,
            self.config.dry_run,
        ))
    }
}
