//! tidybox - organize a directory into age- and type-based subfolders
//!
//! This library scans a target directory (and the category subfolders it
//! previously created), classifies each file by age and extension, and
//! relocates it into a normalized folder structure. Name collisions are
//! resolved with a numbered suffix that never stacks, and a dry-run mode
//! reports every decision without touching the filesystem.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;

pub use classifier::{Category, Classifier, ExtensionTable, OverlappingExtension, RECENT_WINDOW};
pub use config::{Config, ConfigError};
pub use organizer::{Organizer, OrganizeError, Outcome, resolve_collision};

pub use cli::{Cli, run};
