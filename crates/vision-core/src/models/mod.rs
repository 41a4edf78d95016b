//! Data models for vision submissions and email templates.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures stay separate from
//! presentation.
//!
//! # Submission lifecycle
//!
//! ```text
//! started ──▶ step-1-in-progress ──▶ step-2-in-progress ──▶ ... ──▶ completed
//!  (form)          (builder markers, written by the form)      (workflow)
//! ```
//!
//! [`SubmissionStatus`] implements [`Ord`] following this sequence, and the
//! store refuses writes that would move a submission backwards.
//!
//! # Examples
//!
//! ```rust
//! use vision_core::models::{AreaOfLife, SubmissionStatus};
//!
//! let status: SubmissionStatus = "step-2-in-progress".parse().unwrap();
//! assert!(status > SubmissionStatus::Started);
//! assert!(status < SubmissionStatus::Completed);
//!
//! let area: AreaOfLife = "health-fitness".parse().unwrap();
//! assert_eq!(area.label(), "Health & Fitness");
//! ```

pub mod status;
pub mod submission;
pub mod template;


pub use status::{AreaOfLife, SubmissionStatus};
pub use submission::VisionSubmission;
pub use template::{EmailTemplate, ADMIN_TEMPLATE_KEY, RESULTS_TEMPLATE_KEY};
