//! Display formatting for models, collections and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the wrappers here add context such as "created" banners or list layout.
//! Everything renders as markdown.
//!
//! ```rust
//! use vision_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Template saved".to_string());
//! assert_eq!(status.to_string(), "Success: Template saved\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Submissions, Templates};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, GenerationReport};
pub use status::{OperationStatus, StatusKind};
