//! Output generation for a finished scan.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`RadarReport`](crate::models::RadarReport) as JSON for API consumption
//! - [`markdown`]: Renders the report as Markdown for stdout and for disk
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2026-10-16/
//!     └── radar.json
//!
//! markdown_output_dir/
//! └── 2026-10-16_radar.md
//! ```

pub mod json;
pub mod markdown;
