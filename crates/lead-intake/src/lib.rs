//! Lead intake and qualification scoring for solar form submissions.
//!
//! Form answers arrive as loosely-keyed JSON, get scored by
//! [`workflows::leads::score_lead`], and are upserted into the Airtable
//! lead table through the [`workflows::leads::LeadStore`] seam.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
