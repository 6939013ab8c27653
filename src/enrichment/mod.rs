//! Media enrichment via the iTunes Search API.
//!
//! This module provides the API client used by the `cli-enrich` binary to
//! resolve media links and durations for songs that are missing them.

pub mod itunes;
