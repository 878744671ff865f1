//! Core domain models for stream-gen.
//!
//! This module contains the data model shared by the matchers, the decoder
//! and the segmentation engine: markers, entities, segments and parse
//! results. These are pure domain models with no I/O dependencies.

pub mod entity;
pub mod marker;
pub mod segment;

pub use entity::{CalendarEvent, Contact, Entity, EntityKind, Fields, KindSpec};
pub use marker::{Completeness, Marker, SyntaxMode};
pub use segment::{Diagnostic, ParseResult, Segment};
