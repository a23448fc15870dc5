//! pcbdoc-core: document engine for KiCad `.kicad_pcb` board files.
//!
//! Parses a board file into a typed, mutable, indexed in-memory model and
//! serializes it back with format fidelity: content that was never
//! touched is reproduced byte for byte, while modified and newly created
//! elements are rendered in the tool's canonical style. Elements the
//! engine has no schema for -- future tags, `setup` internals, computed
//! zone fills -- are preserved opaquely and round-trip unchanged.
//!
//! # Public API
//!
//! - [`Document::parse`] / [`format_document`] -- load and save a board
//!   as text; [`io::load_board`] / [`io::save_board`] wrap them for files
//! - [`Document`] -- arena of [`Entity`] values keyed by stable
//!   [`EntityId`], with per-field setters and lazy secondary indexes
//!   ([`Document::footprints`], [`Document::tracks`], ...)
//! - [`factory`] -- constructors for new footprints, pads, tracks, vias
//! - [`Diagnostic`] -- non-fatal findings (unknown tags, dangling nets)
//!
//! The engine is synchronous and single-owner: load, mutate and save are
//! sequential phases, lookups rebuild stale indexes in place, and callers
//! wanting cross-thread read sharing call [`Document::refresh_indexes`]
//! first and stop mutating.

pub mod collections;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod io;
pub mod node;
pub mod registry;
pub mod tokenizer;
pub mod units;
mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use collections::{DocumentStats, FootprintIndex, NetIndex, TrackIndex, ViaIndex, ZoneIndex};
pub use config::{BoardConfig, TrackConfig, ViaConfig};
pub use document::{Document, Entity, EntityId};
pub use elements::{
    Element, Footprint, General, Graphic, Group, Layer, LayerTable, Net, Pad, Property, Track,
    Via, Zone,
};
pub use error::{Diagnostic, DocumentError, EditError, IoError, SchemaError, SyntaxError};
pub use formatter::format_document;
pub use node::Node;
pub use registry::{ParseCtx, SectionKind};
pub use tokenizer::tokenize;
pub use units::{Angle, At, Coord, Point};
pub use validate::validate_reference;

/// Parse a complete board text. Shorthand for [`Document::parse`].
pub fn parse_document(text: &str) -> Result<Document, DocumentError> {
    Document::parse(text)
}
