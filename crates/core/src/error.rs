//! Error taxonomy for the board document engine.
//!
//! Fatal errors ([`SyntaxError`], [`SchemaError`], [`DocumentError`]) abort a
//! parse -- a caller either receives a complete, internally consistent
//! [`Document`](crate::Document) or an error, never a half-built one.
//! Non-fatal findings ([`Diagnostic`]) are collected alongside a valid
//! document and never block construction.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ──────────────────────────────────────────────
// Fatal errors
// ──────────────────────────────────────────────

/// A malformed token stream: unbalanced parentheses, an unterminated
/// string, or an invalid numeric literal. Carries the byte offset of the
/// offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at byte {offset}: {message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            offset,
            message: message.into(),
        }
    }
}

/// A recognized element is missing a required field or has the wrong arity
/// for a required positional group. Unrecognized *optional* sub-nodes are
/// never a schema error -- they are preserved in the element's extra bag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema error in ({tag} ...): field `{field}`: {reason}")]
pub struct SchemaError {
    pub tag: &'static str,
    pub field: &'static str,
    pub reason: String,
}

impl SchemaError {
    pub fn missing(tag: &'static str, field: &'static str) -> Self {
        SchemaError {
            tag,
            field,
            reason: "required field is missing".into(),
        }
    }

    pub fn invalid(tag: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        SchemaError {
            tag,
            field,
            reason: reason.into(),
        }
    }
}

/// Any fatal failure while building a [`Document`](crate::Document) from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The top-level form is not a `kicad_pcb` list.
    #[error("not a KiCad board file: top-level form is `{found}`")]
    NotABoard { found: String },
}

// ──────────────────────────────────────────────
// Mutation errors
// ──────────────────────────────────────────────

/// Failures of the entity mutation API. These are caller mistakes (stale
/// id, wrong entity kind, policy violation), not document corruption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no entity with id {id}")]
    NoSuchEntity { id: String },
    #[error("entity {id} is a {actual}, expected {expected}")]
    WrongKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid reference designator `{value}`: {reason}")]
    InvalidReference { value: String, reason: &'static str },
    #[error("reference `{reference}` is already used by footprint {holder}")]
    DuplicateReference { reference: String, holder: String },
    #[error("entity id {id} already exists in this document")]
    DuplicateId { id: String },
}

// ──────────────────────────────────────────────
// Load/save wrapper errors
// ──────────────────────────────────────────────

/// Errors raised by the thin file wrapper in [`crate::io`]. The parser and
/// formatter core never touch the filesystem themselves.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} does not have the .kicad_pcb extension", path.display())]
    Extension { path: PathBuf },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

// ──────────────────────────────────────────────
// Diagnostics
// ──────────────────────────────────────────────

/// Non-fatal findings collected during load or on-demand validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A top-level tag with no registry entry. The element is preserved
    /// opaquely and round-trips byte-for-byte.
    UnknownElement { tag: String, offset: usize },
    /// An entity references a net ordinal with no matching `net`
    /// declaration. The source tool tolerates dangling references during
    /// editing, so this never blocks a load.
    DanglingNet { entity: String, net: i64 },
    /// An entity references a layer name absent from the layer table.
    UnknownLayer { entity: String, layer: String },
}

impl Diagnostic {
    /// True for the referential (net/layer) warnings, false for notices.
    pub fn is_referential(&self) -> bool {
        matches!(
            self,
            Diagnostic::DanglingNet { .. } | Diagnostic::UnknownLayer { .. }
        )
    }
}
