//! Typed element records and their parse/format pairs.
//!
//! Each module holds the record for one element family, a `parse` function
//! reading the element's list node, and a `to_node` function that is its
//! exact mirror. Parse functions read required positional sub-nodes by
//! position, keyword sub-lists by tag in any order, apply documented
//! defaults for absent optionals, and collect anything unrecognized into
//! the record's `extra` bag for verbatim replay.

use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{coord_from, Angle, At, Coord, Point};

mod footprint;
mod graphics;
mod group;
mod header;
mod net;
mod track;
mod via;
mod zone;

pub use footprint::{Drill, Effects, Footprint, FpGraphic, Model3d, Pad, Property};
pub use graphics::Graphic;
pub use group::Group;
pub use header::{General, Generator, GeneratorVersion, Layer, LayerTable, Paper, Version};
pub use net::Net;
pub use track::Track;
pub use via::Via;
pub use zone::{Zone, ZoneFill};

/// The typed payload of one document entity. Tags without a typed record
/// are carried as [`Element::Opaque`] and replayed from their captured
/// span, never regenerated.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Version(Version),
    Generator(Generator),
    GeneratorVersion(GeneratorVersion),
    General(General),
    Paper(Paper),
    LayerTable(LayerTable),
    Net(Net),
    Footprint(Footprint),
    Track(Track),
    Via(Via),
    Zone(Zone),
    Graphic(Graphic),
    Group(Group),
    Opaque(Node),
}

impl Element {
    /// The element's own identity token (`uuid`/`tstamp` child) where the
    /// format carries one. Elements without one get a synthesized id when
    /// added to a document.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Element::Footprint(f) => f.uuid.as_deref(),
            Element::Track(t) => t.uuid.as_deref(),
            Element::Via(v) => v.uuid.as_deref(),
            Element::Zone(z) => z.uuid.as_deref(),
            Element::Graphic(g) => g.uuid(),
            Element::Group(g) => g.uuid.as_deref(),
            // Opaque elements keep their identity token too, so ids stay
            // stable for unmodeled-but-identified entities like track arcs.
            Element::Opaque(node) => node
                .as_list()
                .and_then(|l| l.value_of("uuid").or_else(|| l.value_of("tstamp"))),
            _ => None,
        }
    }

    /// Short kind name for diagnostics and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Version(_) => "version",
            Element::Generator(_) => "generator",
            Element::GeneratorVersion(_) => "generator_version",
            Element::General(_) => "general",
            Element::Paper(_) => "paper",
            Element::LayerTable(_) => "layers",
            Element::Net(_) => "net",
            Element::Footprint(_) => "footprint",
            Element::Track(_) => "segment",
            Element::Via(_) => "via",
            Element::Zone(_) => "zone",
            Element::Graphic(_) => "graphic",
            Element::Group(_) => "group",
            Element::Opaque(_) => "opaque",
        }
    }

    /// Canonical node form of this element. `id` is the owning entity's
    /// identity, emitted as the epoch's identity token for element kinds
    /// that carry one in the file.
    pub fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        match self {
            Element::Version(v) => v.to_node(),
            Element::Generator(g) => g.to_node(),
            Element::GeneratorVersion(g) => g.to_node(),
            Element::General(g) => g.to_node(),
            Element::Paper(p) => p.to_node(),
            Element::LayerTable(t) => t.to_node(),
            Element::Net(n) => n.to_node(),
            Element::Footprint(f) => f.to_node(id, ctx),
            Element::Track(t) => t.to_node(id, ctx),
            Element::Via(v) => v.to_node(id, ctx),
            Element::Zone(z) => z.to_node(id, ctx),
            Element::Graphic(g) => g.to_node(id, ctx),
            Element::Group(g) => g.to_node(id, ctx),
            // Opaque nodes are replayed from their span by the formatter;
            // reaching this arm means the document lost its source text,
            // which is a defect upstream of formatting.
            Element::Opaque(n) => n.clone(),
        }
    }
}

// ──────────────────────────────────────────────
// Shared sub-records
// ──────────────────────────────────────────────

/// A `(stroke (width ...) (type ...))` group used by graphic primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub width: Coord,
    pub style: String,
    pub extra: Vec<Node>,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            width: Coord::from_nm(100_000), // 0.1 mm
            style: "solid".into(),
            extra: Vec::new(),
        }
    }
}

impl Stroke {
    pub(crate) fn parse(list: &ListNode, tag: &'static str) -> Result<Stroke, SchemaError> {
        let mut stroke = Stroke::default();
        for child in list.children.iter().skip(1) {
            match child.tag() {
                Some("width") => {
                    let v = child
                        .as_list()
                        .and_then(|l| l.arg(0))
                        .and_then(Node::as_num)
                        .ok_or_else(|| SchemaError::invalid(tag, "stroke", "bad width"))?;
                    stroke.width = coord_from(v, tag, "stroke")?;
                }
                Some("type") => {
                    if let Some(style) = child.as_list().and_then(|l| l.arg(0)).and_then(Node::text)
                    {
                        stroke.style = style.to_owned();
                    }
                }
                _ => stroke.extra.push(child.clone()),
            }
        }
        Ok(stroke)
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut children = vec![
            Node::tagged("width", vec![coord_node(self.width)]),
            Node::tagged("type", vec![Node::sym(&self.style)]),
        ];
        children.extend(self.extra.iter().cloned());
        Node::tagged("stroke", children)
    }
}

// ──────────────────────────────────────────────
// Parse helpers
// ──────────────────────────────────────────────

/// Read the `(at x y [rot])` group of an element.
pub(crate) fn at_from(list: &ListNode, tag: &'static str) -> Result<At, SchemaError> {
    let at = list.child("at").ok_or(SchemaError::missing(tag, "at"))?;
    let x = num_arg(at, 0).ok_or(SchemaError::missing(tag, "at"))?;
    let y = num_arg(at, 1).ok_or(SchemaError::missing(tag, "at"))?;
    let rotation = num_arg(at, 2).map(Angle::from_degrees);
    Ok(At {
        x: coord_from(x, tag, "at")?,
        y: coord_from(y, tag, "at")?,
        rotation,
    })
}

/// Read a two-coordinate child such as `(start x y)` or `(end x y)`.
pub(crate) fn point_from(
    list: &ListNode,
    child_tag: &'static str,
    tag: &'static str,
) -> Result<Point, SchemaError> {
    let child = list
        .child(child_tag)
        .ok_or(SchemaError::missing(tag, child_tag))?;
    point_of(child, tag, child_tag)
}

/// Read the two coordinates of an already-located group node.
pub(crate) fn point_of(
    group: &ListNode,
    tag: &'static str,
    field: &'static str,
) -> Result<Point, SchemaError> {
    let x = num_arg(group, 0).ok_or(SchemaError::missing(tag, field))?;
    let y = num_arg(group, 1).ok_or(SchemaError::missing(tag, field))?;
    Ok(Point {
        x: coord_from(x, tag, field)?,
        y: coord_from(y, tag, field)?,
    })
}

/// Read a single-coordinate child such as `(width 0.25)`.
pub(crate) fn coord_child(
    list: &ListNode,
    child_tag: &'static str,
    tag: &'static str,
) -> Result<Option<Coord>, SchemaError> {
    match list.child(child_tag) {
        None => Ok(None),
        Some(child) => {
            let v = num_arg(child, 0).ok_or(SchemaError::missing(tag, child_tag))?;
            Ok(Some(coord_from(v, tag, child_tag)?))
        }
    }
}

/// Numeric positional argument of a group, after the tag.
pub(crate) fn num_arg(list: &ListNode, i: usize) -> Option<rust_decimal::Decimal> {
    list.arg(i).and_then(Node::as_num)
}

/// The element's identity token: a `uuid` child in current epochs, a
/// `tstamp` child in older ones. Both are accepted regardless of epoch.
pub(crate) fn identity_of(list: &ListNode) -> Option<String> {
    list.value_of("uuid")
        .or_else(|| list.value_of("tstamp"))
        .map(str::to_owned)
}

/// True when `tag` is one of the identity-token tags.
pub(crate) fn is_identity_tag(tag: &str) -> bool {
    tag == "uuid" || tag == "tstamp"
}

// ──────────────────────────────────────────────
// Format helpers
// ──────────────────────────────────────────────

pub(crate) fn coord_node(c: Coord) -> Node {
    Node::num(
        rust_decimal::Decimal::from_i128_with_scale(c.nm() as i128, 6).normalize(),
        c.to_string(),
    )
}

pub(crate) fn at_node(at: At) -> Node {
    let mut children = vec![coord_node(at.x), coord_node(at.y)];
    if let Some(rot) = at.rotation {
        children.push(Node::num(rot.degrees(), rot.to_string()));
    }
    Node::tagged("at", children)
}

pub(crate) fn point_node(tag: &str, p: Point) -> Node {
    Node::tagged(tag, vec![coord_node(p.x), coord_node(p.y)])
}

/// `(uuid "...")` or `(tstamp "...")` depending on the document epoch.
pub(crate) fn identity_node(id: &str, ctx: &ParseCtx) -> Node {
    Node::tagged(ctx.identity_tag(), vec![Node::string(id)])
}

/// `(layers "F.Cu" "B.Cu" ...)`
pub(crate) fn layers_node(layers: &[String]) -> Node {
    Node::tagged(
        "layers",
        layers.iter().map(|l| Node::string(l.clone())).collect(),
    )
}

/// Names read from `(layers ...)` groups; accepts symbols or strings.
pub(crate) fn layer_names(list: &ListNode) -> Vec<String> {
    list.children
        .iter()
        .skip(1)
        .filter_map(Node::text)
        .map(str::to_owned)
        .collect()
}
