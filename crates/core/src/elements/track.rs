//! Track segments: `(segment (start ...) (end ...) (width ...) ...)`.

use super::{coord_child, coord_node, identity_node, identity_of, is_identity_tag, point_from,
    point_node};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{Coord, Point};

/// A straight copper segment. The net reference is an ordinal; it is not
/// required to resolve to a declared net -- dangling references are a
/// diagnostic, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: Coord,
    pub layer: String,
    pub net: i64,
    pub locked: bool,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

impl Track {
    pub(crate) fn parse(list: &ListNode) -> Result<Track, SchemaError> {
        let start = point_from(list, "start", "segment")?;
        let end = point_from(list, "end", "segment")?;
        // 0.25 mm is the tool's default trace width.
        let width = coord_child(list, "width", "segment")?.unwrap_or(Coord::from_nm(250_000));
        let layer = list.value_of("layer").unwrap_or("F.Cu").to_owned();
        let net = list
            .child("net")
            .and_then(|n| n.arg(0).and_then(Node::as_int))
            .unwrap_or(0);
        let locked = list
            .child("locked")
            .and_then(|l| l.arg(0).and_then(Node::text))
            == Some("yes");

        let mut extra = Vec::new();
        for child in list.children.iter().skip(1) {
            match child.tag() {
                Some("start") | Some("end") | Some("width") | Some("layer") | Some("net")
                | Some("locked") => {}
                Some(t) if is_identity_tag(t) => {}
                _ => extra.push(child.clone()),
            }
        }

        Ok(Track {
            start,
            end,
            width,
            layer,
            net,
            locked,
            uuid: identity_of(list),
            extra,
        })
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let mut children = vec![
            point_node("start", self.start),
            point_node("end", self.end),
            Node::tagged("width", vec![coord_node(self.width)]),
            Node::tagged("layer", vec![Node::string(self.layer.clone())]),
        ];
        if self.locked {
            children.push(Node::tagged("locked", vec![Node::sym("yes")]));
        }
        children.push(Node::tagged("net", vec![Node::int(self.net)]));
        children.push(identity_node(id, ctx));
        children.extend(self.extra.iter().cloned());
        Node::tagged("segment", children)
    }

    /// Segment length in millimeters.
    pub fn length_mm(&self) -> f64 {
        self.start.distance_mm(self.end)
    }
}
