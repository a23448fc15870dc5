//! Vias: `(via (at ...) (size ...) (drill ...) (layers ...) ...)`.

use super::{at_from, at_node, coord_child, coord_node, identity_node, identity_of,
    is_identity_tag, layer_names, layers_node};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{At, Coord};

/// A via. `kind` is `None` for a plain through via, `blind` or `micro`
/// for the restricted spans; the layer pair records the span either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub at: At,
    pub size: Coord,
    pub drill: Coord,
    pub layers: Vec<String>,
    pub kind: Option<String>,
    pub net: i64,
    pub locked: bool,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

impl Via {
    pub(crate) fn parse(list: &ListNode) -> Result<Via, SchemaError> {
        let at = at_from(list, "via")?;
        // 0.8/0.4 mm are the tool's default annular pad and drill.
        let size = coord_child(list, "size", "via")?.unwrap_or(Coord::from_nm(800_000));
        let drill = coord_child(list, "drill", "via")?.unwrap_or(Coord::from_nm(400_000));
        let layers = list
            .child("layers")
            .map(layer_names)
            .unwrap_or_else(|| vec!["F.Cu".to_owned(), "B.Cu".to_owned()]);
        let kind = list.children.iter().skip(1).find_map(|n| match n.as_sym() {
            Some("blind") => Some("blind".to_owned()),
            Some("micro") => Some("micro".to_owned()),
            _ => None,
        });
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
                Some("at") | Some("size") | Some("drill") | Some("layers") | Some("net")
                | Some("locked") => {}
                Some(t) if is_identity_tag(t) => {}
                None if matches!(child.as_sym(), Some("blind") | Some("micro")) => {}
                _ => extra.push(child.clone()),
            }
        }

        Ok(Via {
            at,
            size,
            drill,
            layers,
            kind,
            net,
            locked,
            uuid: identity_of(list),
            extra,
        })
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let mut children = Vec::new();
        if let Some(kind) = &self.kind {
            children.push(Node::sym(kind));
        }
        children.push(at_node(self.at));
        children.push(Node::tagged("size", vec![coord_node(self.size)]));
        children.push(Node::tagged("drill", vec![coord_node(self.drill)]));
        children.push(layers_node(&self.layers));
        if self.locked {
            children.push(Node::tagged("locked", vec![Node::sym("yes")]));
        }
        children.push(Node::tagged("net", vec![Node::int(self.net)]));
        children.push(identity_node(id, ctx));
        children.extend(self.extra.iter().cloned());
        Node::tagged("via", children)
    }

    /// Annular ring width: (size - drill) / 2.
    pub fn annular_ring(&self) -> Coord {
        Coord::from_nm((self.size.nm() - self.drill.nm()) / 2)
    }
}
