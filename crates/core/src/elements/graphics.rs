//! Board-level graphic primitives: `gr_line`, `gr_rect`, `gr_arc`,
//! `gr_circle`, `gr_text`.

use super::{at_from, at_node, identity_node, identity_of, is_identity_tag, point_from,
    point_node, Effects, Stroke};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{At, Point};

/// One board-level graphic. Board edges live on `Edge.Cuts` as `Line` and
/// `Rect` entries like any other drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum Graphic {
    Line {
        start: Point,
        end: Point,
        stroke: Stroke,
        layer: String,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
    Rect {
        start: Point,
        end: Point,
        stroke: Stroke,
        fill: Option<String>,
        layer: String,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
    Arc {
        start: Point,
        mid: Point,
        end: Point,
        stroke: Stroke,
        layer: String,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
    Circle {
        center: Point,
        end: Point,
        stroke: Stroke,
        fill: Option<String>,
        layer: String,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
    Text {
        text: String,
        at: At,
        layer: String,
        effects: Option<Effects>,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
}

impl Graphic {
    pub(crate) fn parse(list: &ListNode, tag: &'static str) -> Result<Graphic, SchemaError> {
        let layer = list.value_of("layer").unwrap_or("F.SilkS").to_owned();
        let uuid = identity_of(list);
        let stroke = match list.child("stroke") {
            Some(s) => Stroke::parse(s, tag)?,
            None => Stroke::default(),
        };
        let fill = list.value_of("fill").map(str::to_owned);
        let extra = |skip: &[&str], from: usize| -> Vec<Node> {
            list.children
                .iter()
                .skip(from)
                .filter(|child| match child.tag() {
                    Some(t) => !skip.contains(&t) && !is_identity_tag(t),
                    None => true,
                })
                .cloned()
                .collect()
        };
        match tag {
            "gr_line" => Ok(Graphic::Line {
                start: point_from(list, "start", tag)?,
                end: point_from(list, "end", tag)?,
                stroke,
                layer,
                uuid,
                extra: extra(&["start", "end", "stroke", "layer"], 1),
            }),
            "gr_rect" => Ok(Graphic::Rect {
                start: point_from(list, "start", tag)?,
                end: point_from(list, "end", tag)?,
                stroke,
                fill,
                layer,
                uuid,
                extra: extra(&["start", "end", "stroke", "fill", "layer"], 1),
            }),
            "gr_arc" => Ok(Graphic::Arc {
                start: point_from(list, "start", tag)?,
                mid: point_from(list, "mid", tag)?,
                end: point_from(list, "end", tag)?,
                stroke,
                layer,
                uuid,
                extra: extra(&["start", "mid", "end", "stroke", "layer"], 1),
            }),
            "gr_circle" => Ok(Graphic::Circle {
                center: point_from(list, "center", tag)?,
                end: point_from(list, "end", tag)?,
                stroke,
                fill,
                layer,
                uuid,
                extra: extra(&["center", "end", "stroke", "fill", "layer"], 1),
            }),
            "gr_text" => {
                let text = list
                    .arg(0)
                    .and_then(Node::text)
                    .ok_or(SchemaError::missing("gr_text", "text"))?;
                let effects = match list.child("effects") {
                    Some(e) => Some(Effects::parse(e, "gr_text")?),
                    None => None,
                };
                Ok(Graphic::Text {
                    text: text.to_owned(),
                    at: at_from(list, "gr_text")?,
                    layer,
                    effects,
                    uuid,
                    extra: extra(&["at", "layer", "effects"], 2),
                })
            }
            other => unreachable!("unregistered graphic tag `{other}`"),
        }
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let layer_node = |layer: &str| Node::tagged("layer", vec![Node::string(layer.to_owned())]);
        match self {
            Graphic::Line {
                start,
                end,
                stroke,
                layer,
                extra,
                ..
            } => {
                let mut children = vec![
                    point_node("start", *start),
                    point_node("end", *end),
                    stroke.to_node(),
                    layer_node(layer),
                    identity_node(id, ctx),
                ];
                children.extend(extra.iter().cloned());
                Node::tagged("gr_line", children)
            }
            Graphic::Rect {
                start,
                end,
                stroke,
                fill,
                layer,
                extra,
                ..
            } => {
                let mut children = vec![
                    point_node("start", *start),
                    point_node("end", *end),
                    stroke.to_node(),
                ];
                if let Some(fill) = fill {
                    children.push(Node::tagged("fill", vec![Node::sym(fill)]));
                }
                children.push(layer_node(layer));
                children.push(identity_node(id, ctx));
                children.extend(extra.iter().cloned());
                Node::tagged("gr_rect", children)
            }
            Graphic::Arc {
                start,
                mid,
                end,
                stroke,
                layer,
                extra,
                ..
            } => {
                let mut children = vec![
                    point_node("start", *start),
                    point_node("mid", *mid),
                    point_node("end", *end),
                    stroke.to_node(),
                    layer_node(layer),
                    identity_node(id, ctx),
                ];
                children.extend(extra.iter().cloned());
                Node::tagged("gr_arc", children)
            }
            Graphic::Circle {
                center,
                end,
                stroke,
                fill,
                layer,
                extra,
                ..
            } => {
                let mut children = vec![
                    point_node("center", *center),
                    point_node("end", *end),
                    stroke.to_node(),
                ];
                if let Some(fill) = fill {
                    children.push(Node::tagged("fill", vec![Node::sym(fill)]));
                }
                children.push(layer_node(layer));
                children.push(identity_node(id, ctx));
                children.extend(extra.iter().cloned());
                Node::tagged("gr_circle", children)
            }
            Graphic::Text {
                text,
                at,
                layer,
                effects,
                extra,
                ..
            } => {
                let mut children = vec![
                    Node::string(text.clone()),
                    at_node(*at),
                    layer_node(layer),
                    identity_node(id, ctx),
                ];
                if let Some(effects) = effects {
                    children.push(effects.to_node());
                }
                children.extend(extra.iter().cloned());
                Node::tagged("gr_text", children)
            }
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        match self {
            Graphic::Line { uuid, .. }
            | Graphic::Rect { uuid, .. }
            | Graphic::Arc { uuid, .. }
            | Graphic::Circle { uuid, .. }
            | Graphic::Text { uuid, .. } => uuid.as_deref(),
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            Graphic::Line { layer, .. }
            | Graphic::Rect { layer, .. }
            | Graphic::Arc { layer, .. }
            | Graphic::Circle { layer, .. }
            | Graphic::Text { layer, .. } => layer,
        }
    }

    /// The source tag for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Graphic::Line { .. } => "gr_line",
            Graphic::Rect { .. } => "gr_rect",
            Graphic::Arc { .. } => "gr_arc",
            Graphic::Circle { .. } => "gr_circle",
            Graphic::Text { .. } => "gr_text",
        }
    }
}
