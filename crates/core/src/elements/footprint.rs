//! Footprints and their nested records: properties, pads, footprint-local
//! graphics and the optional 3-D model reference.

use super::{
    at_from, at_node, coord_from, coord_node, identity_node, identity_of, is_identity_tag,
    layer_names, layers_node, num_arg, point_node, point_of, Stroke,
};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{At, Coord, Point};
use rust_decimal::Decimal;

/// Text effects carried by properties and footprint text. Only the font
/// size and stroke thickness are modeled; justification and the rest ride
/// along verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub font_size: Option<(Coord, Coord)>,
    pub thickness: Option<Coord>,
    pub font_extra: Vec<Node>,
    pub extra: Vec<Node>,
}

impl Effects {
    pub(crate) fn parse(list: &ListNode, tag: &'static str) -> Result<Effects, SchemaError> {
        let mut effects = Effects::default();
        for child in list.children.iter().skip(1) {
            match child.tag() {
                Some("font") => {
                    let font = child.as_list().expect("tagged node is a list");
                    for item in font.children.iter().skip(1) {
                        match item.tag() {
                            Some("size") => {
                                let group = item.as_list().expect("tagged node is a list");
                                let w = num_arg(group, 0)
                                    .ok_or(SchemaError::missing(tag, "font size"))?;
                                let h = num_arg(group, 1)
                                    .ok_or(SchemaError::missing(tag, "font size"))?;
                                effects.font_size = Some((
                                    coord_from(w, tag, "font size")?,
                                    coord_from(h, tag, "font size")?,
                                ));
                            }
                            Some("thickness") => {
                                let group = item.as_list().expect("tagged node is a list");
                                let t = num_arg(group, 0)
                                    .ok_or(SchemaError::missing(tag, "font thickness"))?;
                                effects.thickness = Some(coord_from(t, tag, "font thickness")?);
                            }
                            _ => effects.font_extra.push(item.clone()),
                        }
                    }
                }
                _ => effects.extra.push(child.clone()),
            }
        }
        Ok(effects)
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut font = Vec::new();
        if let Some((w, h)) = self.font_size {
            font.push(Node::tagged("size", vec![coord_node(w), coord_node(h)]));
        }
        if let Some(t) = self.thickness {
            font.push(Node::tagged("thickness", vec![coord_node(t)]));
        }
        font.extend(self.font_extra.iter().cloned());
        let mut children = vec![Node::tagged("font", font)];
        children.extend(self.extra.iter().cloned());
        Node::tagged("effects", children)
    }
}

/// A named footprint property such as `Reference` or `Value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub at: At,
    pub layer: String,
    pub uuid: Option<String>,
    pub effects: Option<Effects>,
    pub extra: Vec<Node>,
}

impl Property {
    pub(crate) fn parse(list: &ListNode) -> Result<Property, SchemaError> {
        let name = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("property", "name"))?;
        let value = list
            .arg(1)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("property", "value"))?;
        let at = if list.child("at").is_some() {
            at_from(list, "property")?
        } else {
            At::default()
        };
        let layer = list.value_of("layer").unwrap_or("F.SilkS").to_owned();
        let effects = match list.child("effects") {
            Some(e) => Some(Effects::parse(e, "property")?),
            None => None,
        };
        let mut extra = Vec::new();
        for child in list.children.iter().skip(3) {
            match child.tag() {
                Some("at") | Some("layer") | Some("effects") => {}
                Some(t) if is_identity_tag(t) => {}
                _ => extra.push(child.clone()),
            }
        }
        Ok(Property {
            name: name.to_owned(),
            value: value.to_owned(),
            at,
            layer,
            uuid: identity_of(list),
            effects,
            extra,
        })
    }

    pub(crate) fn to_node(&self, ctx: &ParseCtx) -> Node {
        let mut children = vec![
            Node::string(self.name.clone()),
            Node::string(self.value.clone()),
            at_node(self.at),
            Node::tagged("layer", vec![Node::string(self.layer.clone())]),
        ];
        if let Some(uuid) = &self.uuid {
            children.push(identity_node(uuid, ctx));
        }
        if let Some(effects) = &self.effects {
            children.push(effects.to_node());
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("property", children)
    }
}

/// A pad drill: round, or oval with two axes. Offset groups and other
/// refinements ride along in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Drill {
    pub width: Coord,
    /// Second axis of an oval drill; `None` for round drills.
    pub height: Option<Coord>,
    pub extra: Vec<Node>,
}

impl Drill {
    pub(crate) fn parse(list: &ListNode) -> Result<Drill, SchemaError> {
        let oval = list.arg(0).and_then(Node::as_sym) == Some("oval");
        let base = if oval { 1 } else { 0 };
        let width = num_arg(list, base).ok_or(SchemaError::missing("pad", "drill"))?;
        let width = coord_from(width, "pad", "drill")?;
        let height = if oval {
            let h = num_arg(list, base + 1).ok_or(SchemaError::missing("pad", "drill"))?;
            Some(coord_from(h, "pad", "drill")?)
        } else {
            None
        };
        let extra = list
            .children
            .iter()
            .skip(1)
            .filter(|n| n.as_list().is_some())
            .cloned()
            .collect();
        Ok(Drill {
            width,
            height,
            extra,
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut children = Vec::new();
        if let Some(h) = self.height {
            children.push(Node::sym("oval"));
            children.push(coord_node(self.width));
            children.push(coord_node(h));
        } else {
            children.push(coord_node(self.width));
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("drill", children)
    }
}

/// One pad of a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub number: String,
    /// `smd`, `thru_hole`, `np_thru_hole` or `connect`.
    pub kind: String,
    /// `circle`, `rect`, `oval`, `roundrect`, `trapezoid` or `custom`.
    pub shape: String,
    pub at: At,
    pub size: (Coord, Coord),
    pub drill: Option<Drill>,
    pub layers: Vec<String>,
    /// Net ordinal and name, when connected.
    pub net: Option<(i64, String)>,
    pub roundrect_rratio: Option<Decimal>,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

impl Pad {
    pub(crate) fn parse(list: &ListNode) -> Result<Pad, SchemaError> {
        let number = list
            .arg(0)
            .and_then(|n| n.text().map(str::to_owned).or_else(|| n.as_num().map(|d| d.to_string())))
            .ok_or(SchemaError::missing("pad", "number"))?;
        let kind = list
            .arg(1)
            .and_then(Node::as_sym)
            .ok_or(SchemaError::missing("pad", "type"))?;
        let shape = list
            .arg(2)
            .and_then(Node::as_sym)
            .ok_or(SchemaError::missing("pad", "shape"))?;

        let at = if list.child("at").is_some() {
            at_from(list, "pad")?
        } else {
            At::default()
        };
        let size = match list.child("size") {
            Some(group) => {
                let p = point_of(group, "pad", "size")?;
                (p.x, p.y)
            }
            None => (Coord::from_nm(1_000_000), Coord::from_nm(1_000_000)),
        };
        let drill = match list.child("drill") {
            Some(d) => Some(Drill::parse(d)?),
            None => None,
        };
        let layers = list.child("layers").map(layer_names).unwrap_or_default();
        let net = list.child("net").and_then(|n| {
            let ordinal = n.arg(0).and_then(Node::as_int)?;
            let name = n.arg(1).and_then(Node::text).unwrap_or("");
            Some((ordinal, name.to_owned()))
        });
        let roundrect_rratio = list
            .child("roundrect_rratio")
            .and_then(|l| num_arg(l, 0));

        let mut extra = Vec::new();
        for child in list.children.iter().skip(4) {
            match child.tag() {
                Some("at") | Some("size") | Some("drill") | Some("layers") | Some("net")
                | Some("roundrect_rratio") => {}
                Some(t) if is_identity_tag(t) => {}
                _ => extra.push(child.clone()),
            }
        }

        Ok(Pad {
            number,
            kind: kind.to_owned(),
            shape: shape.to_owned(),
            at,
            size,
            drill,
            layers,
            net,
            roundrect_rratio,
            uuid: identity_of(list),
            extra,
        })
    }

    pub(crate) fn to_node(&self, ctx: &ParseCtx) -> Node {
        let mut children = vec![
            Node::string(self.number.clone()),
            Node::sym(&self.kind),
            Node::sym(&self.shape),
            at_node(self.at),
            Node::tagged(
                "size",
                vec![coord_node(self.size.0), coord_node(self.size.1)],
            ),
        ];
        if let Some(drill) = &self.drill {
            children.push(drill.to_node());
        }
        if !self.layers.is_empty() {
            children.push(layers_node(&self.layers));
        }
        if let Some(ratio) = &self.roundrect_rratio {
            children.push(Node::tagged(
                "roundrect_rratio",
                vec![Node::num(*ratio, ratio.to_string())],
            ));
        }
        if let Some((ordinal, name)) = &self.net {
            children.push(Node::tagged(
                "net",
                vec![Node::int(*ordinal), Node::string(name.clone())],
            ));
        }
        if let Some(uuid) = &self.uuid {
            children.push(identity_node(uuid, ctx));
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("pad", children)
    }

    /// The net ordinal, with 0 (unconnected) for pads without a net group.
    pub fn net_ordinal(&self) -> i64 {
        self.net.as_ref().map(|(n, _)| *n).unwrap_or(0)
    }
}

/// A footprint-local graphic primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum FpGraphic {
    Line {
        start: Point,
        end: Point,
        stroke: Stroke,
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
    Rect {
        start: Point,
        end: Point,
        stroke: Stroke,
        /// The raw fill token (`yes`, `no`, `none`, `solid`).
        fill: Option<String>,
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
        /// `reference`, `value` or `user`.
        kind: String,
        text: String,
        at: At,
        layer: String,
        effects: Option<Effects>,
        uuid: Option<String>,
        extra: Vec<Node>,
    },
}

impl FpGraphic {
    pub(crate) fn parse(list: &ListNode, tag: &'static str) -> Result<FpGraphic, SchemaError> {
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
            "fp_line" => Ok(FpGraphic::Line {
                start: super::point_from(list, "start", tag)?,
                end: super::point_from(list, "end", tag)?,
                stroke,
                layer,
                uuid,
                extra: extra(&["start", "end", "stroke", "layer"], 1),
            }),
            "fp_arc" => Ok(FpGraphic::Arc {
                start: super::point_from(list, "start", tag)?,
                mid: super::point_from(list, "mid", tag)?,
                end: super::point_from(list, "end", tag)?,
                stroke,
                layer,
                uuid,
                extra: extra(&["start", "mid", "end", "stroke", "layer"], 1),
            }),
            "fp_rect" => Ok(FpGraphic::Rect {
                start: super::point_from(list, "start", tag)?,
                end: super::point_from(list, "end", tag)?,
                stroke,
                fill,
                layer,
                uuid,
                extra: extra(&["start", "end", "stroke", "fill", "layer"], 1),
            }),
            "fp_circle" => Ok(FpGraphic::Circle {
                center: super::point_from(list, "center", tag)?,
                end: super::point_from(list, "end", tag)?,
                stroke,
                fill,
                layer,
                uuid,
                extra: extra(&["center", "end", "stroke", "fill", "layer"], 1),
            }),
            "fp_text" => {
                let kind = list
                    .arg(0)
                    .and_then(Node::as_sym)
                    .ok_or(SchemaError::missing("fp_text", "kind"))?;
                let text = list
                    .arg(1)
                    .and_then(Node::text)
                    .ok_or(SchemaError::missing("fp_text", "text"))?;
                let effects = match list.child("effects") {
                    Some(e) => Some(Effects::parse(e, "fp_text")?),
                    None => None,
                };
                Ok(FpGraphic::Text {
                    kind: kind.to_owned(),
                    text: text.to_owned(),
                    at: at_from(list, "fp_text")?,
                    layer,
                    effects,
                    uuid,
                    extra: extra(&["at", "layer", "effects"], 3),
                })
            }
            other => unreachable!("unregistered footprint graphic tag `{other}`"),
        }
    }

    pub(crate) fn to_node(&self, ctx: &ParseCtx) -> Node {
        let layer_node = |layer: &str| Node::tagged("layer", vec![Node::string(layer.to_owned())]);
        match self {
            FpGraphic::Line {
                start,
                end,
                stroke,
                layer,
                uuid,
                extra,
            } => {
                let mut children = vec![
                    point_node("start", *start),
                    point_node("end", *end),
                    stroke.to_node(),
                    layer_node(layer),
                ];
                if let Some(uuid) = uuid {
                    children.push(identity_node(uuid, ctx));
                }
                children.extend(extra.iter().cloned());
                Node::tagged("fp_line", children)
            }
            FpGraphic::Arc {
                start,
                mid,
                end,
                stroke,
                layer,
                uuid,
                extra,
            } => {
                let mut children = vec![
                    point_node("start", *start),
                    point_node("mid", *mid),
                    point_node("end", *end),
                    stroke.to_node(),
                    layer_node(layer),
                ];
                if let Some(uuid) = uuid {
                    children.push(identity_node(uuid, ctx));
                }
                children.extend(extra.iter().cloned());
                Node::tagged("fp_arc", children)
            }
            FpGraphic::Rect {
                start,
                end,
                stroke,
                fill,
                layer,
                uuid,
                extra,
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
                if let Some(uuid) = uuid {
                    children.push(identity_node(uuid, ctx));
                }
                children.extend(extra.iter().cloned());
                Node::tagged("fp_rect", children)
            }
            FpGraphic::Circle {
                center,
                end,
                stroke,
                fill,
                layer,
                uuid,
                extra,
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
                if let Some(uuid) = uuid {
                    children.push(identity_node(uuid, ctx));
                }
                children.extend(extra.iter().cloned());
                Node::tagged("fp_circle", children)
            }
            FpGraphic::Text {
                kind,
                text,
                at,
                layer,
                effects,
                uuid,
                extra,
            } => {
                let mut children = vec![
                    Node::sym(kind),
                    Node::string(text.clone()),
                    at_node(*at),
                    layer_node(layer),
                ];
                if let Some(uuid) = uuid {
                    children.push(identity_node(uuid, ctx));
                }
                if let Some(effects) = effects {
                    children.push(effects.to_node());
                }
                children.extend(extra.iter().cloned());
                Node::tagged("fp_text", children)
            }
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        match self {
            FpGraphic::Line { uuid, .. }
            | FpGraphic::Arc { uuid, .. }
            | FpGraphic::Rect { uuid, .. }
            | FpGraphic::Circle { uuid, .. }
            | FpGraphic::Text { uuid, .. } => uuid.as_deref(),
        }
    }
}

/// A 3-D model reference; offset/scale/rotate groups ride along verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Model3d {
    pub path: String,
    pub extra: Vec<Node>,
}

impl Model3d {
    pub(crate) fn parse(list: &ListNode) -> Result<Model3d, SchemaError> {
        let path = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("model", "path"))?;
        Ok(Model3d {
            path: path.to_owned(),
            extra: list.children.iter().skip(2).cloned().collect(),
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut children = vec![Node::string(self.path.clone())];
        children.extend(self.extra.iter().cloned());
        Node::tagged("model", children)
    }
}

/// A placed footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Library half of the lib id (`Resistor_SMD` in
    /// `Resistor_SMD:R_0603_1608Metric`); empty when the id has no colon.
    pub library: String,
    pub name: String,
    pub layer: String,
    pub locked: bool,
    pub at: At,
    pub descr: Option<String>,
    pub tags: Option<String>,
    pub path: Option<String>,
    pub sheetname: Option<String>,
    pub sheetfile: Option<String>,
    /// Attribute symbols such as `smd` or `exclude_from_pos_files`.
    pub attr: Vec<String>,
    pub properties: Vec<Property>,
    pub graphics: Vec<FpGraphic>,
    pub pads: Vec<Pad>,
    pub model: Option<Model3d>,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

const FP_GRAPHIC_TAGS: [&str; 5] = ["fp_line", "fp_arc", "fp_rect", "fp_circle", "fp_text"];

impl Footprint {
    pub(crate) fn parse(list: &ListNode) -> Result<Footprint, SchemaError> {
        let lib_id = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("footprint", "lib_id"))?;
        let (library, name) = match lib_id.split_once(':') {
            Some((lib, name)) => (lib.to_owned(), name.to_owned()),
            None => (String::new(), lib_id.to_owned()),
        };

        let mut footprint = Footprint {
            library,
            name,
            layer: list.value_of("layer").unwrap_or("F.Cu").to_owned(),
            locked: false,
            at: at_from(list, "footprint")?,
            descr: None,
            tags: None,
            path: None,
            sheetname: None,
            sheetfile: None,
            attr: Vec::new(),
            properties: Vec::new(),
            graphics: Vec::new(),
            pads: Vec::new(),
            model: None,
            uuid: identity_of(list),
            extra: Vec::new(),
        };

        for child in list.children.iter().skip(2) {
            let Some(tag) = child.tag() else {
                // Bare attribute symbols such as `locked`.
                if child.as_sym() == Some("locked") {
                    footprint.locked = true;
                } else {
                    footprint.extra.push(child.clone());
                }
                continue;
            };
            let group = child.as_list().expect("tagged node is a list");
            match tag {
                "layer" | "at" => {}
                t if is_identity_tag(t) => {}
                "locked" => {
                    footprint.locked = group.arg(0).and_then(Node::text) == Some("yes");
                }
                "descr" => footprint.descr = group.arg(0).and_then(Node::text).map(str::to_owned),
                "tags" => footprint.tags = group.arg(0).and_then(Node::text).map(str::to_owned),
                "path" => footprint.path = group.arg(0).and_then(Node::text).map(str::to_owned),
                "sheetname" => {
                    footprint.sheetname = group.arg(0).and_then(Node::text).map(str::to_owned)
                }
                "sheetfile" => {
                    footprint.sheetfile = group.arg(0).and_then(Node::text).map(str::to_owned)
                }
                "attr" => {
                    footprint.attr = group
                        .children
                        .iter()
                        .skip(1)
                        .filter_map(Node::as_sym)
                        .map(str::to_owned)
                        .collect();
                }
                "property" => footprint.properties.push(Property::parse(group)?),
                "pad" => footprint.pads.push(Pad::parse(group)?),
                "model" => footprint.model = Some(Model3d::parse(group)?),
                t if FP_GRAPHIC_TAGS.contains(&t) => {
                    let tag = *FP_GRAPHIC_TAGS
                        .iter()
                        .find(|k| **k == t)
                        .expect("tag matched above");
                    footprint.graphics.push(FpGraphic::parse(group, tag)?);
                }
                _ => footprint.extra.push(child.clone()),
            }
        }
        Ok(footprint)
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let mut children = vec![Node::string(self.lib_id())];
        if self.locked {
            children.push(Node::tagged("locked", vec![Node::sym("yes")]));
        }
        children.push(Node::tagged(
            "layer",
            vec![Node::string(self.layer.clone())],
        ));
        children.push(identity_node(id, ctx));
        children.push(at_node(self.at));
        if let Some(descr) = &self.descr {
            children.push(Node::tagged("descr", vec![Node::string(descr.clone())]));
        }
        if let Some(tags) = &self.tags {
            children.push(Node::tagged("tags", vec![Node::string(tags.clone())]));
        }
        for property in &self.properties {
            children.push(property.to_node(ctx));
        }
        if let Some(path) = &self.path {
            children.push(Node::tagged("path", vec![Node::string(path.clone())]));
        }
        if let Some(sheetname) = &self.sheetname {
            children.push(Node::tagged(
                "sheetname",
                vec![Node::string(sheetname.clone())],
            ));
        }
        if let Some(sheetfile) = &self.sheetfile {
            children.push(Node::tagged(
                "sheetfile",
                vec![Node::string(sheetfile.clone())],
            ));
        }
        if !self.attr.is_empty() {
            children.push(Node::tagged(
                "attr",
                self.attr.iter().map(|a| Node::sym(a)).collect(),
            ));
        }
        for graphic in &self.graphics {
            children.push(graphic.to_node(ctx));
        }
        for pad in &self.pads {
            children.push(pad.to_node(ctx));
        }
        if let Some(model) = &self.model {
            children.push(model.to_node());
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("footprint", children)
    }

    pub fn lib_id(&self) -> String {
        if self.library.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.library, self.name)
        }
    }

    fn property_value(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// The reference designator, read from the `Reference` property.
    pub fn reference(&self) -> &str {
        self.property_value("Reference").unwrap_or("")
    }

    /// The component value, read from the `Value` property.
    pub fn value(&self) -> &str {
        self.property_value("Value").unwrap_or("")
    }

    pub(crate) fn set_property(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(p) => p.value = value.to_owned(),
            None => self.properties.push(Property {
                name: name.to_owned(),
                value: value.to_owned(),
                at: At::default(),
                layer: if name == "Value" { "F.Fab" } else { "F.SilkS" }.to_owned(),
                uuid: Some(uuid::Uuid::new_v4().to_string()),
                effects: None,
                extra: Vec::new(),
            }),
        }
    }

    /// Nets referenced by any pad, for referential validation.
    pub fn pad_nets(&self) -> impl Iterator<Item = i64> + '_ {
        self.pads.iter().filter_map(|p| p.net.as_ref().map(|(n, _)| *n))
    }
}
