//! Zones (copper pours): outline, connection settings, fill options.
//!
//! Computed fill results (`filled_polygon` and friends) are never modeled;
//! they stay in the extra bag and are replayed verbatim. Once a zone is
//! mutated its canonical re-render makes no byte-stability promise for
//! those sub-trees -- the source tool itself regenerates them between
//! saves.

use super::{coord_child, coord_from, coord_node, identity_node, identity_of, is_identity_tag,
    layer_names, num_arg, point_node, point_of};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;
use crate::units::{Coord, Point};

/// The `(fill ...)` options group of a zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneFill {
    pub enabled: bool,
    pub thermal_gap: Option<Coord>,
    pub thermal_bridge_width: Option<Coord>,
    pub extra: Vec<Node>,
}

impl ZoneFill {
    fn parse(list: &ListNode) -> Result<ZoneFill, SchemaError> {
        let mut fill = ZoneFill {
            enabled: list.arg(0).and_then(Node::text) == Some("yes"),
            ..ZoneFill::default()
        };
        for child in list.children.iter().skip(1) {
            match child.tag() {
                Some("thermal_gap") => {
                    let group = child.as_list().expect("tagged node is a list");
                    let v = num_arg(group, 0).ok_or(SchemaError::missing("zone", "thermal_gap"))?;
                    fill.thermal_gap = Some(coord_from(v, "zone", "thermal_gap")?);
                }
                Some("thermal_bridge_width") => {
                    let group = child.as_list().expect("tagged node is a list");
                    let v = num_arg(group, 0)
                        .ok_or(SchemaError::missing("zone", "thermal_bridge_width"))?;
                    fill.thermal_bridge_width =
                        Some(coord_from(v, "zone", "thermal_bridge_width")?);
                }
                None => {} // the leading yes/no symbol
                _ => fill.extra.push(child.clone()),
            }
        }
        Ok(fill)
    }

    fn to_node(&self) -> Node {
        let mut children = Vec::new();
        if self.enabled {
            children.push(Node::sym("yes"));
        }
        if let Some(gap) = self.thermal_gap {
            children.push(Node::tagged("thermal_gap", vec![coord_node(gap)]));
        }
        if let Some(bridge) = self.thermal_bridge_width {
            children.push(Node::tagged("thermal_bridge_width", vec![coord_node(bridge)]));
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("fill", children)
    }
}

/// A copper pour. The outline polygon is modeled; filled areas are not.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub net: i64,
    pub net_name: String,
    pub layers: Vec<String>,
    pub locked: bool,
    /// Hatch display style and pitch, e.g. `edge 0.5`.
    pub hatch: Option<(String, Coord)>,
    pub connect_pads_mode: Option<String>,
    pub connect_pads_clearance: Option<Coord>,
    pub min_thickness: Option<Coord>,
    pub filled_areas_thickness: Option<bool>,
    pub fill: Option<ZoneFill>,
    /// Outline corner points of the first `(polygon (pts ...))` group.
    pub polygon: Vec<Point>,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

impl Zone {
    pub(crate) fn parse(list: &ListNode) -> Result<Zone, SchemaError> {
        let mut zone = Zone {
            net: 0,
            net_name: String::new(),
            layers: Vec::new(),
            locked: false,
            hatch: None,
            connect_pads_mode: None,
            connect_pads_clearance: None,
            min_thickness: None,
            filled_areas_thickness: None,
            fill: None,
            polygon: Vec::new(),
            uuid: identity_of(list),
            extra: Vec::new(),
        };

        for child in list.children.iter().skip(1) {
            let Some(tag) = child.tag() else {
                zone.extra.push(child.clone());
                continue;
            };
            let group = child.as_list().expect("tagged node is a list");
            match tag {
                t if is_identity_tag(t) => {}
                "net" => {
                    zone.net = group
                        .arg(0)
                        .and_then(Node::as_int)
                        .ok_or(SchemaError::missing("zone", "net"))?;
                    if let Some(name) = group.arg(1).and_then(Node::text) {
                        zone.net_name = name.to_owned();
                    }
                }
                "net_name" => {
                    if let Some(name) = group.arg(0).and_then(Node::text) {
                        zone.net_name = name.to_owned();
                    }
                }
                "layer" | "layers" => zone.layers = layer_names(group),
                "locked" => {
                    zone.locked = group.arg(0).and_then(Node::text) == Some("yes");
                }
                "hatch" => {
                    let style = group
                        .arg(0)
                        .and_then(Node::as_sym)
                        .ok_or(SchemaError::missing("zone", "hatch"))?;
                    let pitch =
                        num_arg(group, 1).ok_or(SchemaError::missing("zone", "hatch"))?;
                    zone.hatch = Some((style.to_owned(), coord_from(pitch, "zone", "hatch")?));
                }
                "connect_pads" => {
                    zone.connect_pads_mode =
                        group.arg(0).and_then(Node::as_sym).map(str::to_owned);
                    zone.connect_pads_clearance = coord_child(group, "clearance", "zone")?;
                }
                "min_thickness" => {
                    let v = num_arg(group, 0)
                        .ok_or(SchemaError::missing("zone", "min_thickness"))?;
                    zone.min_thickness = Some(coord_from(v, "zone", "min_thickness")?);
                }
                "filled_areas_thickness" => {
                    zone.filled_areas_thickness =
                        Some(group.arg(0).and_then(Node::text) != Some("no"));
                }
                "fill" => zone.fill = Some(ZoneFill::parse(group)?),
                "polygon" if zone.polygon.is_empty() => {
                    if let Some(pts) = group.child("pts") {
                        for pt in pts.children_tagged("xy") {
                            zone.polygon.push(point_of(pt, "zone", "polygon")?);
                        }
                    }
                }
                _ => zone.extra.push(child.clone()),
            }
        }
        Ok(zone)
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let mut children = vec![Node::tagged("net", vec![Node::int(self.net)])];
        children.push(Node::tagged(
            "net_name",
            vec![Node::string(self.net_name.clone())],
        ));
        match self.layers.len() {
            0 => {}
            1 => children.push(Node::tagged(
                "layer",
                vec![Node::string(self.layers[0].clone())],
            )),
            _ => children.push(super::layers_node(&self.layers)),
        }
        children.push(identity_node(id, ctx));
        if self.locked {
            children.push(Node::tagged("locked", vec![Node::sym("yes")]));
        }
        if let Some((style, pitch)) = &self.hatch {
            children.push(Node::tagged(
                "hatch",
                vec![Node::sym(style), coord_node(*pitch)],
            ));
        }
        if self.connect_pads_mode.is_some() || self.connect_pads_clearance.is_some() {
            let mut cp = Vec::new();
            if let Some(mode) = &self.connect_pads_mode {
                cp.push(Node::sym(mode));
            }
            if let Some(clearance) = self.connect_pads_clearance {
                cp.push(Node::tagged("clearance", vec![coord_node(clearance)]));
            }
            children.push(Node::tagged("connect_pads", cp));
        }
        if let Some(min) = self.min_thickness {
            children.push(Node::tagged("min_thickness", vec![coord_node(min)]));
        }
        if let Some(filled) = self.filled_areas_thickness {
            children.push(Node::tagged(
                "filled_areas_thickness",
                vec![Node::yes_no(filled)],
            ));
        }
        if let Some(fill) = &self.fill {
            children.push(fill.to_node());
        }
        if !self.polygon.is_empty() {
            let pts = self
                .polygon
                .iter()
                .map(|p| point_node("xy", *p))
                .collect();
            children.push(Node::tagged("polygon", vec![Node::tagged("pts", pts)]));
        }
        children.extend(self.extra.iter().cloned());
        Node::tagged("zone", children)
    }

    /// Thermal relief gap, read from fill options falling back to the
    /// connect_pads clearance the way the source tool does.
    pub fn thermal_relief_gap(&self) -> Option<Coord> {
        self.fill
            .as_ref()
            .and_then(|f| f.thermal_gap)
            .or(self.connect_pads_clearance)
    }
}
