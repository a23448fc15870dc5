//! Header elements: version, generator, general, paper, and the layer
//! table.

use super::{coord_child, coord_node, Node};
use crate::error::SchemaError;
use crate::node::ListNode;
use crate::units::Coord;

/// `(version 20241229)` -- the schema epoch selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub epoch: i64,
}

impl Version {
    pub(crate) fn parse(list: &ListNode) -> Result<Version, SchemaError> {
        let epoch = list
            .arg(0)
            .and_then(Node::as_int)
            .ok_or(SchemaError::missing("version", "epoch"))?;
        Ok(Version { epoch })
    }

    pub(crate) fn to_node(&self) -> Node {
        Node::tagged("version", vec![Node::int(self.epoch)])
    }
}

/// `(generator "pcbnew")` -- accepts the older unquoted form too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub name: String,
}

impl Generator {
    pub(crate) fn parse(list: &ListNode) -> Result<Generator, SchemaError> {
        let name = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("generator", "name"))?;
        Ok(Generator {
            name: name.to_owned(),
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        Node::tagged("generator", vec![Node::string(self.name.clone())])
    }
}

/// `(generator_version "9.0")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorVersion {
    pub version: String,
}

impl GeneratorVersion {
    pub(crate) fn parse(list: &ListNode) -> Result<GeneratorVersion, SchemaError> {
        let version = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("generator_version", "version"))?;
        Ok(GeneratorVersion {
            version: version.to_owned(),
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        Node::tagged(
            "generator_version",
            vec![Node::string(self.version.clone())],
        )
    }
}

/// The `(general ...)` section. Board thickness defaults to 1.6 mm when
/// absent, the tool's own default.
#[derive(Debug, Clone, PartialEq)]
pub struct General {
    pub thickness: Coord,
    pub legacy_teardrops: bool,
    pub extra: Vec<Node>,
}

impl Default for General {
    fn default() -> Self {
        General {
            thickness: Coord::from_nm(1_600_000),
            legacy_teardrops: false,
            extra: Vec::new(),
        }
    }
}

impl General {
    pub(crate) fn parse(list: &ListNode) -> Result<General, SchemaError> {
        let mut general = General::default();
        if let Some(thickness) = coord_child(list, "thickness", "general")? {
            general.thickness = thickness;
        }
        for child in list.children.iter().skip(1) {
            match child.tag() {
                Some("thickness") => {}
                Some("legacy_teardrops") => {
                    general.legacy_teardrops = child
                        .as_list()
                        .and_then(|l| l.arg(0))
                        .and_then(Node::text)
                        == Some("yes");
                }
                _ => general.extra.push(child.clone()),
            }
        }
        Ok(general)
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut children = vec![
            Node::tagged("thickness", vec![coord_node(self.thickness)]),
            Node::tagged("legacy_teardrops", vec![Node::yes_no(self.legacy_teardrops)]),
        ];
        children.extend(self.extra.iter().cloned());
        Node::tagged("general", children)
    }
}

/// `(paper "A4")`, or `(paper "User" w h)` whose custom dimensions ride
/// along in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub size: String,
    pub extra: Vec<Node>,
}

impl Paper {
    pub(crate) fn parse(list: &ListNode) -> Result<Paper, SchemaError> {
        let size = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("paper", "size"))?;
        Ok(Paper {
            size: size.to_owned(),
            extra: list.children.iter().skip(2).cloned().collect(),
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        let mut children = vec![Node::string(self.size.clone())];
        children.extend(self.extra.iter().cloned());
        Node::tagged("paper", children)
    }
}

/// One row of the layer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub ordinal: i64,
    pub name: String,
    /// `signal`, `power`, `mixed`, `jumper` or `user`.
    pub kind: String,
    pub user_name: Option<String>,
}

/// The `(layers ...)` table in the board header. Entity rows are parsed
/// positionally: ordinal, canonical name, kind, optional user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTable {
    pub layers: Vec<Layer>,
}

impl LayerTable {
    pub(crate) fn parse(list: &ListNode) -> Result<LayerTable, SchemaError> {
        let mut layers = Vec::new();
        for child in list.children.iter().skip(1) {
            let row = child
                .as_list()
                .ok_or_else(|| SchemaError::invalid("layers", "entry", "expected a list row"))?;
            let ordinal = row
                .children
                .first()
                .and_then(Node::as_int)
                .ok_or(SchemaError::missing("layers", "ordinal"))?;
            let name = row
                .children
                .get(1)
                .and_then(Node::text)
                .ok_or(SchemaError::missing("layers", "name"))?;
            let kind = row
                .children
                .get(2)
                .and_then(Node::text)
                .ok_or(SchemaError::missing("layers", "type"))?;
            let user_name = row.children.get(3).and_then(Node::text).map(str::to_owned);
            layers.push(Layer {
                ordinal,
                name: name.to_owned(),
                kind: kind.to_owned(),
                user_name,
            });
        }
        Ok(LayerTable { layers })
    }

    pub(crate) fn to_node(&self) -> Node {
        let rows = self
            .layers
            .iter()
            .map(|layer| {
                let mut row = vec![
                    Node::int(layer.ordinal),
                    Node::string(layer.name.clone()),
                    Node::sym(&layer.kind),
                ];
                if let Some(user) = &layer.user_name {
                    row.push(Node::string(user.clone()));
                }
                Node::list(row)
            })
            .collect();
        Node::tagged("layers", rows)
    }

    /// Layer name lookup used by referential validation. Wildcard groups
    /// like `*.Cu` are not table rows and are checked by the caller.
    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }
}
