//! Net declarations: `(net 1 "GND")`.

use crate::error::SchemaError;
use crate::node::{ListNode, Node};

/// A net declaration linking an ordinal to a name. Net 0 is the unnamed,
/// unconnected net and is present in every board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub ordinal: i64,
    pub name: String,
}

impl Net {
    pub(crate) fn parse(list: &ListNode) -> Result<Net, SchemaError> {
        let ordinal = list
            .arg(0)
            .and_then(Node::as_int)
            .ok_or(SchemaError::missing("net", "ordinal"))?;
        let name = list
            .arg(1)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("net", "name"))?;
        Ok(Net {
            ordinal,
            name: name.to_owned(),
        })
    }

    pub(crate) fn to_node(&self) -> Node {
        Node::tagged(
            "net",
            vec![Node::int(self.ordinal), Node::string(self.name.clone())],
        )
    }
}
