//! Groups: `(group "Name" (uuid ...) (members uuid uuid ...))`.

use super::{identity_node, identity_of, is_identity_tag};
use crate::error::SchemaError;
use crate::node::{ListNode, Node};
use crate::registry::ParseCtx;

/// A named grouping of other entities by identity token. Member ids are
/// not required to resolve; the source tool tolerates stale members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub members: Vec<String>,
    pub uuid: Option<String>,
    pub extra: Vec<Node>,
}

impl Group {
    pub(crate) fn parse(list: &ListNode) -> Result<Group, SchemaError> {
        let name = list
            .arg(0)
            .and_then(Node::text)
            .ok_or(SchemaError::missing("group", "name"))?;
        let members = list
            .child("members")
            .map(|m| {
                m.children
                    .iter()
                    .skip(1)
                    .filter_map(Node::text)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let mut extra = Vec::new();
        for child in list.children.iter().skip(2) {
            match child.tag() {
                Some("members") => {}
                Some(t) if is_identity_tag(t) => {}
                _ => extra.push(child.clone()),
            }
        }
        Ok(Group {
            name: name.to_owned(),
            members,
            uuid: identity_of(list),
            extra,
        })
    }

    pub(crate) fn to_node(&self, id: &str, ctx: &ParseCtx) -> Node {
        let mut children = vec![Node::string(self.name.clone()), identity_node(id, ctx)];
        children.push(Node::tagged(
            "members",
            self.members
                .iter()
                .map(|m| Node::string(m.clone()))
                .collect(),
        ));
        children.extend(self.extra.iter().cloned());
        Node::tagged("group", children)
    }
}
