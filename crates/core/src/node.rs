//! Generic S-expression tree.
//!
//! The tokenizer produces [`Node`]s with no knowledge of board semantics.
//! Every atom keeps the exact source substring it was read from so that
//! untouched values can be replayed verbatim by the formatter; every list
//! keeps its byte span into the source text for the same reason.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Byte range of a node in the source text. Synthetic nodes (built by
/// format functions rather than the tokenizer) carry [`Span::SYNTHETIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const SYNTHETIC: Span = Span {
        start: usize::MAX,
        end: usize::MAX,
    };

    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn is_synthetic(&self) -> bool {
        self.start == usize::MAX
    }
}

/// A bare symbol token, e.g. `smd` or `F.Cu` (unquoted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymAtom {
    pub name: String,
    pub span: Span,
}

/// A double-quoted string. `value` is the unescaped content, `raw` the
/// exact source substring including the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrAtom {
    pub value: String,
    pub raw: String,
    pub span: Span,
}

/// A numeric literal. `value` is the exact decimal value, `raw` the source
/// substring -- re-emitting `raw` can never drift, whatever the host float
/// formatting would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumAtom {
    pub value: Decimal,
    pub raw: String,
    pub span: Span,
}

/// A parenthesized list of child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub children: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Sym(SymAtom),
    Str(StrAtom),
    Num(NumAtom),
    List(ListNode),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Sym(a) => a.span,
            Node::Str(a) => a.span,
            Node::Num(a) => a.span,
            Node::List(l) => l.span,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Node::Sym(a) => Some(&a.name),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<Decimal> {
        match self {
            Node::Num(a) => Some(a.value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Num(a) if a.value.is_integer() => a.value.to_i64(),
            _ => None,
        }
    }

    /// The textual value of a symbol or string atom. The grammar quotes
    /// inconsistently across format revisions, so most name-like fields
    /// accept either form.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Sym(a) => Some(&a.name),
            Node::Str(a) => Some(&a.value),
            _ => None,
        }
    }

    /// The leading tag symbol of a list node, if any.
    pub fn tag(&self) -> Option<&str> {
        self.as_list().and_then(ListNode::tag)
    }

    // -- Synthetic constructors used by format functions ------------

    pub fn sym(name: impl Into<String>) -> Node {
        Node::Sym(SymAtom {
            name: name.into(),
            span: Span::SYNTHETIC,
        })
    }

    pub fn string(value: impl Into<String>) -> Node {
        let value = value.into();
        let raw = quote(&value);
        Node::Str(StrAtom {
            value,
            raw,
            span: Span::SYNTHETIC,
        })
    }

    pub fn num(value: Decimal, raw: String) -> Node {
        Node::Num(NumAtom {
            value,
            raw,
            span: Span::SYNTHETIC,
        })
    }

    pub fn int(value: i64) -> Node {
        Node::num(Decimal::from(value), value.to_string())
    }

    /// Booleans are rendered as the format's `yes`/`no` symbols, never a
    /// host-language literal.
    pub fn yes_no(value: bool) -> Node {
        Node::sym(if value { "yes" } else { "no" })
    }

    pub fn list(children: Vec<Node>) -> Node {
        Node::List(ListNode {
            children,
            span: Span::SYNTHETIC,
        })
    }

    /// `(tag child child ...)`
    pub fn tagged(tag: &str, mut rest: Vec<Node>) -> Node {
        let mut children = Vec::with_capacity(rest.len() + 1);
        children.push(Node::sym(tag));
        children.append(&mut rest);
        Node::list(children)
    }
}

impl ListNode {
    pub fn tag(&self) -> Option<&str> {
        self.children.first().and_then(Node::as_sym)
    }

    /// Positional argument `i`, counted after the tag symbol.
    pub fn arg(&self, i: usize) -> Option<&Node> {
        self.children.get(i + 1)
    }

    /// First child list with the given tag. Keyword sub-lists may appear
    /// in any relative order, so lookups are always by tag, never by
    /// position.
    pub fn child(&self, tag: &str) -> Option<&ListNode> {
        self.children.iter().find_map(|n| match n {
            Node::List(l) if l.tag() == Some(tag) => Some(l),
            _ => None,
        })
    }

    /// All child lists with the given tag, in order.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ListNode> + 'a {
        self.children.iter().filter_map(move |n| match n {
            Node::List(l) if l.tag() == Some(tag) => Some(l),
            _ => None,
        })
    }

    /// The single value of a `(tag value)` child, as text.
    pub fn value_of(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(|l| l.arg(0)).and_then(Node::text)
    }
}

/// Quote and escape a string for emission: internal quotes and backslashes
/// are escaped, as are newlines and tabs.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn tagged_builds_list_with_leading_symbol() {
        let n = Node::tagged("at", vec![Node::int(1), Node::int(2)]);
        assert_eq!(n.tag(), Some("at"));
        assert_eq!(n.as_list().unwrap().arg(1).unwrap().as_int(), Some(2));
    }

    #[test]
    fn child_lookup_is_order_independent() {
        let l = match Node::tagged(
            "pad",
            vec![
                Node::tagged("size", vec![Node::int(1), Node::int(1)]),
                Node::tagged("at", vec![Node::int(0), Node::int(0)]),
            ],
        ) {
            Node::List(l) => l,
            _ => unreachable!(),
        };
        assert!(l.child("at").is_some());
        assert!(l.child("size").is_some());
        assert!(l.child("drill").is_none());
    }
}
