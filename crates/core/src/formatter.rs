//! Formatter: document back to text.
//!
//! Entities that were never touched are replayed from their captured
//! source span, byte for byte, including whatever whitespace the original
//! author used between elements. Dirty and newly added entities are
//! rendered canonically: two-space indentation, nested lists on their own
//! lines, scalar-only lists inline, `yes`/`no` booleans, quoted strings.
//! Opaque nodes and extra-bag sub-trees are always replayed from their
//! span -- the engine has no schema to regenerate them from.

use crate::document::Document;
use crate::node::Node;
use crate::registry::SectionKind;

const INDENT: &str = "  ";

/// Serialize a document. A document parsed and saved with zero mutations
/// reproduces its input exactly.
pub fn format_document(doc: &Document) -> String {
    let source = doc.source();
    let mut out = String::with_capacity(source.map(str::len).unwrap_or(4096));

    match (source, doc.prefix()) {
        (Some(src), Some(prefix)) => out.push_str(&src[prefix.start..prefix.end]),
        _ => out.push_str("(kicad_pcb"),
    }

    for entity in doc.entities() {
        match (source, entity.lead()) {
            (Some(src), Some(lead)) => out.push_str(&src[lead.start..lead.end]),
            _ => out.push_str(default_lead(entity.section())),
        }
        match (source, entity.span(), entity.is_dirty()) {
            (Some(src), Some(span), false) => out.push_str(&src[span.start..span.end]),
            _ => {
                let node = entity
                    .element()
                    .to_node(entity.id().as_str(), &doc.parse_ctx());
                render_node(&node, 1, source, &mut out);
            }
        }
    }

    match (source, doc.suffix()) {
        (Some(src), Some(suffix)) => out.push_str(&src[suffix.start..suffix.end]),
        _ => out.push_str("\n)\n"),
    }
    out
}

/// Separator used before entities that have no original position: header
/// scalars share the opening line, everything else starts a fresh
/// indented line.
fn default_lead(section: SectionKind) -> &'static str {
    if section.is_inline_header() {
        " "
    } else {
        "\n  "
    }
}

/// Render one node. Lists carrying a real span are replayed verbatim from
/// the source text; synthetic lists are rendered canonically. Atoms
/// always own their text.
pub(crate) fn render_node(node: &Node, depth: usize, source: Option<&str>, out: &mut String) {
    match node {
        Node::Sym(a) => out.push_str(&a.name),
        Node::Str(a) => out.push_str(&a.raw),
        Node::Num(a) => out.push_str(&a.raw),
        Node::List(list) => {
            if !list.span.is_synthetic() {
                let Some(src) = source else {
                    // An opaque subtree can only be replayed; reaching it
                    // without the source text means the document invariant
                    // was broken before formatting.
                    panic!("cannot replay a preserved subtree without source text");
                };
                out.push_str(&src[list.span.start..list.span.end]);
                return;
            }

            let has_list_child = list.children.iter().any(|c| matches!(c, Node::List(_)));
            out.push('(');
            if !has_list_child {
                for (i, child) in list.children.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    render_node(child, depth, source, out);
                }
                out.push(')');
                return;
            }

            let scalar_prefix = list
                .children
                .iter()
                .take_while(|c| !matches!(c, Node::List(_)))
                .count();
            for (i, child) in list.children.iter().take(scalar_prefix).enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                render_node(child, depth, source, out);
            }
            for child in &list.children[scalar_prefix..] {
                out.push('\n');
                for _ in 0..=depth {
                    out.push_str(INDENT);
                }
                render_node(child, depth + 1, source, out);
            }
            out.push('\n');
            for _ in 0..depth {
                out.push_str(INDENT);
            }
            out.push(')');
        }
    }
}
