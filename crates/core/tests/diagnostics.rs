//! Error taxonomy and diagnostic collection: fatal syntax/schema errors
//! abort the whole parse, referential findings never do.

mod common;

use common::MINIMAL;
use pcbdoc_core::{Diagnostic, Document, DocumentError};

#[test]
fn unmatched_closing_paren_reports_an_offset_inside_the_region() {
    let text = "(kicad_pcb\n  (version 20241229)\n  (net 0 \"\")\n)\n) trailing\n";
    let err = match Document::parse(text) {
        Err(DocumentError::Syntax(e)) => e,
        other => panic!("expected syntax error, got {other:?}"),
    };
    let stray = text.rfind(")\n) trailing").unwrap() + 2;
    assert_eq!(err.offset, stray);
    assert!(err.offset < text.len(), "offset must not point at EOF");
}

#[test]
fn unterminated_string_aborts_the_parse() {
    let text = "(kicad_pcb (paper \"A4)\n";
    assert!(matches!(
        Document::parse(text),
        Err(DocumentError::Syntax(_))
    ));
}

#[test]
fn wrong_root_tag_is_not_a_board() {
    let err = Document::parse("(not_a_pcb)").unwrap_err();
    assert!(matches!(
        err,
        DocumentError::NotABoard { found } if found == "not_a_pcb"
    ));
}

#[test]
fn footprint_without_position_is_a_schema_error() {
    let text = MINIMAL.replace(
        "  (net 0 \"\")\n",
        "  (net 0 \"\")\n  (footprint \"Lib:Name\"\n    (layer \"F.Cu\")\n  )\n",
    );
    let err = match Document::parse(&text) {
        Err(DocumentError::Schema(e)) => e,
        other => panic!("expected schema error, got {other:?}"),
    };
    assert_eq!(err.tag, "footprint");
    assert_eq!(err.field, "at");
}

#[test]
fn net_without_name_is_a_schema_error() {
    let text = MINIMAL.replace("(net 0 \"\")", "(net 0)");
    let err = match Document::parse(&text) {
        Err(DocumentError::Schema(e)) => e,
        other => panic!("expected schema error, got {other:?}"),
    };
    assert_eq!(err.tag, "net");
    assert_eq!(err.field, "name");
}

#[test]
fn schema_failure_returns_no_partial_document() {
    // The erroring footprint comes *after* valid content; the parse must
    // still hand back nothing but the error.
    let mut text = MINIMAL.to_owned();
    text.truncate(text.len() - 2); // drop the closing `)\n`
    text.push_str("  (footprint \"Lib:Name\" (layer \"F.Cu\"))\n)\n");
    assert!(Document::parse(&text).is_err());
}

#[test]
fn dangling_net_reference_warns_but_loads() {
    let text = MINIMAL.replace(
        "  (net 0 \"\")\n",
        "  (net 0 \"\")\n  (segment\n    (start 0 0)\n    (end 5 0)\n    (width 0.25)\n    (layer \"F.Cu\")\n    (net 7)\n    (uuid \"beef0001-0000-4000-8000-000000000001\")\n  )\n",
    );
    let mut doc = Document::parse(&text).expect("dangling nets must not block a load");
    assert_eq!(doc.tracks().len(), 1);
    assert!(doc
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::DanglingNet { net: 7, .. })));
}

#[test]
fn unknown_layer_reference_warns_but_loads() {
    let text = MINIMAL.replace(
        "  (net 0 \"\")\n",
        "  (net 0 \"\")\n  (segment\n    (start 0 0)\n    (end 5 0)\n    (width 0.25)\n    (layer \"X.Cu\")\n    (net 0)\n    (uuid \"beef0002-0000-4000-8000-000000000002\")\n  )\n",
    );
    let doc = Document::parse(&text).expect("unknown layers must not block a load");
    assert!(doc
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::UnknownLayer { layer, .. } if layer == "X.Cu")));
}

#[test]
fn wildcard_pad_layers_are_not_reported() {
    let text = MINIMAL.replace(
        "  (net 0 \"\")\n",
        r#"  (net 0 "")
  (footprint "Connector:Pin"
    (layer "F.Cu")
    (uuid "beef0003-0000-4000-8000-000000000003")
    (at 10 10)
    (pad "1" thru_hole circle
      (at 0 0)
      (size 1.7 1.7)
      (drill 1.0)
      (layers "*.Cu" "*.Mask")
      (uuid "beef0004-0000-4000-8000-000000000004")
    )
  )
"#,
    );
    let doc = Document::parse(&text).expect("parse failed");
    assert!(doc
        .diagnostics()
        .iter()
        .all(|d| !matches!(d, Diagnostic::UnknownLayer { .. })));
}

#[test]
fn unknown_element_notice_carries_tag_and_offset() {
    let text = MINIMAL.replace("  (net 0 \"\")\n", "  (net 0 \"\")\n  (mystery_tag 1)\n");
    let doc = Document::parse(&text).expect("parse failed");
    let notice = doc
        .diagnostics()
        .iter()
        .find_map(|d| match d {
            Diagnostic::UnknownElement { tag, offset } => Some((tag.clone(), *offset)),
            _ => None,
        })
        .expect("expected an unknown-element notice");
    assert_eq!(notice.0, "mystery_tag");
    assert_eq!(notice.1, text.find("(mystery_tag").unwrap());
}

#[test]
fn diagnostics_serialize_for_reporting() {
    let diag = Diagnostic::DanglingNet {
        entity: "beef0001-0000-4000-8000-000000000001".into(),
        net: 7,
    };
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["kind"], "dangling_net");
    assert_eq!(json["net"], 7);
}
