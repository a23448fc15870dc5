//! Referential validation and reference-designator checks.
//!
//! Dangling net ordinals and unknown layer names are warnings, never
//! errors: the source tool itself tolerates them during interactive
//! editing, so a load must not fail on them. Full electrical or geometric
//! rule checking belongs to external collaborators.

use crate::document::Document;
use crate::elements::Element;
use crate::error::{Diagnostic, EditError};
use std::collections::HashSet;

/// Validate a reference designator: one or more ASCII uppercase letters
/// followed by one or more digits (`R1`, `C42`, `U10`).
pub fn validate_reference(reference: &str) -> Result<(), EditError> {
    if reference.is_empty() {
        return Err(EditError::InvalidReference {
            value: reference.to_owned(),
            reason: "reference cannot be empty",
        });
    }
    let letters = reference
        .chars()
        .take_while(|c| c.is_ascii_uppercase())
        .count();
    let valid = letters > 0
        && reference.len() > letters
        && reference.chars().skip(letters).all(|c| c.is_ascii_digit());
    if !valid {
        return Err(EditError::InvalidReference {
            value: reference.to_owned(),
            reason: "expected letters followed by digits",
        });
    }
    Ok(())
}

/// Layer names that designate groups rather than table rows.
fn is_wildcard_layer(name: &str) -> bool {
    name.contains('*') || name.contains('&')
}

/// Scan the whole document for references that do not resolve: net
/// ordinals with no `net` declaration and layer names absent from the
/// layer table.
pub(crate) fn referential_diagnostics(doc: &Document) -> Vec<Diagnostic> {
    let mut declared_nets: HashSet<i64> = HashSet::new();
    let mut layer_table: Option<HashSet<&str>> = None;
    for entity in doc.entities() {
        match entity.element() {
            Element::Net(n) => {
                declared_nets.insert(n.ordinal);
            }
            Element::LayerTable(t) => {
                layer_table = Some(t.layers.iter().map(|l| l.name.as_str()).collect());
            }
            _ => {}
        }
    }

    let mut diagnostics = Vec::new();
    // Net 0 is the implicit unconnected net; entities that omit their net
    // group read back as 0, so it is never reported as dangling.
    let mut check_net = |entity: &str, net: i64, out: &mut Vec<Diagnostic>| {
        if net != 0 && !declared_nets.contains(&net) {
            out.push(Diagnostic::DanglingNet {
                entity: entity.to_owned(),
                net,
            });
        }
    };
    let check_layer = |entity: &str, layer: &str, out: &mut Vec<Diagnostic>| {
        if let Some(table) = &layer_table {
            if !layer.is_empty() && !is_wildcard_layer(layer) && !table.contains(layer) {
                out.push(Diagnostic::UnknownLayer {
                    entity: entity.to_owned(),
                    layer: layer.to_owned(),
                });
            }
        }
    };

    for entity in doc.entities() {
        let id = entity.id().as_str();
        match entity.element() {
            Element::Track(t) => {
                check_net(id, t.net, &mut diagnostics);
                check_layer(id, &t.layer, &mut diagnostics);
            }
            Element::Via(v) => {
                check_net(id, v.net, &mut diagnostics);
                for layer in &v.layers {
                    check_layer(id, layer, &mut diagnostics);
                }
            }
            Element::Zone(z) => {
                check_net(id, z.net, &mut diagnostics);
                for layer in &z.layers {
                    check_layer(id, layer, &mut diagnostics);
                }
            }
            Element::Footprint(f) => {
                check_layer(id, &f.layer, &mut diagnostics);
                for net in f.pad_nets() {
                    check_net(id, net, &mut diagnostics);
                }
            }
            _ => {}
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_designators() {
        for r in ["R1", "C42", "U10", "SW2", "J1"] {
            assert!(validate_reference(r).is_ok(), "{r} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_designators() {
        for r in ["", "R", "1R", "r1", "R1A", "R-1"] {
            assert!(validate_reference(r).is_err(), "{r} should be invalid");
        }
    }

    #[test]
    fn wildcard_layers_are_not_checked() {
        assert!(is_wildcard_layer("*.Cu"));
        assert!(is_wildcard_layer("F&B.Cu"));
        assert!(!is_wildcard_layer("F.Cu"));
    }
}
