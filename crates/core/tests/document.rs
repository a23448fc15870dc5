//! Document model behavior: sections, identity, structural mutation and
//! the setter API.

mod common;

use common::{BOARD, MINIMAL};
use pcbdoc_core::{
    factory, format_document, At, Coord, Document, EditError, Element, Net, Point, SectionKind,
};

#[test]
fn minimal_board_has_no_placed_or_routed_content() {
    let mut doc = Document::parse(MINIMAL).expect("parse failed");
    assert!(doc.footprints().is_empty());
    assert!(doc.tracks().is_empty());
    assert!(doc.vias().is_empty());
    assert!(doc.zones().is_empty());
    assert_eq!(doc.nets().len(), 1);
}

#[test]
fn sections_keep_parse_order() {
    let doc = Document::parse(BOARD).expect("parse failed");
    let nets: Vec<i64> = doc
        .section(SectionKind::Nets)
        .iter()
        .map(|id| doc.entity(id).unwrap().as_net().unwrap().ordinal)
        .collect();
    assert_eq!(nets, [0, 1, 2]);

    assert_eq!(doc.section(SectionKind::Footprints).len(), 1);
    assert_eq!(doc.section(SectionKind::Tracks).len(), 2); // segment + via
    assert_eq!(doc.section(SectionKind::Setup).len(), 1);
    assert_eq!(doc.section(SectionKind::Unknown).len(), 1); // embedded_fonts
}

#[test]
fn entity_ids_come_from_identity_tokens() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let ids = doc.footprints().by_reference("R1").to_vec();
    assert_eq!(ids[0].as_str(), "f00dcafe-0001-4000-8000-000000000001");
}

#[test]
fn id_is_stable_across_unrelated_mutations() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let footprint_id = doc.footprints().by_reference("R1")[0].clone();
    let track_id = doc.tracks().ids()[0].clone();

    doc.set_track_net(&track_id, 2).unwrap();
    doc.set_footprint_value(&footprint_id, "22k").unwrap();
    let net_id = doc.nets().by_ordinal(2)[0].clone();
    doc.set_net_name(&net_id, "VDD").unwrap();

    let footprint = doc.entity(&footprint_id).expect("id must stay valid");
    assert_eq!(footprint.as_footprint().unwrap().value(), "22k");
    assert_eq!(footprint.id(), &footprint_id);
}

#[test]
fn add_places_new_entities_and_returns_their_id() {
    let mut doc = Document::parse(MINIMAL).expect("parse failed");
    let id = doc
        .add(
            SectionKind::Nets,
            Element::Net(Net {
                ordinal: 1,
                name: "GND".into(),
            }),
        )
        .expect("add failed");
    assert!(doc.entity(&id).is_some());
    assert_eq!(doc.section(SectionKind::Nets).len(), 2);
    // New entities append to the end of their section.
    assert_eq!(doc.section(SectionKind::Nets)[1], id);
}

#[test]
fn removed_ids_are_never_reused() {
    let mut doc = Document::parse(MINIMAL).expect("parse failed");
    let element = factory::new_track(
        Point::from_mm("0", "0"),
        Point::from_mm("10", "0"),
        Coord::from_mm_str("0.25"),
        "F.Cu",
        0,
    );
    let resurrected = element.clone();
    let id = doc.add(SectionKind::Tracks, element).expect("add failed");
    doc.remove(&id).expect("remove failed");
    assert!(doc.entity(&id).is_none());

    // The same identity token cannot come back, even though the entity
    // is gone from the arena.
    let err = doc.add(SectionKind::Tracks, resurrected).unwrap_err();
    assert!(matches!(err, EditError::DuplicateId { .. }));
}

#[test]
fn remove_of_unknown_id_fails() {
    let mut doc = Document::parse(MINIMAL).expect("parse failed");
    let element = factory::new_track(
        Point::from_mm("0", "0"),
        Point::from_mm("1", "0"),
        Coord::from_mm_str("0.25"),
        "F.Cu",
        0,
    );
    let id = doc.add(SectionKind::Tracks, element).unwrap();
    doc.remove(&id).unwrap();
    assert!(matches!(
        doc.remove(&id),
        Err(EditError::NoSuchEntity { .. })
    ));
}

#[test]
fn setters_reject_the_wrong_entity_kind() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let footprint_id = doc.footprints().by_reference("R1")[0].clone();
    let err = doc.set_track_net(&footprint_id, 1).unwrap_err();
    assert!(matches!(err, EditError::WrongKind { expected: "segment", .. }));
}

#[test]
fn reference_setter_validates_format() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let id = doc.footprints().by_reference("R1")[0].clone();
    for bad in ["", "1R", "r1", "R1X"] {
        assert!(matches!(
            doc.set_footprint_reference(&id, bad),
            Err(EditError::InvalidReference { .. })
        ));
    }
    doc.set_footprint_reference(&id, "R9").expect("valid rename");
    assert_eq!(
        doc.entity(&id).unwrap().as_footprint().unwrap().reference(),
        "R9"
    );
}

#[test]
fn reference_setter_rejects_duplicates_held_by_others() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let r2 = factory::new_footprint(
        "Resistor_SMD:R_0603_1608Metric",
        "R2",
        "1k",
        At::new(Coord::from_mm_str("60"), Coord::from_mm_str("40")),
        "F.Cu",
    );
    let r2_id = doc.add(SectionKind::Footprints, r2).unwrap();

    let err = doc.set_footprint_reference(&r2_id, "R1").unwrap_err();
    assert!(matches!(err, EditError::DuplicateReference { .. }));

    // Re-assigning a footprint its own reference is not a duplicate.
    doc.set_footprint_reference(&r2_id, "R2").expect("self rename");
}

#[test]
fn modification_tracking_follows_dirty_state() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    assert!(!doc.is_modified());
    let id = doc.tracks().ids()[0].clone();
    doc.set_track_layer(&id, "B.Cu").unwrap();
    assert!(doc.is_modified());
}

#[test]
fn position_and_rotation_setters_update_the_at_group() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let id = doc.footprints().by_reference("R1")[0].clone();
    doc.set_footprint_position(&id, Point::from_mm("72.5", "18"))
        .unwrap();
    doc.set_footprint_rotation(&id, pcbdoc_core::Angle::from_degrees("90".parse().unwrap()))
        .unwrap();

    let footprint = doc.entity(&id).unwrap().as_footprint().unwrap();
    assert_eq!(footprint.at.x, Coord::from_mm_str("72.5"));
    assert_eq!(footprint.at.y, Coord::from_mm_str("18"));
    assert_eq!(
        footprint.at.rotation.map(|r| r.to_string()),
        Some("90.0".to_owned())
    );

    let out = format_document(&doc);
    assert!(out.contains("(at 72.5 18.0 90.0)"));
}

#[test]
fn from_scratch_documents_format_and_reparse() {
    let doc = Document::new();
    assert!(!doc.is_modified());
    let text = format_document(&doc);
    let mut reparsed = Document::parse(&text).expect("fresh board must parse");
    assert_eq!(reparsed.nets().len(), 1);
    assert_eq!(reparsed.epoch(), doc.epoch());
    let layers = reparsed.section(SectionKind::Layers);
    assert_eq!(layers.len(), 1);
}

#[test]
fn dangling_net_is_tolerated_by_the_setter() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let id = doc.tracks().ids()[0].clone();
    doc.set_track_net(&id, 99).expect("dangling nets are legal");
    let warnings = doc.validate();
    assert!(warnings
        .iter()
        .any(|d| matches!(d, pcbdoc_core::Diagnostic::DanglingNet { net: 99, .. })));
}
