//! Secondary index behavior: lazy rebuilds, rename tracking, duplicate
//! surfacing, and the aggregate queries layered on the indexes.

mod common;

use common::BOARD;
use pcbdoc_core::{factory, At, Coord, Document, Point, SectionKind};

#[test]
fn footprint_lookup_follows_a_rename() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let id = doc.footprints().by_reference("R1")[0].clone();

    doc.set_footprint_reference(&id, "R2").expect("rename failed");

    assert!(doc.footprints().by_reference("R1").is_empty());
    assert_eq!(doc.footprints().by_reference("R2"), [id]);
}

#[test]
fn added_footprint_is_visible_on_next_lookup() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let element = factory::new_footprint(
        "Capacitor_SMD:C_0402_1005Metric",
        "C1",
        "100n",
        At::new(Coord::from_mm_str("55"), Coord::from_mm_str("40")),
        "B.Cu",
    );
    let id = doc.add(SectionKind::Footprints, element).unwrap();

    assert_eq!(doc.footprints().by_reference("C1"), [id.clone()]);
    assert_eq!(doc.footprints().by_layer("B.Cu"), [id.clone()]);
    assert_eq!(doc.footprints().by_library("Capacitor_SMD"), [id]);
    assert_eq!(doc.footprints().len(), 2);
}

#[test]
fn duplicate_references_in_source_are_all_returned() {
    // Two footprints that both claim R1: the index must surface both, not
    // silently pick one. Resolution policy belongs to the caller.
    let duplicated = BOARD.replace(
        "  (gr_line",
        r#"  (footprint "Resistor_SMD:R_0805_2012Metric"
    (layer "F.Cu")
    (uuid "f00dcafe-00ff-4000-8000-0000000000ff")
    (at 70 40)
    (property "Reference" "R1"
      (at 0 0 0)
      (layer "F.SilkS")
      (uuid "f00dcafe-00fe-4000-8000-0000000000fe")
    )
    (property "Value" "1k"
      (at 0 0 0)
      (layer "F.Fab")
      (uuid "f00dcafe-00fd-4000-8000-0000000000fd")
    )
  )
  (gr_line"#,
    );
    let mut doc = Document::parse(&duplicated).expect("parse failed");
    assert_eq!(doc.footprints().by_reference("R1").len(), 2);
}

#[test]
fn track_and_via_lookups_by_net() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    assert_eq!(doc.tracks().by_net(1).len(), 1);
    assert!(doc.tracks().by_net(2).is_empty());
    assert_eq!(doc.vias().by_net(1).len(), 1);

    let track_id = doc.tracks().by_net(1)[0].clone();
    doc.set_track_net(&track_id, 2).unwrap();
    assert!(doc.tracks().by_net(1).is_empty());
    assert_eq!(doc.tracks().by_net(2), [track_id]);
}

#[test]
fn zone_lookups_by_net_and_layer() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    assert_eq!(doc.zones().by_net(1).len(), 1);
    assert_eq!(doc.zones().by_layer("F.Cu").len(), 1);
    assert!(doc.zones().by_layer("B.Cu").is_empty());
}

#[test]
fn net_lookups_by_ordinal_and_name() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    assert!(doc.nets().contains_ordinal(0));
    assert_eq!(doc.nets().by_name("GND").len(), 1);
    assert!(doc.nets().by_name("MISSING").is_empty());
    assert_eq!(doc.net_name(2), Some("VCC".to_owned()));
    assert_eq!(doc.net_name(42), None);
}

#[test]
fn batch_mutations_pay_one_rebuild() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    // Many structural changes without any lookup in between: the index
    // stays stale the whole time and only the final lookup rebuilds.
    for i in 0..20 {
        let element = factory::new_track(
            Point::from_mm("0", "0"),
            Point::from_mm("10", "0"),
            Coord::from_mm_str("0.25"),
            "F.Cu",
            i,
        );
        doc.add(SectionKind::Tracks, element).unwrap();
    }
    assert_eq!(doc.tracks().len(), 21);
    assert_eq!(doc.tracks().by_net(7).len(), 1);
}

#[test]
fn track_length_sums_per_net() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    // Two 3-4-5 triangles on net 5: 5 mm each.
    for _ in 0..2 {
        let element = factory::new_track(
            Point::from_mm("0", "0"),
            Point::from_mm("3", "4"),
            Coord::from_mm_str("0.25"),
            "F.Cu",
            5,
        );
        doc.add(SectionKind::Tracks, element).unwrap();
    }
    let total = doc.track_length_by_net(5);
    assert!((total - 10.0).abs() < 1e-9, "got {total}");
}

#[test]
fn refresh_indexes_makes_all_lookups_current() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let id = doc.footprints().by_reference("R1")[0].clone();
    doc.set_footprint_layer(&id, "B.Cu").unwrap();
    doc.refresh_indexes();
    // All further reads go through &self accessors on the already
    // current indexes.
    assert_eq!(doc.footprints().by_layer("B.Cu"), [id]);
}

#[test]
fn stats_reflect_document_contents() {
    let mut doc = Document::parse(BOARD).expect("parse failed");
    let stats = doc.stats();
    assert_eq!(stats.footprints, 1);
    assert_eq!(stats.tracks, 1);
    assert_eq!(stats.vias, 1);
    assert_eq!(stats.zones, 1);
    assert_eq!(stats.nets, 3);
    assert_eq!(stats.graphics, 1);
    // setup + embedded_fonts are carried opaquely.
    assert_eq!(stats.unknown_elements, 2);
    let expected = (20.0f64 * 20.0 + 20.0 * 20.0).sqrt();
    assert!((stats.total_track_length_mm - expected).abs() < 1e-9);
}
