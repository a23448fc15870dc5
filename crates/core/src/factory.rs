//! Factory constructors for new elements.
//!
//! Construction here guarantees fresh identity tokens and the defaults
//! the source tool would apply. Entities built this way are dirty from
//! birth: they have no captured span and always render canonically.

use crate::config::BoardConfig;
use crate::elements::{Effects, Element, Footprint, Pad, Property, Track, Via};
use crate::units::{Angle, At, Coord, Point};

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn text_effects() -> Effects {
    Effects {
        font_size: Some((Coord::from_nm(1_000_000), Coord::from_nm(1_000_000))),
        thickness: Some(Coord::from_nm(150_000)),
        font_extra: Vec::new(),
        extra: Vec::new(),
    }
}

/// A footprint with populated `Reference`/`Value` properties and a fresh
/// identity token. `lib_id` takes the combined `Library:Name` form.
pub fn new_footprint(
    lib_id: &str,
    reference: &str,
    value: &str,
    at: At,
    layer: &str,
) -> Element {
    let (library, name) = match lib_id.split_once(':') {
        Some((lib, name)) => (lib.to_owned(), name.to_owned()),
        None => (String::new(), lib_id.to_owned()),
    };
    let property = |prop_name: &str, prop_value: &str, prop_layer: &str| Property {
        name: prop_name.to_owned(),
        value: prop_value.to_owned(),
        at: At::with_rotation(Coord::ZERO, Coord::ZERO, Angle::ZERO),
        layer: prop_layer.to_owned(),
        uuid: Some(fresh_id()),
        effects: Some(text_effects()),
        extra: Vec::new(),
    };
    Element::Footprint(Footprint {
        library,
        name,
        layer: layer.to_owned(),
        locked: false,
        at,
        descr: None,
        tags: None,
        path: None,
        sheetname: None,
        sheetfile: None,
        attr: Vec::new(),
        properties: vec![
            property("Reference", reference, "F.SilkS"),
            property("Value", value, "F.Fab"),
        ],
        graphics: Vec::new(),
        pads: Vec::new(),
        model: None,
        uuid: Some(fresh_id()),
        extra: Vec::new(),
    })
}

/// A pad with the layer defaults of its mount type: SMD pads land on the
/// front copper/paste/mask stack, through-hole pads on all copper plus
/// mask.
pub fn new_pad(
    number: &str,
    kind: &str,
    shape: &str,
    at: At,
    size: (Coord, Coord),
    net: Option<(i64, String)>,
) -> Pad {
    let layers = match kind {
        "smd" => vec!["F.Cu".to_owned(), "F.Paste".to_owned(), "F.Mask".to_owned()],
        "thru_hole" | "np_thru_hole" => vec!["*.Cu".to_owned(), "*.Mask".to_owned()],
        _ => Vec::new(),
    };
    Pad {
        number: number.to_owned(),
        kind: kind.to_owned(),
        shape: shape.to_owned(),
        at,
        size,
        drill: None,
        layers,
        net,
        roundrect_rratio: None,
        uuid: Some(fresh_id()),
        extra: Vec::new(),
    }
}

/// A straight track segment.
pub fn new_track(start: Point, end: Point, width: Coord, layer: &str, net: i64) -> Element {
    Element::Track(Track {
        start,
        end,
        width,
        layer: layer.to_owned(),
        net,
        locked: false,
        uuid: Some(fresh_id()),
        extra: Vec::new(),
    })
}

/// A via with an explicit geometry and layer span.
pub fn new_via(at: Point, size: Coord, drill: Coord, layers: Vec<String>, net: i64) -> Element {
    Element::Via(Via {
        at: At::new(at.x, at.y),
        size,
        drill,
        layers,
        kind: None,
        net,
        locked: false,
        uuid: Some(fresh_id()),
        extra: Vec::new(),
    })
}

/// A standard through via using the config defaults.
pub fn new_through_via(at: Point, config: &BoardConfig, net: i64) -> Element {
    new_via(
        at,
        config.via.default_size,
        config.via.default_drill,
        vec!["F.Cu".to_owned(), "B.Cu".to_owned()],
        net,
    )
}

/// A blind via spanning an outer and an inner layer.
pub fn new_blind_via(
    at: Point,
    from_layer: &str,
    to_layer: &str,
    size: Coord,
    drill: Coord,
    net: i64,
) -> Element {
    let mut layers = vec![from_layer.to_owned()];
    if to_layer != from_layer {
        layers.push(to_layer.to_owned());
    }
    match new_via(at, size, drill, layers, net) {
        Element::Via(mut via) => {
            via.kind = Some("blind".to_owned());
            Element::Via(via)
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_carries_reference_and_value_properties() {
        let element = new_footprint(
            "Resistor_SMD:R_0603_1608Metric",
            "R1",
            "10k",
            At::new(Coord::from_mm_str("50"), Coord::from_mm_str("40")),
            "F.Cu",
        );
        let Element::Footprint(f) = element else {
            panic!("expected footprint")
        };
        assert_eq!(f.reference(), "R1");
        assert_eq!(f.value(), "10k");
        assert_eq!(f.library, "Resistor_SMD");
        assert_eq!(f.name, "R_0603_1608Metric");
        assert!(f.uuid.is_some());
    }

    #[test]
    fn smd_pads_default_to_front_stack() {
        let pad = new_pad(
            "1",
            "smd",
            "rect",
            At::default(),
            (Coord::from_mm_str("1.05"), Coord::from_mm_str("0.95")),
            None,
        );
        assert_eq!(pad.layers, ["F.Cu", "F.Paste", "F.Mask"]);
    }

    #[test]
    fn blind_via_records_span_and_kind() {
        let element = new_blind_via(
            Point::from_mm("10", "10"),
            "F.Cu",
            "In1.Cu",
            Coord::from_mm_str("0.6"),
            Coord::from_mm_str("0.3"),
            1,
        );
        let Element::Via(via) = element else {
            panic!("expected via")
        };
        assert_eq!(via.kind.as_deref(), Some("blind"));
        assert_eq!(via.layers, ["F.Cu", "In1.Cu"]);
    }
}
