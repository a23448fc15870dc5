//! Shared board fixtures for the integration suites.

/// A small but realistic board: header, layer table, an opaque setup
/// block, three nets, one resistor footprint, an edge line, one routed
/// segment, a via, a hatched zone, and a trailing tag the engine has no
/// schema for.
pub const BOARD: &str = r#"(kicad_pcb
  (version 20241229)
  (generator "pcbnew")
  (generator_version "9.0")
  (general
    (thickness 1.6)
    (legacy_teardrops no)
  )
  (paper "A4")
  (layers
    (0 "F.Cu" signal)
    (31 "B.Cu" signal)
    (44 "Edge.Cuts" user)
  )
  (setup
    (pad_to_mask_clearance 0)
    (allow_soldermask_bridges_in_footprints no)
  )
  (net 0 "")
  (net 1 "GND")
  (net 2 "VCC")
  (footprint "Resistor_SMD:R_0603_1608Metric"
    (layer "F.Cu")
    (uuid "f00dcafe-0001-4000-8000-000000000001")
    (at 50 40)
    (descr "Resistor SMD 0603")
    (tags "resistor")
    (property "Reference" "R1"
      (at 0 -1.43 0)
      (layer "F.SilkS")
      (uuid "f00dcafe-0002-4000-8000-000000000002")
      (effects
        (font
          (size 1 1)
          (thickness 0.15)
        )
      )
    )
    (property "Value" "10k"
      (at 0 1.43 0)
      (layer "F.Fab")
      (uuid "f00dcafe-0003-4000-8000-000000000003")
      (effects
        (font
          (size 1 1)
          (thickness 0.15)
        )
      )
    )
    (attr smd)
    (fp_line
      (start -0.8 -0.4)
      (end 0.8 -0.4)
      (stroke
        (width 0.1)
        (type solid)
      )
      (layer "F.Fab")
      (uuid "f00dcafe-0004-4000-8000-000000000004")
    )
    (pad "1" smd rect
      (at -0.875 0)
      (size 1.05 0.95)
      (layers "F.Cu" "F.Paste" "F.Mask")
      (net 1 "GND")
      (uuid "f00dcafe-0005-4000-8000-000000000005")
    )
    (pad "2" smd rect
      (at 0.875 0)
      (size 1.05 0.95)
      (layers "F.Cu" "F.Paste" "F.Mask")
      (net 2 "VCC")
      (uuid "f00dcafe-0006-4000-8000-000000000006")
    )
  )
  (gr_line
    (start 0 0)
    (end 100 0)
    (stroke
      (width 0.15)
      (type solid)
    )
    (layer "Edge.Cuts")
    (uuid "f00dcafe-0007-4000-8000-000000000007")
  )
  (segment
    (start 10 20)
    (end 30 40)
    (width 0.25)
    (layer "F.Cu")
    (net 1)
    (uuid "f00dcafe-0008-4000-8000-000000000008")
  )
  (via
    (at 50 50)
    (size 0.8)
    (drill 0.4)
    (layers "F.Cu" "B.Cu")
    (net 1)
    (uuid "f00dcafe-0009-4000-8000-000000000009")
  )
  (zone
    (net 1)
    (net_name "GND")
    (layer "F.Cu")
    (uuid "f00dcafe-000a-4000-8000-00000000000a")
    (hatch edge 0.5)
    (connect_pads
      (clearance 0.5)
    )
    (min_thickness 0.25)
    (filled_areas_thickness yes)
    (fill
      (thermal_gap 0.5)
      (thermal_bridge_width 0.5)
    )
    (polygon
      (pts
        (xy 10 10)
        (xy 90 10)
        (xy 90 50)
        (xy 10 50)
      )
    )
  )
  (embedded_fonts no)
)
"#;

/// Header-only board with no placed or routed content.
pub const MINIMAL: &str = r#"(kicad_pcb
  (version 20241229)
  (generator "pcbnew")
  (general
    (thickness 1.6)
  )
  (paper "A4")
  (layers
    (0 "F.Cu" signal)
    (31 "B.Cu" signal)
  )
  (net 0 "")
)
"#;
