// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section command-list writer
//!
//! Re-serializes a [`SectionDefinition`] in the same bracketed shape the
//! parser accepts: one row per line, single-quoted strings. Writing and
//! re-parsing a section is an identity.

use crate::section::{FiberElement, SectionDefinition};

/// Serialize a section definition to the command-list wire format
pub fn write_section(section: &SectionDefinition) -> String {
    let mut out = String::from("[\n");
    out.push_str(&format!(
        "['section', 'Fiber', {}, '-GJ', {}]",
        section.tag,
        fmt_float(section.gj)
    ));
    for element in &section.elements {
        out.push_str(",\n");
        out.push_str(&write_element(element));
    }
    out.push_str("\n]");
    out
}

/// Serialize one element as its command row
pub fn write_element(element: &FiberElement) -> String {
    match *element {
        FiberElement::RectPatch {
            material,
            n_fib_y,
            n_fib_z,
            y1,
            z1,
            y2,
            z2,
        } => format!(
            "['patch', 'rect', {}, {}, {}, {}, {}, {}, {}]",
            material,
            n_fib_y,
            n_fib_z,
            fmt_float(y1),
            fmt_float(z1),
            fmt_float(y2),
            fmt_float(z2)
        ),
        FiberElement::QuadPatch {
            material,
            n_ij,
            n_jk,
            i,
            j,
            k,
            l,
        } => format!(
            "['patch', 'quad', {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}]",
            material,
            n_ij,
            n_jk,
            fmt_float(i.0),
            fmt_float(i.1),
            fmt_float(j.0),
            fmt_float(j.1),
            fmt_float(k.0),
            fmt_float(k.1),
            fmt_float(l.0),
            fmt_float(l.1)
        ),
        FiberElement::CircPatch {
            material,
            n_circ,
            n_rad,
            center,
            r_inner,
            r_outer,
            angle0,
            angle1,
        } => format!(
            "['patch', 'circ', {}, {}, {}, {}, {}, {}, {}, {}, {}]",
            material,
            n_circ,
            n_rad,
            fmt_float(center.0),
            fmt_float(center.1),
            fmt_float(r_inner),
            fmt_float(r_outer),
            fmt_float(angle0),
            fmt_float(angle1)
        ),
        FiberElement::StraightLayer {
            material,
            n_bars,
            bar_area,
            start,
            end,
        } => format!(
            "['layer', 'straight', {}, {}, {}, {}, {}, {}, {}]",
            material,
            n_bars,
            fmt_float(bar_area),
            fmt_float(start.0),
            fmt_float(start.1),
            fmt_float(end.0),
            fmt_float(end.1)
        ),
        FiberElement::CircLayer {
            material,
            n_bars,
            bar_area,
            center,
            radius,
            angle0,
            angle1,
        } => format!(
            "['layer', 'circ', {}, {}, {}, {}, {}, {}, {}, {}]",
            material,
            n_bars,
            fmt_float(bar_area),
            fmt_float(center.0),
            fmt_float(center.1),
            fmt_float(radius),
            fmt_float(angle0),
            fmt_float(angle1)
        ),
    }
}

/// Shortest round-trip float representation, with integral values kept
/// unambiguously float (`15.0`, not `15`)
fn fmt_float(v: f64) -> String {
    if v == 0.0 {
        // Avoid serializing a negative zero produced by rounding
        "0.0".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1.0e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_section;

    #[test]
    fn writes_one_row_per_line() {
        let section = SectionDefinition::new(1, 1.0e6).with_appended(FiberElement::RectPatch {
            material: 2,
            n_fib_y: 10,
            n_fib_z: 10,
            y1: -15.0,
            z1: -10.0,
            y2: 15.0,
            z2: 10.0,
        });
        let text = write_section(&section);
        assert_eq!(
            text,
            "[\n['section', 'Fiber', 1, '-GJ', 1000000.0],\n\
             ['patch', 'rect', 2, 10, 10, -15.0, -10.0, 15.0, 10.0]\n]"
        );
    }

    #[test]
    fn round_trips_through_the_parser() {
        let input = "[['section', 'Fiber', 1, '-GJ', 1000000.0],
            ['patch', 'quad', 1, 4, 1, 0.032, 0.317, -0.311, 0.067, -0.266, 0.005, 0.077, 0.254],
            ['patch', 'circ', 2, 8, 4, 0.0, 0.0, 5.0, 10.0, 0.0, 360.0],
            ['layer', 'straight', 3, 5, 0.79, -12.0, -7.0, -12.0, 7.0],
            ['layer', 'circ', 3, 8, 0.79, 0.0, 0.0, 8.5, 0.0, 360.0]]";
        let section = parse_section(input).unwrap();
        let text = write_section(&section);
        let reparsed = parse_section(&text).unwrap();
        assert_eq!(section, reparsed);
        // And the writer is a fixed point
        assert_eq!(text, write_section(&reparsed));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(fmt_float(15.0), "15.0");
        assert_eq!(fmt_float(-0.0), "0.0");
        assert_eq!(fmt_float(0.1235), "0.1235");
        assert_eq!(fmt_float(1.0e6), "1000000.0");
    }
}
