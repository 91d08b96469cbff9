// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section command-list parser using nom
//!
//! The wire format is a bracketed list of lists mirroring the
//! fiber-section command language: one `['section', 'Fiber', tag, '-GJ',
//! gj]` header row followed by `['patch', ...]` and `['layer', ...]` rows.
//! Anything that is not a well-shaped list of such rows is rejected as
//! `InvalidSectionFormat` with no partial result.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::section::{FiberElement, MaterialTag, SectionDefinition};

/// One token of the command list
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Quoted string: 'patch' or "patch"
    Str(&'a str),
    /// Integer: 42, -3
    Int(i64),
    /// Float: 3.14, 1.0e6, 2.
    Float(f64),
    /// Nested list
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::List(_) => "list",
        }
    }

    /// String payload, if this is a string token
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload; integers widen to float
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }
}

/// Parse string literal: 'text' or "text"
fn string_literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            Value::Str,
        ),
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            Value::Str,
        ),
    ))(input)
}

/// Parse a numeric literal: 42, -3, 3.14, 2., 1.0e6
///
/// A token with a decimal point or exponent is a float, otherwise an
/// integer. Float conversion goes through fast-float.
fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            opt(tuple((char('.'), opt(digit1)))),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| -> std::result::Result<Value, &'static str> {
            if s.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
                fast_float::parse(s).map(Value::Float).map_err(|_| "bad float")
            } else {
                s.parse::<i64>().map(Value::Int).map_err(|_| "bad integer")
            }
        },
    )(input)
}

/// Parse a bracketed, comma-separated list
fn list(input: &str) -> IResult<&str, Value> {
    map(
        delimited(
            char('['),
            separated_list0(char(','), value),
            tuple((multispace0, char(']'))),
        ),
        Value::List,
    )(input)
}

/// Parse any token, surrounded by optional whitespace
fn value(input: &str) -> IResult<&str, Value> {
    delimited(multispace0, alt((list, string_literal, number)), multispace0)(input)
}

/// Tokenize a complete input into a value tree.
///
/// The whole input must be consumed (trailing whitespace aside).
pub fn parse_value_tree(input: &str) -> Result<Value<'_>> {
    match value(input) {
        Ok((rest, tree)) => {
            if rest.trim().is_empty() {
                Ok(tree)
            } else {
                Err(Error::Syntax {
                    offset: input.len() - rest.len(),
                    detail: "unexpected trailing input".to_string(),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::Syntax {
            offset: input.len() - e.input.len(),
            detail: format!("{:?}", e.code),
        }),
        Err(nom::Err::Incomplete(_)) => Err(Error::Syntax {
            offset: input.len(),
            detail: "incomplete input".to_string(),
        }),
    }
}

/// Parse and validate a complete section definition.
///
/// # Example
///
/// ```
/// let input = "[['section', 'Fiber', 1, '-GJ', 1000000.0],
///              ['patch', 'rect', 2, 10, 10, -15.0, -10.0, 15.0, 10.0]]";
/// let section = fibsec_core::parse_section(input).unwrap();
/// assert_eq!(section.tag, 1);
/// assert_eq!(section.elements.len(), 1);
/// ```
pub fn parse_section(input: &str) -> Result<SectionDefinition> {
    let tree = parse_value_tree(input)?;
    let rows = match tree {
        Value::List(rows) => rows,
        other => {
            return Err(Error::InvalidSectionFormat(format!(
                "expected a list of rows, got {}",
                other.type_name()
            )))
        }
    };

    let mut header: Option<(u32, f64)> = None;
    let mut elements = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let items = match row {
            Value::List(items) => items,
            other => {
                return Err(Error::InvalidSectionFormat(format!(
                    "row {}: expected a list, got {}",
                    index,
                    other.type_name()
                )))
            }
        };
        let kind = req_str(items, 0, index)?;
        match kind {
            "section" => {
                if header.is_some() {
                    return Err(Error::InvalidSectionFormat(format!(
                        "row {}: duplicate section header",
                        index
                    )));
                }
                header = Some(decode_header(items, index)?);
            }
            "patch" | "layer" => {
                if header.is_none() {
                    return Err(Error::InvalidSectionFormat(format!(
                        "row {}: element before the section header",
                        index
                    )));
                }
                elements.push(decode_element(items, index)?);
            }
            other => {
                return Err(Error::InvalidSectionFormat(format!(
                    "row {}: unknown row kind '{}'",
                    index, other
                )))
            }
        }
    }

    let (tag, gj) = header.ok_or_else(|| {
        Error::InvalidSectionFormat("missing ['section', 'Fiber', ...] header row".to_string())
    })?;
    Ok(SectionDefinition { tag, gj, elements })
}

/// Decode `['section', 'Fiber', tag, '-GJ', gj]`
fn decode_header(items: &[Value], row: usize) -> Result<(u32, f64)> {
    expect_len(items, 5, row, "section header")?;
    let kind = req_str(items, 1, row)?;
    if kind != "Fiber" {
        return Err(Error::InvalidSectionFormat(format!(
            "row {}: unsupported section kind '{}'",
            row, kind
        )));
    }
    let tag = req_tag(items, 2, row)?;
    let marker = req_str(items, 3, row)?;
    if marker != "-GJ" {
        return Err(Error::InvalidSectionFormat(format!(
            "row {}: expected '-GJ', got '{}'",
            row, marker
        )));
    }
    let gj = req_f64(items, 4, row)?;
    Ok((tag, gj))
}

/// Decode one patch/layer row into a typed element.
///
/// The string discriminators exist only here; past this point every match
/// on `FiberElement` is exhaustive, so an unhandled combination cannot
/// silently do nothing.
fn decode_element(items: &[Value], row: usize) -> Result<FiberElement> {
    let family = req_str(items, 0, row)?;
    let subtype = req_str(items, 1, row)?;

    match (family, subtype) {
        ("patch", "rect") => {
            expect_len(items, 9, row, "patch rect")?;
            let c = req_f64_run::<4>(items, 5, row)?;
            Ok(FiberElement::RectPatch {
                material: req_tag(items, 2, row)?,
                n_fib_y: req_count(items, 3, row)?,
                n_fib_z: req_count(items, 4, row)?,
                y1: c[0],
                z1: c[1],
                y2: c[2],
                z2: c[3],
            })
        }
        // 'quadr' is a legacy spelling of the same element
        ("patch", "quad") | ("patch", "quadr") => {
            expect_len(items, 13, row, "patch quad")?;
            let c = req_f64_run::<8>(items, 5, row)?;
            Ok(FiberElement::QuadPatch {
                material: req_tag(items, 2, row)?,
                n_ij: req_count(items, 3, row)?,
                n_jk: req_count(items, 4, row)?,
                i: (c[0], c[1]),
                j: (c[2], c[3]),
                k: (c[4], c[5]),
                l: (c[6], c[7]),
            })
        }
        ("patch", "circ") => {
            expect_len(items, 11, row, "patch circ")?;
            let c = req_f64_run::<6>(items, 5, row)?;
            check_angles(c[4], c[5], row)?;
            Ok(FiberElement::CircPatch {
                material: req_tag(items, 2, row)?,
                n_circ: req_count(items, 3, row)?,
                n_rad: req_count(items, 4, row)?,
                center: (c[0], c[1]),
                r_inner: c[2],
                r_outer: c[3],
                angle0: c[4],
                angle1: c[5],
            })
        }
        ("layer", "straight") => {
            expect_len(items, 9, row, "layer straight")?;
            let c = req_f64_run::<4>(items, 5, row)?;
            Ok(FiberElement::StraightLayer {
                material: req_tag(items, 2, row)?,
                n_bars: req_count(items, 3, row)?,
                bar_area: req_f64(items, 4, row)?,
                start: (c[0], c[1]),
                end: (c[2], c[3]),
            })
        }
        ("layer", "circ") => {
            // Angles are optional; without them the layer spans the full
            // circle with the seam bar dropped
            if items.len() != 8 && items.len() != 10 {
                return Err(Error::InvalidSectionFormat(format!(
                    "row {}: layer circ expects 8 or 10 items, got {}",
                    row,
                    items.len()
                )));
            }
            let c = req_f64_run::<3>(items, 5, row)?;
            let (angle0, angle1) = if items.len() == 10 {
                let a = req_f64_run::<2>(items, 8, row)?;
                check_angles(a[0], a[1], row)?;
                (a[0], a[1])
            } else {
                (0.0, 360.0)
            };
            Ok(FiberElement::CircLayer {
                material: req_tag(items, 2, row)?,
                n_bars: req_count(items, 3, row)?,
                bar_area: req_f64(items, 4, row)?,
                center: (c[0], c[1]),
                radius: c[2],
                angle0,
                angle1,
            })
        }
        (family, subtype) => Err(Error::InvalidSectionFormat(format!(
            "row {}: unknown element kind '{} {}'",
            row, family, subtype
        ))),
    }
}

fn expect_len(items: &[Value], want: usize, row: usize, what: &str) -> Result<()> {
    if items.len() != want {
        return Err(Error::InvalidSectionFormat(format!(
            "row {}: {} expects {} items, got {}",
            row,
            what,
            want,
            items.len()
        )));
    }
    Ok(())
}

fn req_str<'a>(items: &[Value<'a>], idx: usize, row: usize) -> Result<&'a str> {
    items
        .get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| bad_field(items, idx, row, "string"))
}

fn req_f64(items: &[Value], idx: usize, row: usize) -> Result<f64> {
    items
        .get(idx)
        .and_then(Value::as_f64)
        .ok_or_else(|| bad_field(items, idx, row, "number"))
}

/// A run of `N` consecutive numeric fields starting at `idx`
fn req_f64_run<const N: usize>(items: &[Value], idx: usize, row: usize) -> Result<[f64; N]> {
    let run: SmallVec<[f64; 8]> = (idx..idx + N)
        .map(|i| req_f64(items, i, row))
        .collect::<Result<_>>()?;
    let mut out = [0.0; N];
    out.copy_from_slice(&run);
    Ok(out)
}

/// Strictly positive subdivision or bar count
fn req_count(items: &[Value], idx: usize, row: usize) -> Result<u32> {
    match items.get(idx) {
        Some(&Value::Int(n)) if n >= 1 && n <= u32::MAX as i64 => Ok(n as u32),
        _ => Err(bad_field(items, idx, row, "positive integer count")),
    }
}

/// Strictly positive material tag
fn req_tag(items: &[Value], idx: usize, row: usize) -> Result<MaterialTag> {
    match items.get(idx) {
        Some(&Value::Int(n)) if n >= 1 && n <= u32::MAX as i64 => Ok(n as MaterialTag),
        _ => Err(bad_field(items, idx, row, "positive integer tag")),
    }
}

fn check_angles(angle0: f64, angle1: f64, row: usize) -> Result<()> {
    if angle1 < angle0 {
        return Err(Error::InvalidSectionFormat(format!(
            "row {}: angle1 ({}) must be >= angle0 ({})",
            row, angle1, angle0
        )));
    }
    Ok(())
}

fn bad_field(items: &[Value], idx: usize, row: usize, want: &str) -> Error {
    match items.get(idx) {
        Some(v) => Error::InvalidSectionFormat(format!(
            "row {}, field {}: expected {}, got {}",
            row,
            idx,
            want,
            v.type_name()
        )),
        None => Error::InvalidSectionFormat(format!(
            "row {}, field {}: expected {}, row too short",
            row, idx, want
        )),
    }
}
