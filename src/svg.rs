//! Vertex extraction: SVG document → polygon rings.
//!
//! Only `<path>` elements inside the first `<svg>` element matter.  Each path
//! becomes one ring; every subpath of its `d` attribute is walked in order and
//! appended to that ring.  Straight segments contribute their endpoints, curved
//! segments are subdivided so consecutive samples are at most
//! `sample_length` apart along the arc.
//!
//! Coordinates stay in SVG user space (+y down) and are multiplied by the
//! caller's scale.  Centering and the flip into world orientation happen in
//! [`crate::body`].

use crate::error::{SandboxError, SandboxResult};
use bevy::prelude::*;
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Accuracy passed to kurbo's arc-length estimate.
const ARCLEN_ACCURACY: f64 = 1e-3;

/// One `<path>` element as found in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    pub d: String,
    pub fill: Option<String>,
    pub stroke: Option<String>,
}

impl SvgPath {
    /// Outline colour: stroke first, then fill.  `none` and unparsable values
    /// are ignored.
    pub fn color(&self) -> Option<Color> {
        [self.stroke.as_deref(), self.fill.as_deref()]
            .into_iter()
            .flatten()
            .filter(|v| *v != "none")
            .find_map(|v| Srgba::hex(v).ok().map(Color::from))
    }
}

/// A closed polygon ring.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRing {
    pub points: Vec<Vec2>,
    pub color: Option<Color>,
}

/// Every usable ring of one SVG document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgShape {
    pub rings: Vec<ShapeRing>,
}

impl SvgShape {
    /// Axis-aligned bounds of all ring vertices.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.rings.iter().flat_map(|r| r.points.iter().copied());
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Rect { min, max })
    }

    /// Total vertex count across rings.
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(|r| r.points.len()).sum()
    }
}

/// Parse `doc` and return one polygon ring per `<path>`, scaled by `scale`.
///
/// Paths whose data cannot be parsed, or that collapse to fewer than three
/// distinct vertices, are skipped.  If nothing usable remains the result is
/// [`SandboxError::NoPaths`].
pub fn extract_shape(doc: &str, scale: f32, sample_length: f32) -> SandboxResult<SvgShape> {
    let paths = parse_svg_paths(doc)?;
    let mut rings = Vec::with_capacity(paths.len());

    for path in &paths {
        let points = match path_to_vertices(&path.d, sample_length) {
            Ok(points) => points,
            Err(e) => {
                debug!("[svg] skipping path: {e}");
                continue;
            }
        };
        if points.len() < 3 {
            continue;
        }
        rings.push(ShapeRing {
            points: points.into_iter().map(|p| p * scale).collect(),
            color: path.color(),
        });
    }

    if rings.is_empty() {
        return Err(SandboxError::NoPaths);
    }
    Ok(SvgShape { rings })
}

/// Collect the `<path>` descendants of the first `<svg>` element.
pub fn parse_svg_paths(doc: &str) -> SandboxResult<Vec<SvgPath>> {
    let mut reader = Reader::from_str(doc);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut paths = Vec::new();
    // Element depth inside the first <svg>; `None` until it is found.
    let mut svg_depth: Option<usize> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if let Some(depth) = svg_depth.as_mut() {
                    if e.local_name().as_ref() == b"path" {
                        paths.push(path_from_element(e));
                    }
                    *depth += 1;
                } else if e.local_name().as_ref() == b"svg" {
                    svg_depth = Some(1);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if svg_depth.is_some() {
                    if e.local_name().as_ref() == b"path" {
                        paths.push(path_from_element(e));
                    }
                } else if e.local_name().as_ref() == b"svg" {
                    // A self-closing <svg/> is a root with no paths.
                    return Err(SandboxError::NoPaths);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(depth) = svg_depth.as_mut() {
                    *depth -= 1;
                    if *depth == 0 {
                        break;
                    }
                }
            }
            Ok(Event::Eof) => {
                if svg_depth.is_some() {
                    return Err(SandboxError::SvgParse("unclosed <svg> element".into()));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(SandboxError::SvgParse(e.to_string())),
        }
        buf.clear();
    }

    if svg_depth.is_none() {
        return Err(SandboxError::NoSvgRoot);
    }
    if paths.is_empty() {
        return Err(SandboxError::NoPaths);
    }
    Ok(paths)
}

fn path_from_element(e: &BytesStart) -> SvgPath {
    SvgPath {
        d: get_attribute_opt(e, "d").unwrap_or_default(),
        fill: get_attribute_opt(e, "fill"),
        stroke: get_attribute_opt(e, "stroke"),
    }
}

fn get_attribute_opt(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// Convert SVG path data into an ordered vertex ring.
pub fn path_to_vertices(d: &str, sample_length: f32) -> SandboxResult<Vec<Vec2>> {
    let path = BezPath::from_svg(d).map_err(|e| SandboxError::PathData(e.to_string()))?;
    let step = f64::from(sample_length.max(0.1));
    let mut points: Vec<Vec2> = Vec::new();

    for seg in path.segments() {
        push_point(&mut points, seg.start());
        if !matches!(seg, PathSeg::Line(_)) {
            let length = seg.arclen(ARCLEN_ACCURACY);
            let samples = (length / step).ceil().max(1.0) as usize;
            for i in 1..samples {
                let t = seg.inv_arclen(length * i as f64 / samples as f64, ARCLEN_ACCURACY);
                push_point(&mut points, seg.eval(t));
            }
        }
        push_point(&mut points, seg.end());
    }

    if points.len() > 1 {
        let first = points[0];
        if points
            .last()
            .is_some_and(|last| last.distance(first) < crate::constants::VERTEX_DEDUP_MIN_DIST)
        {
            points.pop();
        }
    }
    Ok(points)
}

fn push_point(points: &mut Vec<Vec2>, p: Point) {
    let v = Vec2::new(p.x as f32, p.y as f32);
    if points
        .last()
        .is_some_and(|last| last.distance(v) < crate::constants::VERTEX_DEDUP_MIN_DIST)
    {
        return;
    }
    points.push(v);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <path d="M0 0 L100 0 L100 100 L0 100 Z" stroke="#ff0000"/>
    </svg>"##;

    #[test]
    fn square_path_yields_four_vertices() {
        let pts = path_to_vertices("M0 0 L100 0 L100 100 L0 100 Z", 10.0).unwrap();
        assert_eq!(pts.len(), 4, "closing duplicate must be dropped: {pts:?}");
        assert_eq!(pts[0], Vec2::ZERO);
        assert_eq!(pts[2], Vec2::new(100.0, 100.0));
    }

    #[test]
    fn curves_are_subdivided_by_sample_length() {
        // Cubic hump of roughly 200 px; the closing line is not sampled.
        let pts = path_to_vertices("M0 0 C 0 100, 100 100, 100 0 Z", 10.0).unwrap();
        assert!(pts.len() > 10, "curve should be sampled, got {}", pts.len());
        for pair in pts.windows(2) {
            assert!(
                pair[0].distance(pair[1]) <= 10.5,
                "samples too far apart: {pair:?}"
            );
        }
        let coarse = path_to_vertices("M0 0 C 0 100, 100 100, 100 0 Z", 50.0).unwrap();
        assert!(coarse.len() < pts.len());
    }

    #[test]
    fn invalid_path_data_is_an_error() {
        assert!(matches!(
            path_to_vertices("M 0 0 Q", 10.0),
            Err(SandboxError::PathData(_))
        ));
    }

    #[test]
    fn extract_scales_every_vertex() {
        let shape = extract_shape(SQUARE, 0.5, 10.0).unwrap();
        assert_eq!(shape.rings.len(), 1);
        let bounds = shape.bounds().unwrap();
        assert_eq!(bounds.min, Vec2::ZERO);
        assert_eq!(bounds.max, Vec2::new(50.0, 50.0));
        assert_eq!(shape.rings[0].color, Some(Color::srgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn one_ring_per_path_element() {
        let doc = r#"<svg><g>
            <path d="M0 0 L10 0 L10 10 Z"/>
            <path d="M20 0 L30 0 L30 10 Z"></path>
        </g></svg>"#;
        let shape = extract_shape(doc, 1.0, 10.0).unwrap();
        assert_eq!(shape.rings.len(), 2);
        assert_eq!(shape.vertex_count(), 6);
    }

    #[test]
    fn missing_svg_root_is_reported() {
        assert!(matches!(
            parse_svg_paths("<html><path d='M0 0 L1 1 L0 1 Z'/></html>"),
            Err(SandboxError::NoSvgRoot)
        ));
    }

    #[test]
    fn svg_without_paths_is_reported() {
        assert!(matches!(
            parse_svg_paths("<svg><rect width='10' height='10'/></svg>"),
            Err(SandboxError::NoPaths)
        ));
        assert!(matches!(parse_svg_paths("<svg/>"), Err(SandboxError::NoPaths)));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        assert!(matches!(
            parse_svg_paths("<svg><path d='M0 0'></svg>"),
            Err(SandboxError::SvgParse(_))
        ));
    }

    #[test]
    fn paths_outside_the_first_svg_are_ignored() {
        let doc = r#"<doc><path d="M0 0 L5 0 L5 5 Z"/><svg><path d="M0 0 L1 0 L1 1 Z"/></svg></doc>"#;
        let paths = parse_svg_paths(doc).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].d, "M0 0 L1 0 L1 1 Z");
    }

    #[test]
    fn degenerate_paths_are_dropped() {
        let doc = r#"<svg><path d="M0 0 L10 0"/></svg>"#;
        assert!(matches!(extract_shape(doc, 1.0, 10.0), Err(SandboxError::NoPaths)));
    }

    #[test]
    fn none_fill_falls_through_to_no_colour() {
        let path = SvgPath {
            d: String::new(),
            fill: Some("none".into()),
            stroke: None,
        };
        assert_eq!(path.color(), None);
    }
}
