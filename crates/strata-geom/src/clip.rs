//! Clipping geometries to the query window.
//!
//! A [`ClipShape`] is prepared once per query from the bounding box and
//! the optional refining clip polygon. Clipping exists for output
//! purposes only — reconstruction always happens unclipped, and the
//! clipped form is what result entries carry and what the contribution
//! classifier compares.
//!
//! Box clipping is done directly (Liang–Barsky per segment, binding
//! boundary coordinates substituted exactly) so that a geometry edit
//! entirely outside the box leaves the clipped output bit-identical.
//! The refining-polygon path delegates to `geo`'s boolean ops.

use geo::{BooleanOps, BoundingRect, HasDimensions, Intersects};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use strata_core::GeoBounds;

/// The prepared spatial window of one query.
#[derive(Clone, Debug)]
pub struct ClipShape {
    bounds: GeoBounds,
    /// The refining polygon, when the query supplied one. Always covered
    /// by `bounds` (validated at query construction).
    exact: Option<Polygon<f64>>,
    /// Clip region as a multipolygon for boolean ops: the refining
    /// polygon if present, the box otherwise.
    region: MultiPolygon<f64>,
}

impl ClipShape {
    /// Window consisting of the box alone.
    pub fn from_bounds(bounds: GeoBounds) -> Self {
        let region = MultiPolygon(vec![bounds.to_rect().to_polygon()]);
        Self {
            bounds,
            exact: None,
            region,
        }
    }

    /// Window refined by a clip polygon. The caller guarantees the box
    /// covers the polygon; the box then serves as the cheap pre-check.
    pub fn with_polygon(bounds: GeoBounds, polygon: Polygon<f64>) -> Self {
        let region = MultiPolygon(vec![polygon.clone()]);
        Self {
            bounds,
            exact: Some(polygon),
            region,
        }
    }

    /// The query bounding box.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Does the geometry touch the window at all? Box test first, exact
    /// polygon second.
    pub fn intersects(&self, g: &Geometry<f64>) -> bool {
        if g.is_empty() {
            return false;
        }
        let Some(rect) = g.bounding_rect() else {
            return false;
        };
        if !self.bounds.intersects(&rect_bounds(&rect)) {
            return false;
        }
        if !g.intersects(&self.bounds.to_rect().to_polygon()) {
            return false;
        }
        match &self.exact {
            Some(p) => g.intersects(p),
            None => true,
        }
    }

    /// Intersect the geometry with the window.
    ///
    /// Geometries entirely inside the window are returned unchanged, so
    /// "clipped" and "unclipped" coincide bit-for-bit in the common
    /// fully-interior case.
    pub fn clip(&self, g: &Geometry<f64>) -> Geometry<f64> {
        if self.covers_fully(g) {
            return g.clone();
        }
        match g {
            Geometry::Point(p) => {
                if self.covers_point(p) {
                    Geometry::Point(*p)
                } else {
                    Geometry::MultiPoint(MultiPoint(Vec::new()))
                }
            }
            Geometry::MultiPoint(mp) => Geometry::MultiPoint(MultiPoint(
                mp.0.iter().copied().filter(|p| self.covers_point(p)).collect(),
            )),
            Geometry::Line(l) => {
                self.clip_lines(&MultiLineString(vec![LineString::new(vec![l.start, l.end])]))
            }
            Geometry::LineString(ls) => {
                self.clip_lines(&MultiLineString(vec![ls.clone()]))
            }
            Geometry::MultiLineString(mls) => self.clip_lines(mls),
            Geometry::Polygon(p) => self.clip_area(&MultiPolygon(vec![p.clone()])),
            Geometry::MultiPolygon(mp) => self.clip_area(mp),
            Geometry::Rect(r) => self.clip_area(&MultiPolygon(vec![r.to_polygon()])),
            Geometry::Triangle(t) => self.clip_area(&MultiPolygon(vec![t.to_polygon()])),
            Geometry::GeometryCollection(gc) => {
                let parts: Vec<Geometry<f64>> = gc
                    .0
                    .iter()
                    .map(|part| self.clip(part))
                    .filter(|part| !part.is_empty())
                    .collect();
                Geometry::GeometryCollection(GeometryCollection(parts))
            }
        }
    }

    /// True when the geometry's extent lies entirely inside the box and
    /// no refining polygon can cut into it.
    fn covers_fully(&self, g: &Geometry<f64>) -> bool {
        if self.exact.is_some() {
            return false;
        }
        match g.bounding_rect() {
            Some(rect) => self.bounds.contains_bounds(&rect_bounds(&rect)),
            None => false,
        }
    }

    fn covers_point(&self, p: &Point<f64>) -> bool {
        if !self.bounds.contains(p.x(), p.y()) {
            return false;
        }
        match &self.exact {
            Some(poly) => p.intersects(poly),
            None => true,
        }
    }

    fn clip_lines(&self, mls: &MultiLineString<f64>) -> Geometry<f64> {
        let real: MultiLineString<f64> = MultiLineString(
            mls.0.iter().filter(|ls| ls.0.len() >= 2).cloned().collect(),
        );
        if real.0.is_empty() {
            return Geometry::MultiLineString(real);
        }
        if self.exact.is_some() {
            return Geometry::MultiLineString(self.region.clip(&real, false));
        }
        let mut out: Vec<LineString<f64>> = Vec::new();
        for ls in &real.0 {
            clip_line_to_bounds(ls, &self.bounds, &mut out);
        }
        Geometry::MultiLineString(MultiLineString(out))
    }

    fn clip_area(&self, mp: &MultiPolygon<f64>) -> Geometry<f64> {
        if mp.is_empty() {
            return Geometry::MultiPolygon(MultiPolygon(Vec::new()));
        }
        Geometry::MultiPolygon(self.region.intersection(mp))
    }
}

fn rect_bounds(rect: &geo_types::Rect<f64>) -> GeoBounds {
    GeoBounds::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
}

/// Clip one polyline against the box, appending the surviving runs.
///
/// Consecutive segments whose shared vertex survives are stitched back
/// into one linestring, so a line that dips out of the box once comes
/// back as exactly two runs.
fn clip_line_to_bounds(ls: &LineString<f64>, b: &GeoBounds, out: &mut Vec<LineString<f64>>) {
    let mut current: Vec<Coord<f64>> = Vec::new();
    for seg in ls.lines() {
        match clip_segment(seg.start, seg.end, b) {
            Some((p0, p1)) => {
                match current.last() {
                    Some(last) if *last == p0 => current.push(p1),
                    Some(_) => {
                        out.push(LineString::new(std::mem::take(&mut current)));
                        current.extend([p0, p1]);
                    }
                    None => current.extend([p0, p1]),
                }
            }
            None => {
                if current.len() >= 2 {
                    out.push(LineString::new(std::mem::take(&mut current)));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() >= 2 {
        out.push(LineString::new(current));
    }
}

/// Which box edge bound a clip parameter.
#[derive(Clone, Copy, PartialEq)]
enum Edge {
    None,
    MinX,
    MaxX,
    MinY,
    MaxY,
}

/// Liang–Barsky segment clip.
///
/// The binding boundary coordinate is substituted exactly instead of
/// being recomputed through the parameter, so a segment crossing x =
/// max_lon comes back with that exact x regardless of the segment's
/// length — which is what keeps out-of-box edits invisible in clipped
/// output.
fn clip_segment(a: Coord<f64>, bcoord: Coord<f64>, b: &GeoBounds) -> Option<(Coord<f64>, Coord<f64>)> {
    let dx = bcoord.x - a.x;
    let dy = bcoord.y - a.y;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    let mut e0 = Edge::None;
    let mut e1 = Edge::None;

    let checks = [
        (-dx, a.x - b.min_lon, Edge::MinX),
        (dx, b.max_lon - a.x, Edge::MaxX),
        (-dy, a.y - b.min_lat, Edge::MinY),
        (dy, b.max_lat - a.y, Edge::MaxY),
    ];
    for (p, q, edge) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
                e0 = edge;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                e1 = edge;
            }
        }
    }

    let at = |t: f64, edge: Edge, fallback: Coord<f64>| -> Coord<f64> {
        let mut c = if edge == Edge::None {
            fallback
        } else {
            Coord {
                x: a.x + t * dx,
                y: a.y + t * dy,
            }
        };
        match edge {
            Edge::MinX => c.x = b.min_lon,
            Edge::MaxX => c.x = b.max_lon,
            Edge::MinY => c.y = b.min_lat,
            Edge::MaxY => c.y = b.max_lat,
            Edge::None => {}
        }
        c
    };

    let p0 = at(t0, e0, a);
    let p1 = at(t1, e1, bcoord);
    if p0 == p1 {
        // Degenerate sliver (corner touch); nothing to draw.
        return None;
    }
    Some((p0, p1))
}
