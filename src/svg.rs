//! Drawing trimming results, for debugging.

use kurbo::Rect;
use svg::{
    node::element::{path::Data, Circle, Path},
    Document,
};

use crate::{chain::ChainKind, Point, TrimOutput};

const COLORS: [&str; 9] = [
    "#005F73", "#0A9396", "#94D2BD", "#E9D8A6", "#EE9B00", "#CA6702", "#BB3E03", "#AE2012",
    "#9B2226",
];

/// Draws the chains in `out`, and a marker at every intersection point.
///
/// Merged chains are drawn in rotating colors, intersected pieces in black.
/// If there are no chains (because they weren't asked for), the trim groups
/// get drawn instead.
pub fn render(out: &TrimOutput) -> Document {
    let mut lines: Vec<(Vec<Point>, Option<ChainKind>)> = out
        .chains
        .iter()
        .map(|c| (c.points.clone(), Some(c.kind)))
        .collect();
    if lines.is_empty() {
        lines = out
            .groups
            .iter()
            .flat_map(|g| &g.pieces)
            .map(|p| (vec![p.start, p.end], None))
            .collect();
    }

    let bbox = lines
        .iter()
        .flat_map(|(ps, _)| ps)
        .chain(out.intersections.iter().map(|i| &i.point))
        .fold(None, |bbox: Option<Rect>, p| {
            let p = p.to_kurbo();
            Some(bbox.map_or(Rect::from_points(p, p), |r| r.union_pt(p)))
        })
        .unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));

    let size = bbox.width().max(bbox.height()).max(1.0);
    let stroke_width = size / 512.0;
    let pad = size / 32.0;
    let mut document = Document::new().set(
        "viewBox",
        (
            bbox.x0 - pad,
            bbox.y0 - pad,
            bbox.width() + 2.0 * pad,
            bbox.height() + 2.0 * pad,
        ),
    );

    let mut color_idx = 0;
    for (points, kind) in &lines {
        let Some((first, rest)) = points.split_first() else {
            continue;
        };
        let mut data = Data::new().move_to((first.x, first.y));
        for p in rest {
            data = data.line_to((p.x, p.y));
        }

        let color = match kind {
            Some(ChainKind::Intersected) | None => "black",
            Some(ChainKind::Merged) => {
                color_idx = (color_idx + 1) % COLORS.len();
                COLORS[color_idx]
            }
        };
        let path = Path::new()
            .set("d", data)
            .set("stroke", color)
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("fill", "none");
        document = document.add(path);
    }

    for i in &out.intersections {
        let marker = Circle::new()
            .set("cx", i.point.x)
            .set("cy", i.point.y)
            .set("r", 3.0 * stroke_width)
            .set("fill", "red")
            .set("opacity", 0.6);
        document = document.add(marker);
    }
    document
}
