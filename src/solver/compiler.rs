//! Constraint compiler: attribute requests to candidate intervals and interval boxes

use crate::types::{
    Attribute, AttributeRequest, Interval, IntervalBox, PerAttribute, Style, ATTRIBUTE_COUNT,
};

use super::bands::intervals_for_band;

/// An attribute whose compiled interval list came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infeasible(pub Attribute);

/// Candidate intervals for one attribute.
///
/// Without a band restriction this is the explicit range (or the whole open
/// domain). With one, it is every non-empty intersection of that range with
/// the segments of the requested bands, bands taken in sorted order,
/// duplicates removed. An empty result means the attribute is infeasible.
pub fn compile_attribute(style: &Style, attr: Attribute, request: &AttributeRequest) -> Vec<Interval> {
    let start = request.range.unwrap_or_else(Interval::unbounded);
    if request.bands.is_empty() {
        return vec![start];
    }

    let mut out: Vec<Interval> = Vec::new();
    for &band in &request.bands {
        for seg in intervals_for_band(style, attr, band) {
            if let Some(iv) = start.intersect(&seg) {
                if !out.iter().any(|existing| existing.approx_eq(&iv)) {
                    out.push(iv);
                }
            }
        }
    }
    out
}

/// Compile every attribute, stopping at the first infeasible one.
pub fn compile_lists(
    style: &Style,
    requests: &PerAttribute<AttributeRequest>,
) -> Result<PerAttribute<Vec<Interval>>, Infeasible> {
    let mut lists: PerAttribute<Vec<Interval>> = PerAttribute::default();
    for attr in Attribute::ALL {
        let list = compile_attribute(style, attr, &requests[attr]);
        if list.is_empty() {
            return Err(Infeasible(attr));
        }
        lists[attr] = list;
    }
    Ok(lists)
}

/// Cartesian product of the per-attribute lists; the first attribute varies slowest.
pub fn expand_boxes(lists: &PerAttribute<Vec<Interval>>) -> Vec<IntervalBox> {
    let mut boxes = vec![[Interval::unbounded(); ATTRIBUTE_COUNT]];
    for attr in Attribute::ALL {
        let options = &lists[attr];
        let mut next = Vec::with_capacity(boxes.len() * options.len());
        for partial in &boxes {
            for iv in options {
                let mut b = *partial;
                b[attr.index()] = *iv;
                next.push(b);
            }
        }
        boxes = next;
    }
    boxes.into_iter().map(IntervalBox).collect()
}

/// Compile `requests` all the way to interval boxes.
pub fn compile_boxes(
    style: &Style,
    requests: &PerAttribute<AttributeRequest>,
) -> Result<Vec<IntervalBox>, Infeasible> {
    compile_lists(style, requests).map(|lists| expand_boxes(&lists))
}
