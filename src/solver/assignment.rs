//! Band-count assignment enumerator
//!
//! Given exact per-color targets ("two green, one yellow") and the bands each
//! attribute may legally take, list every per-attribute band assignment that
//! meets the targets. Attributes are assigned in their fixed order.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Attribute, AttributeRequest, Band, PerAttribute, ATTRIBUTE_COUNT};

/// Required number of attributes per band. Bands absent from the map are unconstrained.
pub type BandCounts = BTreeMap<Band, u32>;

/// Bands an attribute may take: its direct restriction, or every band.
pub fn legal_bands(request: &AttributeRequest) -> Vec<Band> {
    if request.bands.is_empty() {
        Band::ALL.to_vec()
    } else {
        request.bands.iter().copied().collect()
    }
}

/// Every assignment meeting `targets` exactly, in lexicographic band order.
pub fn enumerate_assignments(
    legal: &PerAttribute<Vec<Band>>,
    targets: &BandCounts,
) -> Vec<PerAttribute<Band>> {
    let mut target = [None; 3];
    for (band, &count) in targets {
        target[band.index()] = Some(count);
    }

    // eligible_after[i][b]: attributes at positions >= i that may take band b
    let mut eligible_after = [[0u32; 3]; ATTRIBUTE_COUNT + 1];
    for i in (0..ATTRIBUTE_COUNT).rev() {
        eligible_after[i] = eligible_after[i + 1];
        for band in &legal[Attribute::ALL[i]] {
            eligible_after[i][band.index()] += 1;
        }
    }

    let mut walker = Walker {
        legal,
        target,
        eligible_after,
        counts: [0; 3],
        current: [Band::Green; ATTRIBUTE_COUNT],
        out: Vec::new(),
    };
    walker.assign(0);
    walker.out
}

struct Walker<'a> {
    legal: &'a PerAttribute<Vec<Band>>,
    target: [Option<u32>; 3],
    eligible_after: [[u32; 3]; ATTRIBUTE_COUNT + 1],
    counts: [u32; 3],
    current: [Band; ATTRIBUTE_COUNT],
    out: Vec<PerAttribute<Band>>,
}

impl Walker<'_> {
    fn assign(&mut self, idx: usize) {
        if !self.can_still_meet(idx) {
            return;
        }

        if idx == ATTRIBUTE_COUNT {
            let exact = self
                .target
                .iter()
                .zip(self.counts.iter())
                .all(|(t, &c)| t.map_or(true, |t| t == c));
            if exact {
                let current = self.current;
                self.out.push(PerAttribute::from_fn(|a| current[a.index()]));
            }
            return;
        }

        let legal = self.legal;
        for &band in &legal[Attribute::ALL[idx]] {
            self.current[idx] = band;
            self.counts[band.index()] += 1;
            self.assign(idx + 1);
            self.counts[band.index()] -= 1;
        }
    }

    /// Prune when a count overshoots or can no longer reach its target.
    fn can_still_meet(&self, idx: usize) -> bool {
        self.target.iter().enumerate().all(|(b, t)| match t {
            Some(t) => self.counts[b] <= *t && self.counts[b] + self.eligible_after[idx][b] >= *t,
            None => true,
        })
    }
}

/// Replace each request's band set with its assigned band, keeping the numeric range.
pub fn apply_assignment(
    requests: &PerAttribute<AttributeRequest>,
    assignment: &PerAttribute<Band>,
) -> PerAttribute<AttributeRequest> {
    requests.map(|attr, req| AttributeRequest {
        range: req.range,
        bands: BTreeSet::from([assignment[attr]]),
    })
}
