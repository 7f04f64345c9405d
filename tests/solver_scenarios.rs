//! Solver Scenario Tests
//!
//! End-to-end searches over small hand-built catalogs and the built-in
//! reference catalog, plus randomized property checks with a fixed seed.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use zonebrew::solver::compiler::compile_lists;
use zonebrew::types::{BandSegment, SearchNote, EPS};
use zonebrew::{
    search, Attribute, AttributeRequest, Band, Catalog, Ingredient, PerAttribute, SearchParams,
    Style,
};

fn any() -> PerAttribute<AttributeRequest> {
    PerAttribute::default()
}

/// Everything the search found, in rank order.
fn exhaustive(params: SearchParams) -> SearchParams {
    params.with_top_k(100_000)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn single_range_prefers_the_fewest_units() {
    let catalog = Catalog::new(
        vec![Ingredient::new("sugar", [1.0, 0.0, 0.0, 0.0])],
        vec![Style::new("plain")],
    )
    .unwrap();
    let mut requests = any();
    requests[Attribute::Taste] = AttributeRequest::range(2.0, 4.0);

    let outcome = search(
        &catalog,
        "plain",
        &requests,
        &SearchParams::default().with_caps(10, 10),
    )
    .unwrap();

    assert_eq!(outcome.total_solutions, 3);
    let best = outcome.best().unwrap();
    assert_eq!(best.quantities, vec![2]);
    assert_eq!(best.total_quantity, 2);
    let all: Vec<u32> = outcome.solutions.iter().map(|s| s.quantities[0]).collect();
    assert_eq!(all, vec![2, 3, 4]);
}

#[test]
fn required_ingredient_alone_is_the_top_solution() {
    let catalog = Catalog::new(
        vec![
            Ingredient::new("yeast", [1.0, 0.0, 0.0, 0.0]),
            Ingredient::new("malt", [0.0, 1.0, 0.0, 0.0]),
        ],
        vec![Style::new("simple").with_min("yeast", 1)],
    )
    .unwrap();
    let mut requests = any();
    requests[Attribute::Taste] = AttributeRequest::range(0.5, 1.5);

    let outcome = search(
        &catalog,
        "simple",
        &requests,
        &SearchParams::default().with_caps(3, 3),
    )
    .unwrap();

    let best = outcome.best().unwrap();
    assert_eq!(best.quantities, vec![1, 0]);
    assert_eq!(best.counts_by_id.len(), 1);
    assert!(outcome.solutions[1..].iter().all(|s| s.total_quantity > 1));
    assert_eq!(outcome.total_solutions, 3);
}

#[test]
fn band_range_without_overlap_is_empty_not_an_error() {
    let catalog = Catalog::builtin();
    let mut requests = any();
    requests[Attribute::Taste] = AttributeRequest::band(Band::Green).with_range(5.0, 6.0);

    let outcome = search(&catalog, "light_ale", &requests, &SearchParams::default()).unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.total_solutions, 0);
    assert_eq!(
        outcome.notes,
        vec![SearchNote::NoFeasibleIntervals {
            attribute: Attribute::Taste
        }]
    );
}

#[test]
fn impossible_band_count_yields_no_assignment() {
    let catalog = Catalog::builtin();
    let mut requests = any();
    requests[Attribute::Color] = AttributeRequest::band(Band::Red);

    let outcome = search(
        &catalog,
        "light_ale",
        &requests,
        &SearchParams::default().with_band_count(Band::Green, 4),
    )
    .unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.notes, vec![SearchNote::NoBandAssignment]);
    assert_eq!(outcome.visited_nodes, 0);
}

#[test]
fn total_cap_below_minimums_is_raised() {
    let catalog = Catalog::builtin();
    let outcome = search(
        &catalog,
        "light_ale",
        &any(),
        &SearchParams::default().with_caps(1, 5),
    )
    .unwrap();

    assert_eq!(outcome.effective_total_cap, 2);
    assert_eq!(
        outcome.notes.first(),
        Some(&SearchNote::TotalCapRaised {
            requested: 1,
            effective: 2
        })
    );
    assert_eq!(outcome.total_solutions, 1);
    // standard_yeast and pale_malt come first in catalog order
    assert_eq!(outcome.solutions[0].quantities, vec![1, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn band_counts_pin_each_attribute_to_one_band() {
    let catalog = Catalog::builtin();
    let style = catalog.style("light_ale").unwrap().clone();
    let params = exhaustive(SearchParams::default().with_caps(6, 4))
        .with_band_count(Band::Green, 3)
        .with_band_count(Band::Yellow, 1);

    let outcome = search(&catalog, "light_ale", &any(), &params).unwrap();

    assert!(!outcome.is_empty());
    for sol in &outcome.solutions {
        let greens = Attribute::ALL
            .iter()
            .filter(|&&a| sol.band(a) == Some(Band::Green))
            .count();
        let yellows = Attribute::ALL
            .iter()
            .filter(|&&a| sol.band(a) == Some(Band::Yellow))
            .count();
        assert_eq!((greens, yellows), (3, 1), "bands {:?}", sol.bands);
        assert_eq!(sol.quantities.iter().sum::<u32>(), sol.total_quantity);
        assert!(sol.quantities[0] >= style.min_counts["standard_yeast"]);
    }
}

#[test]
fn budget_cut_marks_the_outcome_partial() {
    let catalog = Catalog::builtin();
    let outcome = search(
        &catalog,
        "light_ale",
        &any(),
        &SearchParams::default().with_max_state_visits(50).sequential(),
    )
    .unwrap();

    assert!(outcome.partial);
    assert!(outcome
        .notes
        .iter()
        .any(|n| matches!(n, SearchNote::BudgetExhausted { .. })));
}

#[test]
fn huge_caps_with_a_narrow_range_finish_within_budget() {
    let catalog = Catalog::new(
        vec![Ingredient::new("sugar", [1.0, 0.0, 0.0, 0.0])],
        vec![Style::new("plain")],
    )
    .unwrap();
    let mut requests = any();
    requests[Attribute::Taste] = AttributeRequest::range(2.0, 4.0);
    let params = SearchParams::default()
        .with_caps(300_000_000, 300_000_000)
        .with_max_state_visits(10)
        .with_time_budget(Duration::from_millis(10));

    let started = Instant::now();
    let outcome = search(&catalog, "plain", &requests, &params).unwrap();

    assert!(!outcome.partial);
    assert_eq!(outcome.total_solutions, 3);
    assert!(outcome.visited_nodes < 10, "visited {}", outcome.visited_nodes);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn huge_caps_without_constraints_stop_at_the_node_budget() {
    let catalog = Catalog::new(
        vec![Ingredient::new("sugar", [1.0, 0.0, 0.0, 0.0])],
        vec![Style::new("plain")],
    )
    .unwrap();
    let params = SearchParams::default()
        .with_caps(300_000_000, 300_000_000)
        .with_max_state_visits(10)
        .sequential();

    let outcome = search(&catalog, "plain", &any(), &params).unwrap();

    assert!(outcome.partial);
    assert!(outcome.total_solutions < 10);
}

#[test]
fn negative_base_is_lifted_by_ingredients() {
    let mut style = Style::new("sour").with_bands(
        Attribute::Taste,
        vec![
            BandSegment::new(Band::Red, -1000.0, -0.01),
            BandSegment::new(Band::Green, 0.0, 1.0),
        ],
    );
    style.base[Attribute::Taste] = -2.0;
    let catalog =
        Catalog::new(vec![Ingredient::new("sugar", [1.0, 0.0, 0.0, 0.0])], vec![style]).unwrap();
    let mut requests = any();
    requests[Attribute::Taste] = AttributeRequest::band(Band::Green);

    let outcome = search(&catalog, "sour", &requests, &SearchParams::default()).unwrap();

    let found: Vec<u32> = outcome.solutions.iter().map(|s| s.quantities[0]).collect();
    assert_eq!(found, vec![2, 3]);
    assert_eq!(outcome.solutions[0].band(Attribute::Taste), Some(Band::Green));
}

// ============================================================================
// Properties
// ============================================================================

fn random_requests(rng: &mut StdRng) -> PerAttribute<AttributeRequest> {
    PerAttribute::from_fn(|_| match rng.gen_range(0..4) {
        0 => AttributeRequest::any(),
        1 => {
            let lo = rng.gen_range(0.0..4.0);
            AttributeRequest::range(lo, lo + rng.gen_range(0.5..3.0))
        }
        2 => AttributeRequest::bands(Band::ALL.into_iter().filter(|_| rng.gen_bool(0.5))),
        _ => {
            let lo = rng.gen_range(0.0..3.0);
            AttributeRequest::band(Band::ALL[rng.gen_range(0..3)]).with_range(lo, lo + 2.0)
        }
    })
}

fn small_params() -> SearchParams {
    exhaustive(SearchParams::default().with_caps(6, 3))
}

#[test]
fn random_searches_hold_every_invariant() {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for case in 0..40 {
        let style = &catalog.styles()[rng.gen_range(0..catalog.styles().len())];
        let requests = random_requests(&mut rng);
        let params = small_params();

        let outcome = search(&catalog, &style.id, &requests, &params).unwrap();
        assert!(!outcome.partial);
        assert_eq!(outcome.total_solutions, outcome.solutions.len());

        let lists = compile_lists(style, &requests);
        if outcome.is_empty() {
            continue;
        }
        let lists = lists.unwrap();
        let mut seen = HashSet::new();

        for sol in &outcome.solutions {
            assert!(seen.insert(sol.quantities.clone()), "case {case}: duplicate");

            // Totals identity
            for attr in Attribute::ALL {
                let expected = style.base[attr]
                    + catalog
                        .ingredients()
                        .iter()
                        .zip(&sol.quantities)
                        .map(|(ing, &q)| f64::from(q) * ing.vector[attr])
                        .sum::<f64>();
                assert!(
                    (sol.totals[attr] - expected).abs() <= 1e-6,
                    "case {case}: {attr} total {} vs {expected}",
                    sol.totals[attr]
                );
            }

            // Bounds
            assert!(sol.total_quantity <= 6);
            for (ing, &q) in catalog.ingredients().iter().zip(&sol.quantities) {
                assert!(q <= 3);
                assert!(q >= style.min_counts.get(&ing.id).copied().unwrap_or(0));
            }

            // Containment
            for attr in Attribute::ALL {
                let value = sol.totals[attr];
                assert!(
                    lists[attr].iter().any(|iv| iv.lo - EPS <= value && value <= iv.hi + EPS),
                    "case {case}: {attr} = {value} outside {:?}",
                    lists[attr]
                );
            }
        }
    }
}

#[test]
fn repeated_searches_are_identical() {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..10 {
        let requests = random_requests(&mut rng);
        let params = small_params();
        let first = search(&catalog, "old_ale", &requests, &params).unwrap();
        let second = search(&catalog, "old_ale", &requests, &params).unwrap();
        let sequential = search(&catalog, "old_ale", &requests, &params.clone().sequential()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.solutions, sequential.solutions);
    }
}

fn quantity_set(catalog: &Catalog, style: &str, requests: &PerAttribute<AttributeRequest>, params: &SearchParams) -> HashSet<Vec<u32>> {
    search(catalog, style, requests, params)
        .unwrap()
        .solutions
        .into_iter()
        .map(|s| s.quantities)
        .collect()
}

#[test]
fn relaxing_a_constraint_never_loses_solutions() {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(2024);

    for case in 0..25 {
        let style = catalog.styles()[rng.gen_range(0..catalog.styles().len())].id.clone();
        let requests = random_requests(&mut rng);
        let params = small_params();
        let before = quantity_set(&catalog, &style, &requests, &params);
        let attr = Attribute::ALL[rng.gen_range(0..Attribute::ALL.len())];

        // Widen the numeric range
        if let Some(range) = requests[attr].range {
            let mut wider = requests.clone();
            wider[attr].range = Some(zonebrew::Interval::new(range.lo - 1.0, range.hi + 1.0));
            let after = quantity_set(&catalog, &style, &wider, &params);
            assert!(before.is_subset(&after), "case {case}: widening {attr} lost solutions");
        }

        // Permit one more band
        if !requests[attr].bands.is_empty() {
            let mut more = requests.clone();
            let extra = Band::ALL[rng.gen_range(0..3)];
            more[attr].bands.insert(extra);
            let after = quantity_set(&catalog, &style, &more, &params);
            assert!(before.is_subset(&after), "case {case}: adding {extra} lost solutions");
        }

        // Raise the caps
        let raised = exhaustive(SearchParams::default().with_caps(7, 4));
        let after = quantity_set(&catalog, &style, &requests, &raised);
        assert!(before.is_subset(&after), "case {case}: raising caps lost solutions");
    }
}
