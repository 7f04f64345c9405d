//! Band-constrained recipe search
//!
//! ## Pipeline
//!
//! ```text
//! requests ──► band-count enumerator ──► assignments (or the requests as-is)
//!                                             │
//!                          constraint compiler ▼
//!                                      interval boxes
//!                                             │
//!             bounded DFS per (assignment × box), rayon workers
//!                                             │
//!                                             ▼
//!                             pooled solutions ──► rank + dedup ──► top K
//! ```
//!
//! Every infeasibility is a normal outcome: the result is empty and carries
//! a [`SearchNote`] saying why. The only error is an unknown style id.

pub mod assignment;
pub mod bands;
pub mod bounded;
pub mod budget;
pub mod compiler;
pub mod ranking;

pub use assignment::BandCounts;
pub use bands::{detect_band, intervals_for_band};
pub use budget::SearchBudget;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::SolverConfig;
use crate::types::{
    Attribute, AttributeRequest, AttributeVector, Band, IntervalBox, PerAttribute, SearchNote,
    SearchOutcome, Season, Solution, Style,
};

use assignment::{apply_assignment, enumerate_assignments, legal_bands};
use bounded::{Hit, SearchSpace};
use compiler::{compile_boxes, Infeasible};

/// More allowed optional ingredients than this makes a budget-exhausted
/// search eligible for the trimmed retry.
pub const OPTIONAL_TRIM_THRESHOLD: usize = 18;

/// Fewest optional ingredients the trimmed retry keeps.
pub const OPTIONAL_TRIM_MIN: usize = 8;

/// Most optional ingredients the trimmed retry keeps.
pub const OPTIONAL_TRIM_MAX: usize = 18;

/// Decimal places kept in reported attribute totals.
const TOTALS_DECIMALS: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unknown style '{0}'")]
    UnknownStyle(String),
}

/// Everything a search needs besides the catalog, style and attribute requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Maximum sum of all quantities (raised to the sum of minimums if lower)
    pub total_cap: i64,
    /// Maximum quantity of any single ingredient
    pub per_cap: i64,
    pub top_k: usize,
    /// Extra minimum quantities on top of the style's own
    pub extra_minimums: BTreeMap<String, u32>,
    /// Exact number of attributes required per band
    pub band_counts: BandCounts,
    /// When set, ingredients outside it (and not required) are excluded
    pub allowed_ingredients: Option<BTreeSet<String>>,
    /// Node budget, 0 disables
    pub max_state_visits: u64,
    pub time_budget: Option<Duration>,
    pub parallel: bool,
    pub optional_trim: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            total_cap: 25,
            per_cap: 25,
            top_k: 10,
            extra_minimums: BTreeMap::new(),
            band_counts: BandCounts::new(),
            allowed_ingredients: None,
            max_state_visits: 0,
            time_budget: None,
            parallel: true,
            optional_trim: true,
        }
    }
}

impl SearchParams {
    /// Defaults taken from the service configuration.
    pub fn from_config(cfg: &SolverConfig) -> Self {
        Self {
            total_cap: i64::from(cfg.default_total_cap),
            per_cap: i64::from(cfg.default_per_cap),
            top_k: cfg.default_top_k,
            max_state_visits: cfg.max_state_visits,
            time_budget: (cfg.time_budget_ms > 0).then(|| Duration::from_millis(cfg.time_budget_ms)),
            parallel: cfg.parallel,
            optional_trim: cfg.optional_trim,
            ..Self::default()
        }
    }

    pub fn with_caps(mut self, total_cap: i64, per_cap: i64) -> Self {
        self.total_cap = total_cap;
        self.per_cap = per_cap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_extra_minimum(mut self, ingredient: impl Into<String>, count: u32) -> Self {
        let entry = self.extra_minimums.entry(ingredient.into()).or_insert(0);
        *entry = (*entry).max(count);
        self
    }

    pub fn with_band_count(mut self, band: Band, count: u32) -> Self {
        self.band_counts.insert(band, count);
        self
    }

    pub fn with_allowed<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_ingredients = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_state_visits(mut self, max: u64) -> Self {
        self.max_state_visits = max;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn without_optional_trim(mut self) -> Self {
        self.optional_trim = false;
        self
    }
}

/// Run one search.
///
/// Deterministic for a complete search: identical inputs give identically
/// ordered outputs. Only a budget cut combined with parallel execution can
/// make the partial result set vary between runs.
pub fn search(
    catalog: &Catalog,
    style_id: &str,
    requests: &PerAttribute<AttributeRequest>,
    params: &SearchParams,
) -> Result<SearchOutcome, SearchError> {
    let style = catalog
        .style(style_id)
        .ok_or_else(|| SearchError::UnknownStyle(style_id.to_string()))?;

    // 1. Caps
    if params.total_cap < 0 || params.per_cap < 0 {
        return Ok(SearchOutcome::empty(SearchNote::InvalidCaps {
            total_cap: params.total_cap,
            per_cap: params.per_cap,
        }));
    }
    let per_cap = clamp_cap(params.per_cap);
    let requested_total = clamp_cap(params.total_cap);

    // 2. Minimums: style requirement or caller extra, whichever is larger
    let minimums: Vec<u32> = catalog
        .ingredients()
        .iter()
        .map(|ing| {
            let style_min = style.min_counts.get(&ing.id).copied().unwrap_or(0);
            let extra = params.extra_minimums.get(&ing.id).copied().unwrap_or(0);
            style_min.max(extra)
        })
        .collect();
    for id in params.extra_minimums.keys() {
        if !catalog.contains_ingredient(id) {
            debug!(ingredient = %id, "Ignoring extra minimum for unknown ingredient");
        }
    }

    if let Some((ing, &minimum)) = catalog
        .ingredients()
        .iter()
        .zip(minimums.iter())
        .find(|(_, m)| **m > per_cap)
    {
        return Ok(SearchOutcome::empty(SearchNote::MinimumExceedsPerCap {
            ingredient: ing.id.clone(),
            minimum,
            per_cap,
        }));
    }

    // 3. Effective total cap and per-ingredient ceilings
    let min_sum = minimums.iter().fold(0u32, |acc, &m| acc.saturating_add(m));
    let mut notes = Vec::new();
    let total_cap = requested_total.max(min_sum);
    if total_cap > requested_total {
        notes.push(SearchNote::TotalCapRaised {
            requested: requested_total,
            effective: total_cap,
        });
    }
    let ceiling = per_cap.min(total_cap);
    let maximums: Vec<u32> = catalog
        .ingredients()
        .iter()
        .zip(minimums.iter())
        .map(|(ing, &min)| {
            let allowed = params
                .allowed_ingredients
                .as_ref()
                .map_or(true, |set| set.contains(&ing.id));
            if min > 0 || allowed {
                ceiling
            } else {
                min
            }
        })
        .collect();

    let plan = Plan {
        catalog,
        style,
        requests,
        params,
        minimums,
        total_cap,
    };

    // 4. Search, with a single trimmed retry if the budget ran out empty-handed
    let first = plan.run(&maximums);
    let optional = plan.optional_indices(&maximums);
    let needs_trim = params.optional_trim
        && first.partial
        && first.solutions.is_empty()
        && optional.len() > OPTIONAL_TRIM_THRESHOLD;

    let mut outcome = if needs_trim {
        let kept = plan.trim_target(min_sum).min(optional.len());
        if kept < optional.len() {
            let trimmed = plan.trimmed_maximums(&maximums, &optional, kept);
            warn!(
                style = %style.id,
                kept,
                total = optional.len(),
                "Search budget exhausted without solutions, retrying with fewer optional ingredients"
            );
            let mut retry = plan.run(&trimmed);
            retry.visited_nodes += first.visited_nodes;
            retry.notes.insert(
                0,
                SearchNote::TrimmedOptional {
                    kept,
                    total: optional.len(),
                },
            );
            retry
        } else {
            first
        }
    } else {
        first
    };

    notes.append(&mut outcome.notes);
    outcome.notes = notes;
    outcome.effective_total_cap = total_cap;
    Ok(outcome)
}

fn clamp_cap(cap: i64) -> u32 {
    u32::try_from(cap).unwrap_or(u32::MAX)
}

/// Inputs fixed for the lifetime of one `search` call.
struct Plan<'a> {
    catalog: &'a Catalog,
    style: &'a Style,
    requests: &'a PerAttribute<AttributeRequest>,
    params: &'a SearchParams,
    minimums: Vec<u32>,
    total_cap: u32,
}

impl Plan<'_> {
    /// Allowed optional ingredients, strongest first (max |coefficient|, stable).
    fn optional_indices(&self, maximums: &[u32]) -> Vec<usize> {
        let ingredients = self.catalog.ingredients();
        let mut idx: Vec<usize> = (0..ingredients.len())
            .filter(|&i| self.minimums[i] == 0 && maximums[i] > 0)
            .collect();
        idx.sort_by(|&a, &b| {
            ingredients[b]
                .vector
                .max_abs()
                .total_cmp(&ingredients[a].vector.max_abs())
        });
        idx
    }

    fn trim_target(&self, min_sum: u32) -> usize {
        let required = self.minimums.iter().filter(|&&m| m > 0).count();
        let remaining_cap = (self.total_cap - min_sum) as usize;
        OPTIONAL_TRIM_MIN.max(OPTIONAL_TRIM_MAX.min(remaining_cap + required))
    }

    fn trimmed_maximums(&self, maximums: &[u32], optional: &[usize], kept: usize) -> Vec<u32> {
        let mut trimmed = maximums.to_vec();
        for &i in &optional[kept..] {
            trimmed[i] = self.minimums[i];
        }
        trimmed
    }

    /// One complete pass: assignments, boxes, bounded search, ranking.
    fn run(&self, maximums: &[u32]) -> SearchOutcome {
        let mut notes = Vec::new();

        // Band-count targets fan the request out into one request per assignment
        let variants: Vec<PerAttribute<AttributeRequest>> = if self.params.band_counts.is_empty() {
            vec![self.requests.clone()]
        } else {
            let legal = self.requests.map(|_, req| legal_bands(req));
            let assignments = enumerate_assignments(&legal, &self.params.band_counts);
            if assignments.is_empty() {
                return SearchOutcome::empty(SearchNote::NoBandAssignment);
            }
            assignments
                .iter()
                .map(|a| apply_assignment(self.requests, a))
                .collect()
        };

        let mut boxes: Vec<IntervalBox> = Vec::new();
        let mut first_infeasible: Option<Attribute> = None;
        for variant in &variants {
            match compile_boxes(self.style, variant) {
                Ok(mut b) => boxes.append(&mut b),
                Err(Infeasible(attr)) => {
                    first_infeasible.get_or_insert(attr);
                }
            }
        }
        if boxes.is_empty() {
            if let Some(attribute) = first_infeasible {
                notes.push(SearchNote::NoFeasibleIntervals { attribute });
            }
            return SearchOutcome {
                notes,
                ..SearchOutcome::default()
            };
        }

        // Ingredients pinned at zero contribute nothing and are left out of the walk
        let active: Vec<usize> = (0..maximums.len()).filter(|&i| maximums[i] > 0).collect();
        let ingredients = self.catalog.ingredients();
        let space = SearchSpace::new(
            active.iter().map(|&i| ingredients[i].vector).collect(),
            active.iter().map(|&i| self.minimums[i]).collect(),
            active.iter().map(|&i| maximums[i]).collect(),
            self.total_cap,
            self.style.base,
        );

        let budget = SearchBudget::new(self.params.max_state_visits, self.params.time_budget);
        let per_box: Vec<Vec<Hit>> = if self.params.parallel && boxes.len() > 1 {
            boxes.par_iter().map(|b| space.search_box(b, &budget)).collect()
        } else {
            boxes.iter().map(|b| space.search_box(b, &budget)).collect()
        };

        let solutions: Vec<Solution> = per_box
            .into_iter()
            .flatten()
            .map(|hit| self.build_solution(&active, &hit))
            .collect();
        let (solutions, total_solutions) = ranking::rank(solutions, self.params.top_k);

        let partial = budget.is_exhausted();
        let visited_nodes = budget.visited();
        if partial {
            warn!(
                style = %self.style.id,
                visited_nodes,
                found = total_solutions,
                "Search budget exhausted, returning partial results"
            );
            notes.push(SearchNote::BudgetExhausted { visited_nodes });
        }
        debug!(
            style = %self.style.id,
            assignments = variants.len(),
            boxes = boxes.len(),
            ingredients = space.len(),
            visited_nodes,
            total_solutions,
            "Search pass finished"
        );

        SearchOutcome {
            solutions,
            total_solutions,
            partial,
            effective_total_cap: self.total_cap,
            visited_nodes,
            notes,
        }
    }

    /// Expand a hit back to catalog order and derive everything reported about it.
    fn build_solution(&self, active: &[usize], hit: &Hit) -> Solution {
        let ingredients = self.catalog.ingredients();
        let mut quantities = vec![0u32; ingredients.len()];
        for (&i, &q) in active.iter().zip(hit.quantities.iter()) {
            quantities[i] = q;
        }

        let mut totals = self.style.base;
        let mut counts_by_id = BTreeMap::new();
        let mut total_cost = 0.0;
        let mut seasonal_costs: BTreeMap<Season, f64> = Season::ALL.iter().map(|&s| (s, 0.0)).collect();
        for (ing, &q) in ingredients.iter().zip(quantities.iter()) {
            if q == 0 {
                continue;
            }
            let units = f64::from(q);
            totals = totals.add_scaled(&ing.vector, units);
            counts_by_id.insert(ing.id.clone(), q);
            total_cost += ing.cost * units;
            for (season, cost) in &mut seasonal_costs {
                *cost += ing.cost * season.multiplier(ing.seasonal_type.as_deref()) * units;
            }
        }
        let (min_cost, average_cost, max_cost) = cost_spread(&seasonal_costs);

        // bands come from the unrounded totals
        let bands = PerAttribute::from_fn(|a| detect_band(self.style, a, totals[a]));

        Solution {
            total_quantity: quantities.iter().sum(),
            quantities,
            totals: round_totals(&totals),
            bands,
            ingredient_count: counts_by_id.len(),
            counts_by_id,
            total_cost,
            seasonal_costs,
            min_cost,
            average_cost,
            max_cost,
        }
    }
}

/// Minimum, mean and maximum over the per-season costs.
fn cost_spread(seasonal_costs: &BTreeMap<Season, f64>) -> (f64, f64, f64) {
    if seasonal_costs.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = seasonal_costs.values().copied().fold(f64::INFINITY, f64::min);
    let max = seasonal_costs.values().copied().fold(f64::NEG_INFINITY, f64::max);
    #[allow(clippy::cast_precision_loss)]
    let average = seasonal_costs.values().sum::<f64>() / seasonal_costs.len() as f64;
    (min, average, max)
}

fn round_totals(totals: &AttributeVector) -> AttributeVector {
    totals.rounded(TOTALS_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn any() -> PerAttribute<AttributeRequest> {
        PerAttribute::default()
    }

    fn line_catalog() -> Catalog {
        let style = Style::new("line");
        Catalog::new(vec![Ingredient::new("unit", [1.0, 0.0, 0.0, 0.0])], vec![style]).unwrap()
    }

    #[test]
    fn unknown_style_is_an_error() {
        let err = search(&Catalog::builtin(), "lager", &any(), &SearchParams::default());
        assert!(matches!(err, Err(SearchError::UnknownStyle(s)) if s == "lager"));
    }

    #[test]
    fn negative_caps_give_empty_result_with_note() {
        let params = SearchParams::default().with_caps(-1, 5);
        let out = search(&line_catalog(), "line", &any(), &params).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            out.notes,
            vec![SearchNote::InvalidCaps {
                total_cap: -1,
                per_cap: 5
            }]
        );
    }

    #[test]
    fn minimum_above_per_cap_is_infeasible() {
        let params = SearchParams::default().with_caps(10, 2).with_extra_minimum("unit", 3);
        let out = search(&line_catalog(), "line", &any(), &params).unwrap();
        assert!(out.is_empty());
        assert!(matches!(
            out.notes[0],
            SearchNote::MinimumExceedsPerCap { minimum: 3, per_cap: 2, .. }
        ));
    }

    #[test]
    fn range_request_prefers_fewest_units() {
        let mut requests = any();
        requests.taste = AttributeRequest::range(2.0, 4.0);
        let params = SearchParams::default().with_caps(10, 10);
        let out = search(&line_catalog(), "line", &requests, &params).unwrap();
        assert_eq!(out.total_solutions, 3);
        assert_eq!(out.best().unwrap().quantities, vec![2]);
        assert_eq!(out.best().unwrap().total_quantity, 2);
        assert!(!out.partial);
    }

    #[test]
    fn disallowed_ingredients_stay_at_their_minimum() {
        let catalog = Catalog::builtin();
        let params = SearchParams::default()
            .with_caps(8, 8)
            .with_allowed(Vec::<String>::new())
            .with_top_k(100);
        let out = search(&catalog, "light_ale", &any(), &params).unwrap();
        let pale = catalog.ingredient_index("pale_malt").unwrap();
        let yeast = catalog.ingredient_index("standard_yeast").unwrap();
        for s in &out.solutions {
            for (i, &q) in s.quantities.iter().enumerate() {
                if i != pale && i != yeast {
                    assert_eq!(q, 0);
                }
            }
        }
        // pale in 1..=7, yeast in 1..=8-pale
        assert_eq!(out.total_solutions, 28);
    }

    #[test]
    fn solution_reports_counts_cost_and_bands() {
        let catalog = Catalog::builtin();
        let params = SearchParams::default().with_caps(2, 2).with_allowed(Vec::<String>::new());
        let out = search(&catalog, "light_ale", &any(), &params).unwrap();
        let best = out.best().unwrap();
        assert_eq!(best.total_quantity, 2);
        assert_eq!(best.counts_by_id.get("pale_malt"), Some(&1));
        assert_eq!(best.counts_by_id.get("standard_yeast"), Some(&1));
        assert!((best.total_cost - 4.0).abs() < 1e-9);
        assert_eq!(best.ingredient_count, 2);
        // malt is dear in spring and cheap in summer; yeast never moves
        assert!((best.seasonal_costs[&Season::Spring] - 4.5).abs() < 1e-9);
        assert!((best.seasonal_costs[&Season::Summer] - 3.5).abs() < 1e-9);
        assert!((best.seasonal_costs[&Season::Autumn] - 4.0).abs() < 1e-9);
        assert!((best.min_cost - 3.5).abs() < 1e-9);
        assert!((best.max_cost - 4.5).abs() < 1e-9);
        assert!((best.average_cost - 4.0).abs() < 1e-9);
        // pale + yeast = [0.9, 0.3, 0.0, 0.0]
        assert_eq!(best.totals, AttributeVector::new([0.9, 0.3, 0.0, 0.0]));
        assert_eq!(best.band(Attribute::Taste), Some(Band::Red));
        assert_eq!(best.band(Attribute::Foam), Some(Band::Yellow));
    }

    #[test]
    fn trim_target_is_clamped() {
        let catalog = Catalog::builtin();
        let requests = any();
        let params = SearchParams::default();
        let plan = Plan {
            catalog: &catalog,
            style: catalog.style("light_ale").unwrap(),
            requests: &requests,
            params: &params,
            minimums: vec![1, 1, 0, 0, 0, 0, 0],
            total_cap: 4,
        };
        // remaining 2 + required 2 -> raised to the floor
        assert_eq!(plan.trim_target(2), OPTIONAL_TRIM_MIN);
        let plan = Plan { total_cap: 40, ..plan };
        assert_eq!(plan.trim_target(2), OPTIONAL_TRIM_MAX);
    }

    #[test]
    fn optional_indices_sorted_by_strength() {
        let catalog = Catalog::builtin();
        let requests = any();
        let params = SearchParams::default();
        let plan = Plan {
            catalog: &catalog,
            style: catalog.style("light_ale").unwrap(),
            requests: &requests,
            params: &params,
            minimums: vec![1, 1, 0, 0, 0, 0, 0],
            total_cap: 25,
        };
        let optional = plan.optional_indices(&[25; 7]);
        let ids: Vec<&str> = optional
            .iter()
            .map(|&i| catalog.ingredients()[i].id.as_str())
            .collect();
        // brown 2.0, amber 1.2, eucalyptus 1.0, honey 1.0 (catalog order kept), gruit 0.5
        assert_eq!(ids, vec!["brown_malt", "amber_malt", "eucalyptus", "honey", "gruit"]);
    }
}
