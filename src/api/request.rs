//! Solve request parsing
//!
//! Turns the loosely-typed caller input (strings or numbers, free-form band
//! and mode names) into typed [`AttributeRequest`]s and [`SearchParams`].
//! Nothing here fails on odd input: unknown bands and modes mean "no
//! constraint", unparsable numbers count as missing, bounds are clamped into
//! the configured domain.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::config::SolverConfig;
use crate::solver::SearchParams;
use crate::types::{AttributeRequest, Band, Interval, PerAttribute, OPEN_BOUND};

/// A number that may arrive as JSON number or as (possibly blank) text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    /// Finite value, or `None` for blank / unparsable / non-finite input.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            LooseNumber::Number(v) => *v,
            LooseNumber::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for LooseNumber {
    fn from(v: f64) -> Self {
        LooseNumber::Number(v)
    }
}

/// How the numeric bounds of one attribute are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    #[default]
    Any,
    /// `value >= min`
    AtLeast,
    /// `value <= max`
    AtMost,
    /// `min <= value <= max`
    Between,
}

impl RangeMode {
    /// Unknown names fall back to [`RangeMode::Any`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ge" => RangeMode::AtLeast,
            "le" => RangeMode::AtMost,
            "between" => RangeMode::Between,
            _ => RangeMode::Any,
        }
    }
}

/// Raw per-attribute input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeInput {
    /// Band name, or "any"
    #[serde(default)]
    pub band: Option<String>,
    /// One of "any", "ge", "le", "between"
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub min: Option<LooseNumber>,
    #[serde(default)]
    pub max: Option<LooseNumber>,
}

impl AttributeInput {
    /// Resolve into a typed request, clamping bounds into `[domain_min, domain_max]`.
    pub fn resolve(&self, domain_min: f64, domain_max: f64) -> AttributeRequest {
        let clamp = |n: &Option<LooseNumber>| {
            n.as_ref()
                .and_then(LooseNumber::value)
                .map(|v| v.clamp(domain_min, domain_max))
        };
        let min = clamp(&self.min);
        let max = clamp(&self.max);

        let mode = self.mode.as_deref().map_or(RangeMode::Any, RangeMode::from_name);
        let range = match mode {
            RangeMode::Any => None,
            RangeMode::AtLeast => Some(Interval::new(min.unwrap_or(domain_min), OPEN_BOUND)),
            RangeMode::AtMost => Some(Interval::new(-OPEN_BOUND, max.unwrap_or(domain_max))),
            RangeMode::Between => {
                let lo = min.unwrap_or(domain_min);
                let hi = max.unwrap_or(domain_max);
                Some(Interval::new(lo.min(hi), lo.max(hi)))
            }
        };

        let bands = self
            .band
            .as_deref()
            .and_then(Band::from_name)
            .into_iter()
            .collect::<BTreeSet<_>>();

        AttributeRequest { range, bands }
    }
}

/// Body of `POST /api/v1/solve` and of `zonebrew solve --request FILE`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub style: String,
    #[serde(default)]
    pub total_cap: Option<i64>,
    #[serde(default)]
    pub per_cap: Option<i64>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub attributes: PerAttribute<AttributeInput>,
    /// Each selected optional ingredient must appear at least once
    #[serde(default)]
    pub optional_ingredients: Vec<String>,
    /// Restrict optional ingredients to this set
    #[serde(default)]
    pub allowed_ingredients: Option<Vec<String>>,
    /// Band name -> exact number of attributes in that band
    #[serde(default)]
    pub band_counts: BTreeMap<String, u32>,
}

/// A request ready for [`crate::solver::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub style: String,
    pub requests: PerAttribute<AttributeRequest>,
    pub params: SearchParams,
}

impl SolveRequest {
    /// Resolve against the solver defaults and the catalog's ingredient ids.
    pub fn parse(&self, cfg: &SolverConfig, catalog: &Catalog) -> ParsedRequest {
        let mut params = SearchParams::from_config(cfg);
        // negative caps pass through so the search can report them
        if let Some(total) = self.total_cap {
            params.total_cap = total.min(i64::from(cfg.max_total_cap));
        }
        if let Some(per) = self.per_cap {
            params.per_cap = per.min(i64::from(cfg.max_per_cap));
        }
        params.top_k = self.top_k.unwrap_or(cfg.default_top_k).clamp(1, cfg.max_top_k.max(1));

        for id in &self.optional_ingredients {
            if catalog.contains_ingredient(id) {
                params = params.with_extra_minimum(id.clone(), 1);
            }
        }

        if let Some(allowed) = &self.allowed_ingredients {
            params = params.with_allowed(allowed.iter().filter(|id| catalog.contains_ingredient(id)).cloned());
        }

        for (name, &count) in &self.band_counts {
            if let Some(band) = Band::from_name(name) {
                params = params.with_band_count(band, count);
            }
        }

        let requests = self
            .attributes
            .map(|_, input| input.resolve(cfg.domain_min, cfg.domain_max));

        ParsedRequest {
            style: self.style.trim().to_string(),
            requests,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    fn input(band: &str, mode: &str, min: &str, max: &str) -> AttributeInput {
        AttributeInput {
            band: Some(band.to_string()),
            mode: Some(mode.to_string()),
            min: Some(LooseNumber::Text(min.to_string())),
            max: Some(LooseNumber::Text(max.to_string())),
        }
    }

    #[test]
    fn ge_defaults_missing_min_to_domain_floor() {
        let req = input("any", "ge", "", "").resolve(0.0, 11.0);
        assert_eq!(req.range, Some(Interval::new(0.0, OPEN_BOUND)));
        assert!(req.bands.is_empty());
    }

    #[test]
    fn le_defaults_missing_max_to_domain_ceiling() {
        let req = input("any", "le", "3", "oops").resolve(0.0, 11.0);
        assert_eq!(req.range, Some(Interval::new(-OPEN_BOUND, 11.0)));
    }

    #[test]
    fn between_swaps_reversed_bounds_and_clamps() {
        let req = input("green", "between", "20", "2.5").resolve(0.0, 11.0);
        assert_eq!(req.range, Some(Interval::new(2.5, 11.0)));
        assert_eq!(req.bands, BTreeSet::from([Band::Green]));
    }

    #[test]
    fn unknown_names_mean_no_constraint() {
        let req = input("purple", "approximately", "1", "2").resolve(0.0, 11.0);
        assert!(req.is_unconstrained());
        assert!(AttributeInput::default().resolve(0.0, 11.0).is_unconstrained());
    }

    #[test]
    fn numbers_may_arrive_as_json_numbers() {
        let raw = r#"{"band": "Yellow", "mode": "between", "min": 1.5, "max": "4"}"#;
        let parsed: AttributeInput = serde_json::from_str(raw).unwrap();
        let req = parsed.resolve(0.0, 11.0);
        assert_eq!(req.range, Some(Interval::new(1.5, 4.0)));
        assert_eq!(req.bands, BTreeSet::from([Band::Yellow]));
    }

    #[test]
    fn huge_caps_are_clamped_to_the_configured_ceiling() {
        let catalog = Catalog::builtin();
        let cfg = SolverConfig::default();
        let body: SolveRequest = serde_json::from_str(
            r#"{"style": "light_ale", "total_cap": 300000000, "per_cap": 300000000}"#,
        )
        .unwrap();
        let parsed = body.parse(&cfg, &catalog);
        assert_eq!(parsed.params.total_cap, i64::from(cfg.max_total_cap));
        assert_eq!(parsed.params.per_cap, i64::from(cfg.max_per_cap));

        let negative = SolveRequest {
            style: "light_ale".to_string(),
            total_cap: Some(-1),
            ..SolveRequest::default()
        };
        assert_eq!(negative.parse(&cfg, &catalog).params.total_cap, -1);
    }

    #[test]
    fn parse_applies_config_defaults_and_filters_ids() {
        let catalog = Catalog::builtin();
        let cfg = SolverConfig::default();
        let body: SolveRequest = serde_json::from_str(
            r#"{
                "style": " light_ale ",
                "top_k": 1000,
                "attributes": {"taste": {"band": "green"}},
                "optional_ingredients": ["honey", "dragon_scale"],
                "allowed_ingredients": ["gruit", "nope"],
                "band_counts": {"green": 3, "teal": 1}
            }"#,
        )
        .unwrap();
        let parsed = body.parse(&cfg, &catalog);
        assert_eq!(parsed.style, "light_ale");
        assert_eq!(parsed.params.top_k, cfg.max_top_k);
        assert_eq!(parsed.params.total_cap, 25);
        assert_eq!(parsed.params.extra_minimums, BTreeMap::from([("honey".to_string(), 1)]));
        assert_eq!(
            parsed.params.allowed_ingredients,
            Some(BTreeSet::from(["gruit".to_string()]))
        );
        assert_eq!(parsed.params.band_counts, BTreeMap::from([(Band::Green, 3)]));
        assert_eq!(parsed.requests[Attribute::Taste].bands, BTreeSet::from([Band::Green]));
        assert!(parsed.requests[Attribute::Foam].is_unconstrained());
        assert_eq!(parsed.params.max_state_visits, cfg.max_state_visits);
    }
}
