//! Attribute space: the four numeric dimensions every ingredient and target lives in.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of attributes in the product model.
pub const ATTRIBUTE_COUNT: usize = 4;

/// One scalar dimension of the product being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Taste,
    Color,
    Strength,
    Foam,
}

impl Attribute {
    /// All attributes in their fixed, stable order.
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Taste,
        Attribute::Color,
        Attribute::Strength,
        Attribute::Foam,
    ];

    /// Position of this attribute inside an [`AttributeVector`].
    pub const fn index(self) -> usize {
        match self {
            Attribute::Taste => 0,
            Attribute::Color => 1,
            Attribute::Strength => 2,
            Attribute::Foam => 3,
        }
    }

    /// Machine name used in catalogs and requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Taste => "taste",
            Attribute::Color => "color",
            Attribute::Strength => "strength",
            Attribute::Foam => "foam",
        }
    }

    /// Parse a machine name; `None` for anything unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-size vector with one value per [`Attribute`].
///
/// Serialized as a plain JSON/TOML array in attribute order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeVector(pub [f64; ATTRIBUTE_COUNT]);

impl AttributeVector {
    pub const ZERO: AttributeVector = AttributeVector([0.0; ATTRIBUTE_COUNT]);

    pub const fn new(values: [f64; ATTRIBUTE_COUNT]) -> Self {
        Self(values)
    }

    /// `self + other * factor`, component-wise.
    pub fn add_scaled(&self, other: &AttributeVector, factor: f64) -> AttributeVector {
        let mut out = *self;
        for (o, v) in out.0.iter_mut().zip(other.0.iter()) {
            *o += v * factor;
        }
        out
    }

    /// Round every component to `decimals` decimal places.
    pub fn rounded(&self, decimals: i32) -> AttributeVector {
        let scale = 10f64.powi(decimals);
        let mut out = *self;
        for v in &mut out.0 {
            *v = (*v * scale).round() / scale;
        }
        out
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.0[a.index()]))
    }
}

impl Index<Attribute> for AttributeVector {
    type Output = f64;

    fn index(&self, attr: Attribute) -> &f64 {
        &self.0[attr.index()]
    }
}

impl IndexMut<Attribute> for AttributeVector {
    fn index_mut(&mut self, attr: Attribute) -> &mut f64 {
        &mut self.0[attr.index()]
    }
}

/// A value of type `T` for every attribute, indexable by [`Attribute`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerAttribute<T> {
    #[serde(default)]
    pub taste: T,
    #[serde(default)]
    pub color: T,
    #[serde(default)]
    pub strength: T,
    #[serde(default)]
    pub foam: T,
}

impl<T> PerAttribute<T> {
    /// Build by calling `f` for each attribute in order.
    pub fn from_fn(mut f: impl FnMut(Attribute) -> T) -> Self {
        Self {
            taste: f(Attribute::Taste),
            color: f(Attribute::Color),
            strength: f(Attribute::Strength),
            foam: f(Attribute::Foam),
        }
    }

    pub fn get(&self, attr: Attribute) -> &T {
        match attr {
            Attribute::Taste => &self.taste,
            Attribute::Color => &self.color,
            Attribute::Strength => &self.strength,
            Attribute::Foam => &self.foam,
        }
    }

    pub fn get_mut(&mut self, attr: Attribute) -> &mut T {
        match attr {
            Attribute::Taste => &mut self.taste,
            Attribute::Color => &mut self.color,
            Attribute::Strength => &mut self.strength,
            Attribute::Foam => &mut self.foam,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &T)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Attribute, &T) -> U) -> PerAttribute<U> {
        PerAttribute::from_fn(|a| f(a, self.get(a)))
    }
}

impl<T> Index<Attribute> for PerAttribute<T> {
    type Output = T;

    fn index(&self, attr: Attribute) -> &T {
        self.get(attr)
    }
}

impl<T> IndexMut<Attribute> for PerAttribute<T> {
    fn index_mut(&mut self, attr: Attribute) -> &mut T {
        self.get_mut(attr)
    }
}
