use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::article::ArticleId;

/// Output of one evidence strategy for one article.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureValue {
    Bool { value: bool },
    Score { value: f64 },
    YearGap { gap: i32, implausible: bool },
    /// The strategy could not determine a value. Neutral in aggregation.
    Absent,
}

impl FeatureValue {
    #[inline]
    pub fn bool(value: bool) -> Self {
        FeatureValue::Bool { value }
    }

    #[inline]
    pub fn score(value: f64) -> Self {
        FeatureValue::Score { value }
    }

    /// Signal in [0, 1] used when aggregating over a cluster.
    ///
    /// A year gap counts as 1 when implausible. Non-finite scores count as 0.
    pub fn signal(&self) -> f64 {
        match *self {
            FeatureValue::Bool { value } => {
                if value {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureValue::Score { value } if value.is_finite() => value.clamp(0.0, 1.0),
            FeatureValue::Score { .. } => 0.0,
            FeatureValue::YearGap { implausible, .. } => {
                if implausible {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureValue::Absent => 0.0,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, FeatureValue::Absent)
    }
}

/// Renders the value as a single CSV cell. Absent is the empty string.
impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Bool { value } => write!(f, "{}", u8::from(*value)),
            FeatureValue::Score { value } => write!(f, "{:.4}", value),
            FeatureValue::YearGap { gap, .. } => write!(f, "{}", gap),
            FeatureValue::Absent => Ok(()),
        }
    }
}

/// Every strategy output for one article, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pmid: ArticleId,
    gold_standard: bool,
    values: IndexMap<String, FeatureValue>,
}

impl Feature {
    pub fn new(pmid: ArticleId, gold_standard: bool, values: IndexMap<String, FeatureValue>) -> Self {
        Self {
            pmid,
            gold_standard,
            values,
        }
    }

    #[inline]
    pub fn pmid(&self) -> ArticleId {
        self.pmid
    }

    #[inline]
    pub fn is_gold_standard(&self) -> bool {
        self.gold_standard
    }

    /// Value of a named feature; unknown names read as `Absent`.
    pub fn get(&self, name: &str) -> FeatureValue {
        self.values.get(name).copied().unwrap_or(FeatureValue::Absent)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Copy with the gold-standard flag replaced.
    pub fn with_gold_standard(&self, gold_standard: bool) -> Self {
        Self {
            gold_standard,
            ..self.clone()
        }
    }
}
