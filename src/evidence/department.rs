use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::{contains_phrase, names_unit, normalize_text, token_set};

/// Target author's affiliation names the identity's department.
///
/// Only the comma- or semicolon-separated segments that name a unit are
/// considered, so institution names ("Weill Cornell Medicine") never match.
/// A segment matches on a normalized substring, or when every significant
/// word of the department occurs in it ("Dept. of Medicine" vs
/// "Department of Medicine").
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentStrategy;

impl DepartmentStrategy {
    pub const NAME: &'static str = "department_match";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let Some(department) = identity
            .department
            .as_deref()
            .map(normalize_text)
            .filter(|d| !d.is_empty())
        else {
            return FeatureValue::bool(false);
        };
        let affiliation = normalize_text(&article.target_affiliation_text(&identity.name));
        if affiliation.is_empty() {
            return FeatureValue::bool(false);
        }
        let matched = affiliation
            .split([',', ';'])
            .filter(|segment| names_unit(segment))
            .any(|segment| {
                segment.contains(department.as_str())
                    || contains_phrase(&token_set(segment), &department)
            });
        FeatureValue::bool(matched)
    }
}
