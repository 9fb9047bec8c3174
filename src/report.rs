//! CSV exports of a run.

use std::io;

use ahash::AHashSet;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::error::Result;
use crate::model::article::{Article, ArticleId};
use crate::model::feature::Feature;
use crate::vectorizer::dictionary::TermDictionary;

/// One row per article: pmid, one column per feature, gold flag.
/// Columns follow the first feature's order; absent values are empty cells.
pub fn write_features<W: io::Write>(writer: W, features: &[Feature]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let Some(first) = features.first() else {
        wtr.flush()?;
        return Ok(());
    };
    let names: Vec<&str> = first.names().collect();

    let mut header = vec!["pmid"];
    header.extend(names.iter().copied());
    header.push("gold_standard");
    wtr.write_record(&header)?;

    for feature in features {
        let mut row = Vec::with_capacity(names.len() + 2);
        row.push(feature.pmid().to_string());
        row.extend(names.iter().map(|name| feature.get(name).to_string()));
        row.push(u8::from(feature.is_gold_standard()).to_string());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct AnalysisRow<'a> {
    identity_key: &'a str,
    precision: f64,
    recall: f64,
    accuracy: f64,
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
    true_negatives: usize,
    false_positive_pmids: String,
    false_negative_pmids: String,
}

/// Single-row summary of an analysis.
pub fn write_analysis<W: io::Write>(writer: W, identity_key: &str, analysis: &Analysis) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.serialize(AnalysisRow {
        identity_key,
        precision: analysis.precision,
        recall: analysis.recall,
        accuracy: analysis.accuracy,
        true_positives: analysis.true_positives.len(),
        false_positives: analysis.false_positives.len(),
        false_negatives: analysis.false_negatives.len(),
        true_negatives: analysis.true_negatives.len(),
        false_positive_pmids: join_ids(&analysis.false_positives),
        false_negative_pmids: join_ids(&analysis.false_negatives),
    })?;
    wtr.flush()?;
    Ok(())
}

fn join_ids(ids: &[ArticleId]) -> String {
    ids.iter().map(ArticleId::to_string).collect::<Vec<_>>().join(" ")
}

/// Binary term-presence matrix: one column per dictionary term (any field),
/// plus `is_correct` from the gold standard.
pub fn write_term_matrix<W: io::Write>(
    writer: W,
    articles: &[Article],
    dictionary: &TermDictionary,
    gold: &[ArticleId],
) -> Result<()> {
    let gold: AHashSet<ArticleId> = gold.iter().copied().collect();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["pmid"];
    header.extend(dictionary.terms());
    header.push("is_correct");
    wtr.write_record(&header)?;

    for article in articles {
        let mut present = vec![false; dictionary.vocab_size()];
        for (_, vector) in article.vectors.iter() {
            for &idx in vector.indices() {
                if let Some(slot) = present.get_mut(idx as usize) {
                    *slot = true;
                }
            }
        }
        let mut row = Vec::with_capacity(present.len() + 2);
        row.push(article.id.to_string());
        row.extend(present.iter().map(|p| (if *p { "1" } else { "0" }).to_string()));
        row.push(u8::from(gold.contains(&article.id)).to_string());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::FeatureValue;
    use crate::vectorizer::{term::TermFrequency, TermVector, VectorField};
    use indexmap::IndexMap;

    #[test]
    fn feature_csv_layout() {
        let mut values = IndexMap::new();
        values.insert("email_match".to_string(), FeatureValue::bool(true));
        values.insert("scopus_affiliation".to_string(), FeatureValue::Absent);
        let features = vec![Feature::new(7, true, values)];

        let mut out = Vec::new();
        write_features(&mut out, &features).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "pmid,email_match,scopus_affiliation,gold_standard\n7,1,,1\n");
    }

    #[test]
    fn analysis_csv_has_one_row() {
        let analysis = Analysis::analyze(&[1, 3], &[1, 2], &[1, 2, 3]);
        let mut out = Vec::new();
        write_analysis(&mut out, "jdoe", &analysis).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("identity_key,precision,recall,accuracy"));
        assert!(lines[1].starts_with("jdoe,0.5,0.5,0.5,1,1,1,0,3,2"));
    }

    #[test]
    fn term_matrix_marks_presence() {
        let dictionary =
            TermDictionary::build([&TermFrequency::from(&["cell", "tumor"][..])]);
        let mut article = Article::new(4);
        *article.vectors.get_mut(VectorField::Title) = TermVector::from_pairs([(1, 1.0)]);

        let mut out = Vec::new();
        write_term_matrix(&mut out, &[article], &dictionary, &[4]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "pmid,cell,tumor,is_correct\n4,0,1,1\n");
    }
}
