use criterion::{criterion_group, criterion_main, Criterion};

use author_disambiguation::model::translate::{RawArticle, RawAuthor, RawMeshHeading};
use author_disambiguation::{AuthorName, Engine, EngineConfig, EngineParameters, Identity};

const COAUTHORS: &[&str] = &["Smith", "Chen", "Garcia", "Kumar", "Novak", "Okafor", "Rossi", "Tanaka"];
const TOPICS: &[&str] = &["Lymphoma", "Leukemia", "Myeloma", "Sepsis", "Asthma"];
const JOURNALS: &[&str] = &["Blood", "Cell", "Nature Medicine", "Leukemia"];

/// Synthetic candidates: a handful of coauthor groups with overlapping topics.
fn candidates(n: u64) -> Vec<RawArticle> {
    (1..=n)
        .map(|pmid| {
            let group = (pmid % 7) as usize;
            let author = |first: &str, last: &str| RawAuthor {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                affiliation: Some(format!("Department {} , University {}", group, group % 3)),
                ..RawAuthor::default()
            };
            RawArticle {
                pmid: Some(pmid),
                title: Some(format!("{} outcomes in cohort {}", TOPICS[group % TOPICS.len()], pmid)),
                journal: Some(JOURNALS[group % JOURNALS.len()].to_string()),
                year: Some(1990 + (pmid % 30) as i32),
                mesh_headings: vec![RawMeshHeading {
                    descriptor: Some(TOPICS[(group + 1) % TOPICS.len()].to_string()),
                    major_topic: true,
                }],
                keywords: vec![TOPICS[group % TOPICS.len()].to_lowercase()],
                authors: vec![
                    author("Jane", "Doe"),
                    author("A", COAUTHORS[group % COAUTHORS.len()]),
                    author("B", COAUTHORS[(group + 3) % COAUTHORS.len()]),
                ],
            }
        })
        .collect()
}

fn engine_benchmark(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).expect("default config is valid");
    let mut identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
    identity.keywords = vec!["lymphoma".into()];

    let params = EngineParameters {
        identity,
        articles: candidates(500),
        gold_standard: (1..=500).filter(|p| p % 7 == 0).collect(),
        ..EngineParameters::default()
    };

    c.bench_function("generate_features_500", |b| {
        b.iter(|| engine.generate_features(&params))
    });

    c.bench_function("run_500", |b| {
        b.iter(|| engine.run(&params).expect("run succeeds"))
    });
}

criterion_group!(benches, engine_benchmark);
criterion_main!(benches);
