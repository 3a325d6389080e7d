use breedlab_core::pedigree::{check_inbreeding, PedigreeGraph};
use breedlab_core::{
    compute_offspring_outcomes, score_goal, BreedingLogEntry, BreedingPair, Creature, GeneCatalog,
    GoalMode, HybridTable, OffspringPrediction, ResearchGoal,
};
use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

const CATALOG: &str = r#"{
  "species": [{
    "name": "Mothkin",
    "categories": [
      {"name": "Gender", "kind": "gender", "genes": [
        {"genotype": "XX", "phenotype": "Female", "gender": "female"},
        {"genotype": "XY", "phenotype": "Male", "gender": "male"}
      ]},
      {"name": "Body Color", "genes": [
        {"genotype": "AA", "phenotype": "Red", "dominance": 3},
        {"genotype": "Aa", "phenotype": "Red", "dominance": 2},
        {"genotype": "aa", "phenotype": "Cream", "dominance": 1}
      ]},
      {"name": "Eye Color", "genes": [
        {"genotype": "EE", "phenotype": "Gold", "dominance": 6},
        {"genotype": "Ee", "phenotype": "Gold", "dominance": 5},
        {"genotype": "Er", "phenotype": "Gold", "dominance": 4},
        {"genotype": "ee", "phenotype": "Green", "dominance": 3},
        {"genotype": "er", "phenotype": "Green", "dominance": 2},
        {"genotype": "rr", "phenotype": "Ruby", "dominance": 1}
      ]}
    ]
  }]
}"#;

fn bench_outcomes(c: &mut Criterion) {
    let catalog = GeneCatalog::from_json(CATALOG).unwrap();
    let hybrids = HybridTable::new();
    let a = Creature::new("a", "Mothkin", "Gender:XX;Body Color:Aa;Eye Color:Er");
    let b = Creature::new("b", "Mothkin", "Gender:XY;Body Color:aa;Eye Color:er");

    c.bench_function("offspring_outcomes_3_categories", |bench| {
        bench.iter(|| compute_offspring_outcomes(&a, &b, &catalog, &hybrids).unwrap())
    });

    let goal = ResearchGoal::new("Mothkin", GoalMode::Phenotype)
        .with_target("Body Color", "Cream")
        .with_target("Eye Color", "Ruby")
        .with_optional("Gender", "Female");
    let OffspringPrediction::Purebred(outcomes) =
        compute_offspring_outcomes(&a, &b, &catalog, &hybrids).unwrap()
    else {
        panic!("same-species pairing");
    };
    c.bench_function("score_goal_phenotype", |bench| {
        bench.iter(|| score_goal(&goal, &outcomes, Default::default()).unwrap())
    });
}

fn bench_inbreeding(c: &mut Criterion) {
    // a single long line with a shared stud at every generation
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut pairs = Vec::new();
    let mut logs = Vec::new();
    for i in 0..10_000 {
        let pair = format!("pair-{i}");
        pairs.push(BreedingPair::new(pair.as_str(), format!("n{}", i + 1), "stud"));
        logs.push(BreedingLogEntry {
            id: format!("log-{i}"),
            pair_id: pair,
            offspring: vec![format!("n{i}"), format!("m{i}")],
            logged_at: start + Duration::minutes(i),
        });
    }
    let graph = PedigreeGraph::build(&pairs, &logs);

    c.bench_function("inbreeding_depth_6", |bench| {
        bench.iter(|| check_inbreeding(&graph, "n0", "m0", 6))
    });
    c.bench_function("inbreeding_depth_64", |bench| {
        bench.iter(|| check_inbreeding(&graph, "n0", "m0", 64))
    });
}

criterion_group!(benches, bench_outcomes, bench_inbreeding);
criterion_main!(benches);
