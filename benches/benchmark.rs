use criterion::{criterion_group, criterion_main, Criterion};
use job_recommender::{DefaultTFIDFEngine, JobCorpus, JobPosting, Snapshot, TFIDFVectorizer};

const SKILLS: [&str; 12] = [
    "rust", "python", "data", "design", "marketing", "sales", "writing", "finance", "support",
    "cloud", "mobile", "security",
];
const ROLES: [&str; 6] = ["engineer", "analyst", "manager", "consultant", "specialist", "developer"];

fn synthetic_postings(n: usize) -> Vec<JobPosting> {
    (0..n)
        .map(|i| {
            let a = SKILLS[i % SKILLS.len()];
            let b = SKILLS[(i * 7 + 3) % SKILLS.len()];
            let role = ROLES[i % ROLES.len()];
            JobPosting {
                id: i,
                description: format!("{a} {role} with {b} experience, project {i} for client{}", i % 97),
                title: format!("{a} {role}"),
                category: a.to_string(),
                country: "Remote".to_string(),
                hourly_rate: Some(20.0 + (i % 50) as f64),
                link: format!("https://jobs.example/{i}"),
                published_date: None,
            }
        })
        .collect()
}

fn fit_and_recommend_benchmark(c: &mut Criterion) {
    let corpus = JobCorpus::from_postings(synthetic_postings(5_000));
    let descriptions = corpus.descriptions();

    c.bench_function("fit", |b| {
        b.iter(|| {
            let mut vectorizer = TFIDFVectorizer::<DefaultTFIDFEngine>::new(5000).unwrap();
            vectorizer.fit(&descriptions).unwrap()
        });
    });

    let mut vectorizer = TFIDFVectorizer::<DefaultTFIDFEngine>::new(5000).unwrap();
    let vectors = vectorizer.fit(&descriptions).unwrap();
    let snapshot = Snapshot::from_fit(vectorizer, corpus, vectors).unwrap();

    c.bench_function("recommend", |b| {
        b.iter(|| snapshot.recommend("senior rust engineer with cloud experience", 5).unwrap());
    });
}

criterion_group!(benches, fit_and_recommend_benchmark);
criterion_main!(benches);
