use std::fs;

use tempfile::TempDir;

use job_recommender::{
    experiment::ExperimentRecorder, training, AppConfig, Error, Recommender, Snapshot, TFIDFVectorizer,
};

const POSTINGS: &str = "\
job_description,Cleaned Job Title,Category,country,average_hourly_rate,link,published_date
Enter customer data into spreadsheets as a data entry clerk,Data Entry Clerk,Admin Support,India,8,https://jobs/1,2024-01-05
Senior data scientist building machine learning models,Senior Data Scientist,Data Science,United States,75,https://jobs/2,2024-01-20
,Posting Without Description,Admin Support,India,5,https://jobs/3,2024-02-01
Design logos and brand identity for startups,Logo Designer,Design,Germany,35,https://jobs/4,2024-02-11
Machine learning engineer deploying models to production,ML Engineer,Data Science,Canada,70,https://jobs/5,2024-03-02
Write blog posts about personal finance,Content Writer,Writing,United Kingdom,,https://jobs/6,2024-03-15
";

fn setup() -> (TempDir, AppConfig) {
    let tmp = TempDir::new().unwrap();
    let data_path = tmp.path().join("jobs.csv");
    fs::write(&data_path, POSTINGS).unwrap();
    let config = AppConfig {
        data_path,
        model_path: tmp.path().join("models/tfidf.cbor"),
        experiment_log: Some(tmp.path().join("experiments.jsonl")),
        max_features: 5000,
        top_k: 5,
        smoke_query: Some("data scientist".to_string()),
        ..AppConfig::default()
    };
    (tmp, config)
}

#[test]
fn train_then_serve_from_artifact() {
    let (_tmp, config) = setup();
    let report = training::train(&config).expect("train");

    assert_eq!(report.corpus_size, 5, "blank description row is dropped");
    assert!(config.model_path.exists());
    assert!(report.experiment_recorded);
    assert_eq!(report.smoke_results[0].title, "Senior Data Scientist");

    let recommender = Recommender::open(&config).expect("open");
    let recs = recommender.recommend("data scientist").unwrap();
    assert!(!recs.is_empty() && recs.len() <= 5);
    assert_eq!(recs[0].id, 1, "ids are source rows");
    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));

    // serving reproduces what training saw
    assert_eq!(recs, report.smoke_results);
}

#[test]
fn recommend_is_deterministic_and_validates_input() {
    let (_tmp, config) = setup();
    training::train(&config).unwrap();
    let recommender = Recommender::open(&config).unwrap();

    let first = recommender.recommend("machine learning models").unwrap();
    let second = recommender.recommend("machine learning models").unwrap();
    assert_eq!(first, second);
    // the shorter posting puts more of its weight on the shared terms
    assert_eq!(first[0].title, "ML Engineer");
    assert_eq!(first[1].title, "Senior Data Scientist");

    assert!(matches!(recommender.recommend("   "), Err(Error::InvalidQuery(_))));
    assert!(recommender.recommend("underwater basket weaving").unwrap().is_empty());
}

#[test]
fn experiment_log_records_corpus_size() {
    let (_tmp, config) = setup();
    training::train(&config).unwrap();
    let runs = ExperimentRecorder::new(config.experiment_log.clone().unwrap()).runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].corpus_size, 5);
    assert_eq!(runs[0].model_artifact, config.model_path);
}

#[test]
fn broken_experiment_log_does_not_fail_training() {
    let (tmp, mut config) = setup();
    // a directory cannot be appended to
    config.experiment_log = Some(tmp.path().to_path_buf());
    let report = training::train(&config).unwrap();
    assert!(!report.experiment_recorded);
    assert!(config.model_path.exists());
}

#[test]
fn missing_or_corrupt_model_is_model_load_error() {
    let (tmp, config) = setup();
    let err = Recommender::open(&config).err().unwrap();
    assert!(matches!(err, Error::ModelLoad { .. }));

    fs::create_dir_all(config.model_path.parent().unwrap()).unwrap();
    fs::write(&config.model_path, b"\x00\x01garbage").unwrap();
    let err = Snapshot::open(&config.model_path, &config.data_path).err().unwrap();
    assert!(matches!(err, Error::ModelLoad { .. }));

    let err = TFIDFVectorizer::<job_recommender::DefaultTFIDFEngine>::load(&tmp.path().join("nope.cbor"))
        .err()
        .unwrap();
    assert!(matches!(err, Error::ModelLoad { .. }));
}

#[test]
fn saved_model_transforms_identically() {
    let (_tmp, config) = setup();
    let corpus = job_recommender::JobCorpus::load_csv(&config.data_path).unwrap();
    let mut vectorizer = TFIDFVectorizer::<job_recommender::DefaultTFIDFEngine>::new(5000).unwrap();
    let fitted_vectors = vectorizer.fit(&corpus.descriptions()).unwrap();
    vectorizer.save(&config.model_path).unwrap();

    let loaded = TFIDFVectorizer::<job_recommender::DefaultTFIDFEngine>::load(&config.model_path).unwrap();
    assert_eq!(loaded.transform_batch(&corpus.descriptions()).unwrap(), fitted_vectors);
    assert_eq!(
        loaded.transform("finance blog writer").unwrap(),
        vectorizer.transform("finance blog writer").unwrap()
    );
    let model_dir = config.model_path.parent().unwrap();
    let staged: Vec<_> = fs::read_dir(model_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert!(staged.is_empty(), "{staged:?}");
}
