//! End-to-end sweeps over partitions written to a temporary directory.

use foldsweep_core::data::{Attribute, FeatureDataset, LabelNode, LabelsMetaData};
use foldsweep_core::eval::registry::MEASURE_NAMES;
use foldsweep_core::learners::{ClassifierFactory, ClassifierKind, LearnerFactory};
use foldsweep_core::sweep::{Axis, FOLDS, Technique};
use foldsweep_core::{
    DatasetRepository, FileDatasetRepository, FileResultSink, MemoryDiagnostics, ModelError,
    MultiLabelDataset, MultiLabelLearner, PartitionName, SweepConfig, SweepController, SweepError,
    SweepState, TrainedModel,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn hierarchy() -> LabelsMetaData {
    LabelsMetaData::new(vec![
        LabelNode::with_children("animal", vec![LabelNode::leaf("cat"), LabelNode::leaf("dog")]),
        LabelNode::leaf("plant"),
    ])
}

/// Cats near (0, 0), dogs near (5, 5), plants near (10, 10); jitter varies by fold.
fn partition_data(fold: usize) -> FeatureDataset {
    let mut data = FeatureDataset::new(
        format!("fold{fold}"),
        vec![
            Attribute::numeric("x"),
            Attribute::numeric("y"),
            Attribute::binary("animal"),
            Attribute::binary("cat"),
            Attribute::binary("dog"),
            Attribute::binary("plant"),
        ],
    );
    for i in 0..5 {
        let j = (i + fold) as f64 * 0.07;
        data.push(vec![j, 0.3 - j, 1.0, 1.0, 0.0, 0.0]);
        data.push(vec![5.0 + j, 5.0 - j, 1.0, 0.0, 1.0, 0.0]);
        data.push(vec![10.0 - j, 10.0 + j, 0.0, 0.0, 0.0, 1.0]);
    }
    data
}

/// Writes every fold and axis for `technique`, except `skip`.
fn write_partitions(dir: &Path, technique: Technique, skip: &[(usize, Axis)]) {
    let repo = FileDatasetRepository::new(dir);
    for fold in 0..FOLDS {
        for axis in Axis::ALL {
            if skip.contains(&(fold, axis)) {
                continue;
            }
            let name = PartitionName::new(technique, fold, axis);
            repo.store(&name, &partition_data(fold), &hierarchy()).unwrap();
        }
    }
}

fn config(data: &Path, out: &Path, flags: &[&str]) -> SweepConfig {
    let mut config = SweepConfig {
        run_id: Some("run1-".into()),
        dataset_dir: data.to_path_buf(),
        output_dir: out.to_path_buf(),
        ..Default::default()
    };
    for flag in flags {
        assert!(config.set_flag(flag, true), "unknown flag {flag}");
    }
    config
}

fn reports_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

#[test]
fn test_single_technique_single_classifier() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Ehd, &[]);

    let config = config(data.path(), out.path(), &["ehd", "mlknn"]);
    let summary = SweepController::from_config(&config).run().unwrap();
    assert_eq!(summary.state, SweepState::Done);
    assert_eq!(summary.models_trained, FOLDS * Axis::ALL.len());

    let reports = reports_in(out.path());
    assert_eq!(reports.len(), 360);

    let axis_t: Vec<&String> = reports
        .iter()
        .filter(|n| n.starts_with("run1-MLkNN-Ehd-T-"))
        .collect();
    assert_eq!(axis_t.len(), 90);
    for train in 0..FOLDS {
        for test in (0..FOLDS).filter(|&j| j != train) {
            let name = format!("run1-MLkNN-Ehd-T-Treino{train}-Teste{test}.csv");
            assert!(axis_t.contains(&&name), "missing {name}");
        }
        let same = format!("run1-MLkNN-Ehd-T-Treino{train}-Teste{train}.csv");
        assert!(!reports.contains(&same));
    }

    let sample = std::fs::read_to_string(out.path().join("run1-MLkNN-Ehd-T-Treino0-Teste1.csv"))
        .unwrap();
    let lines: Vec<&str> = sample.lines().collect();
    assert_eq!(lines.len(), 16);
    for (line, name) in lines.iter().zip(MEASURE_NAMES) {
        let (label, value) = line.split_once(": ").unwrap();
        assert_eq!(label, name);
        assert!(value == "NaN" || value.parse::<f64>().is_ok(), "{line}");
    }
}

#[test]
fn test_missing_fold_aborts_without_later_output() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Ehd, &[(3, Axis::T)]);

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let config = config(data.path(), out.path(), &["ehd", "mlknn"]);
    let mut controller =
        SweepController::from_config(&config).with_diagnostics(Box::new(Arc::clone(&diagnostics)));
    let err = controller.run().unwrap_err();

    assert!(matches!(err, SweepError::Deserialization { .. }), "{err}");
    assert_eq!(controller.state(), SweepState::Aborted);
    assert_eq!(
        reports_in(out.path()),
        vec![
            "run1-MLkNN-Ehd-T-Treino0-Teste1.csv".to_string(),
            "run1-MLkNN-Ehd-T-Treino0-Teste2.csv".to_string(),
        ]
    );
    let last = diagnostics.messages().pop().unwrap();
    assert!(last.contains("evaluating fold"), "{last}");
    assert!(last.contains("Ehd-Sub3-T"), "{last}");
}

#[test]
fn test_nothing_enabled() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = config(data.path(), &out.path().join("reports"), &[]);
    let mut controller = SweepController::from_config(&config);
    assert!(controller.plan().is_empty());
    let summary = controller.run().unwrap();
    assert_eq!(summary.models_trained, 0);
    assert!(summary.artifacts.is_empty());
    assert_eq!(controller.state(), SweepState::Done);
    assert!(!out.path().join("reports").exists());
}

#[derive(Debug)]
struct CountingLearner {
    inner: Box<dyn MultiLabelLearner>,
    fits: Arc<AtomicUsize>,
}

impl MultiLabelLearner for CountingLearner {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fit(&self, dataset: &MultiLabelDataset) -> Result<Box<dyn TrainedModel>, ModelError> {
        self.fits.fetch_add(1, Ordering::SeqCst);
        self.inner.fit(dataset)
    }
}

struct CountingFactory {
    fits: Arc<AtomicUsize>,
}

impl LearnerFactory for CountingFactory {
    fn create(&self, kind: ClassifierKind) -> Box<dyn MultiLabelLearner> {
        Box::new(CountingLearner {
            inner: ClassifierFactory.create(kind),
            fits: Arc::clone(&self.fits),
        })
    }
}

#[test]
fn test_each_tuple_fits_once() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Gabor, &[]);

    let fits = Arc::new(AtomicUsize::new(0));
    let config = config(data.path(), out.path(), &["gabor", "hmc_t", "lp"]);
    let mut controller = SweepController::from_config(&config).with_factory(Box::new(
        CountingFactory {
            fits: Arc::clone(&fits),
        },
    ));
    let expected_tuples = controller.plan().len();
    let summary = controller.run().unwrap();

    assert_eq!(expected_tuples, 80);
    assert_eq!(fits.load(Ordering::SeqCst), expected_tuples);
    assert_eq!(summary.models_trained, expected_tuples);
    assert_eq!(summary.artifacts.len(), expected_tuples * (FOLDS - 1));
}

#[test]
fn test_label_structure_round_trip() {
    let data = TempDir::new().unwrap();
    let repo = FileDatasetRepository::new(data.path());
    let name = PartitionName::new(Technique::Sift, 2, Axis::A);
    repo.store(&name, &partition_data(2), &hierarchy()).unwrap();

    assert_eq!(repo.load_labels(&name).unwrap(), hierarchy());
    let dataset = repo.load(&name).unwrap();
    assert_eq!(dataset.label_structure(), &hierarchy());
    assert_eq!(dataset.label_names(), ["animal", "cat", "dog", "plant"]);
    assert_eq!(dataset.num_features(), 2);
    assert_eq!(dataset.num_instances(), 15);
}

#[test]
fn test_label_count_mismatch_aborts_with_argument_error() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Lbp, &[(2, Axis::T)]);

    let mut narrow = FeatureDataset::new(
        "narrow",
        vec![
            Attribute::numeric("x"),
            Attribute::numeric("y"),
            Attribute::binary("animal"),
            Attribute::binary("plant"),
        ],
    );
    narrow.push(vec![0.0, 0.0, 1.0, 0.0]);
    narrow.push(vec![10.0, 10.0, 0.0, 1.0]);
    FileDatasetRepository::new(data.path())
        .store(
            &PartitionName::new(Technique::Lbp, 2, Axis::T),
            &narrow,
            &LabelsMetaData::flat(&["animal", "plant"]),
        )
        .unwrap();

    let config = config(data.path(), out.path(), &["lbp", "brknn"]);
    let err = SweepController::from_config(&config).run().unwrap_err();
    assert!(matches!(err, SweepError::EvaluationArgument(_)), "{err}");
    assert_eq!(
        reports_in(out.path()),
        vec!["run1-BRkNN-Lbp-T-Treino0-Teste1.csv".to_string()]
    );
}

#[test]
fn test_missing_training_partition_is_deserialization_error() {
    let data = TempDir::new().unwrap();
    let repo = FileDatasetRepository::new(data.path());
    let err = repo
        .load(&PartitionName::new(Technique::Ehd, 0, Axis::B))
        .unwrap_err();
    match err {
        SweepError::Deserialization { path, .. } => {
            assert_eq!(path, PathBuf::from(data.path()).join("Ehd-Sub0-B.bsi"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_sink_writes_into_nested_output_dir() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Sift, &[]);

    let nested = out.path().join("a").join("b");
    let config = config(data.path(), &nested, &["sift", "chain"]);
    let mut controller = SweepController::new(
        &config,
        Box::new(FileDatasetRepository::new(data.path())),
        Box::new(FileResultSink::new(&nested)),
    );
    let summary = controller.run().unwrap();
    assert_eq!(summary.artifacts.len(), 360);
    assert!(summary.artifacts.iter().all(|p| p.starts_with(&nested)));
}

#[test]
fn test_empty_training_partition_aborts_with_model_build_error() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Ehd, &[(0, Axis::T)]);
    let empty = FeatureDataset::new("empty", partition_data(0).attributes.clone());
    FileDatasetRepository::new(data.path())
        .store(&PartitionName::new(Technique::Ehd, 0, Axis::T), &empty, &hierarchy())
        .unwrap();

    let config = config(data.path(), out.path(), &["ehd", "mlknn"]);
    let mut controller = SweepController::from_config(&config);
    let err = controller.run().unwrap_err();

    match err {
        SweepError::ModelBuild {
            classifier,
            dataset,
            source,
        } => {
            assert_eq!(classifier, "MLkNN");
            assert_eq!(dataset, "Ehd-Sub0-T");
            assert!(matches!(source, ModelError::EmptyDataset), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(controller.state(), SweepState::Aborted);
    assert!(reports_in(out.path()).is_empty());
}

#[test]
fn test_blocked_output_dir_aborts_with_io_error() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Ehd, &[]);
    let blocker = out.path().join("reports");
    std::fs::write(&blocker, "file, not a directory").unwrap();

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let config = config(data.path(), &blocker, &["ehd", "brknn"]);
    let mut controller =
        SweepController::from_config(&config).with_diagnostics(Box::new(Arc::clone(&diagnostics)));
    let err = controller.run().unwrap_err();

    match err {
        SweepError::Io { path, .. } => {
            assert_eq!(path, blocker.join("run1-BRkNN-Ehd-T-Treino0-Teste1.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(controller.state(), SweepState::Aborted);
    assert!(blocker.is_file());
    assert_eq!(reports_in(out.path()), vec!["reports".to_string()]);
    let last = diagnostics.messages().pop().unwrap();
    assert!(last.contains("evaluating fold"), "{last}");
}

#[test]
fn test_inconsistent_labels_abort_with_validation_error() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_partitions(data.path(), Technique::Sift, &[]);
    let name = PartitionName::new(Technique::Sift, 2, Axis::T);
    let with_tree = LabelsMetaData::new(vec![
        LabelNode::with_children("animal", vec![LabelNode::leaf("cat"), LabelNode::leaf("dog")]),
        LabelNode::leaf("plant"),
        LabelNode::leaf("tree"),
    ]);
    FileDatasetRepository::new(data.path())
        .store(&name, &partition_data(2), &with_tree)
        .unwrap();

    let config = config(data.path(), out.path(), &["sift", "lp"]);
    let mut controller = SweepController::from_config(&config);
    let err = controller.run().unwrap_err();

    match err {
        SweepError::DatasetValidation { dataset, reason } => {
            assert_eq!(dataset, "Sift-Sub2-T");
            assert!(reason.contains("tree"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(controller.state(), SweepState::Aborted);
    assert_eq!(
        reports_in(out.path()),
        vec!["run1-LP-Sift-T-Treino0-Teste1.csv".to_string()]
    );
}
