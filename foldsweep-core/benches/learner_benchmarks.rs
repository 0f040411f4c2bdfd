use criterion::{Criterion, black_box, criterion_group, criterion_main};
use foldsweep_core::data::{Attribute, FeatureDataset, LabelNode, LabelsMetaData};
use foldsweep_core::eval::{Evaluator, registry};
use foldsweep_core::learners::{ClassifierFactory, ClassifierKind, LearnerFactory};
use foldsweep_core::MultiLabelDataset;

fn dataset(instances: usize) -> MultiLabelDataset {
    let mut attributes: Vec<Attribute> = (0..16).map(|i| Attribute::numeric(format!("f{i}"))).collect();
    for name in ["animal", "cat", "dog", "plant"] {
        attributes.push(Attribute::binary(name));
    }
    let mut data = FeatureDataset::new("bench", attributes);
    for i in 0..instances {
        let group = i % 3;
        let mut row: Vec<f64> = (0..16)
            .map(|f| group as f64 * 5.0 + ((i * 31 + f * 17) % 13) as f64 * 0.1)
            .collect();
        let labels = match group {
            0 => [1.0, 1.0, 0.0, 0.0],
            1 => [1.0, 0.0, 1.0, 0.0],
            _ => [0.0, 0.0, 0.0, 1.0],
        };
        row.extend(labels);
        data.push(row);
    }
    let structure = LabelsMetaData::new(vec![
        LabelNode::with_children("animal", vec![LabelNode::leaf("cat"), LabelNode::leaf("dog")]),
        LabelNode::leaf("plant"),
    ]);
    MultiLabelDataset::new("bench", data, structure).expect("valid bench dataset")
}

fn bench_fit(c: &mut Criterion) {
    let train = dataset(300);
    for kind in ClassifierKind::ALL {
        let learner = ClassifierFactory.create(kind);
        c.bench_function(&format!("fit_{}", kind.option_key()), |b| {
            b.iter(|| learner.fit(black_box(&train)).expect("fit"))
        });
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let train = dataset(300);
    let test = dataset(100);
    for kind in [ClassifierKind::MlKnn, ClassifierKind::HmcThreshold] {
        let model = ClassifierFactory.create(kind).fit(&train).expect("fit");
        c.bench_function(&format!("evaluate_{}", kind.option_key()), |b| {
            b.iter(|| {
                let mut measures = registry::build(test.num_labels());
                Evaluator
                    .evaluate(model.as_ref(), black_box(&test), &mut measures)
                    .expect("evaluate")
            })
        });
    }
}

criterion_group!(benches, bench_fit, bench_evaluate);
criterion_main!(benches);
