//! Compatibility tests between LibSVM-format query files and stored models
//!
//! Feature indices are never renumbered, so a query file and a model written
//! by the same tool line up exactly.

use rsvm_infer::{
    Dataset, JsonModelReader, KernelConfig, LibSVMDataset, ModelBuilder, ModelRepository,
    SVMError, SparseVector, SvmType,
};
use std::io::Cursor;

#[test]
fn test_libsvm_format_variations() {
    let data = "\
# header comment
1 1:0.5 3:1.2
  -1   2:0.3    5:2.1
2.5 7:1e-3 4:-2E2

3
";
    let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.get_labels(), vec![1.0, -1.0, 2.5, 3.0]);

    let third = dataset.get_sample(2);
    assert_eq!(third.features.indices, vec![4, 7]);
    assert_eq!(third.features.values, vec![-200.0, 0.001]);
    assert!(dataset.get_sample(3).features.is_empty());
}

#[test]
fn test_indices_line_up_with_support_vectors() {
    // Model trained on 1-based feature indices
    let model = ModelBuilder::new(SvmType::CSvc, KernelConfig::linear())
        .class_labels(vec![4.0, 7.0])
        .support_vector_counts(vec![1, 1])
        .support_vectors(vec![
            SparseVector::new(vec![1], vec![1.0]),
            SparseVector::new(vec![2], vec![1.0]),
        ])
        .dual_coefficients(vec![vec![1.0, -1.0]])
        .rho(vec![0.0])
        .build()
        .unwrap();

    let dataset = LibSVMDataset::from_reader(Cursor::new("4 1:1.0\n7 2:1.0\n")).unwrap();
    let predictions = model
        .predict_batch(&dataset.get_batch(&[0, 1]).into_iter().map(|s| s.features).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(predictions, dataset.get_labels());
}

#[test]
fn test_precomputed_kernel_rows() {
    let json = r#"{
        "svm_type": "c_svc",
        "kernel": { "kernel_type": "precomputed" },
        "class_count": 2,
        "support_vectors": [
            { "indices": [0], "values": [2.0] },
            { "indices": [0], "values": [4.0] }
        ],
        "dual_coefficients": [[0.5, -0.5]],
        "rho": [0.0],
        "class_labels": [1, -1],
        "support_vector_counts": [1, 1]
    }"#;
    let model = JsonModelReader::new(json.as_bytes()).load_model().unwrap();

    // label 0:serial then one kernel value per training instance
    let rows = "\
1 0:1 1:0.2 2:0.9 3:0.1 4:0.3
-1 0:2 1:0.1 2:0.2 3:0.7 4:0.8
";
    let dataset = LibSVMDataset::from_reader(Cursor::new(rows)).unwrap();
    for sample in dataset.samples() {
        assert_eq!(model.predict(&sample.features).unwrap(), sample.label);
    }
}

#[test]
fn test_malformed_data_handling() {
    let cases = [
        "1 1:2:3",
        "1 a:1",
        "1 1:1 1:2",
        "one 1:1",
        "1 1:nanx",
        "1 1:inf",
        "1 1:NaN",
    ];
    for case in cases {
        let result = LibSVMDataset::from_reader(Cursor::new(case));
        assert!(
            matches!(result, Err(SVMError::ParseError(_))),
            "{case:?} should fail to parse"
        );
    }
}
