//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test data files
struct TestDataFiles {
    pub train_file: NamedTempFile,
    pub test_file: NamedTempFile,
    pub three_class_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Two linearly separable classes
        let mut train_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(train_file, "feature1,feature2,label")?;
        writeln!(train_file, "2.0,1.0,pos")?;
        writeln!(train_file, "-2.0,-1.0,neg")?;
        writeln!(train_file, "1.5,0.8,pos")?;
        writeln!(train_file, "-1.5,-0.8,neg")?;
        writeln!(train_file, "1.8,0.9,pos")?;
        writeln!(train_file, "-1.8,-0.9,neg")?;
        train_file.flush()?;

        let mut test_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(test_file, "feature1,feature2,label")?;
        writeln!(test_file, "1.6,0.7,pos")?;
        writeln!(test_file, "-1.6,-0.7,neg")?;
        test_file.flush()?;

        // Three small clusters, classes interleaved
        let mut three_class_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(three_class_file, "x,y,species")?;
        for (dx, dy) in [(0.0, 0.0), (0.3, 0.1), (-0.2, 0.3), (0.1, -0.3)] {
            writeln!(three_class_file, "{},{},setosa", dx, dy)?;
            writeln!(three_class_file, "{},{},versicolor", 4.0 + dx, dy)?;
            writeln!(three_class_file, "{},{},virginica", 2.0 + dx, 4.0 + dy)?;
        }
        three_class_file.flush()?;

        Ok(TestDataFiles {
            train_file,
            test_file,
            three_class_file,
        })
    }
}

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_svmtune")
}

fn run(args: &[&str]) -> Output {
    Command::new(get_cli_binary_path())
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn train_model(data: &Path, model: &Path, extra: &[&str]) {
    let mut args = vec!["train", "--data", path_str(data), "--output", path_str(model)];
    args.extend_from_slice(extra);
    let output = run(&args);
    assert!(
        output.status.success(),
        "Train command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model.exists(), "Model file was not created");
}

#[test]
fn test_cli_train_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(
        test_data.train_file.path(),
        &model_path,
        &["-C", "1.0", "--epsilon", "0.001", "--max-iterations", "100"],
    );

    let json = std::fs::read_to_string(&model_path).unwrap();
    assert!(json.contains("\"library_version\""));
    assert!(json.contains("\"created_at\""));
    assert!(json.contains("\"type\": \"linear\""));
}

#[test]
fn test_cli_train_kernels() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for (kernel, extra) in [
        ("rbf", vec!["--gamma", "0.5"]),
        ("radial", vec![]),
        ("polynomial", vec!["--degree", "2", "--coef0", "1.0"]),
        ("sigmoid", vec!["--gamma", "0.1", "--coef0", "0.0"]),
    ] {
        let model_path = temp_dir.path().join(format!("{kernel}.json"));
        let mut args = vec!["--kernel", kernel];
        args.extend(extra);
        train_model(test_data.three_class_file.path(), &model_path, &args);
    }
}

#[test]
fn test_cli_info_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.three_class_file.path(), &model_path, &[]);

    let info_output = run(&["info", path_str(&model_path)]);
    assert!(
        info_output.status.success(),
        "Info command failed: {}",
        String::from_utf8_lossy(&info_output.stderr)
    );

    let stdout = String::from_utf8_lossy(&info_output.stdout);
    assert!(stdout.contains("SVM Model Summary"));
    assert!(stdout.contains("Classes: setosa, versicolor, virginica"));
    assert!(stdout.contains("Pairwise Models: 3"));
    assert!(stdout.contains("setosa vs versicolor"));
    assert!(stdout.contains("versicolor vs virginica"));
}

#[test]
fn test_cli_predict_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.train_file.path(), &model_path, &[]);

    let predict_output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
    ]);
    assert!(
        predict_output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&predict_output.stderr)
    );

    let stdout = String::from_utf8_lossy(&predict_output.stdout);
    assert!(stdout.contains("Predictions for 2 samples"));
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(lines, vec!["0 pos", "1 neg"]);
}

#[test]
fn test_cli_predict_with_decision_values() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.three_class_file.path(), &model_path, &[]);

    let predict_output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.three_class_file.path()),
        "--decision-values",
    ]);
    assert!(predict_output.status.success());

    let stdout = String::from_utf8_lossy(&predict_output.stdout);
    for line in stdout.lines().filter(|l| !l.starts_with('#')) {
        // index, label, three pairwise values
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 5, "unexpected line: {line}");
        for value in &fields[2..] {
            assert!(value.parse::<f64>().is_ok());
        }
    }
}

#[test]
fn test_cli_predict_to_file() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    let predictions_path = temp_dir.path().join("predictions.txt");

    train_model(test_data.train_file.path(), &model_path, &[]);

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
        "--output",
        path_str(&predictions_path),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());

    let content = std::fs::read_to_string(&predictions_path).unwrap();
    assert!(content.contains("0 pos"));
    assert!(content.contains("1 neg"));
}

#[test]
fn test_cli_evaluate_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.train_file.path(), &model_path, &[]);

    let eval_output = run(&[
        "evaluate",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
    ]);
    assert!(
        eval_output.status.success(),
        "Evaluate command failed: {}",
        String::from_utf8_lossy(&eval_output.stderr)
    );

    let stdout = String::from_utf8_lossy(&eval_output.stdout);
    assert!(stdout.contains("Model Evaluation"));
    assert!(stdout.contains("Confusion Matrix"));
    assert!(stdout.contains("predicted \\ actual"));
    assert!(stdout.contains("Accuracy: 100.00%"));
}

#[test]
fn test_cli_tune_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("best.json");

    let output = run(&[
        "tune",
        "--data",
        path_str(test_data.three_class_file.path()),
        "--kernel",
        "rbf",
        "--costs",
        "0.1,1,10",
        "--gammas",
        "0.5,1",
        "--folds",
        "4",
        "--stratified",
        "--seed",
        "3",
        "--output",
        path_str(&model_path),
    ]);
    assert!(
        output.status.success(),
        "Tune command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Grid Search Results"));
    assert!(stdout.contains("Best: rbf(gamma="));
    assert_eq!(stdout.matches("rbf(gamma=").count(), 7);
    assert!(model_path.exists());

    let info_output = run(&["info", path_str(&model_path)]);
    assert!(info_output.status.success());
}

#[test]
fn test_cli_tune_empty_grid() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    // No coef0 values for a sigmoid search
    let output = run(&[
        "tune",
        "--data",
        path_str(test_data.train_file.path()),
        "--kernel",
        "sigmoid",
        "--costs",
        "1",
        "--gammas",
        "0.1",
        "--coef0s",
        "",
        "--folds",
        "2",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_tune_too_many_folds() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "tune",
        "--data",
        path_str(test_data.train_file.path()),
        "--costs",
        "1",
        "--folds",
        "7",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Insufficient samples"));
}

#[test]
fn test_cli_error_handling_invalid_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "train",
        "--data",
        "/nonexistent/file.csv",
        "--output",
        path_str(&model_path),
    ]);

    assert!(!output.status.success(), "Should fail with nonexistent file");
    assert!(!model_path.exists());
}

#[test]
fn test_cli_train_single_class() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(data, "1.0,2.0,only").unwrap();
    writeln!(data, "2.0,1.0,only").unwrap();
    data.flush().unwrap();

    let output = run(&[
        "train",
        "--data",
        path_str(data.path()),
        "--output",
        path_str(&model_path),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Insufficient classes"));
}

#[test]
fn test_cli_invalid_kernel_parameters() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "train",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
        "--kernel",
        "rbf",
        "--gamma=-1",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid parameter"));

    let output = run(&[
        "train",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
        "--kernel",
        "laplacian",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_predict_dimension_mismatch() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.train_file.path(), &model_path, &[]);

    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(data, "1.0,2.0,3.0,pos").unwrap();
    data.flush().unwrap();

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(data.path()),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Dimension mismatch"));
}

#[test]
fn test_cli_verbose_and_debug_flags() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "--verbose",
        "train",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Training completed"));

    let output = run(&[
        "--debug",
        "train",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("SMO converged"));
}

#[test]
fn test_cli_help_output() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["train", "predict", "evaluate", "info", "tune"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_cli_version_output() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
