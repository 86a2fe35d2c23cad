//! Walkthrough of SVM classification on the iris dataset
//!
//! 1. A linearly separable pair of species with a linear kernel
//! 2. A pair that is not linearly separable, tuned with a radial kernel
//! 3. All three species, one-vs-one, tuned by cross-validation

use svmtune::api::SVM;
use svmtune::core::{Classifier, Dataset, Sample};
use svmtune::data::{load_csv, train_test_split};
use svmtune::kernel::KernelSpec;
use svmtune::metrics::ConfusionMatrix;
use svmtune::tuning::{FoldStrategy, GridSearch, KernelFamily, ParamGrid};

const IRIS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/iris.csv");
const SEED: u64 = 1;

/// Petal length and width only, for the species in `keep`
fn petals(dataset: &Dataset<String>, keep: &[&str]) -> Result<Dataset<String>, Box<dyn std::error::Error>> {
    let samples = dataset
        .samples()
        .iter()
        .filter(|s| keep.contains(&s.label.as_str()))
        .map(|s| Sample::new(vec![s.features[2], s.features[3]], s.label.clone()))
        .collect();
    Ok(Dataset::new(samples)?)
}

fn report(title: &str, confusion: &ConfusionMatrix<String>) {
    println!("\n{title}");
    print!("{confusion}");
    println!("Accuracy: {:.2}%", confusion.accuracy() * 100.0);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let iris = load_csv(IRIS)?;
    println!("=== Iris SVM Walkthrough ===");
    println!("{} samples, {} features, classes {:?}", iris.len(), iris.dim(), iris.classes());

    // Linearly separable: setosa vs versicolor
    println!("\n--- Linear kernel: setosa vs versicolor ---");
    let pair = petals(&iris, &["setosa", "versicolor"])?;
    let (train, test) = train_test_split(&pair, 0.7, SEED)?;

    let model = SVM::new().with_cost(1.0).train_samples(&train)?;
    let binary = &model.pairs()[0].model;
    println!(
        "Support vectors: {} of {} training samples",
        binary.support_vectors().len(),
        train.len()
    );
    if let Some(w) = binary.linear_weights() {
        println!("Hyperplane: {:.3}*petal_length + {:.3}*petal_width + {:.3} = 0", w[0], w[1], binary.bias());
    }
    report("Test set (rows predicted, columns actual):", &SVM::evaluate(&model, &test));

    // Not linearly separable: versicolor vs virginica
    println!("\n--- Radial kernel: versicolor vs virginica ---");
    let pair = petals(&iris, &["versicolor", "virginica"])?;
    let (train, test) = train_test_split(&pair, 0.7, SEED)?;

    let linear = SVM::new().with_cost(1.0).train_samples(&train)?;
    println!("Linear kernel training error: {:.3}", linear.error_rate(&train));

    let grid = ParamGrid::new(vec![0.1, 1.0, 10.0, 100.0]).with_gammas(vec![0.5, 1.0, 2.0, 3.0, 4.0]);
    let tuned = GridSearch::new()
        .with_folds(10)
        .with_fold_strategy(FoldStrategy::Stratified { seed: SEED })
        .tune(&train, KernelFamily::Rbf, &grid)?;
    println!(
        "Best: {}, cost {} (CV error {:.3}, {} tie(s))",
        tuned.best_kernel(),
        tuned.best_cost(),
        tuned.best_error(),
        tuned.ties().len()
    );
    println!("Support vectors: {}", tuned.model().n_support_vectors());
    report("Test set:", &SVM::evaluate(tuned.model(), &test));

    // Three classes, all four features
    println!("\n--- One-vs-one: all species ---");
    let (train, test) = train_test_split(&iris, 0.7, SEED)?;

    let default_rbf = SVM::with_rbf_auto(iris.dim()).train_samples(&train)?;
    println!(
        "Default radial model: {} pairwise models, {} support vectors",
        default_rbf.n_models(),
        default_rbf.n_support_vectors()
    );

    let grid = ParamGrid::new(vec![0.1, 1.0, 10.0, 100.0]).with_gammas(vec![0.01, 0.1, 0.25, 0.5, 1.0]);
    let tuned = GridSearch::new()
        .with_folds(10)
        .with_fold_strategy(FoldStrategy::Stratified { seed: SEED })
        .tune(&train, KernelFamily::Rbf, &grid)?;
    println!(
        "Best: {}, cost {} (CV error {:.3})",
        tuned.best_kernel(),
        tuned.best_cost(),
        tuned.best_error()
    );
    report("Test set:", &SVM::evaluate(tuned.model(), &test));

    // The same data through a polynomial kernel for comparison
    let poly = SVM::new()
        .with_kernel(KernelSpec::Polynomial {
            degree: 3,
            gamma: 0.25,
            coef0: 1.0,
        })
        .with_cost(1.0)
        .train_samples(&train)?;
    report("Cubic polynomial kernel, test set:", &SVM::evaluate(&poly, &test));

    println!("\n=== Hyperparameters ===");
    println!("cost    penalty on margin violations; larger values fit the training set harder");
    println!("gamma   kernel width for radial, polynomial and sigmoid kernels");
    println!("degree  polynomial kernel degree");
    println!("coef0   independent term of polynomial and sigmoid kernels");

    Ok(())
}
