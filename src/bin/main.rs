//! svmtune Command Line Interface
//!
//! A command-line interface for training, tuning, evaluating, and using SVM
//! models on labelled CSV data.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use svmtune::api::{ModelInfo, SVM};
use svmtune::core::{Classifier, Result, WorkingSetStrategy};
use svmtune::kernel::KernelSpec;
use svmtune::load_csv;
use svmtune::persistence::SerializableModel;
use svmtune::tuning::{FoldStrategy, GridSearch, KernelFamily, ParamGrid};

#[derive(Parser)]
#[command(name = "svmtune")]
#[command(about = "Soft-margin SVM training, grid-search tuning and evaluation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "svmtune contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new SVM model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Grid-search the cost and kernel parameters by cross-validation
    Tune(TuneArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CliKernel {
    Linear,
    #[value(alias = "poly")]
    Polynomial,
    #[value(alias = "radial")]
    Rbf,
    Sigmoid,
}

impl From<CliKernel> for KernelFamily {
    fn from(kernel: CliKernel) -> Self {
        match kernel {
            CliKernel::Linear => KernelFamily::Linear,
            CliKernel::Polynomial => KernelFamily::Polynomial,
            CliKernel::Rbf => KernelFamily::Rbf,
            CliKernel::Sigmoid => KernelFamily::Sigmoid,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum CliWorkingSetStrategy {
    /// Maximal violating pair (first order)
    #[value(name = "max-violating-pair")]
    MaxViolatingPair,
    /// Second-order partner selection (default)
    #[value(name = "second-order")]
    SecondOrder,
}

impl From<CliWorkingSetStrategy> for WorkingSetStrategy {
    fn from(cli_strategy: CliWorkingSetStrategy) -> Self {
        match cli_strategy {
            CliWorkingSetStrategy::MaxViolatingPair => WorkingSetStrategy::MaxViolatingPair,
            CliWorkingSetStrategy::SecondOrder => WorkingSetStrategy::SecondOrder,
        }
    }
}

/// Solver settings shared by `train` and `tune`
#[derive(Args, Clone)]
struct SolverArgs {
    /// Convergence tolerance on the KKT violation
    #[arg(short, long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum SMO iterations per pairwise model
    #[arg(short, long, default_value = "100000")]
    max_iterations: usize,

    /// Kernel cache size in MB
    #[arg(long, default_value = "100")]
    cache_size: usize,

    /// Working set selection strategy
    #[arg(long, default_value = "second-order")]
    working_set_strategy: CliWorkingSetStrategy,
}

impl SolverArgs {
    fn builder(&self) -> SVM {
        SVM::new()
            .with_epsilon(self.epsilon)
            .with_max_iterations(self.max_iterations)
            .with_cache_size(self.cache_size * 1024 * 1024) // Convert MB to bytes
            .with_working_set_strategy(self.working_set_strategy.clone().into())
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (CSV, label in the last column)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel type
    #[arg(short, long, value_enum, default_value = "linear")]
    kernel: CliKernel,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Kernel gamma (polynomial, rbf, sigmoid); defaults to 1 / n_features
    #[arg(short, long)]
    gamma: Option<f64>,

    /// Polynomial degree
    #[arg(long, default_value = "3")]
    degree: u32,

    /// Independent term for polynomial and sigmoid kernels
    #[arg(long, default_value = "0.0")]
    coef0: f64,

    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the pairwise decision values
    #[arg(long)]
    decision_values: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct TuneArgs {
    /// Data file
    #[arg(long)]
    data: PathBuf,

    /// Kernel family to search
    #[arg(short, long, value_enum, default_value = "linear")]
    kernel: CliKernel,

    /// Candidate costs
    #[arg(long, value_delimiter = ',', required = true)]
    costs: Vec<f64>,

    /// Candidate gammas
    #[arg(long, value_delimiter = ',')]
    gammas: Vec<f64>,

    /// Candidate polynomial degrees
    #[arg(long, value_delimiter = ',', default_value = "3")]
    degrees: Vec<u32>,

    /// Candidate coef0 values
    #[arg(long, value_delimiter = ',', default_value = "0.0")]
    coef0s: Vec<f64>,

    /// Number of cross-validation folds
    #[arg(long, default_value = "10")]
    folds: usize,

    /// Seed for shuffling samples into folds; contiguous folds without it
    #[arg(long)]
    seed: Option<u64>,

    /// Keep class proportions equal across folds (uses --seed, default 0)
    #[arg(long)]
    stratified: bool,

    /// Save the refit best model here
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    solver: SolverArgs,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Tune(args) => tune_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

/// Kernel for `train`, with gamma defaulting to 1 / n_features
fn kernel_spec(args: &TrainArgs, n_features: usize) -> KernelSpec {
    let gamma = args.gamma.unwrap_or(1.0 / n_features.max(1) as f64);
    match args.kernel {
        CliKernel::Linear => KernelSpec::Linear,
        CliKernel::Polynomial => KernelSpec::Polynomial {
            degree: args.degree,
            gamma,
            coef0: args.coef0,
        },
        CliKernel::Rbf => KernelSpec::Rbf { gamma },
        CliKernel::Sigmoid => KernelSpec::Sigmoid {
            gamma,
            coef0: args.coef0,
        },
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training SVM model...");
    info!("Data file: {:?}", args.data);

    let dataset = load_csv(&args.data)?;
    info!(
        "Loaded {} samples with {} dimensions, {} classes",
        dataset.len(),
        dataset.dim(),
        dataset.classes().len()
    );

    let kernel = kernel_spec(&args, dataset.dim());
    info!(
        "Parameters: kernel={}, C={}, epsilon={}, max_iter={}",
        kernel, args.c, args.solver.epsilon, args.solver.max_iterations
    );

    let svm = args.solver.builder().with_kernel(kernel).with_cost(args.c);
    let model = svm.train(&dataset)?;

    info!("Training completed successfully");
    info!("Support vectors: {}", model.n_support_vectors());

    // Quick evaluation on training data
    let accuracy = 1.0 - model.error_rate(dataset.samples());
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    let serializable = SerializableModel::from_trained_model(model, svm.config());
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::<String>::load_from_file(&args.model)?;
    let model = &serializable_model.model;

    info!("Loading prediction data from: {:?}", args.data);
    let dataset = load_csv(&args.data)?;

    info!(
        "Making predictions using model with {} support vectors",
        serializable_model.metadata.n_support_vectors
    );

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    writeln!(writer, "# Predictions for {} samples", dataset.len())?;
    writeln!(
        writer,
        "# Format: sample_index predicted_label{}",
        if args.decision_values {
            " decision_values..."
        } else {
            ""
        }
    )?;

    for (i, sample) in dataset.samples().iter().enumerate() {
        let label = model.try_predict(&sample.features)?;
        if args.decision_values {
            let values: Vec<String> = model
                .decision_values(&sample.features)
                .iter()
                .map(|v| format!("{v:.6}"))
                .collect();
            writeln!(writer, "{i} {label} {}", values.join(" "))?;
        } else {
            writeln!(writer, "{i} {label}")?;
        }
    }
    writer.flush()?;

    if let Some(path) = args.output {
        info!("Predictions saved to: {path:?}");
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::<String>::load_from_file(&args.model)?;
    let model = &serializable_model.model;

    info!("Loading test data from: {:?}", args.data);
    let dataset = load_csv(&args.data)?;
    model.check_dimension(dataset.samples()[0].features.as_slice())?;

    let confusion = SVM::evaluate(model, dataset.samples());

    println!("=== Model Evaluation ===");
    serializable_model.print_summary();

    println!("\nConfusion Matrix:");
    print!("{confusion}");

    println!("\nTest Results:");
    println!("  Samples:  {}", confusion.total());
    println!("  Correct:  {}", confusion.correct());
    println!("  Accuracy: {:.2}%", confusion.accuracy() * 100.0);

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::<String>::load_from_file(&args.model)?;
    let model = &serializable_model.model;

    serializable_model.print_summary();

    let info = ModelInfo::of(model);
    if !info.converged {
        warn!("Some pairwise models stopped at the iteration limit");
    }

    println!("\nPairwise Models:");
    for pair in model.pairs() {
        let classes = model.classes();
        let m = &pair.model;
        println!(
            "  {} vs {}: {} support vectors, bias {:.6}, {} iterations{}",
            classes[pair.first],
            classes[pair.second],
            m.support_vectors().len(),
            m.bias(),
            m.iterations(),
            if m.converged() { "" } else { " (not converged)" }
        );
    }

    Ok(())
}

fn tune_command(args: TuneArgs) -> Result<()> {
    info!("Loading data from: {:?}", args.data);
    let dataset = load_csv(&args.data)?;

    let family = KernelFamily::from(args.kernel);
    let mut gammas = args.gammas.clone();
    if gammas.is_empty() && family != KernelFamily::Linear {
        let gamma = 1.0 / dataset.dim() as f64;
        warn!("No --gammas given, using 1 / n_features = {gamma}");
        gammas.push(gamma);
    }

    let grid = ParamGrid::new(args.costs.clone())
        .with_gammas(gammas)
        .with_degrees(args.degrees.clone())
        .with_coef0s(args.coef0s.clone());

    let strategy = match (args.stratified, args.seed) {
        (true, seed) => FoldStrategy::Stratified {
            seed: seed.unwrap_or(0),
        },
        (false, Some(seed)) => FoldStrategy::Shuffled { seed },
        (false, None) => FoldStrategy::Contiguous,
    };

    let svm = args.solver.builder();
    let search = GridSearch::new()
        .with_folds(args.folds)
        .with_fold_strategy(strategy)
        .with_optimizer(svm.config().clone());
    let result = search.tune(dataset.samples(), family, &grid)?;

    println!("=== Grid Search Results ===");
    println!("Data file: {:?}", args.data);
    println!("Folds: {} ({strategy:?})", args.folds);
    println!("\n{:<48} {:>10} {:>10}", "kernel", "cost", "cv error");
    for point in result.history() {
        println!(
            "{:<48} {:>10} {:>10.4}",
            point.kernel.to_string(),
            point.cost,
            point.mean_error
        );
    }

    println!("\nBest: {}, C = {}", result.best_kernel(), result.best_cost());
    println!("Mean CV error: {:.4}", result.best_error());
    let ties = result.ties();
    if !ties.is_empty() {
        println!("Tied with {} other grid point(s)", ties.len());
    }

    if let Some(output) = args.output {
        let serializable = SerializableModel::from_trained_model(result.into_model(), svm.config());
        serializable.save_to_file(&output)?;
        info!("Best model saved to: {output:?}");
    }

    Ok(())
}
