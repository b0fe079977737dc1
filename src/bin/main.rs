//! rsvm-infer Command Line Interface
//!
//! Runs trained SVM models (JSON model documents) over LibSVM-format data:
//! predictions, evaluation and model summaries.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use rsvm_infer::core::{Result, SVMError};
use rsvm_infer::evaluation::Metric;
use rsvm_infer::persistence::{JsonModelFile, ModelRepository};
use rsvm_infer::{Dataset, LibSVMDataset, Model};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "rsvm-infer")]
#[command(about = "Inference for trained one-vs-one Support Vector Machine models")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "rsvm contributors")]
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
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on labelled data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file (JSON)
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file (LibSVM format)
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append class probabilities (calibrated classifiers only)
    #[arg(short, long)]
    probability: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliMetric {
    /// Percentage of correct predictions
    #[value(name = "accuracy")]
    Accuracy,
    /// Geometric mean of per-class recall
    #[value(name = "geometric-mean")]
    GeometricMean,
    /// Precision of the class given by --class
    #[value(name = "precision")]
    Precision,
    /// Recall of the class given by --class
    #[value(name = "recall")]
    Recall,
}

impl From<CliMetric> for Metric {
    fn from(cli_metric: CliMetric) -> Self {
        match cli_metric {
            CliMetric::Accuracy => Metric::Accuracy,
            CliMetric::GeometricMean => Metric::GeometricMean,
            CliMetric::Precision => Metric::Precision,
            CliMetric::Recall => Metric::Recall,
        }
    }
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file (JSON)
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file (LibSVM format)
    #[arg(long)]
    data: PathBuf,

    /// Performance measure
    #[arg(long, default_value = "accuracy")]
    metric: CliMetric,

    /// Class label scored by precision and recall
    #[arg(long, allow_negative_numbers = true)]
    class: Option<f64>,

    /// Print the prediction for every instance
    #[arg(long)]
    print_results: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
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
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_inputs(model: &Path, data: &Path) -> Result<(Model, LibSVMDataset)> {
    let model = JsonModelFile::new(model).load_model()?;
    info!("Loading data from: {data:?}");
    let dataset = LibSVMDataset::from_file(data)?;
    info!(
        "Loaded {} samples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );
    Ok((model, dataset))
}

fn predict_command(args: PredictArgs) -> Result<()> {
    let (model, dataset) = load_inputs(&args.model, &args.data)?;

    if args.probability && !model.has_probability_model() {
        return Err(SVMError::ProbabilityUnavailable);
    }

    info!(
        "Making predictions using model with {} support vectors",
        model.total_support_vectors()
    );

    match args.output {
        Some(output_path) => {
            let file = File::create(&output_path)?;
            let mut writer = BufWriter::new(file);
            write_predictions(&model, &dataset, args.probability, &mut writer)?;
            writer.flush()?;
            info!("Predictions saved to: {output_path:?}");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_predictions(&model, &dataset, args.probability, &mut writer)?;
        }
    }

    Ok(())
}

fn write_predictions<W: Write>(
    model: &Model,
    dataset: &LibSVMDataset,
    probability: bool,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "# Predictions for {} samples", dataset.len())?;
    if probability {
        let labels: Vec<String> = model.class_labels().iter().map(f64::to_string).collect();
        writeln!(
            writer,
            "# Format: sample_index predicted_label p({})",
            labels.join(") p(")
        )?;
    } else {
        writeln!(writer, "# Format: sample_index predicted_label")?;
    }

    for (i, sample) in dataset.samples().iter().enumerate() {
        if probability {
            let (label, probabilities) = model.predict_with_probabilities(&sample.features)?;
            let formatted: Vec<String> = probabilities.iter().map(|p| format!("{p:.6}")).collect();
            writeln!(writer, "{i} {label} {}", formatted.join(" "))?;
        } else {
            writeln!(writer, "{i} {}", model.predict(&sample.features)?)?;
        }
    }
    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let (model, dataset) = load_inputs(&args.model, &args.data)?;
    let metric = Metric::from(args.metric);
    let mut evaluator = metric.evaluator(args.class)?;

    info!(
        "Evaluating model with {} support vectors",
        model.total_support_vectors()
    );

    if args.print_results {
        model.evaluate_dataset_with(&dataset, evaluator.as_mut(), |i, predicted, actual| {
            println!("Instance {i}, Prediction: {predicted}, True label: {actual}");
        })?;
    } else {
        model.evaluate_dataset(&dataset, evaluator.as_mut())?;
    }

    println!("=== Model Evaluation ===");
    println!("{}", model.info());
    println!("\nTest Results:");
    println!("  Samples: {}", dataset.len());
    println!("  {}: {:.4}", evaluator.name(), evaluator.value());

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    let model = JsonModelFile::new(&args.model).load_model()?;

    println!("=== SVM Model Summary ===");
    println!("{}", model.info());

    if model.svm_type().is_regression() {
        if let Ok(scale) = model.svr_probability() {
            println!("Laplace scale: {scale:.6}");
        }
    }

    println!("\nRho values:");
    let rho = model.rho();
    let n_show = rho.len().min(10);
    for (p, value) in rho.iter().enumerate().take(n_show) {
        println!("  rho{p}: {value:.6}");
    }
    if rho.len() > n_show {
        println!("  ... ({} more)", rho.len() - n_show);
    }

    match model.hyperplane_norms() {
        Ok(norms) => {
            println!("\n|w|^2 per decision function:");
            for (p, norm) in norms.iter().enumerate().take(n_show) {
                println!("  w{p}: {norm:.6}");
            }
        }
        Err(e) => info!("Skipping hyperplane norms: {e}"),
    }

    Ok(())
}
