use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use ferrite_mlp::data::{builtin_blobs, builtin_xor, load_csv, LabelMode};
use ferrite_mlp::{sweep, train_loop, Dataset, HyperparameterConfig, SweepPlan, TrainConfig};

/// Train a two-layer perceptron with hand-derived backpropagation, or sweep
/// its hyperparameters.
#[derive(Parser, Debug)]
#[command(name = "ferrite-mlp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train one model and report its loss trajectory
    Train(TrainArgs),
    /// Train one fresh model per configuration and print a comparison table
    Sweep(SweepArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Builtin {
    Xor,
    Blobs,
}

/// Where the preprocessed features and labels come from.
#[derive(Args, Debug)]
struct DataArgs {
    /// CSV file of numeric features followed by label column(s)
    #[arg(long, conflicts_with = "builtin")]
    data: Option<String>,

    /// Number of classes when the last CSV column is a class index
    #[arg(long, conflicts_with = "label_cols")]
    classes: Option<usize>,

    /// Number of trailing one-hot label columns in the CSV
    #[arg(long)]
    label_cols: Option<usize>,

    /// Use a built-in toy dataset instead of a CSV file
    #[arg(long, value_enum, default_value_t = Builtin::Blobs)]
    builtin: Builtin,

    /// Sample count for the blobs dataset
    #[arg(long, default_value_t = 300)]
    samples: usize,
}

#[derive(Args, Debug)]
struct TrainArgs {
    #[command(flatten)]
    data: DataArgs,

    #[arg(long, default_value_t = 0.1)]
    lr: f64,

    #[arg(long, default_value_t = 64)]
    hidden: usize,

    #[arg(long, default_value_t = 100)]
    epochs: usize,

    #[arg(long, default_value_t = ferrite_mlp::train::DEFAULT_SEED)]
    seed: u64,

    /// Write the trained parameters to this JSON file
    #[arg(long)]
    save_params: Option<String>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    data: DataArgs,

    /// JSON sweep plan; without it the default grid is used
    #[arg(long)]
    plan: Option<String>,

    /// Override the plan's epoch count
    #[arg(long)]
    epochs: Option<usize>,

    /// Override the plan's subset size
    #[arg(long)]
    subset: Option<usize>,

    /// Run sweep entries in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the result table to this JSON file
    #[arg(long)]
    results: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ferrite_mlp=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn load_dataset(args: &DataArgs) -> Result<Dataset> {
    let Some(path) = &args.data else {
        let ds = match args.builtin {
            Builtin::Xor => builtin_xor()?,
            Builtin::Blobs => builtin_blobs(args.samples, 3)?,
        };
        return Ok(ds);
    };
    let mode = match (args.classes, args.label_cols) {
        (Some(n_classes), _) => LabelMode::ClassIndex { n_classes },
        (None, Some(n_label_cols)) => LabelMode::OneHot { n_label_cols },
        (None, None) => anyhow::bail!("--data needs either --classes or --label-cols"),
    };
    load_csv(path, mode).with_context(|| format!("failed to load dataset from '{path}'"))
}

fn run_train(args: TrainArgs) -> Result<()> {
    let ds = load_dataset(&args.data)?;
    let config = TrainConfig::new(args.lr, args.hidden, args.epochs).with_seed(args.seed);
    let report = train_loop(&ds.inputs, &ds.labels, &config)?;

    for (i, loss) in report.loss_history.iter().enumerate() {
        println!("epoch {:>5}: loss = {loss:.6}", i + 1);
    }
    println!("final loss: {:.6}", report.final_loss);
    if !report.is_finite() {
        eprintln!("warning: training diverged; try a smaller learning rate");
    }

    if let Some(path) = &args.save_params {
        report.params.save_json(path)
            .with_context(|| format!("failed to save parameters to '{path}'"))?;
        println!("parameters written to {path}");
    }
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    let ds = load_dataset(&args.data)?;
    let mut plan = match &args.plan {
        Some(path) => SweepPlan::load_json(path)
            .with_context(|| format!("failed to load sweep plan from '{path}'"))?,
        None => SweepPlan::default(),
    };
    if let Some(epochs) = args.epochs {
        plan.epochs = epochs;
    }
    if args.subset.is_some() {
        plan.subset = args.subset;
    }
    plan.parallel |= args.parallel;

    let ds = match plan.subset {
        Some(n) => ds.subset(n),
        None => ds,
    };
    let configs: &[HyperparameterConfig] = &plan.configs;
    let table = sweep(configs, &ds.inputs, &ds.labels, &plan.options())?;

    print!("{table}");
    match table.best() {
        Some(best) => println!(
            "best: learning_rate={} hidden_size={} final_loss={:.6}",
            best.learning_rate, best.hidden_size, best.final_loss
        ),
        None if table.is_empty() => println!("the sweep plan has no configurations"),
        None => println!("every configuration diverged"),
    }

    if let Some(path) = &args.results {
        table.save_json(path)
            .with_context(|| format!("failed to save results to '{path}'"))?;
    }
    Ok(())
}
