use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use popdensity_form::{
    DEFAULT_MODEL_PATH, FIELDS, FormInput, FormSession, Predictor, load_model, schema_matches,
};

#[derive(Parser)]
#[command(name = "popdensity")]
#[command(about = "Predict whether a country is densely populated from nine demographic fields")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the trained classifier artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH, global = true)]
    model: PathBuf,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// The nine form fields. Omitted fields take the form defaults; out-of-range
/// values are clamped to the field bounds.
#[derive(Args, Debug, Clone)]
struct FieldArgs {
    /// Population (2020), >= 0
    #[arg(long, allow_negative_numbers = true)]
    population: Option<i64>,

    /// Land area in km², >= 0
    #[arg(long, allow_negative_numbers = true)]
    land_area: Option<i64>,

    /// Net yearly population change
    #[arg(long, allow_negative_numbers = true)]
    net_change: Option<i64>,

    /// Yearly change in percent, [-5, 10]
    #[arg(long, allow_negative_numbers = true)]
    yearly_change: Option<f64>,

    /// Net migrants
    #[arg(long, allow_negative_numbers = true)]
    migrants_net: Option<i64>,

    /// Fertility rate, [0, 8]
    #[arg(long, allow_negative_numbers = true)]
    fert_rate: Option<f64>,

    /// Median age, [10, 60]
    #[arg(long, allow_negative_numbers = true)]
    med_age: Option<f64>,

    /// Urban population in percent, [0, 100]
    #[arg(long, allow_negative_numbers = true)]
    urban_pop: Option<f64>,

    /// Share of world population in percent, [0, 20]
    #[arg(long, allow_negative_numbers = true)]
    world_share: Option<f64>,
}

impl From<FieldArgs> for FormInput {
    fn from(args: FieldArgs) -> Self {
        let d = FormInput::default();
        FormInput {
            population: args.population.unwrap_or(d.population),
            land_area: args.land_area.unwrap_or(d.land_area),
            net_change: args.net_change.unwrap_or(d.net_change),
            yearly_change_pct: args.yearly_change.unwrap_or(d.yearly_change_pct),
            migrants_net: args.migrants_net.unwrap_or(d.migrants_net),
            fert_rate: args.fert_rate.unwrap_or(d.fert_rate),
            med_age: args.med_age.unwrap_or(d.med_age),
            urban_pop_pct: args.urban_pop.unwrap_or(d.urban_pop_pct),
            world_share_pct: args.world_share.unwrap_or(d.world_share_pct),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a single prediction from command-line values
    Predict {
        #[command(flatten)]
        fields: FieldArgs,

        /// Print the prediction as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Fill in the form interactively on stdin/stdout
    Form {
        /// Stop after one prediction instead of offering another
        #[arg(long, default_value_t = false)]
        once: bool,
    },

    /// Print the loaded model's metadata
    Inspect,

    /// Print the form fields with their bounds and defaults
    Fields,
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct InspectOutput {
    model: String,
    n_trees: usize,
    n_features: usize,
    n_classes: usize,
    feature_names: Vec<String>,
    schema_matches: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Predict { fields, json } => {
            let forest = load_model(&cli.model).context("failed to load model")?;
            let predictor = Predictor::new(forest);

            let input = FormInput::from(fields)
                .validate()
                .context("invalid form input")?;
            let prediction = predictor
                .predict(&input)
                .context("an error occurred during prediction")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&prediction.report())?);
            } else {
                print!("{prediction}");
            }
        }

        Command::Form { once } => {
            let forest = load_model(&cli.model).context("failed to load model")?;
            let predictor = Predictor::new(forest);

            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            let summary = FormSession::new(&predictor, stdin, stdout)
                .with_repeat(!once)
                .run()
                .context("form session I/O failed")?;
            info!(
                predictions = summary.predictions,
                failures = summary.failures,
                "form session ended"
            );
        }

        Command::Inspect => {
            let forest = load_model(&cli.model).context("failed to load model")?;
            let output = InspectOutput {
                model: cli.model.display().to_string(),
                n_trees: forest.n_trees(),
                n_features: forest.n_features(),
                n_classes: forest.n_classes(),
                feature_names: forest.feature_names().to_vec(),
                schema_matches: schema_matches(forest.feature_names()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Fields => {
            println!("{}", serde_json::to_string_pretty(&FIELDS)?);
        }
    }

    Ok(())
}
