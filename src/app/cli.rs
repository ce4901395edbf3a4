use super::config::Config;
use crate::parser::ValidationMode;
use crate::pipeline::{DEFAULT_THRESHOLD, LabelFilter};
use crate::scoring::Mission;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Classify exoplanet transit candidates", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check an upload against the column contract without contacting the service
    Validate(ValidateArgs),
    /// Score an upload, print the summary and one page of results
    Classify(ClassifyArgs),
    /// Submit a labelled upload for remote training
    Train(TrainArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// CSV file to check
    #[arg(long, short)]
    pub input: PathBuf,

    /// Column contract to check against
    #[arg(long, value_enum, default_value_t = ValidationMode::Classification)]
    pub mode: ValidationMode,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// CSV file to classify
    #[arg(long, short)]
    pub input: PathBuf,

    /// Survey the upload came from
    #[arg(long, value_enum, default_value_t = Mission::Koi)]
    pub mission: Mission,

    /// Threshold forwarded to the prediction service
    #[arg(long, default_value_t = 0.5)]
    pub scoring_threshold: f64,

    /// Classification threshold for the four labels
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Show only one label ("all" or e.g. "STRONG CANDIDATE")
    #[arg(long, default_value = "all")]
    pub filter: LabelFilter,

    /// 1-based page to print
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Custom model to score with
    #[arg(long)]
    pub model_id: Option<String>,

    /// Write the full export into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Labelled CSV file (must include isPlanet)
    #[arg(long, short)]
    pub input: PathBuf,

    /// Name for the trained model
    #[arg(long)]
    pub name: Option<String>,

    /// TOML file with hyperparameter overrides
    #[arg(long)]
    pub hyperparams: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanetLabel;
    use serial_test::serial;

    #[test]
    #[serial]
    fn classify_defaults() {
        let cli = Cli::try_parse_from(["transit-classifier", "classify", "--input", "koi.csv"])
            .unwrap();
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.mission, Mission::Koi);
        assert_eq!(args.scoring_threshold, 0.5);
        assert_eq!(args.threshold, 0.7);
        assert_eq!(args.filter, LabelFilter::All);
        assert_eq!(args.page, 1);
        assert_eq!(cli.config.page_size, 10);
    }

    #[test]
    #[serial]
    fn classify_accepts_filter_and_mission() {
        let cli = Cli::try_parse_from([
            "transit-classifier",
            "--endpoint",
            "http://scorer:8000",
            "classify",
            "-i",
            "tess.csv",
            "--mission",
            "TESS",
            "--filter",
            "WEAK CANDIDATE",
            "--model-id",
            "m-42",
        ])
        .unwrap();
        assert_eq!(cli.config.endpoint, "http://scorer:8000");
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.mission, Mission::Tess);
        assert_eq!(args.filter, LabelFilter::Only(PlanetLabel::WeakCandidate));
        assert_eq!(args.model_id.as_deref(), Some("m-42"));
    }

    #[test]
    #[serial]
    fn validate_mode_is_selectable() {
        let cli = Cli::try_parse_from([
            "transit-classifier",
            "validate",
            "--input",
            "train.csv",
            "--mode",
            "training",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.mode, ValidationMode::Training);
    }

    #[test]
    #[serial]
    fn unknown_filter_is_rejected() {
        assert!(
            Cli::try_parse_from([
                "transit-classifier",
                "classify",
                "--input",
                "a.csv",
                "--filter",
                "maybe",
            ])
            .is_err()
        );
    }
}
