use crate::commands::{
    run_assess_org, run_assess_product, run_blueprint, run_score_org, AssessOrgArgs,
    AssessProductArgs, BlueprintArgs, ScoreOrgArgs,
};
use ai_governance::config::AppConfig;
use ai_governance::error::AppError;
use ai_governance::telemetry;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "ai-governance",
    about = "Score AI governance assessments and derive the controls they require",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score an organization answer set and print the risk result
    ScoreOrg(ScoreOrgArgs),
    /// Run the full organization pipeline: risk, controls, crosswalk and blueprint
    AssessOrg(AssessOrgArgs),
    /// Run the product pipeline under a parent organization
    AssessProduct(AssessProductArgs),
    /// Print the governance operating model for an organization size and maturity
    Blueprint(BlueprintArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(
        environment = ?config.environment,
        governance_floor = config.engine.governance_floor,
        max_suggestions = config.engine.max_suggestions,
        "configuration loaded"
    );

    match cli.command {
        Command::ScoreOrg(args) => run_score_org(&config, args),
        Command::AssessOrg(args) => run_assess_org(&config, args),
        Command::AssessProduct(args) => run_assess_product(&config, args),
        Command::Blueprint(args) => run_blueprint(args),
    }
}
