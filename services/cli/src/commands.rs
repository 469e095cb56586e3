use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use ai_governance::assessment::{
    generate_blueprint, write_mapping_csv, CoverageReport, MappingEntry, MaturityStage,
    OrgAnswers, OrgAssessment, OrgContext, OrgSize, ProductAnswers, ProductAssessment,
    RiskScorer, Suggestion,
};
use ai_governance::config::AppConfig;
use ai_governance::error::AppError;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::infra::{
    load_engine, parse_maturity, parse_org_size, print_json, read_json, ReferenceArgs,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreOrgArgs {
    /// Organization answers JSON
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

/// Inputs and outputs shared by the two assessment commands.
#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Externally suggested controls JSON (array of {name, description, ...})
    #[arg(long)]
    pub(crate) suggestions: Option<PathBuf>,
    /// Control ids already implemented, used for coverage tallies
    #[arg(long, value_delimiter = ',')]
    pub(crate) implemented: Vec<String>,
    /// Also write the crosswalk as an audit CSV
    #[arg(long)]
    pub(crate) mapping_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessOrgArgs {
    /// Organization answers JSON
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

/// Where the parent organization's context comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct ParentArgs {
    /// Organization answers JSON; the organization is scored to derive the context
    #[arg(long)]
    pub(crate) org_answers: Option<PathBuf>,
    /// Previously derived organization context JSON
    #[arg(long)]
    pub(crate) org_context: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessProductArgs {
    /// Product answers JSON
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[command(flatten)]
    pub(crate) parent: ParentArgs,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    #[command(flatten)]
    pub(crate) reference: ReferenceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct BlueprintArgs {
    /// Organization size (startup, small, medium, enterprise or a headcount band)
    #[arg(long, value_parser = parse_org_size)]
    pub(crate) size: OrgSize,
    /// Governance maturity (initial, developing, defined, optimized)
    #[arg(long, value_parser = parse_maturity)]
    pub(crate) maturity: MaturityStage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrgReport<'a> {
    assessment: &'a OrgAssessment,
    coverage: CoverageReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductReport<'a> {
    assessment: &'a ProductAssessment,
    coverage: CoverageReport,
}

pub(crate) fn run_score_org(config: &AppConfig, args: ScoreOrgArgs) -> Result<(), AppError> {
    let answers: OrgAnswers = read_json(&args.answers)?;
    let result = RiskScorer::new(config.engine_config().scoring).score_org(&answers);
    print_json(&result)
}

pub(crate) fn run_assess_org(config: &AppConfig, args: AssessOrgArgs) -> Result<(), AppError> {
    let engine = load_engine(config.engine_config(), &args.reference)?;
    let answers: OrgAnswers = read_json(&args.answers)?;
    let suggestions = load_suggestions(&args.output)?;

    let assessment = engine.assess_org(&answers, &suggestions);
    export_mappings(&args.output, &assessment.mappings)?;
    let coverage = engine.coverage(&assessment.mappings, &args.output.implemented);

    print_json(&OrgReport {
        assessment: &assessment,
        coverage,
    })
}

pub(crate) fn run_assess_product(
    config: &AppConfig,
    args: AssessProductArgs,
) -> Result<(), AppError> {
    let engine = load_engine(config.engine_config(), &args.reference)?;
    let answers: ProductAnswers = read_json(&args.answers)?;
    let suggestions = load_suggestions(&args.output)?;

    let parent: OrgContext = match &args.parent.org_context {
        Some(path) => read_json(path)?,
        None => {
            // clap requires one of the two sources; default answers give a neutral parent.
            let org_answers: OrgAnswers = match &args.parent.org_answers {
                Some(path) => read_json(path)?,
                None => OrgAnswers::default(),
            };
            let risk = engine.scorer().score_org(&org_answers);
            engine.scorer().org_context(&org_answers, &risk)
        }
    };

    let assessment = engine.assess_product(&answers, &parent, &suggestions);
    export_mappings(&args.output, &assessment.mappings)?;
    let coverage = engine.coverage(&assessment.mappings, &args.output.implemented);

    print_json(&ProductReport {
        assessment: &assessment,
        coverage,
    })
}

pub(crate) fn run_blueprint(args: BlueprintArgs) -> Result<(), AppError> {
    print_json(&generate_blueprint(args.size, args.maturity))
}

fn load_suggestions(output: &OutputArgs) -> Result<Vec<Suggestion>, AppError> {
    match &output.suggestions {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

fn export_mappings(output: &OutputArgs, mappings: &[MappingEntry]) -> Result<(), AppError> {
    let Some(path) = &output.mapping_csv else {
        return Ok(());
    };
    let writer = BufWriter::new(File::create(path)?);
    write_mapping_csv(writer, mappings)?;
    info!(path = %path.display(), rows = mappings.len(), "mapping csv written");
    Ok(())
}
