use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ai_governance::assessment::{
    AnswerLabel, AssessmentEngine, ControlCatalog, EngineConfig, MaturityStage, NistHierarchy,
    OrgSize, RuleSet,
};
use ai_governance::error::AppError;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

/// Replacement reference data. Anything not given falls back to the embedded set.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ReferenceArgs {
    /// Rule definitions JSON (array of rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Control catalog JSON (array of controls)
    #[arg(long)]
    pub(crate) controls: Option<PathBuf>,
    /// NIST AI RMF taxonomy JSON
    #[arg(long)]
    pub(crate) taxonomy: Option<PathBuf>,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn load_engine(
    config: EngineConfig,
    reference: &ReferenceArgs,
) -> Result<AssessmentEngine, AppError> {
    let rules = match &reference.rules {
        Some(path) => {
            let set = RuleSet::from_json(&fs::read_to_string(path)?)?;
            if !set.rejected().is_empty() {
                warn!(
                    path = %path.display(),
                    rejected = set.rejected().len(),
                    "some rules were rejected while loading"
                );
            }
            info!(path = %path.display(), rules = set.rules().len(), "loaded rules");
            set
        }
        None => RuleSet::standard(),
    };
    let catalog = match &reference.controls {
        Some(path) => {
            let catalog = ControlCatalog::from_json(&fs::read_to_string(path)?)?;
            info!(path = %path.display(), controls = catalog.len(), "loaded control catalog");
            catalog
        }
        None => ControlCatalog::standard(),
    };
    let taxonomy = match &reference.taxonomy {
        Some(path) => NistHierarchy::from_json(&fs::read_to_string(path)?)?,
        None => NistHierarchy::ai_rmf(),
    };

    Ok(AssessmentEngine::new(config, rules, catalog, taxonomy))
}

/// Pretty JSON on stdout, newline terminated.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

// Sizes and stages accept the same spellings as the answer files, but unlike
// answer files an unknown label is an argument error rather than a default.
pub(crate) fn parse_org_size(raw: &str) -> Result<OrgSize, String> {
    OrgSize::from_label(raw).ok_or_else(|| {
        format!(
            "unknown organization size '{raw}' (startup, small, medium, enterprise or a headcount band such as 51-250)"
        )
    })
}

pub(crate) fn parse_maturity(raw: &str) -> Result<MaturityStage, String> {
    MaturityStage::from_label(raw).ok_or_else(|| {
        format!("unknown maturity stage '{raw}' (initial, developing, defined, optimized)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_governance::assessment::OrgAnswers;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ai-governance-cli-{}-{name}",
            std::process::id()
        ));
        fs::write(&path, contents).expect("scratch file written");
        path
    }

    #[test]
    fn sizes_accept_headcount_bands() {
        assert_eq!(parse_org_size("251-1000"), Ok(OrgSize::Medium));
        assert_eq!(parse_org_size(" startup "), Ok(OrgSize::Startup));
        assert_eq!(parse_org_size("1-10"), Ok(OrgSize::Startup));
        assert!(parse_org_size("huge").is_err());
        assert_eq!(parse_maturity("Optimized"), Ok(MaturityStage::Optimized));
    }

    #[test]
    fn reads_answer_files() {
        let path = scratch_file(
            "org.json",
            r#"{"step1": {"organizationName": "Acme", "countries": ["Canada"]}}"#,
        );
        let answers: OrgAnswers = read_json(&path).expect("answers load");
        fs::remove_file(&path).ok();
        assert_eq!(answers.step1.organization_name, "Acme");
    }

    #[test]
    fn malformed_answers_surface_as_json_errors() {
        let path = scratch_file("broken.json", "{ not json");
        let result: Result<OrgAnswers, AppError> = read_json(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn custom_rules_replace_the_standard_set() {
        let path = scratch_file(
            "rules.json",
            r#"[{"ruleId": "ONLY", "name": "only rule", "actions": {"selectControls": ["GOV-01"]}}]"#,
        );
        let engine = load_engine(
            EngineConfig::default(),
            &ReferenceArgs {
                rules: Some(path.clone()),
                ..ReferenceArgs::default()
            },
        )
        .expect("engine loads");
        fs::remove_file(&path).ok();

        assert_eq!(engine.rules().rules().len(), 1);
        assert!(!engine.catalog().is_empty());
    }
}
