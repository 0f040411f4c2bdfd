//! Sweep configuration.
//!
//! Uses `figment` for layered configuration: defaults -> workspace file ->
//! explicit file -> environment -> CLI overrides. The enablement options are
//! a flat mapping of booleans; anything absent is disabled.

use crate::error::SweepError;
use crate::learners::ClassifierKind;
use crate::sweep::plan::Technique;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the workspace-level configuration file.
pub const CONFIG_FILE_NAME: &str = "foldsweep.toml";

/// Resolved configuration for one sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Prefix for every output artifact name. Generated from the clock when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Directory holding the `.bsi` / `.labels` partitions.
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,
    /// Directory receiving the per-pairing reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for the JSON run log (platform data dir when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub ehd: bool,
    #[serde(default)]
    pub lbp: bool,
    #[serde(default)]
    pub sift: bool,
    #[serde(default)]
    pub gabor: bool,

    #[serde(default)]
    pub mlknn: bool,
    #[serde(default)]
    pub brknn: bool,
    #[serde(default)]
    pub chain: bool,
    #[serde(default)]
    pub lp: bool,
    #[serde(default)]
    pub hmc_t: bool,
    #[serde(default)]
    pub hmc_a: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            run_id: None,
            dataset_dir: default_dataset_dir(),
            output_dir: default_output_dir(),
            log_dir: None,
            ehd: false,
            lbp: false,
            sift: false,
            gabor: false,
            mlknn: false,
            brknn: false,
            chain: false,
            lp: false,
            hmc_t: false,
            hmc_a: false,
        }
    }
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("Bases")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SweepConfig {
    /// Build a configuration from a flat string mapping such as `{"ehd": "true"}`.
    ///
    /// Values parse leniently: only a case-insensitive `"true"` enables an
    /// option. Unrecognised keys are ignored.
    pub fn from_options(options: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        for (key, value) in options {
            let enabled = value.trim().eq_ignore_ascii_case("true");
            if !config.set_flag(key, enabled) {
                tracing::debug!(option = %key, "Ignoring unrecognised sweep option");
            }
        }
        config
    }

    /// Set one enablement flag by its option name. Returns `false` for unknown names.
    pub fn set_flag(&mut self, name: &str, enabled: bool) -> bool {
        let key = name.trim().to_ascii_lowercase();
        let slot = if let Some(&technique) = Technique::ALL.iter().find(|t| t.option_key() == key) {
            self.technique_slot(technique)
        } else if let Some(&kind) = ClassifierKind::ALL.iter().find(|k| k.option_key() == key) {
            self.classifier_slot(kind)
        } else {
            return false;
        };
        *slot = enabled;
        true
    }

    pub fn technique_enabled(&self, technique: Technique) -> bool {
        match technique {
            Technique::Ehd => self.ehd,
            Technique::Lbp => self.lbp,
            Technique::Sift => self.sift,
            Technique::Gabor => self.gabor,
        }
    }

    pub fn classifier_enabled(&self, kind: ClassifierKind) -> bool {
        match kind {
            ClassifierKind::MlKnn => self.mlknn,
            ClassifierKind::BrKnn => self.brknn,
            ClassifierKind::Chain => self.chain,
            ClassifierKind::LabelPowerset => self.lp,
            ClassifierKind::HmcThreshold => self.hmc_t,
            ClassifierKind::HmcAlgorithm => self.hmc_a,
        }
    }

    fn technique_slot(&mut self, technique: Technique) -> &mut bool {
        match technique {
            Technique::Ehd => &mut self.ehd,
            Technique::Lbp => &mut self.lbp,
            Technique::Sift => &mut self.sift,
            Technique::Gabor => &mut self.gabor,
        }
    }

    fn classifier_slot(&mut self, kind: ClassifierKind) -> &mut bool {
        match kind {
            ClassifierKind::MlKnn => &mut self.mlknn,
            ClassifierKind::BrKnn => &mut self.brknn,
            ClassifierKind::Chain => &mut self.chain,
            ClassifierKind::LabelPowerset => &mut self.lp,
            ClassifierKind::HmcThreshold => &mut self.hmc_t,
            ClassifierKind::HmcAlgorithm => &mut self.hmc_a,
        }
    }

    /// The run id, or a timestamp prefix when none was configured.
    pub fn resolved_run_id(&self) -> String {
        self.run_id
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d-%H%M%S-").to_string())
    }
}

/// Values supplied on the command line. Unset fields leave lower layers intact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// Option names to switch on (`ehd`, `mlknn`, ...).
    #[serde(skip)]
    pub enable: Vec<String>,
}

/// Load configuration with layered merging.
///
/// Precedence, lowest first: defaults, `<workspace>/foldsweep.toml`, the
/// explicit `config_file`, `FOLDSWEEP_*` environment variables, overrides.
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<SweepConfig, SweepError> {
    let mut figment = Figment::from(Serialized::defaults(SweepConfig::default()));

    if let Some(ws) = workspace {
        let ws_config = ws.join(CONFIG_FILE_NAME);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.exists() {
            return Err(SweepError::config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }

    // FOLDSWEEP_EHD=true, FOLDSWEEP_OUTPUT_DIR=results, ...
    figment = figment.merge(Env::prefixed("FOLDSWEEP_"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
        let mut flags = BTreeMap::new();
        for name in &overrides.enable {
            flags.insert(name.trim().to_ascii_lowercase(), true);
        }
        figment = figment.merge(Serialized::defaults(flags));
    }

    let config: SweepConfig = figment
        .extract()
        .map_err(|e| SweepError::config(e.to_string()))?;

    if let Some(overrides) = overrides {
        let mut scratch = SweepConfig::default();
        for name in &overrides.enable {
            if !scratch.set_flag(name, true) {
                return Err(SweepError::config(format!("unknown option '{name}'")));
            }
        }
    }

    Ok(config)
}
