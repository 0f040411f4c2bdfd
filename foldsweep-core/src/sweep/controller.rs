//! Sweep controller: trains one model per training tuple and evaluates it
//! against every other fold, stopping at the first failure.

use crate::config::SweepConfig;
use crate::data::{DatasetRepository, FileDatasetRepository};
use crate::diagnostics::{DiagnosticSink, TracingDiagnostics};
use crate::error::SweepError;
use crate::eval::{Evaluator, registry};
use crate::learners::{ClassifierFactory, LearnerFactory};
use crate::sink::{FileResultSink, ResultSink};
use crate::sweep::plan::{SweepPlan, TrainingConfig};
use crate::training::Trainer;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a sweep. `Done` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    Enumerating,
    Training,
    EvaluatingFold,
    Done,
    Aborted,
}

impl SweepState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for SweepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Enumerating => "enumerating",
            Self::Training => "training",
            Self::EvaluatingFold => "evaluating fold",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// What a completed sweep produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub run_id: String,
    pub models_trained: usize,
    pub artifacts: Vec<PathBuf>,
    pub state: SweepState,
}

pub struct SweepController {
    plan: SweepPlan,
    run_id: String,
    repository: Box<dyn DatasetRepository>,
    sink: Box<dyn ResultSink>,
    factory: Box<dyn LearnerFactory>,
    diagnostics: Box<dyn DiagnosticSink>,
    trainer: Trainer,
    evaluator: Evaluator,
    state: SweepState,
}

impl fmt::Debug for SweepController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweepController")
            .field("plan", &self.plan)
            .field("run_id", &self.run_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SweepController {
    pub fn new(
        config: &SweepConfig,
        repository: Box<dyn DatasetRepository>,
        sink: Box<dyn ResultSink>,
    ) -> Self {
        Self {
            plan: SweepPlan::new(config),
            run_id: config.resolved_run_id(),
            repository,
            sink,
            factory: Box::new(ClassifierFactory),
            diagnostics: Box::new(TracingDiagnostics),
            trainer: Trainer,
            evaluator: Evaluator,
            state: SweepState::Idle,
        }
    }

    /// Controller over the configured dataset and output directories.
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config,
            Box::new(FileDatasetRepository::new(&config.dataset_dir)),
            Box::new(FileResultSink::new(&config.output_dir)),
        )
    }

    pub fn with_factory(mut self, factory: Box<dyn LearnerFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Execute the whole plan. A controller runs once; later calls are rejected.
    pub fn run(&mut self) -> Result<SweepSummary, SweepError> {
        if self.state != SweepState::Idle {
            return Err(SweepError::config(format!(
                "sweep {} already ran (state: {})",
                self.run_id, self.state
            )));
        }
        self.state = SweepState::Enumerating;
        self.diagnostics.write(&format!(
            "Sweep {} started: {} training tuples",
            self.run_id,
            self.plan.len()
        ));

        let mut summary = SweepSummary {
            run_id: self.run_id.clone(),
            models_trained: 0,
            artifacts: Vec::new(),
            state: SweepState::Enumerating,
        };

        let plan = self.plan.clone();
        for tuple in plan.iter() {
            if let Err(err) = self.run_tuple(&tuple, &mut summary) {
                let message = format!(
                    "Sweep {} aborted while {} {tuple}: {} failed: {err}",
                    self.run_id,
                    self.state,
                    err.kind()
                );
                self.state = SweepState::Aborted;
                self.diagnostics.fail(&message);
                return Err(err);
            }
            self.state = SweepState::Enumerating;
        }

        self.state = SweepState::Done;
        summary.state = SweepState::Done;
        self.diagnostics.write(&format!(
            "Sweep {} done: {} models, {} reports",
            self.run_id,
            summary.models_trained,
            summary.artifacts.len()
        ));
        Ok(summary)
    }

    fn run_tuple(
        &mut self,
        tuple: &TrainingConfig,
        summary: &mut SweepSummary,
    ) -> Result<(), SweepError> {
        let span = tracing::info_span!(
            "tuple",
            classifier = %tuple.classifier,
            technique = %tuple.technique,
            fold = tuple.train_fold,
            axis = %tuple.axis
        );
        let _guard = span.enter();

        self.state = SweepState::Training;
        self.diagnostics.write(&format!("Training {tuple}"));
        let train = self.repository.load(&tuple.train_partition())?;
        let learner = self.factory.create(tuple.classifier);
        let model = self.trainer.fit(learner.as_ref(), &train)?;
        summary.models_trained += 1;

        let mut measures = registry::build(train.num_labels());
        for fold in tuple.test_folds() {
            self.state = SweepState::EvaluatingFold;
            let test = self.repository.load(&tuple.test_partition(fold))?;
            let result = self
                .evaluator
                .evaluate(model.as_ref(), &test, &mut measures)?;
            let path = self
                .sink
                .write(&result, &tuple.destination(&self.run_id, fold))?;
            tracing::info!(test_fold = fold, path = %path.display(), "Fold evaluated");
            summary.artifacts.push(path);
        }
        Ok(())
    }
}
