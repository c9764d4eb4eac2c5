use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorReport;
use crate::fault::FaultWeights;
use crate::phases::{
    BoneGenerator, DayBlocker, GeneratorPhase, Improver, MissingLessonsAdder, Replicator,
};
use crate::schedule::Schedule;

/// Tuning of a generation run. Every field has a default, so an instance
/// may omit the whole block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Week whose lessons are replicated over the term.
    pub seed_week: usize,
    pub weekdays_per_type: usize,
    /// Average comfort a weekday needs to count as free.
    pub free_day_threshold: f32,
    pub improve: bool,
    pub improve_step_limit: Option<usize>,
    pub weights: FaultWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed_week: 0,
            weekdays_per_type: 2,
            free_day_threshold: 0.99,
            improve: false,
            improve_step_limit: None,
            weights: FaultWeights::default(),
        }
    }
}

/// Runs the phases in order over one schedule.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn phases(&self) -> Vec<Box<dyn GeneratorPhase>> {
        let config = &self.config;
        let mut phases: Vec<Box<dyn GeneratorPhase>> = vec![
            Box::new(DayBlocker::new(
                config.weekdays_per_type,
                config.free_day_threshold,
            )),
            Box::new(BoneGenerator::new(config.seed_week)),
            Box::new(Replicator::new(config.seed_week)),
            Box::new(MissingLessonsAdder::new()),
        ];
        if config.improve {
            phases.push(Box::new(Improver::new(
                config.weights,
                config.improve_step_limit,
            )));
        }
        phases
    }

    /// Runs every phase and returns the soft errors they collected.
    pub fn run(&self, schedule: &mut Schedule) -> ErrorReport {
        let mut errors = ErrorReport::new();
        for mut phase in self.phases() {
            info!("running {}", phase.name());
            let before = errors.len();
            phase.run(schedule, &mut errors);
            info!(
                "{} done: {} lessons, {} new errors",
                phase.name(),
                schedule.lessons().len(),
                errors.len() - before
            );
        }
        errors
    }

    /// Like [`Generator::run`], but a run with soft errors is an `Err`.
    pub fn generate(&self, schedule: &mut Schedule) -> Result<(), ErrorReport> {
        self.run(schedule).into_result()
    }
}
