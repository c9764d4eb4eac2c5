//! Weighted objective function over schedule defects. Zero is a perfect
//! schedule.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;
use crate::Penalty;

/// Weights of the fault terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultWeights {
    pub teacher_windows: f64,
    pub group_windows: f64,
    pub teacher_hour_deficit: f64,
    pub group_hour_deficit: f64,
    pub teacher_overlaps: f64,
    pub group_overlaps: f64,
    pub group_overtime: f64,
    pub group_invalid_type_days: f64,
}

impl Default for FaultWeights {
    fn default() -> Self {
        Self {
            teacher_windows: 0.1,
            group_windows: 1000.0,
            teacher_hour_deficit: 10.0,
            group_hour_deficit: 10.0,
            teacher_overlaps: 10.0,
            group_overlaps: 10.0,
            group_overtime: 10.0,
            group_invalid_type_days: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaultParameter {
    pub name: &'static str,
    pub value: f64,
    pub weight: f64,
}

impl FaultParameter {
    pub fn fault(&self) -> f64 {
        self.value * self.weight
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleFault {
    parameters: Vec<FaultParameter>,
}

impl ScheduleFault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term. A term with the same name is replaced.
    pub fn add_parameter(&mut self, name: &'static str, value: f64, weight: f64) {
        let parameter = FaultParameter { name, value, weight };
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    pub fn total(&self) -> f64 {
        self.parameters.iter().map(FaultParameter::fault).sum()
    }

    pub fn parameters(&self) -> &[FaultParameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&FaultParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The term contributing most, if any contributes at all.
    pub fn dominant(&self) -> Option<&FaultParameter> {
        self.parameters
            .iter()
            .filter(|p| p.fault() > 0.0)
            .max_by_key(|p| OrderedFloat(p.fault()))
    }

    /// Scores `schedule`. Needs mutable access because overlap counting
    /// toggles grid cells; every grid is left as it was.
    pub fn measure(schedule: &mut Schedule, weights: &FaultWeights) -> Self {
        let mut fault = Self::new();
        fault.add_parameter(
            "teacher_windows",
            schedule.teacher_windows() as f64,
            weights.teacher_windows,
        );
        fault.add_parameter(
            "group_windows",
            schedule.group_windows() as f64,
            weights.group_windows,
        );
        fault.add_parameter(
            "teacher_hour_deficit",
            schedule.teacher_hour_deficit() as f64,
            weights.teacher_hour_deficit,
        );
        fault.add_parameter(
            "group_hour_deficit",
            schedule.group_hour_deficit() as f64,
            weights.group_hour_deficit,
        );
        fault.add_parameter(
            "teacher_overlaps",
            schedule.total_teacher_overlaps() as f64,
            weights.teacher_overlaps,
        );
        fault.add_parameter(
            "group_overlaps",
            schedule.total_group_overlaps() as f64,
            weights.group_overlaps,
        );
        fault.add_parameter(
            "group_overtime",
            schedule.total_group_overtime() as f64,
            weights.group_overtime,
        );
        fault.add_parameter(
            "group_invalid_type_days",
            schedule.total_group_invalid_type_days() as f64,
            weights.group_invalid_type_days,
        );
        fault
    }
}

impl Penalty for ScheduleFault {
    fn penalty(&self) -> f64 {
        self.total()
    }
}

impl fmt::Display for ScheduleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault {:.2}", self.total())?;
        for p in self.parameters.iter().filter(|p| p.fault() != 0.0) {
            write!(f, "\n  {}: {} x {} = {:.2}", p.name, p.value, p.weight, p.fault())?;
        }
        Ok(())
    }
}
