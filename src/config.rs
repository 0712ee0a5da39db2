use serde::{Deserialize, Serialize};

use crate::{
    core::Ticks,
    error::{SchedError, SchedResult},
    scheduler::Algorithm,
};

pub const DEFAULT_QUANTUM: Ticks = 3;
pub const DEFAULT_OVERLOAD: Ticks = 0;

/// Scheduler configuration, fixed for the lifetime of a `Scheduler`.
///
/// `quantum` and `overload` only affect the preemptive algorithms (RR, EDF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub algorithm: Algorithm,
    /// Maximum consecutive ticks a process may hold the execution slot
    pub quantum: Ticks,
    /// Ticks the execution slot stays frozen after a preemption
    pub overload: Ticks,
}

impl SchedulerConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_overload(mut self, overload: Ticks) -> Self {
        self.overload = overload;
        self
    }

    pub fn validate(&self) -> SchedResult<()> {
        if self.quantum == 0 {
            return Err(SchedError::ZeroQuantum);
        }
        Ok(())
    }

    /// Parse and validate a JSON config, e.g. `{"algorithm": "RR", "quantum": 2}`.
    pub fn from_json(raw: &str) -> SchedResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| SchedError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            quantum: DEFAULT_QUANTUM,
            overload: DEFAULT_OVERLOAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = SchedulerConfig::new(Algorithm::Edf)
            .with_quantum(4)
            .with_overload(2);
        assert_eq!(config.algorithm, Algorithm::Edf);
        assert_eq!(config.quantum, 4);
        assert_eq!(config.overload, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_quantum_is_rejected() {
        let config = SchedulerConfig::new(Algorithm::RoundRobin).with_quantum(0);
        assert_eq!(config.validate(), Err(SchedError::ZeroQuantum));
    }

    #[test]
    fn json_fills_defaults() {
        let config = SchedulerConfig::from_json(r#"{"algorithm": "rr", "overload": 1}"#).unwrap();
        assert_eq!(
            config,
            SchedulerConfig::new(Algorithm::RoundRobin).with_overload(1)
        );

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""algorithm":"RR""#));
    }

    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(
            SchedulerConfig::from_json(r#"{"algorithm": "lottery"}"#),
            Err(SchedError::InvalidConfig(_))
        ));
        assert!(matches!(
            SchedulerConfig::from_json(r#"{"slice": 3}"#),
            Err(SchedError::InvalidConfig(_))
        ));
        assert_eq!(
            SchedulerConfig::from_json(r#"{"quantum": 0}"#),
            Err(SchedError::ZeroQuantum)
        );
    }
}
