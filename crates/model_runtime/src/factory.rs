//! Executor factory keyed by configuration.

use tracing::info;

use contracts::{ExecutorConfig, ExecutorMode, ModelExecutor, ModelInputs, PipelineError};

use crate::{MockExecutor, ReplayExecutor};

/// Concrete executor selected at startup.
///
/// Enum dispatch instead of trait objects: the executor trait is async and
/// the set of backends is closed.
#[derive(Debug)]
pub enum AnyExecutor {
    Mock(MockExecutor),
    Replay(ReplayExecutor),
}

impl ModelExecutor for AnyExecutor {
    fn name(&self) -> &str {
        match self {
            AnyExecutor::Mock(executor) => executor.name(),
            AnyExecutor::Replay(executor) => executor.name(),
        }
    }

    async fn execute(&mut self, inputs: &ModelInputs) -> Result<Vec<f32>, PipelineError> {
        match self {
            AnyExecutor::Mock(executor) => executor.execute(inputs).await,
            AnyExecutor::Replay(executor) => executor.execute(inputs).await,
        }
    }
}

/// Build the executor described by the configuration
pub fn build_executor(config: &ExecutorConfig) -> Result<AnyExecutor, PipelineError> {
    match config.mode {
        ExecutorMode::Mock => {
            info!(seed = config.seed, "using mock executor");
            Ok(AnyExecutor::Mock(MockExecutor::new(config.seed)))
        }
        ExecutorMode::Replay => {
            let path = config.replay_path.as_deref().ok_or_else(|| {
                PipelineError::config_validation(
                    "executor.replay_path",
                    "replay mode requires a recording path",
                )
            })?;
            Ok(AnyExecutor::Replay(ReplayExecutor::open(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_mode_requires_path() {
        let config = ExecutorConfig {
            mode: ExecutorMode::Replay,
            replay_path: None,
            seed: 0,
        };
        let err = build_executor(&config).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigValidation { .. }));
    }

    #[test]
    fn test_mock_mode_builds() {
        let executor = build_executor(&ExecutorConfig::default()).unwrap();
        assert_eq!(executor.name(), "mock");
    }
}
