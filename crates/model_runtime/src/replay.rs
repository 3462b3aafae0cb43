//! ReplayExecutor - plays back recorded output buffers.
//!
//! The recording is a bincode-encoded `Vec<Vec<f32>>`, one inner vector per
//! frame, in capture order. Exhaustion is reported as a replay error so the
//! orchestrator can wind the pipeline down cleanly.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use contracts::{ModelExecutor, ModelInputs, PipelineError};

/// Recorded-output executor
#[derive(Debug)]
pub struct ReplayExecutor {
    buffers: Vec<Vec<f32>>,
    cursor: usize,
}

impl ReplayExecutor {
    /// Load a recording from disk
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::Replay {
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        let buffers: Vec<Vec<f32>> =
            bincode::deserialize_from(BufReader::new(file)).map_err(|e| PipelineError::Replay {
                message: format!("cannot decode {}: {e}", path.display()),
            })?;

        info!(path = %path.display(), frames = buffers.len(), "replay recording loaded");
        Ok(Self::from_buffers(buffers))
    }

    /// Build a replay source from in-memory buffers (tests, tooling)
    pub fn from_buffers(buffers: Vec<Vec<f32>>) -> Self {
        Self { buffers, cursor: 0 }
    }

    /// Save buffers in the recording format
    pub fn save(path: &Path, buffers: &[Vec<f32>]) -> Result<(), PipelineError> {
        let file = File::create(path)?;
        bincode::serialize_into(file, &buffers).map_err(|e| PipelineError::Replay {
            message: format!("cannot encode {}: {e}", path.display()),
        })
    }

    /// Frames remaining
    pub fn remaining(&self) -> usize {
        self.buffers.len().saturating_sub(self.cursor)
    }
}

impl ModelExecutor for ReplayExecutor {
    fn name(&self) -> &str {
        "replay"
    }

    async fn execute(&mut self, _inputs: &ModelInputs) -> Result<Vec<f32>, PipelineError> {
        let buf = self
            .buffers
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| PipelineError::Replay {
                message: "replay source exhausted".to_string(),
            })?;
        self.cursor += 1;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ModelInputs {
        ModelInputs {
            desire_pulse: vec![],
            traffic_convention: [1.0, 0.0],
            feature_buffer: vec![],
        }
    }

    #[tokio::test]
    async fn test_replay_in_capture_order_then_exhausts() {
        let mut executor =
            ReplayExecutor::from_buffers(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(executor.remaining(), 2);

        assert_eq!(executor.execute(&inputs()).await.unwrap(), vec![1.0, 2.0]);
        assert_eq!(executor.execute(&inputs()).await.unwrap(), vec![3.0, 4.0]);

        let err = executor.execute(&inputs()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Replay { .. }));
    }

    #[tokio::test]
    async fn test_save_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.bin");

        let buffers = vec![vec![0.5f32; 4], vec![1.5f32; 4]];
        ReplayExecutor::save(&path, &buffers).unwrap();

        let mut executor = ReplayExecutor::open(&path).unwrap();
        assert_eq!(executor.remaining(), 2);
        assert_eq!(executor.execute(&inputs()).await.unwrap(), vec![0.5f32; 4]);
    }

    #[test]
    fn test_open_missing_file_is_replay_error() {
        let err = ReplayExecutor::open(Path::new("/nonexistent/recording.bin")).unwrap_err();
        assert!(matches!(err, PipelineError::Replay { .. }));
    }
}
