//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::DecodeMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total frames decoded
    pub frames_decoded: u64,

    /// Frames the dispatcher queue refused (backpressure)
    pub frames_backpressured: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of sinks that received data
    pub active_sinks: usize,

    /// Decode metrics aggregator
    pub decode_metrics: DecodeMetricsAggregator,
}

impl PipelineStats {
    /// Calculate frames per second throughput
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_decoded as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Frames decoded: {}", self.frames_decoded);
        println!("Backpressured frames: {}", self.frames_backpressured);
        println!("Throughput: {:.2} fps", self.fps());
        println!("Active sinks: {}", self.active_sinks);
        println!();
        println!("{}", self.decode_metrics.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        let stats = PipelineStats {
            frames_decoded: 200,
            duration: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((stats.fps() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fps_zero_duration() {
        let stats = PipelineStats::default();
        assert_eq!(stats.fps(), 0.0);
    }
}
