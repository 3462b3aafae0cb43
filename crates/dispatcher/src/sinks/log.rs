//! LogSink - logs frame summary via tracing

use contracts::{DecodedFrame, FrameSink, PipelineError};
use tracing::{info, instrument};

/// Sink that logs frame summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_frame_summary(&self, frame: &DecodedFrame) {
        let model = &frame.model;
        info!(
            sink = %self.name,
            frame_id = model.frame_id,
            confidence = ?model.confidence,
            hard_brake = model.meta.hard_brake_predicted,
            engaged_prob = model.meta.engaged_prob,
            lead_prob = model.leads.first().map(|l| l.prob).unwrap_or(0.0),
            execution_time_s = model.model_execution_time,
            "DecodedFrame received"
        );
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.model.frame_id)
    )]
    async fn write(&mut self, frame: &DecodedFrame) -> Result<(), PipelineError> {
        self.log_frame_summary(frame);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), PipelineError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), PipelineError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
