//! Pipeline orchestrator - coordinates executor, decode engine and dispatcher.
//!
//! Drives the per-frame loop sequentially: the decode engine's recurrent and
//! confidence state is only correct when frames are processed strictly in
//! order, so there is exactly one decode task.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use contracts::{DecodedFrame, FrameContext, ModelExecutor, PipelineBlueprint, PipelineError};
use decode_engine::DecodeEngine;
use model_runtime::build_executor;
use observability::record_decode_metrics;
use tensor_view::DESIRE_LEN;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The pipeline blueprint
    pub blueprint: PipelineBlueprint,

    /// Maximum number of frames to decode (None = unlimited)
    pub max_frames: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Dispatcher channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Pace the loop at the configured model frequency
    pub realtime: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Executor
        let mut executor =
            build_executor(&blueprint.executor).context("Failed to build executor")?;
        info!(executor = executor.name(), "Executor ready");

        // Decode engine
        let mut engine = DecodeEngine::new(blueprint.decoder.clone());
        info!(
            frequency_hz = blueprint.decoder.frequency_hz,
            cadence_frames = blueprint.decoder.confidence.cadence_frames,
            "Decode engine configured"
        );

        // Dispatcher
        let (frame_tx, frame_rx) = mpsc::channel::<DecodedFrame>(self.config.buffer_size);

        if blueprint.sinks.is_empty() {
            warn!("No sinks configured - decoded frames will be dropped");
        }

        let dispatcher = dispatcher::create_dispatcher(blueprint.sinks.clone(), frame_rx)
            .context("Failed to create dispatcher")?;

        let active_sinks = blueprint.sinks.len();
        let dispatcher_handle = dispatcher.spawn();

        info!(active_sinks, "Dispatcher started");

        let max_frames = self.config.max_frames;
        let frame_interval = Duration::from_secs_f64(1.0 / blueprint.decoder.frequency_hz as f64);
        let realtime = self.config.realtime;

        info!(max_frames = ?max_frames, realtime, "Pipeline running");

        // Decode loop task
        let pipeline_task = async move {
            let mut stats = PipelineStats {
                active_sinks,
                ..Default::default()
            };

            // No navigation upstream in this harness: the desire vector stays
            // at "none" and the convention defaults to left-hand drive.
            let desire = [0.0f32; DESIRE_LEN];
            let is_rhd = false;

            let mut ticker = realtime.then(|| tokio::time::interval(frame_interval));
            let mut frame_id: u32 = 0;

            loop {
                if let Some(ref mut ticker) = ticker {
                    ticker.tick().await;
                }

                let inputs = engine.prepare_inputs(&desire, is_rhd);

                let inference_start = Instant::now();
                let buf = match executor.execute(&inputs).await {
                    Ok(buf) => buf,
                    Err(PipelineError::Replay { message }) => {
                        info!(reason = %message, "Replay finished");
                        break;
                    }
                    Err(e) => return (stats, Err(e)),
                };

                let ctx = FrameContext {
                    frame_id,
                    frame_id_extra: frame_id,
                    timestamp_eof: frame_id as u64 * frame_interval.as_nanos() as u64,
                    valid: true,
                    model_execution_time: inference_start.elapsed().as_secs_f32(),
                    ..Default::default()
                };

                let decoded = match engine.decode(ctx, &buf) {
                    Ok(decoded) => decoded,
                    Err(e) => return (stats, Err(e)),
                };

                stats.frames_decoded += 1;
                record_decode_metrics(&decoded.model);
                stats.decode_metrics.update(&decoded.model);

                if frame_tx.try_send(decoded).is_err() {
                    stats.frames_backpressured += 1;
                }

                frame_id = frame_id.wrapping_add(1);

                if let Some(max) = max_frames {
                    if stats.frames_decoded >= max {
                        info!(frames = stats.frames_decoded, "Reached max frames limit");
                        break;
                    }
                }
            }

            (stats, Ok(()))
        };

        // Run with optional timeout
        let (stats, result) = if let Some(timeout) = self.config.timeout {
            match tokio::time::timeout(timeout, pipeline_task).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    (PipelineStats::default(), Ok(()))
                }
            }
        } else {
            pipeline_task.await
        };

        result.context("Decode loop failed")?;

        // Shutdown: the decode loop's sender is dropped with the task, so the
        // dispatcher drains and exits on its own.
        info!("Shutting down pipeline...");
        let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

        let mut final_stats = stats;
        final_stats.duration = start_time.elapsed();

        info!(
            duration_secs = final_stats.duration.as_secs_f64(),
            fps = format!("{:.2}", final_stats.fps()),
            "Pipeline shutdown complete"
        );

        Ok(final_stats)
    }
}
