//! JsonlSink - appends frames as JSON lines

use contracts::{DecodedFrame, FrameSink, PipelineError};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for JsonlSink
#[derive(Debug, Clone)]
pub struct JsonlSinkConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl JsonlSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Sink that appends one JSON document per frame to a run-stamped file
pub struct JsonlSink {
    name: String,
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JsonlSink, opening a fresh run file
    pub fn new(name: impl Into<String>, config: JsonlSinkConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = config.base_path.join(format!("frames-{stamp}.jsonl"));
        let writer = BufWriter::new(File::create(&path)?);

        Ok(Self {
            name: name.into(),
            writer,
            path,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = JsonlSinkConfig::from_params(params);
        Self::new(name, config)
    }

    /// Path of the run file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn append_frame(&mut self, frame: &DecodedFrame) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(b"\n")
    }

    fn persist_frame(&mut self, frame: &DecodedFrame) -> Result<(), PipelineError> {
        self.append_frame(frame).map_err(|e| {
            error!(sink = %self.name, frame_id = frame.model.frame_id, error = %e, "Write failed");
            PipelineError::sink_write(&self.name, e.to_string())
        })
    }
}

impl FrameSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "jsonl_sink_write",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.model.frame_id)
    )]
    async fn write(&mut self, frame: &DecodedFrame) -> Result<(), PipelineError> {
        self.persist_frame(frame)?;
        Ok(())
    }

    #[instrument(name = "jsonl_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), PipelineError> {
        self.writer
            .flush()
            .map_err(|e| PipelineError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "jsonl_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), PipelineError> {
        self.writer
            .flush()
            .map_err(|e| PipelineError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, path = %self.path.display(), "JsonlSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_jsonl_sink_appends_lines() {
        let dir = tempdir().unwrap();
        let config = JsonlSinkConfig {
            base_path: dir.path().to_path_buf(),
        };

        let mut sink = JsonlSink::new("test_jsonl", config).unwrap();
        for i in 0..3 {
            let mut frame = DecodedFrame::default();
            frame.model.frame_id = i;
            sink.write(&frame).await.unwrap();
        }
        sink.flush().await.unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let parsed: DecodedFrame = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(parsed.model.frame_id, 2);
    }
}
