//! BincodeSink - appends frames as length-prefixed bincode records

use contracts::{DecodedFrame, FrameSink, PipelineError};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Sink that appends binary frame records to a run-stamped file.
///
/// Record format: little-endian u32 payload length, then the bincode payload.
pub struct BincodeSink {
    name: String,
    writer: BufWriter<File>,
    path: PathBuf,
}

impl BincodeSink {
    /// Create a new BincodeSink, opening a fresh run file
    pub fn new(name: impl Into<String>, base_path: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&base_path)?;

        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = base_path.join(format!("frames-{stamp}.bin"));
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
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));
        Self::new(name, base_path)
    }

    /// Path of the run file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn append_frame(&mut self, frame: &DecodedFrame) -> std::io::Result<()> {
        let payload = bincode::serialize(frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer
            .write_all(&(payload.len() as u32).to_le_bytes())?;
        self.writer.write_all(&payload)
    }
}

impl FrameSink for BincodeSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "bincode_sink_write",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.model.frame_id)
    )]
    async fn write(&mut self, frame: &DecodedFrame) -> Result<(), PipelineError> {
        self.append_frame(frame).map_err(|e| {
            error!(sink = %self.name, frame_id = frame.model.frame_id, error = %e, "Write failed");
            PipelineError::sink_write(&self.name, e.to_string())
        })
    }

    #[instrument(name = "bincode_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), PipelineError> {
        self.writer
            .flush()
            .map_err(|e| PipelineError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "bincode_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), PipelineError> {
        self.writer
            .flush()
            .map_err(|e| PipelineError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, path = %self.path.display(), "BincodeSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_bincode_sink_record_round_trip() {
        let dir = tempdir().unwrap();
        let mut sink = BincodeSink::new("test_bin", dir.path().to_path_buf()).unwrap();

        let mut frame = DecodedFrame::default();
        frame.model.frame_id = 99;
        sink.write(&frame).await.unwrap();
        sink.flush().await.unwrap();

        let bytes = fs::read(sink.path()).unwrap();
        let len = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), 4 + len);

        let parsed: DecodedFrame = bincode::deserialize(&bytes[4..]).unwrap();
        assert_eq!(parsed.model.frame_id, 99);
    }
}
