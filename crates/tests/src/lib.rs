//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（mock executor，无需真实模型）
//! - 回放链路测试

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_layout_matches_contract_constants() {
        // 外部接口约定的结构常量
        assert_eq!(tensor_view::DISENGAGE_T, [2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(tensor_view::LEAD_T_OFFSETS, [0.0, 2.0, 4.0]);
        assert_eq!(tensor_view::LEAD_TRAJ_LEN, 6);
        assert_eq!(tensor_view::LEAD_SELECTION_N, 3);
        // 默认 cadence = 2 秒 × 模型帧率
        let decoder = contracts::DecoderConfig::default();
        assert_eq!(
            decoder.confidence.cadence_frames,
            2 * decoder.frequency_hz
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;

    use contracts::{
        DecodedFrame, DecoderConfig, ExecutorConfig, FrameContext, ModelExecutor, SinkConfig,
        SinkType,
    };
    use decode_engine::DecodeEngine;
    use dispatcher::create_dispatcher;
    use model_runtime::{build_executor, MockExecutor, ReplayExecutor};
    use tensor_view::{DESIRE_LEN, OUTPUT_FLOATS, TRAJECTORY_SIZE};
    use tokio::sync::mpsc;

    fn frame_ctx(frame_id: u32) -> FrameContext {
        FrameContext {
            frame_id,
            frame_id_extra: frame_id,
            timestamp_eof: frame_id as u64 * 50_000_000,
            valid: true,
            ..Default::default()
        }
    }

    /// End-to-end test: MockExecutor -> DecodeEngine -> Dispatcher
    ///
    /// 验证完整的数据流：
    /// 1. MockExecutor 生成输出张量
    /// 2. DecodeEngine 解码为结构化预测
    /// 3. Dispatcher 将 DecodedFrame 分发到 sinks
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let dir = tempfile::tempdir().unwrap();

        let mut executor = MockExecutor::new(7);
        let mut engine = DecodeEngine::new(DecoderConfig::default());

        let (frame_tx, frame_rx) = mpsc::channel::<DecodedFrame>(100);
        let sink_configs = vec![
            SinkConfig {
                name: "test_log".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 50,
                params: HashMap::new(),
            },
            SinkConfig {
                name: "test_jsonl".to_string(),
                sink_type: SinkType::Jsonl,
                queue_capacity: 50,
                params: HashMap::from([(
                    "base_path".to_string(),
                    dir.path().display().to_string(),
                )]),
            },
        ];

        let dispatcher = create_dispatcher(sink_configs, frame_rx).unwrap();
        let dispatcher_handle = dispatcher.spawn();

        let desire = [0.0f32; DESIRE_LEN];
        let target_frames = 5u32;

        for frame_id in 0..target_frames {
            let inputs = engine.prepare_inputs(&desire, false);
            let buf = executor.execute(&inputs).await.unwrap();
            assert_eq!(buf.len(), OUTPUT_FLOATS);

            let decoded = engine.decode(frame_ctx(frame_id), &buf).unwrap();
            assert_eq!(decoded.model.frame_id, frame_id);
            assert_eq!(decoded.model.position.t.len(), TRAJECTORY_SIZE);
            assert_eq!(decoded.model.lane_lines.len(), 4);
            assert_eq!(decoded.model.leads.len(), 3);
            // Quiet mock scene decodes as low risk.
            assert_eq!(decoded.model.confidence, contracts::ConfidenceClass::Green);
            assert!(!decoded.model.meta.hard_brake_predicted);

            frame_tx.send(decoded).await.unwrap();
        }
        assert_eq!(engine.frame_count(), target_frames as u64);

        // Close channel to shut the dispatcher down, then inspect the files.
        drop(frame_tx);
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), dispatcher_handle).await;

        let jsonl = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
            .expect("jsonl sink should have created a run file");
        let content = std::fs::read_to_string(jsonl).unwrap();
        assert_eq!(content.lines().count(), target_frames as usize);

        let first: DecodedFrame = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first.model.frame_id, 0);
        assert_eq!(first.model.meta.desire_state.len(), DESIRE_LEN);
    }

    /// Record with the mock executor, then decode through the replay path.
    #[tokio::test]
    async fn test_e2e_record_then_replay() {
        let dir = tempfile::tempdir().unwrap();
        let recording = dir.path().join("recording.bin");

        // Record three mock frames.
        let mut mock = MockExecutor::new(3);
        let mut engine = DecodeEngine::new(DecoderConfig::default());
        let desire = [0.0f32; DESIRE_LEN];

        let mut buffers = Vec::new();
        for _ in 0..3 {
            let inputs = engine.prepare_inputs(&desire, false);
            buffers.push(mock.execute(&inputs).await.unwrap());
        }
        ReplayExecutor::save(&recording, &buffers).unwrap();

        // Replay through the factory and decode every frame.
        let config = ExecutorConfig {
            mode: contracts::ExecutorMode::Replay,
            replay_path: Some(recording),
            seed: 0,
        };
        let mut replay = build_executor(&config).unwrap();
        let mut engine = DecodeEngine::new(DecoderConfig::default());

        for frame_id in 0..3 {
            let inputs = engine.prepare_inputs(&desire, false);
            let buf = replay.execute(&inputs).await.unwrap();
            let decoded = engine.decode(frame_ctx(frame_id), &buf).unwrap();
            assert!(decoded.model.valid);
        }

        // Fourth frame: source exhausted.
        let inputs = engine.prepare_inputs(&desire, false);
        let err = replay.execute(&inputs).await.unwrap_err();
        assert!(matches!(err, contracts::PipelineError::Replay { .. }));
    }

    /// The recurrent feature loop: each decode feeds the next frame's input.
    #[tokio::test]
    async fn test_recurrent_features_flow_into_next_inputs() {
        let mut executor = MockExecutor::new(11);
        let mut engine = DecodeEngine::new(DecoderConfig::default());
        let desire = [0.0f32; DESIRE_LEN];

        let inputs = engine.prepare_inputs(&desire, false);
        let all_zero = inputs.feature_buffer.iter().all(|&v| v == 0.0);
        assert!(all_zero, "cold-start feature history must be zeroed");

        let buf = executor.execute(&inputs).await.unwrap();
        let features_tail = &buf[OUTPUT_FLOATS - tensor_view::FEATURE_LEN..];
        engine.decode(frame_ctx(0), &buf).unwrap();

        let inputs = engine.prepare_inputs(&desire, false);
        let history_tail =
            &inputs.feature_buffer[inputs.feature_buffer.len() - tensor_view::FEATURE_LEN..];
        assert_eq!(history_tail, features_tail);
    }

    /// Config file drives the whole pipeline assembly.
    #[tokio::test]
    async fn test_config_to_pipeline_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[decoder]
frequency_hz = 20

[executor]
mode = "mock"
seed = 5

[[sinks]]
name = "log"
sink_type = "log"
"#,
        )
        .unwrap();

        let blueprint = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        let mut executor = build_executor(&blueprint.executor).unwrap();
        let mut engine = DecodeEngine::new(blueprint.decoder.clone());

        let desire = [0.0f32; DESIRE_LEN];
        let inputs = engine.prepare_inputs(&desire, false);
        let buf = executor.execute(&inputs).await.unwrap();
        let decoded = engine.decode(frame_ctx(0), &buf).unwrap();

        observability::record_decode_metrics(&decoded.model);
        let mut aggregator = observability::DecodeMetricsAggregator::new();
        aggregator.update(&decoded.model);
        assert_eq!(aggregator.total_frames, 1);
    }
}
