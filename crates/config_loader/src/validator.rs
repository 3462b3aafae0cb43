//! 配置校验模块
//!
//! 校验规则：
//! - 数值范围合法 (validator derive)
//! - severe_relaxed <= severe_strict
//! - score_green < score_yellow
//! - sink 名称唯一且非空
//! - replay 模式必须提供 replay_path

use std::collections::HashSet;

use validator::Validate;

use contracts::{ExecutorMode, PipelineBlueprint, PipelineError};

/// 校验 PipelineBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    validate_ranges(blueprint)?;
    validate_hazard_thresholds(blueprint)?;
    validate_confidence_bands(blueprint)?;
    validate_executor(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 字段级范围校验 (validator derive)
fn validate_ranges(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    blueprint.validate().map_err(|e| {
        let field = e
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "decoder".to_string());
        PipelineError::config_validation(field, e.to_string())
    })
}

/// 校验 hazard 阈值次序
fn validate_hazard_thresholds(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    let hazard = &blueprint.decoder.hazard;
    if hazard.severe_relaxed > hazard.severe_strict {
        return Err(PipelineError::config_validation(
            "decoder.hazard.severe_relaxed / severe_strict",
            format!(
                "severe_relaxed ({}) must be <= severe_strict ({})",
                hazard.severe_relaxed, hazard.severe_strict
            ),
        ));
    }
    Ok(())
}

/// 校验置信度分带次序
fn validate_confidence_bands(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    let bands = &blueprint.decoder.confidence;
    if bands.score_green >= bands.score_yellow {
        return Err(PipelineError::config_validation(
            "decoder.confidence.score_green / score_yellow",
            format!(
                "score_green ({}) must be < score_yellow ({})",
                bands.score_green, bands.score_yellow
            ),
        ));
    }
    Ok(())
}

/// 校验 executor 配置
fn validate_executor(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    if blueprint.executor.mode == ExecutorMode::Replay && blueprint.executor.replay_path.is_none() {
        return Err(PipelineError::config_validation(
            "executor.replay_path",
            "replay mode requires a recording path",
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &PipelineBlueprint) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(PipelineError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(PipelineError::config_validation(
                format!("sinks[{idx}].name"),
                format!("duplicate sink name '{}'", sink.name),
            ));
        }
    }
    Ok(())
}
