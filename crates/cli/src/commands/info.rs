//! `info` command implementation.

use anyhow::{Context, Result};

use tensor_view::{
    DESIRE_LEN, DESIRE_PRED_LEN, DISENGAGE_LEN, DISENGAGE_T, FEATURE_LEN, HISTORY_LEN,
    LEAD_HYP_N, LEAD_SELECTION_N, LEAD_TRAJ_LEN, OUTPUT_FLOATS, PLAN_HYP_N, PREDICTION_FLOATS,
    TRAJECTORY_SIZE,
};

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let blueprint = if args.config.exists() {
        Some(
            config_loader::ConfigLoader::load_from_path(&args.config).with_context(|| {
                format!("Failed to load config from {}", args.config.display())
            })?,
        )
    } else {
        None
    };

    if args.json {
        let mut result = serde_json::json!({
            "layout": {
                "output_floats": OUTPUT_FLOATS,
                "prediction_floats": PREDICTION_FLOATS,
                "trajectory_size": TRAJECTORY_SIZE,
                "plan_hypotheses": PLAN_HYP_N,
                "lead_hypotheses": LEAD_HYP_N,
                "feature_len": FEATURE_LEN,
                "history_len": HISTORY_LEN,
            },
        });
        if let Some(ref bp) = blueprint {
            result["config"] = serde_json::to_value(bp)?;
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n=== Model Decoder Info ===\n");

    if args.layout || blueprint.is_none() {
        println!("Output tensor layout:");
        println!("  Total floats: {}", OUTPUT_FLOATS);
        println!(
            "  Prediction floats: {} (+ {} recurrent features)",
            PREDICTION_FLOATS, FEATURE_LEN
        );
        println!(
            "  Plan: {} hypotheses x {} steps",
            PLAN_HYP_N, TRAJECTORY_SIZE
        );
        println!(
            "  Leads: {} hypotheses x {} steps, {} anchors",
            LEAD_HYP_N, LEAD_TRAJ_LEN, LEAD_SELECTION_N
        );
        println!(
            "  Desire: {} categories, {} forecast buckets",
            DESIRE_LEN, DESIRE_PRED_LEN
        );
        println!(
            "  Disengage horizons ({}): {:?} s",
            DISENGAGE_LEN, DISENGAGE_T
        );
        println!("  Recurrent history: {} frames", HISTORY_LEN);
        println!();
    }

    if let Some(bp) = blueprint {
        println!("Configuration ({}):", args.config.display());
        println!("  Model frequency: {} Hz", bp.decoder.frequency_hz);
        println!("  Executor: {:?}", bp.executor.mode);
        println!(
            "  Raw prediction passthrough: {}",
            bp.decoder.send_raw_predictions
        );

        if args.sinks {
            println!("\nSinks ({}):", bp.sinks.len());
            for sink in &bp.sinks {
                println!(
                    "  - {} ({:?}, queue {})",
                    sink.name, sink.sink_type, sink.queue_capacity
                );
                for (key, value) in &sink.params {
                    println!("      {key} = {value}");
                }
            }
        }
        println!();
    }

    Ok(())
}
