//! 解码指标收集模块
//!
//! 基于 DrivingModelFrame 收集和统计解码管道的运行指标。

use contracts::{ConfidenceClass, DrivingModelFrame};
use metrics::{counter, gauge, histogram};

/// 从解码结果记录指标
///
/// 每解码一帧调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_decode_metrics;
///
/// let decoded = engine.decode(ctx, &buf)?;
/// record_decode_metrics(&decoded.model);
/// ```
pub fn record_decode_metrics(frame: &DrivingModelFrame) {
    // 帧计数器
    counter!("model_decoder_frames_total").increment(1);

    // 帧 ID (用于检测跳帧)
    gauge!("model_decoder_last_frame_id").set(frame.frame_id as f64);

    // 模型执行耗时 (秒 -> 毫秒)
    histogram!("model_decoder_execution_time_ms")
        .record(frame.model_execution_time as f64 * 1000.0);

    // 上游丢帧率
    gauge!("model_decoder_frame_drop_perc").set(frame.frame_drop_perc as f64);

    // 置信度分带
    let class = confidence_label(frame.confidence);
    counter!("model_decoder_confidence_total", "class" => class).increment(1);
    gauge!("model_decoder_confidence_band").set(frame.confidence as u8 as f64);

    // 介入概率
    gauge!("model_decoder_engaged_prob").set(frame.meta.engaged_prob as f64);

    // 硬刹预警
    if frame.meta.hard_brake_predicted {
        counter!("model_decoder_hard_brake_total").increment(1);
    }

    // 车道线存在概率
    for (idx, prob) in frame.lane_line_probs.iter().enumerate() {
        gauge!(
            "model_decoder_lane_line_prob",
            "lane" => idx.to_string()
        )
        .set(*prob as f64);
    }

    // 前车存在概率 (0s 锚点)
    if let Some(lead) = frame.leads.first() {
        gauge!("model_decoder_lead_prob").set(lead.prob as f64);
        histogram!("model_decoder_lead_prob_hist").record(lead.prob as f64);
    }
}

/// 记录解码帧分发
pub fn record_frame_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "model_decoder_frames_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

fn confidence_label(class: ConfidenceClass) -> &'static str {
    match class {
        ConfidenceClass::Green => "green",
        ConfidenceClass::Yellow => "yellow",
        ConfidenceClass::Red => "red",
    }
}

/// 解码指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DecodeMetricsAggregator {
    /// 总帧数
    pub total_frames: u64,

    /// 各置信度分带帧数 [green, yellow, red]
    pub confidence_counts: [u64; 3],

    /// 硬刹预警帧数
    pub hard_brake_frames: u64,

    /// 模型执行耗时统计 (毫秒)
    pub execution_time_stats: RunningStats,

    /// 介入概率统计
    pub engaged_prob_stats: RunningStats,

    /// 前车存在概率统计 (0s 锚点)
    pub lead_prob_stats: RunningStats,
}

impl DecodeMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, frame: &DrivingModelFrame) {
        self.total_frames += 1;
        self.confidence_counts[frame.confidence as u8 as usize] += 1;

        if frame.meta.hard_brake_predicted {
            self.hard_brake_frames += 1;
        }

        self.execution_time_stats
            .push(frame.model_execution_time as f64 * 1000.0);
        self.engaged_prob_stats.push(frame.meta.engaged_prob as f64);

        if let Some(lead) = frame.leads.first() {
            self.lead_prob_stats.push(lead.prob as f64);
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let rate = |count: u64| {
            if self.total_frames > 0 {
                count as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            }
        };

        MetricsSummary {
            total_frames: self.total_frames,
            green_frames: self.confidence_counts[0],
            yellow_frames: self.confidence_counts[1],
            red_frames: self.confidence_counts[2],
            red_rate: rate(self.confidence_counts[2]),
            hard_brake_frames: self.hard_brake_frames,
            hard_brake_rate: rate(self.hard_brake_frames),
            execution_time_ms: StatsSummary::from(&self.execution_time_stats),
            engaged_prob: StatsSummary::from(&self.engaged_prob_stats),
            lead_prob: StatsSummary::from(&self.lead_prob_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub green_frames: u64,
    pub yellow_frames: u64,
    pub red_frames: u64,
    pub red_rate: f64,
    pub hard_brake_frames: u64,
    pub hard_brake_rate: f64,
    pub execution_time_ms: StatsSummary,
    pub engaged_prob: StatsSummary,
    pub lead_prob: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Decode Metrics Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(
            f,
            "Confidence: green={} yellow={} red={} ({:.2}% red)",
            self.green_frames, self.yellow_frames, self.red_frames, self.red_rate
        )?;
        writeln!(
            f,
            "Hard-brake flags: {} ({:.2}%)",
            self.hard_brake_frames, self.hard_brake_rate
        )?;
        writeln!(f, "Execution time (ms): {}", self.execution_time_ms)?;
        writeln!(f, "Engaged prob: {}", self.engaged_prob)?;
        writeln!(f, "Lead prob: {}", self.lead_prob)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::LeadForecast;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = DecodeMetricsAggregator::new();

        let mut frame = DrivingModelFrame {
            model_execution_time: 0.02,
            confidence: ConfidenceClass::Yellow,
            ..Default::default()
        };
        frame.meta.hard_brake_predicted = true;
        frame.meta.engaged_prob = 0.9;
        frame.leads.push(LeadForecast {
            prob: 0.8,
            ..Default::default()
        });

        aggregator.update(&frame);

        assert_eq!(aggregator.total_frames, 1);
        assert_eq!(aggregator.confidence_counts, [0, 1, 0]);
        assert_eq!(aggregator.hard_brake_frames, 1);
        assert_eq!(aggregator.lead_prob_stats.count(), 1);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = DecodeMetricsAggregator::new();
        for _ in 0..4 {
            aggregator.update(&DrivingModelFrame::default());
        }

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total frames: 4"));
        assert!(output.contains("green=4"));
    }
}
