// 该文件是 Maisui （麦穗） 项目的一部分。
// src/bin/simple_oneshot.rs - 单张图像检测
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::Result;
use clap::Parser;
use url::Url;

use maisui::{
  FromUrl,
  input::InputWrapper,
  metrics,
  model::{ReplayEngine, WheatLabel, Yolo11Builder},
  output::{OutputWrapper, Render},
};
use tracing::info;

/// Maisui 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 记录的模型输出 (replay://path.json)
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 输入来源 (image://path)
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出路径 (image://path 或 report://path)
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
  /// 置信度阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.25", value_name = "THRESHOLD")]
  pub confidence: f32,
  /// NMS IOU 阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.45", value_name = "THRESHOLD")]
  pub nms_threshold: f32,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型记录路径: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let input = InputWrapper::from_url(&args.input)?;
  let engine = ReplayEngine::from_url(&args.model)?;
  let detector = Yolo11Builder::default()
    .conf_thres(args.confidence)
    .iou_thres(args.nms_threshold)
    .build::<WheatLabel, _, 640, 640>(engine);
  let output = OutputWrapper::from_url(&args.output)?;

  info!("开始推理...");
  for frame in input {
    let now = std::time::Instant::now();
    let result = detector.detect(&frame)?;
    let elapsed = now.elapsed();
    info!("推理完成，耗时: {:.2?}", elapsed);

    let report = metrics::summarize(&result);
    info!(
      "麦穗数量: {}, 预估产量: {:.1} kg/亩, 长势指数: {:.1}",
      report.count, report.estimated_yield_kg, report.health_index
    );

    output.render_result(&frame, &result)?;
  }

  Ok(())
}
