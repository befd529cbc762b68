// 该文件是 Maisui （麦穗） 项目的一部分。
// src/output/json_report.rs - JSON 检测报告输出
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::Path;

use chrono::Utc;
use image::RgbImage;
use serde_json::json;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::metrics;
use crate::model::{DetectResult, WithLabel};
use crate::output::Render;
use crate::{FromUrl, FromUrlWithScheme};

/// 把检测框、农情指标与计算步骤写成 JSON 报告文件。
pub struct JsonReportOutput {
  path: String,
}

#[derive(Error, Debug)]
pub enum JsonReportError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

impl FromUrlWithScheme for JsonReportOutput {
  const SCHEME: &'static str = "report";
}

impl FromUrl for JsonReportOutput {
  type Error = JsonReportError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(JsonReportError::SchemeMismatch);
    }

    Ok(JsonReportOutput {
      path: uri.path().to_string(),
    })
  }
}

impl<T: WithLabel> Render<RgbImage, DetectResult<T>> for JsonReportOutput {
  type Error = JsonReportError;

  fn render_result(&self, frame: &RgbImage, result: &DetectResult<T>) -> Result<(), Self::Error> {
    let report = metrics::summarize(result);

    let detections: Vec<serde_json::Value> = result
      .items
      .iter()
      .map(|item| {
        json!({
          "box": item.bbox,
          "score": item.score,
          "label": item.kind.to_label_str(),
        })
      })
      .collect();

    let mut value = report.to_json();
    value["generated_at"] = json!(Utc::now().to_rfc3339());
    value["image"] = json!({
      "width": frame.width(),
      "height": frame.height(),
    });
    value["detections"] = json!(detections);

    if let Some(parent) = Path::new(&self.path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(&self.path)?;
    serde_json::to_writer_pretty(file, &value)?;

    info!("写入检测报告: {}", self.path);

    Ok(())
  }
}
