// 该文件是 Maisui （麦穗） 项目的一部分。
// src/metrics.rs - 农情指标估算
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use serde_json::json;

use crate::model::DetectResult;

// 产量估算系数：
// 假设照片拍摄面积约为 0.6 平方米
// 1 亩 = 666.67 平方米
// 标准小麦产量约 400 kg/亩, 标准密度约 40-50 万穗/亩
pub const PHOTO_AREA_M2: f32 = 0.6;
pub const MU_AREA_M2: f32 = 666.67;
/// 单穗平均粒重 (g)，约 35-40 粒 × 每粒 1 g
pub const AVG_GRAIN_WEIGHT_G: f32 = 35.0;
/// 纹理均匀度（暂为固定值，后续由纹理分析给出）
pub const TEXTURE_SCORE: f32 = 0.95;

/// 单张照片的农情汇总：麦穗计数、亩产估算与长势指数。
#[derive(Debug, Clone)]
pub struct FieldReport {
  pub count: usize,
  /// 每亩估计穗数
  pub estimated_density: f32,
  /// 估算产量 (kg/亩)
  pub estimated_yield_kg: f32,
  pub avg_confidence: f32,
  /// 长势指数 = (置信度×0.6 + 纹理×0.4) × 100
  pub health_index: f32,
}

pub fn summarize<T>(result: &DetectResult<T>) -> FieldReport {
  let count = result.len();
  let area_scale = MU_AREA_M2 / PHOTO_AREA_M2;
  let estimated_density = count as f32 * area_scale;
  let estimated_yield_kg = estimated_density * AVG_GRAIN_WEIGHT_G / 1000.0;

  let avg_confidence = result.mean_score();
  let health_index = (avg_confidence * 0.6 + TEXTURE_SCORE * 0.4) * 100.0;

  FieldReport {
    count,
    estimated_density,
    estimated_yield_kg,
    avg_confidence,
    health_index,
  }
}

fn round1(value: f32) -> f64 {
  (value as f64 * 10.0).round() / 10.0
}

impl FieldReport {
  /// 序列化为带计算步骤的 JSON 报告。
  pub fn to_json(&self) -> serde_json::Value {
    json!({
      "count": self.count,
      "estimated_yield": round1(self.estimated_yield_kg),
      "health_index": round1(self.health_index),
      "calculation_steps": {
        "yield": {
          "count": self.count,
          "photo_area": PHOTO_AREA_M2,
          "area_scale": round1(MU_AREA_M2 / PHOTO_AREA_M2),
          "estimated_density": self.estimated_density as i64,
          "avg_grain_weight": AVG_GRAIN_WEIGHT_G,
          "formula": "(count × 面积系数) × 单穗粒重 / 1000",
          "result": round1(self.estimated_yield_kg),
        },
        "health": {
          "avg_confidence": round1(self.avg_confidence * 100.0),
          "texture_score": round1(TEXTURE_SCORE * 100.0),
          "formula": "置信度×0.6 + 纹理×0.4",
          "result": round1(self.health_index),
        },
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{DetectItem, DetectResult, WheatLabel};

  fn result(scores: &[f32]) -> DetectResult<WheatLabel> {
    DetectResult {
      items: scores
        .iter()
        .map(|&score| DetectItem {
          kind: WheatLabel::WheatEar,
          score,
          bbox: [0.0, 0.0, 1.0, 1.0],
        })
        .collect(),
    }
  }

  #[test]
  fn empty_result_gives_zero_yield() {
    let report = summarize(&result(&[]));
    assert_eq!(report.count, 0);
    assert_eq!(report.estimated_yield_kg, 0.0);
    assert_eq!(report.avg_confidence, 0.0);
    // 长势仅剩纹理项: 0.95 × 0.4 × 100
    assert!((report.health_index - 38.0).abs() < 1e-4);
  }

  #[test]
  fn yield_formula_matches_reference() {
    let report = summarize(&result(&[0.9, 0.8, 0.7]));
    assert_eq!(report.count, 3);
    // 3 × (666.67 / 0.6) = 3333.35 穗/亩
    assert!((report.estimated_density - 3333.35).abs() < 0.1);
    // 3333.35 × 35 / 1000 ≈ 116.7 kg/亩
    assert!((report.estimated_yield_kg - 116.667).abs() < 0.01);
    assert!((report.avg_confidence - 0.8).abs() < 1e-6);
    assert!((report.health_index - 86.0).abs() < 1e-3);
  }

  #[test]
  fn json_report_carries_calculation_steps() {
    let value = summarize(&result(&[0.5])).to_json();
    assert_eq!(value["count"], 1);
    assert_eq!(value["calculation_steps"]["yield"]["count"], 1);
    assert_eq!(
      value["calculation_steps"]["health"]["formula"],
      "置信度×0.6 + 纹理×0.4"
    );
  }
}
