// 该文件是 Maisui （麦穗） 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::frame::{NchwTensor, RawOutput};

/// 推理引擎能力接口：张量进、张量出，同步执行。
///
/// 真实的推理运行时（NPU、ONNX Runtime 等）在此 seam 之外；
/// 实现方需自行说明其线程安全性，若不支持并发调用，
/// 由调用方串行化执行，预/后处理仍可按请求并发。
pub trait Engine<const W: u32, const H: u32> {
  type Error;

  fn run(&self, input: &NchwTensor<W, H>) -> Result<RawOutput, Self::Error>;
}

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  fn from_label_id(id: u32) -> Self;
}

/// 麦穗检测只有单一类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheatLabel {
  WheatEar,
}

impl WithLabel for WheatLabel {
  fn to_label_str(&self) -> String {
    "wheat".to_string()
  }

  fn from_label_id(_id: u32) -> Self {
    WheatLabel::WheatEar
  }
}

#[derive(Debug, Clone)]
pub struct DetectItem<T> {
  pub kind: T,
  pub score: f32,
  pub bbox: [f32; 4], // [x_min, y_min, x_max, y_max]，原始图像像素坐标
}

#[derive(Debug, Clone)]
pub struct DetectResult<T> {
  pub items: Box<[DetectItem<T>]>,
}

impl<T> DetectResult<T> {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn mean_score(&self) -> f32 {
    if self.items.is_empty() {
      return 0.0;
    }
    self.items.iter().map(|item| item.score).sum::<f32>() / self.items.len() as f32
  }
}

#[cfg(feature = "model_yolo11")]
mod yolo11;
#[cfg(feature = "model_yolo11")]
pub use self::yolo11::{
  YOLO11_CLASS_NUM, YOLO11_CONF_THRES, YOLO11_IOU_THRES, Yolo11, Yolo11Builder, Yolo11Error,
};

#[cfg(feature = "replay_engine")]
mod replay;
#[cfg(feature = "replay_engine")]
pub use self::replay::{ReplayEngine, ReplayEngineError};
