// 该文件是 Maisui （麦穗） 项目的一部分。
// src/model/yolo11.rs - YOLO11 麦穗检测器
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::model::{DetectResult, Engine, WithLabel};
use crate::pipeline::{decode, invert, letterbox, nms};

pub const YOLO11_CONF_THRES: f32 = 0.25;
pub const YOLO11_IOU_THRES: f32 = 0.45;
pub const YOLO11_CLASS_NUM: usize = 1;

#[derive(Error, Debug)]
pub enum Yolo11Error<E> {
  #[error("无效图像: {width}x{height}, 面积为零")]
  InvalidImage { width: u32, height: u32 },
  // 类别数量不符说明模型与流水线配置不一致，属于启动期配置错误，
  // 调用方应视为致命错误而非按请求重试
  #[error("输出类别数量不匹配: 期望 {expected}, 实际 {found}")]
  ShapeMismatch { expected: usize, found: usize },
  #[error("推理引擎错误: {0}")]
  Engine(E),
}

/// YOLO11 检测器：组合信箱缩放、解码、坐标还原与 NMS，
/// 推理本身交给注入的引擎。各阶段不保留跨调用状态。
pub struct Yolo11<T, E, const W: u32, const H: u32> {
  engine: E,
  conf_thres: f32,
  iou_thres: f32,
  num_classes: usize,
  _phantom: std::marker::PhantomData<T>,
}

#[derive(Debug, Clone)]
pub struct Yolo11Builder {
  conf_thres: f32,
  iou_thres: f32,
  num_classes: usize,
}

impl Default for Yolo11Builder {
  fn default() -> Self {
    Self {
      conf_thres: YOLO11_CONF_THRES,
      iou_thres: YOLO11_IOU_THRES,
      num_classes: YOLO11_CLASS_NUM,
    }
  }
}

impl Yolo11Builder {
  pub fn conf_thres(mut self, conf_thres: f32) -> Self {
    self.conf_thres = conf_thres;
    self
  }

  pub fn iou_thres(mut self, iou_thres: f32) -> Self {
    self.iou_thres = iou_thres;
    self
  }

  pub fn num_classes(mut self, num_classes: usize) -> Self {
    self.num_classes = num_classes;
    self
  }

  pub fn build<T, E, const W: u32, const H: u32>(self, engine: E) -> Yolo11<T, E, W, H> {
    Yolo11 {
      engine,
      conf_thres: self.conf_thres,
      iou_thres: self.iou_thres,
      num_classes: self.num_classes,
      _phantom: std::marker::PhantomData,
    }
  }
}

impl<T, E, const W: u32, const H: u32> Yolo11<T, E, W, H>
where
  T: WithLabel,
  E: Engine<W, H>,
{
  /// 端到端检测：图像进，原始图像坐标系下的检测框序列出。
  /// 无候选或全部被抑制时返回空结果；错误时不产生部分结果。
  pub fn detect(&self, image: &RgbImage) -> Result<DetectResult<T>, Yolo11Error<E::Error>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
      return Err(Yolo11Error::InvalidImage { width, height });
    }

    debug!("预处理: {}x{} -> {}x{}", width, height, W, H);
    let lb = letterbox::<W, H>(image);
    debug!(
      "缩放系数 {}, 填充偏移 ({}, {})",
      lb.scale, lb.pad_left, lb.pad_top
    );

    debug!("执行引擎推理");
    let raw = self.engine.run(&lb.tensor).map_err(Yolo11Error::Engine)?;

    if raw.num_classes() != self.num_classes {
      return Err(Yolo11Error::ShapeMismatch {
        expected: self.num_classes,
        found: raw.num_classes(),
      });
    }

    let candidates = decode(&raw, self.conf_thres);
    let items = invert(candidates, lb.scale, lb.pad_left, lb.pad_top);
    let kept = nms(items, self.conf_thres, self.iou_thres);
    debug!("检测到 {} 个目标", kept.len());

    Ok(DetectResult {
      items: kept.into_boxed_slice(),
    })
  }

  pub fn conf_thres(&self) -> f32 {
    self.conf_thres
  }

  pub fn iou_thres(&self) -> f32 {
    self.iou_thres
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_defaults_match_model_constants() {
    let builder = Yolo11Builder::default();
    assert_eq!(builder.conf_thres, YOLO11_CONF_THRES);
    assert_eq!(builder.iou_thres, YOLO11_IOU_THRES);
    assert_eq!(builder.num_classes, 1);
  }
}
