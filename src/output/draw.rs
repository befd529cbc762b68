// 该文件是 Maisui （麦穗） 项目的一部分。
// src/output/draw.rs - 检测结果可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::model::{DetectResult, WithLabel};

// 绘制常量
const BOX_COLOR: [u8; 3] = [255, 196, 0]; // 麦黄色
const BOX_THICKNESS: u32 = 2;

pub struct Draw {
  color: Rgb<u8>,
  thickness: u32,
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      color: Rgb(BOX_COLOR),
      thickness: BOX_THICKNESS,
    }
  }
}

impl Draw {
  /// 在原图副本上绘制全部检测框。
  pub fn draw_detection<T: WithLabel>(
    &self,
    image: &RgbImage,
    result: &DetectResult<T>,
  ) -> RgbImage {
    let mut canvas = image.clone();
    for item in result.items.iter() {
      self.draw_bbox(&mut canvas, &item.bbox);
    }
    canvas
  }

  // 检测框坐标可能略微越界，仅在栅格化时裁剪到图像范围
  fn draw_bbox(&self, canvas: &mut RgbImage, bbox: &[f32; 4]) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
      return;
    }

    let x_min = bbox[0].clamp(0.0, (width - 1) as f32) as i32;
    let y_min = bbox[1].clamp(0.0, (height - 1) as f32) as i32;
    let x_max = bbox[2].clamp(0.0, (width - 1) as f32) as i32;
    let y_max = bbox[3].clamp(0.0, (height - 1) as f32) as i32;

    let box_w = (x_max - x_min).max(1) as u32;
    let box_h = (y_max - y_min).max(1) as u32;

    for t in 0..self.thickness {
      let inset_w = box_w.saturating_sub(2 * t).max(1);
      let inset_h = box_h.saturating_sub(2 * t).max(1);
      let rect = Rect::at(x_min + t as i32, y_min + t as i32).of_size(inset_w, inset_h);
      draw_hollow_rect_mut(canvas, rect, self.color);
    }
  }
}
