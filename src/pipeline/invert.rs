// 该文件是 Maisui （麦穗） 项目的一部分。
// src/pipeline/invert.rs - 坐标系还原
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

use crate::model::{DetectItem, WithLabel};
use crate::pipeline::Candidate;

/// 把候选框从填充后的输入空间还原到原始图像像素空间：
/// 中心点形式转角点形式，减去填充偏移，再除以缩放系数。
///
/// 结果在图像边缘处可能略微超出 [0, W)×[0, H)，这里不做裁剪
/// （裁剪会改变边缘框的面积进而影响 IoU，仅在绘制时裁剪）。
pub fn invert<T: WithLabel>(
  candidates: Vec<Candidate>,
  scale: f32,
  pad_left: f32,
  pad_top: f32,
) -> Vec<DetectItem<T>> {
  candidates
    .into_iter()
    .map(|c| {
      let x_min = (c.cx - c.w / 2.0 - pad_left) / scale;
      let y_min = (c.cy - c.h / 2.0 - pad_top) / scale;
      let x_max = (c.cx + c.w / 2.0 - pad_left) / scale;
      let y_max = (c.cy + c.h / 2.0 - pad_top) / scale;

      DetectItem {
        kind: T::from_label_id(c.class_id),
        score: c.score,
        bbox: [x_min, y_min, x_max, y_max],
      }
    })
    .collect()
}
