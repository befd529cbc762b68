// 该文件是 Maisui （麦穗） 项目的一部分。
// src/pipeline/letterbox.rs - 保持宽高比的信箱缩放
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

use image::{RgbImage, imageops::FilterType};
use tracing::debug;

use crate::frame::NchwTensor;

/// 填充区域的常量灰度值（0-255 空间）。
pub const PAD_FILL: u8 = 114;

/// 信箱缩放结果：填充后的网络输入张量，以及把检测框映射回
/// 原始图像坐标所需的缩放系数和填充偏移。
#[derive(Debug, Clone)]
pub struct Letterbox<const W: u32, const H: u32> {
  pub tensor: NchwTensor<W, H>,
  pub scale: f32,
  pub pad_left: f32,
  pub pad_top: f32,
}

/// 将任意尺寸的 RGB 图像缩放并填充到 W×H 的网络输入。
///
/// 缩放取 min(H/h, W/w)，即完整放入目标而不裁剪；双线性插值；
/// 剩余空间以 114 灰填充并平分到两侧。两侧填充量用
/// round(pad/2 - 0.1) / round(pad/2 + 0.1) 的偏置舍入拆分，
/// 奇数余量时偏向下/右侧，该舍入方式需与参考输出逐位一致，
/// 不得改动。
///
/// 前置条件：图像面积非零（由调用方校验）。
pub fn letterbox<const W: u32, const H: u32>(image: &RgbImage) -> Letterbox<W, H> {
  let (width, height) = image.dimensions();

  let scale = (H as f32 / height as f32).min(W as f32 / width as f32);
  let new_w = ((width as f32 * scale).round() as u32).max(1);
  let new_h = ((height as f32 * scale).round() as u32).max(1);
  debug!(
    "信箱缩放: {}x{} -> {}x{}, 系数 {}",
    width, height, new_w, new_h, scale
  );

  let resized = if (new_w, new_h) == (width, height) {
    image.clone()
  } else {
    image::imageops::resize(image, new_w, new_h, FilterType::Triangle)
  };

  let pad_w = (W - new_w) as f32 / 2.0;
  let pad_h = (H - new_h) as f32 / 2.0;
  let top = (pad_h - 0.1).round() as u32;
  let left = (pad_w - 0.1).round() as u32;

  // 直接写入 NCHW f32 张量：先铺满填充灰，再覆盖缩放后的像素。
  // image crate 解码即为 RGB，无需像 OpenCV 管线那样反转通道序。
  let plane = (W as usize) * (H as usize);
  let mut data = vec![PAD_FILL as f32 / 255.0; 3 * plane];
  for (x, y, pixel) in resized.enumerate_pixels() {
    let row = (y + top) as usize;
    let col = (x + left) as usize;
    for c in 0..3 {
      data[c * plane + row * (W as usize) + col] = pixel[c] as f32 / 255.0;
    }
  }

  Letterbox {
    tensor: NchwTensor::from(data),
    scale,
    pad_left: left as f32,
    pad_top: top as f32,
  }
}
