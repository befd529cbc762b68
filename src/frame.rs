// 该文件是 Maisui （麦穗） 项目的一部分。
// src/frame.rs - 张量帧定义
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

use thiserror::Error;

const RGB_CHANNELS: usize = 3;

/// 网络输入张量：NCHW 布局，f32，像素值已归一化到 [0, 1]。
/// 模型输入尺寸在类型层面固定（与模型文件一一对应）。
#[derive(Debug, Clone)]
pub struct NchwTensor<const W: u32, const H: u32> {
  data: Box<[f32]>,
}

impl<const W: u32, const H: u32> From<Vec<f32>> for NchwTensor<W, H> {
  fn from(data: Vec<f32>) -> Self {
    if data.len() != (RGB_CHANNELS * W as usize * H as usize) {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        RGB_CHANNELS * W as usize * H as usize,
        data.len()
      );
    }

    Self {
      data: data.into_boxed_slice(),
    }
  }
}

impl<const W: u32, const H: u32> Default for NchwTensor<W, H> {
  fn default() -> Self {
    let size = RGB_CHANNELS * (W as usize) * (H as usize);
    let data = vec![0f32; size].into_boxed_slice();
    Self { data }
  }
}

impl<const W: u32, const H: u32> NchwTensor<W, H> {
  pub fn height(&self) -> usize {
    H as usize
  }

  pub fn width(&self) -> usize {
    W as usize
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  /// 读取指定位置的像素值（c 为通道，x 为列，y 为行）。
  pub fn at(&self, c: usize, y: usize, x: usize) -> f32 {
    self.data[c * (H as usize) * (W as usize) + y * (W as usize) + x]
  }
}

impl<const W: u32, const H: u32> AsRef<[f32]> for NchwTensor<W, H> {
  fn as_ref(&self) -> &[f32] {
    &self.data
  }
}

impl<const W: u32, const H: u32> AsMut<[f32]> for NchwTensor<W, H> {
  fn as_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }
}

#[derive(Error, Debug)]
pub enum RawOutputError {
  #[error("输出张量形状不匹配: 期望 {expected} 个元素, 实际 {found} 个")]
  ShapeMismatch { expected: usize, found: usize },
  #[error("每个候选的属性数量过少: {0}, 至少需要 4 + 1 个")]
  TooFewAttrs(usize),
}

/// 网络原始输出张量：候选主序 (num_candidates × num_attrs)，
/// 每行为 [cx, cy, w, h, 类别分数 ...]，坐标位于填充后的输入图像空间。
///
/// 行/列主序是模型的固定约定而非自动探测；若运行时给出的是
/// 属性主序 (num_attrs × num_candidates)，引擎适配层需通过
/// [`RawOutput::from_attrs_major`] 转置后再交给解码器。
#[derive(Debug, Clone)]
pub struct RawOutput {
  data: Box<[f32]>,
  num_candidates: usize,
  num_attrs: usize,
}

impl RawOutput {
  pub fn new(
    data: Vec<f32>,
    num_candidates: usize,
    num_attrs: usize,
  ) -> Result<Self, RawOutputError> {
    if num_attrs < 5 {
      return Err(RawOutputError::TooFewAttrs(num_attrs));
    }

    let expected = num_candidates * num_attrs;
    if data.len() != expected {
      return Err(RawOutputError::ShapeMismatch {
        expected,
        found: data.len(),
      });
    }

    Ok(Self {
      data: data.into_boxed_slice(),
      num_candidates,
      num_attrs,
    })
  }

  /// 由属性主序数据构造（YOLOv8/11 的 ONNX 输出形如 (1, 4+C, N)）。
  pub fn from_attrs_major(
    data: Vec<f32>,
    num_attrs: usize,
    num_candidates: usize,
  ) -> Result<Self, RawOutputError> {
    if num_attrs < 5 {
      return Err(RawOutputError::TooFewAttrs(num_attrs));
    }

    let expected = num_candidates * num_attrs;
    if data.len() != expected {
      return Err(RawOutputError::ShapeMismatch {
        expected,
        found: data.len(),
      });
    }

    let mut transposed = vec![0f32; expected];
    for a in 0..num_attrs {
      for n in 0..num_candidates {
        transposed[n * num_attrs + a] = data[a * num_candidates + n];
      }
    }

    Ok(Self {
      data: transposed.into_boxed_slice(),
      num_candidates,
      num_attrs,
    })
  }

  pub fn num_candidates(&self) -> usize {
    self.num_candidates
  }

  pub fn num_attrs(&self) -> usize {
    self.num_attrs
  }

  pub fn num_classes(&self) -> usize {
    self.num_attrs - 4
  }

  pub fn row(&self, index: usize) -> &[f32] {
    &self.data[index * self.num_attrs..(index + 1) * self.num_attrs]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_output_rejects_length_mismatch() {
    let err = RawOutput::new(vec![0.0; 11], 2, 6).unwrap_err();
    assert!(matches!(
      err,
      RawOutputError::ShapeMismatch {
        expected: 12,
        found: 11
      }
    ));
  }

  #[test]
  fn raw_output_rejects_too_few_attrs() {
    let err = RawOutput::new(vec![0.0; 8], 2, 4).unwrap_err();
    assert!(matches!(err, RawOutputError::TooFewAttrs(4)));
  }

  #[test]
  fn from_attrs_major_transposes() {
    // 属性主序: 每个属性连续存放 2 个候选的值
    let data = vec![
      1.0, 2.0, // cx
      3.0, 4.0, // cy
      5.0, 6.0, // w
      7.0, 8.0, // h
      0.9, 0.1, // 类别分数
    ];
    let raw = RawOutput::from_attrs_major(data, 5, 2).unwrap();
    assert_eq!(raw.num_candidates(), 2);
    assert_eq!(raw.num_classes(), 1);
    assert_eq!(raw.row(0), &[1.0, 3.0, 5.0, 7.0, 0.9]);
    assert_eq!(raw.row(1), &[2.0, 4.0, 6.0, 8.0, 0.1]);
  }

  #[test]
  fn nchw_tensor_checks_length() {
    let tensor: NchwTensor<4, 2> = NchwTensor::from(vec![0.5; 24]);
    assert_eq!(tensor.width(), 4);
    assert_eq!(tensor.height(), 2);
    assert_eq!(tensor.channels(), 3);
    assert_eq!(tensor.at(2, 1, 3), 0.5);
  }
}
