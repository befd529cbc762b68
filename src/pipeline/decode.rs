// 该文件是 Maisui （麦穗） 项目的一部分。
// src/pipeline/decode.rs - 网络输出解码
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

use tracing::debug;

use crate::frame::RawOutput;

/// 置信度筛选后的候选框：中心点形式，坐标位于填充后的输入图像空间。
#[derive(Debug, Clone)]
pub struct Candidate {
  pub cx: f32,
  pub cy: f32,
  pub w: f32,
  pub h: f32,
  pub score: f32,
  pub class_id: u32,
}

/// 逐行解码原始输出：score = max(row[4..])，class_id = argmax(row[4..])，
/// 仅保留 score 严格大于阈值的行，行序保持不变。
/// 没有行通过筛选时返回空序列，不是错误。
pub fn decode(output: &RawOutput, conf_thres: f32) -> Vec<Candidate> {
  let mut candidates = Vec::new();

  for index in 0..output.num_candidates() {
    let row = output.row(index);

    let mut score = f32::MIN;
    let mut class_id = 0u32;
    for (c, &s) in row[4..].iter().enumerate() {
      if s > score {
        score = s;
        class_id = c as u32;
      }
    }

    if score > conf_thres {
      candidates.push(Candidate {
        cx: row[0],
        cy: row[1],
        w: row[2],
        h: row[3],
        score,
        class_id,
      });
    }
  }

  debug!(
    "解码完成: {} 个候选中 {} 个超过阈值 {}",
    output.num_candidates(),
    candidates.len(),
    conf_thres
  );

  candidates
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(rows: &[[f32; 6]]) -> RawOutput {
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    RawOutput::new(flat, rows.len(), 6).unwrap()
  }

  #[test]
  fn keeps_max_score_and_argmax_class() {
    let output = raw(&[[10.0, 20.0, 4.0, 6.0, 0.3, 0.8]]);
    let candidates = decode(&output, 0.25);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].score, 0.8);
    assert_eq!(candidates[0].class_id, 1);
    assert_eq!(candidates[0].cx, 10.0);
    assert_eq!(candidates[0].h, 6.0);
  }

  #[test]
  fn threshold_is_strict() {
    let output = raw(&[[0.0, 0.0, 1.0, 1.0, 0.5, 0.1]]);
    assert!(decode(&output, 0.5).is_empty());
    assert_eq!(decode(&output, 0.49).len(), 1);
  }

  #[test]
  fn survivors_keep_row_order() {
    let output = raw(&[
      [1.0, 0.0, 1.0, 1.0, 0.3, 0.0],
      [2.0, 0.0, 1.0, 1.0, 0.1, 0.0],
      [3.0, 0.0, 1.0, 1.0, 0.9, 0.0],
    ]);
    let candidates = decode(&output, 0.2);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].cx, 1.0);
    assert_eq!(candidates[1].cx, 3.0);
  }

  #[test]
  fn raising_threshold_never_adds_survivors() {
    let output = raw(&[
      [0.0, 0.0, 1.0, 1.0, 0.15, 0.0],
      [0.0, 0.0, 1.0, 1.0, 0.35, 0.0],
      [0.0, 0.0, 1.0, 1.0, 0.55, 0.0],
      [0.0, 0.0, 1.0, 1.0, 0.75, 0.0],
    ]);
    let mut last = usize::MAX;
    for thres in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
      let count = decode(&output, thres).len();
      assert!(count <= last);
      last = count;
    }
    assert_eq!(last, 0);
  }

  #[test]
  fn zero_rows_is_empty_not_error() {
    let output = RawOutput::new(Vec::new(), 0, 6).unwrap();
    assert!(decode(&output, 0.25).is_empty());
  }
}
