// 该文件是 Maisui （麦穗） 项目的一部分。
// src/pipeline/nms.rs - 非极大值抑制
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

use crate::model::DetectItem;

/// 两个角点形式框的交并比。零面积或无重叠时按约定返回 0，
/// 并集不为正时不做除法。
pub fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
  let x1 = a[0].max(b[0]);
  let y1 = a[1].max(b[1]);
  let x2 = a[2].min(b[2]);
  let y2 = a[3].min(b[3]);

  let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
  let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
  let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
  let union = area_a + area_b - intersection;

  if union > 0.0 {
    intersection / union
  } else {
    0.0
  }
}

/// 经典贪心 NMS：丢弃 score <= score_thres 的框，按分数降序
/// （同分保持原序）依次保留最高分框，剔除与其 IoU 大于阈值的框。
///
/// 抑制是全局的，跨类别进行——这是沿用参考实现的有意行为，
/// 不要改成按类别抑制。
pub fn nms<T>(
  mut items: Vec<DetectItem<T>>,
  score_thres: f32,
  iou_thres: f32,
) -> Vec<DetectItem<T>> {
  items.retain(|item| item.score > score_thres);
  items.sort_by(|a, b| b.score.total_cmp(&a.score));

  let mut kept = Vec::new();
  while !items.is_empty() {
    let best = items.remove(0);
    items.retain(|item| iou(&best.bbox, &item.bbox) <= iou_thres);
    kept.push(best);
  }

  debug!("NMS 保留 {} 个检测框", kept.len());
  kept
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::WheatLabel;

  fn item(bbox: [f32; 4], score: f32) -> DetectItem<WheatLabel> {
    DetectItem {
      kind: WheatLabel::WheatEar,
      score,
      bbox,
    }
  }

  #[test]
  fn identical_boxes_keep_only_best() {
    let kept = nms(
      vec![
        item([10.0, 10.0, 50.0, 50.0], 0.6),
        item([10.0, 10.0, 50.0, 50.0], 0.9),
      ],
      0.0,
      0.45,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].score, 0.9);
  }

  #[test]
  fn disjoint_boxes_all_kept() {
    let kept = nms(
      vec![
        item([0.0, 0.0, 10.0, 10.0], 0.8),
        item([20.0, 20.0, 30.0, 30.0], 0.7),
      ],
      0.0,
      0.45,
    );
    assert_eq!(kept.len(), 2);
    // 输出按分数降序
    assert_eq!(kept[0].score, 0.8);
    assert_eq!(kept[1].score, 0.7);
  }

  #[test]
  fn empty_input_gives_empty_output() {
    let kept: Vec<DetectItem<WheatLabel>> = nms(Vec::new(), 0.25, 0.45);
    assert!(kept.is_empty());
  }

  #[test]
  fn score_prefilter_drops_at_or_below_threshold() {
    let kept = nms(
      vec![
        item([0.0, 0.0, 10.0, 10.0], 0.25),
        item([20.0, 20.0, 30.0, 30.0], 0.26),
      ],
      0.25,
      0.45,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].score, 0.26);
  }

  #[test]
  fn kept_pairs_respect_iou_bound() {
    let items = vec![
      item([0.0, 0.0, 100.0, 100.0], 0.9),
      item([10.0, 10.0, 110.0, 110.0], 0.8),
      item([50.0, 50.0, 150.0, 150.0], 0.7),
      item([200.0, 200.0, 300.0, 300.0], 0.6),
      item([90.0, 90.0, 190.0, 190.0], 0.5),
    ];
    let iou_thres = 0.45;
    let kept = nms(items, 0.0, iou_thres);

    for i in 0..kept.len() {
      for j in (i + 1)..kept.len() {
        assert!(iou(&kept[i].bbox, &kept[j].bbox) <= iou_thres);
      }
    }
  }

  #[test]
  fn running_twice_is_idempotent() {
    let items = vec![
      item([0.0, 0.0, 100.0, 100.0], 0.9),
      item([5.0, 5.0, 105.0, 105.0], 0.8),
      item([200.0, 0.0, 260.0, 60.0], 0.7),
      item([400.0, 400.0, 440.0, 440.0], 0.4),
    ];
    let once = nms(items, 0.25, 0.45);
    let twice = nms(once.clone(), 0.25, 0.45);

    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(twice.iter()) {
      assert_eq!(a.bbox, b.bbox);
      assert_eq!(a.score, b.score);
    }
  }

  #[test]
  fn zero_area_boxes_have_zero_iou() {
    assert_eq!(iou(&[5.0, 5.0, 5.0, 5.0], &[5.0, 5.0, 5.0, 5.0]), 0.0);
    assert_eq!(iou(&[0.0, 0.0, 10.0, 10.0], &[5.0, 5.0, 5.0, 5.0]), 0.0);
  }

  #[test]
  fn suppression_is_global_across_classes() {
    // 两个框完全重叠但类别不同，仍然只保留高分者
    let kept = nms(
      vec![
        DetectItem {
          kind: 0u32,
          score: 0.9,
          bbox: [10.0, 10.0, 50.0, 50.0],
        },
        DetectItem {
          kind: 1u32,
          score: 0.6,
          bbox: [10.0, 10.0, 50.0, 50.0],
        },
      ],
      0.0,
      0.45,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].kind, 0);
  }
}
