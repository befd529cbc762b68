// 该文件是 Maisui （麦穗） 项目的一部分。
// src/model/replay.rs - 记录回放引擎
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

use std::io::BufReader;

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::frame::{NchwTensor, RawOutput, RawOutputError};
use crate::model::Engine;
use crate::{FromUrl, FromUrlWithScheme};

/// 回放引擎：从 JSON 记录文件加载一份网络原始输出并在每次
/// 调用时原样返回，忽略输入张量。用于离线调试与流水线测试，
/// 不依赖任何推理运行时。
///
/// 记录格式为候选主序的二维数组，每行 [cx, cy, w, h, 类别分数...]。
#[derive(Debug)]
pub struct ReplayEngine {
  output: RawOutput,
}

#[derive(Error, Debug)]
pub enum ReplayEngineError {
  #[error("URI 方案不匹配: 期望 'replay', 实际 '{0}'")]
  SchemeMismatch(String),
  #[error("读取记录文件失败: {0}")]
  IoError(#[from] std::io::Error),
  #[error("解析记录文件失败: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("记录文件没有任何候选行")]
  Empty,
  #[error("记录行宽不一致: 第 {row} 行有 {found} 列, 期望 {expected} 列")]
  RaggedRow {
    row: usize,
    expected: usize,
    found: usize,
  },
  #[error("记录张量形状无效: {0}")]
  ShapeError(#[from] RawOutputError),
}

impl FromUrlWithScheme for ReplayEngine {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayEngine {
  type Error = ReplayEngineError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayEngineError::SchemeMismatch(url.scheme().to_string()));
    }

    let file = std::fs::File::open(url.path())?;
    let rows: Vec<Vec<f32>> = serde_json::from_reader(BufReader::new(file))?;
    info!("加载记录文件: {}, {} 个候选行", url.path(), rows.len());

    Self::from_rows(rows)
  }
}

impl ReplayEngine {
  pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, ReplayEngineError> {
    let num_attrs = rows.first().ok_or(ReplayEngineError::Empty)?.len();

    let mut data = Vec::with_capacity(rows.len() * num_attrs);
    for (index, row) in rows.iter().enumerate() {
      if row.len() != num_attrs {
        return Err(ReplayEngineError::RaggedRow {
          row: index,
          expected: num_attrs,
          found: row.len(),
        });
      }
      data.extend_from_slice(row);
    }

    let output = RawOutput::new(data, rows.len(), num_attrs)?;
    Ok(ReplayEngine { output })
  }
}

impl<const W: u32, const H: u32> Engine<W, H> for ReplayEngine {
  type Error = ReplayEngineError;

  fn run(&self, _input: &NchwTensor<W, H>) -> Result<RawOutput, Self::Error> {
    Ok(self.output.clone())
  }
}
