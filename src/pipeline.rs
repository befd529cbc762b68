// 该文件是 Maisui （麦穗） 项目的一部分。
// src/pipeline.rs - 检测前后处理流水线
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

//! 流水线各阶段均为无内部状态的纯函数，可在多请求间并发使用：
//! 信箱缩放 -> （外部推理）-> 解码 -> 坐标还原 -> 非极大值抑制。

mod decode;
mod invert;
mod letterbox;
mod nms;

pub use self::decode::{Candidate, decode};
pub use self::invert::invert;
pub use self::letterbox::{Letterbox, PAD_FILL, letterbox};
pub use self::nms::{iou, nms};
