// 该文件是 YoloGrid 项目的一部分。
// src/output/record.rs - 检测结果记录
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

use std::path::Path;

use serde_json::{Value, json};

use crate::{
  model::{DetectResult, WithLabel},
  output::geometry::{ScaleRatio, to_source_space},
};

/// 以 JSON 形式记录原图坐标下的检测结果
pub struct Record {
  pub image_size: (u32, u32),
  pub ratio: ScaleRatio,
}

impl Record {
  pub fn to_json<T: WithLabel>(&self, result: &DetectResult<T>) -> Value {
    let detections: Vec<Value> = result
      .items
      .iter()
      .map(|item| {
        let scaled = to_source_space(&item.detection, self.ratio);
        json!({
          "class_id": item.kind.to_label_id(),
          "class_name": item.kind.to_label_str(),
          "confidence": scaled.confidence,
          "bbox": [scaled.x1, scaled.y1, scaled.x2, scaled.y2],
        })
      })
      .collect();

    json!({
      "width": self.image_size.0,
      "height": self.image_size.1,
      "detections": detections,
    })
  }

  pub fn record<T: WithLabel>(
    &self,
    result: &DetectResult<T>,
    path: &Path,
  ) -> Result<(), std::io::Error> {
    let text = serde_json::to_string_pretty(&self.to_json(result))?;
    std::fs::write(path, text)?;
    Ok(())
  }
}
