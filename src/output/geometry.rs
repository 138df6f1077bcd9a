// 该文件是 YoloGrid 项目的一部分。
// src/output/geometry.rs - 模型空间到原图空间的坐标换算
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

use crate::model::Detection;

/// 每个轴上的缩放比例，原图尺寸 / 模型输入尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatio {
  pub x: f32,
  pub y: f32,
}

impl ScaleRatio {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  pub fn from_dimensions(source: (u32, u32), input: (u32, u32)) -> Self {
    Self {
      x: source.0 as f32 / input.0 as f32,
      y: source.1 as f32 / input.1 as f32,
    }
  }
}

/// 原图像素坐标下的检测框，坐标可能超出图像范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledDetection {
  pub class_index: usize,
  pub confidence: f32,
  pub x1: i32,
  pub y1: i32,
  pub x2: i32,
  pub y2: i32,
}

/// 缩放后向零取整，不做裁剪
pub fn to_source_space(detection: &Detection, ratio: ScaleRatio) -> ScaledDetection {
  ScaledDetection {
    class_index: detection.class_index,
    confidence: detection.confidence,
    x1: (detection.x1 * ratio.x) as i32,
    y1: (detection.y1 * ratio.y) as i32,
    x2: (detection.x2 * ratio.x) as i32,
    y2: (detection.y2 * ratio.y) as i32,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detection(x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
    Detection {
      class_index: 1,
      confidence: 0.75,
      x1,
      y1,
      x2,
      y2,
    }
  }

  #[test]
  fn scales_each_axis() {
    let scaled = to_source_space(&detection(0.0, 0.0, 32.0, 32.0), ScaleRatio::new(2.0, 3.0));
    assert_eq!((scaled.x1, scaled.y1, scaled.x2, scaled.y2), (0, 0, 64, 96));
    assert_eq!(scaled.class_index, 1);
    assert_eq!(scaled.confidence, 0.75);
  }

  #[test]
  fn truncates_toward_zero_without_clamping() {
    let scaled = to_source_space(
      &detection(-10.6, -0.4, 460.9, 100.99),
      ScaleRatio::new(1.0, 1.0),
    );
    assert_eq!((scaled.x1, scaled.y1, scaled.x2, scaled.y2), (-10, 0, 460, 100));
  }

  #[test]
  fn ratio_from_dimensions() {
    let ratio = ScaleRatio::from_dimensions((896, 224), (448, 448));
    assert_eq!(ratio, ScaleRatio::new(2.0, 0.5));
  }
}
