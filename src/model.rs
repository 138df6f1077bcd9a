// 该文件是 YoloGrid 项目的一部分。
// src/model.rs - 模型
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

pub mod decoder;
pub mod grid;
pub mod label;

pub use self::decoder::{Detection, GridDecoder, ThresholdRangeError};
pub use self::grid::{GridPrediction, GridShape, ShapeError};
pub use self::label::BddLabel;

/// 模型输入边长（像素）
pub const MODEL_INPUT_SIZE: u32 = 448;
/// YOLOv1 输出网格形状 (14, 14, 5·2 + 13)
pub const YOLOV1_GRID: GridShape = GridShape::new(14, 2, BddLabel::NUM_CLASSES);

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct DetectItem<T> {
  pub kind: T,
  pub detection: Detection,
}

#[derive(Debug, Clone)]
pub struct DetectResult<T> {
  pub items: Box<[DetectItem<T>]>,
}

impl<T> DetectResult<T> {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl<T: WithLabel> DetectResult<T> {
  /// 为解码结果附加类别标签，无法识别的类别索引将被丢弃
  pub fn from_detections(detections: impl IntoIterator<Item = Detection>) -> Self {
    let items: Vec<_> = detections
      .into_iter()
      .filter_map(|detection| {
        T::from_label_id(detection.class_index as u32).map(|kind| DetectItem { kind, detection })
      })
      .collect();

    DetectResult {
      items: items.into_boxed_slice(),
    }
  }
}

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  fn to_label_id(&self) -> u32;
  fn from_label_id(id: u32) -> Option<Self>;
  /// 绘制时使用的类别颜色 (RGB)
  fn color(&self) -> [u8; 3];
}

#[cfg(feature = "model_yolov1")]
mod yolov1;
#[cfg(feature = "model_yolov1")]
pub use self::yolov1::{YoloV1, YoloV1Builder, YoloV1Error};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yolov1_grid_layout() {
    assert_eq!(YOLOV1_GRID.dims(), [14, 14, 23]);
  }

  #[test]
  fn attaches_labels_in_order() {
    let detections = [3usize, 8, 20].map(|class_index| Detection {
      class_index,
      confidence: 0.9,
      x1: 0.0,
      y1: 0.0,
      x2: 1.0,
      y2: 1.0,
    });

    let result = DetectResult::<BddLabel>::from_detections(detections);
    assert_eq!(result.len(), 2);
    assert_eq!(result.items[0].kind, BddLabel::TrafficSign);
    assert_eq!(result.items[1].kind, BddLabel::Car);
  }
}
