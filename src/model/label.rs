// 该文件是 YoloGrid 项目的一部分。
// src/model/label.rs - BDD100K 类别标签
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

use crate::model::WithLabel;

/// BDD100K 数据集的 13 个类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BddLabel {
  OtherVehicle,
  Pedestrian,
  TrafficLight,
  TrafficSign,
  Truck,
  Train,
  OtherPerson,
  Bus,
  Car,
  Rider,
  Motorcycle,
  Bicycle,
  Trailer,
}

impl BddLabel {
  pub const NUM_CLASSES: usize = 13;

  /// 按类别索引排列
  pub const ALL: [BddLabel; Self::NUM_CLASSES] = [
    BddLabel::OtherVehicle,
    BddLabel::Pedestrian,
    BddLabel::TrafficLight,
    BddLabel::TrafficSign,
    BddLabel::Truck,
    BddLabel::Train,
    BddLabel::OtherPerson,
    BddLabel::Bus,
    BddLabel::Car,
    BddLabel::Rider,
    BddLabel::Motorcycle,
    BddLabel::Bicycle,
    BddLabel::Trailer,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      BddLabel::OtherVehicle => "other vehicle",
      BddLabel::Pedestrian => "pedestrian",
      BddLabel::TrafficLight => "traffic light",
      BddLabel::TrafficSign => "traffic sign",
      BddLabel::Truck => "truck",
      BddLabel::Train => "train",
      BddLabel::OtherPerson => "other person",
      BddLabel::Bus => "bus",
      BddLabel::Car => "car",
      BddLabel::Rider => "rider",
      BddLabel::Motorcycle => "motorcycle",
      BddLabel::Bicycle => "bicycle",
      BddLabel::Trailer => "trailer",
    }
  }

  /// 类别颜色 (RGB)
  pub fn rgb(&self) -> [u8; 3] {
    match self {
      BddLabel::OtherVehicle => [0, 255, 255],
      BddLabel::Pedestrian => [0, 0, 255],
      BddLabel::TrafficLight => [0, 128, 255],
      BddLabel::TrafficSign => [255, 255, 0],
      BddLabel::Truck => [255, 0, 255],
      BddLabel::Train => [0, 255, 128],
      BddLabel::OtherPerson => [128, 255, 0],
      BddLabel::Bus => [127, 0, 255],
      BddLabel::Car => [0, 255, 0],
      BddLabel::Rider => [255, 0, 0],
      BddLabel::Motorcycle => [255, 0, 127],
      BddLabel::Bicycle => [255, 128, 0],
      BddLabel::Trailer => [128, 128, 128],
    }
  }
}

impl WithLabel for BddLabel {
  fn to_label_str(&self) -> String {
    self.name().to_string()
  }

  fn to_label_id(&self) -> u32 {
    *self as u32
  }

  fn from_label_id(id: u32) -> Option<Self> {
    Self::ALL.get(id as usize).copied()
  }

  fn color(&self) -> [u8; 3] {
    self.rgb()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_follow_table_order() {
    for (idx, label) in BddLabel::ALL.iter().enumerate() {
      assert_eq!(label.to_label_id(), idx as u32);
      assert_eq!(BddLabel::from_label_id(idx as u32), Some(*label));
    }
    assert_eq!(BddLabel::from_label_id(3), Some(BddLabel::TrafficSign));
    assert_eq!(BddLabel::from_label_id(13), None);
  }

  #[test]
  fn names_and_colors() {
    assert_eq!(BddLabel::OtherVehicle.to_label_str(), "other vehicle");
    assert_eq!(BddLabel::Trailer.to_label_str(), "trailer");
    assert_eq!(BddLabel::Pedestrian.color(), [0, 0, 255]);
    assert_eq!(BddLabel::Rider.color(), [255, 0, 0]);
  }
}
