// 该文件是 YoloGrid 项目的一部分。
// src/model/grid.rs - 网格预测张量
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

use ndarray::{Array3, ArrayView1, s};
use thiserror::Error;

/// 每个预测框的通道数: [confidence, cx, cy, w, h]
pub const BOX_CHANNELS: usize = 5;

/// 网格张量形状不匹配
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("网格张量形状不匹配: 期望 {expected:?}, 实际 {actual:?}")]
pub struct ShapeError {
  pub expected: Vec<usize>,
  pub actual: Vec<usize>,
}

/// 网格形状: S x S 个单元，每个单元 B 个预测框，C 个类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
  pub grid_size: usize,
  pub boxes_per_cell: usize,
  pub num_classes: usize,
}

impl GridShape {
  pub const fn new(grid_size: usize, boxes_per_cell: usize, num_classes: usize) -> Self {
    Self {
      grid_size,
      boxes_per_cell,
      num_classes,
    }
  }

  /// 每个单元的通道数 5·B + C
  pub const fn channels(&self) -> usize {
    BOX_CHANNELS * self.boxes_per_cell + self.num_classes
  }

  /// 类别分数通道的起始位置
  pub const fn class_offset(&self) -> usize {
    BOX_CHANNELS * self.boxes_per_cell
  }

  pub const fn dims(&self) -> [usize; 3] {
    [self.grid_size, self.grid_size, self.channels()]
  }

  pub const fn len(&self) -> usize {
    self.grid_size * self.grid_size * self.channels()
  }

  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn mismatch(&self, actual: &[usize]) -> ShapeError {
    ShapeError {
      expected: self.dims().to_vec(),
      actual: actual.to_vec(),
    }
  }
}

/// 模型输出的网格预测，按 (row, col, channel) 行优先存储
#[derive(Debug, Clone, PartialEq)]
pub struct GridPrediction {
  data: Array3<f32>,
}

impl GridPrediction {
  /// 从扁平的行优先数据构造，长度必须等于 S·S·(5B+C)
  pub fn from_slice(shape: GridShape, data: &[f32]) -> Result<Self, ShapeError> {
    if data.len() != shape.len() {
      return Err(shape.mismatch(&[data.len()]));
    }

    let dims = shape.dims();
    let data = Array3::from_shape_vec((dims[0], dims[1], dims[2]), data.to_vec())
      .map_err(|_| shape.mismatch(&[data.len()]))?;
    Ok(Self { data })
  }

  /// 从已有数组构造，并检查形状
  pub fn from_array(shape: GridShape, data: Array3<f32>) -> Result<Self, ShapeError> {
    if data.shape() != &shape.dims()[..] {
      return Err(shape.mismatch(data.shape()));
    }
    Ok(Self { data })
  }

  /// 全零网格
  pub fn zeros(shape: GridShape) -> Self {
    let dims = shape.dims();
    Self {
      data: Array3::zeros((dims[0], dims[1], dims[2])),
    }
  }

  pub fn shape(&self) -> &[usize] {
    self.data.shape()
  }

  /// 检查张量是否符合给定的网格形状
  pub fn check_shape(&self, shape: GridShape) -> Result<(), ShapeError> {
    if self.shape() != &shape.dims()[..] {
      return Err(shape.mismatch(self.shape()));
    }
    Ok(())
  }

  /// 单元 (row, col) 的全部通道
  pub fn cell(&self, row: usize, col: usize) -> ArrayView1<'_, f32> {
    self.data.slice(s![row, col, ..])
  }

  pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<f32> {
    self.data.get((row, col, channel)).copied()
  }

  /// 写入单个通道，索引越界时返回的错误中 `actual` 为请求的索引
  pub fn set(&mut self, row: usize, col: usize, channel: usize, value: f32) -> Result<(), ShapeError> {
    match self.data.get_mut((row, col, channel)) {
      Some(v) => {
        *v = value;
        Ok(())
      }
      None => Err(ShapeError {
        expected: self.shape().to_vec(),
        actual: vec![row, col, channel],
      }),
    }
  }
}
