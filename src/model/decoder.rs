// 该文件是 YoloGrid 项目的一部分。
// src/model/decoder.rs - 网格预测解码
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

//! 将 S x S 网格预测解码为模型像素空间中的检测框。
//!
//! 每个单元只保留置信度最高的一个预测框（并列时取索引较小者），
//! 不做跨单元的排序、去重或非极大值抑制，坐标也不裁剪到图像范围内。

use ndarray::ArrayView1;
use thiserror::Error;

use crate::model::grid::{BOX_CHANNELS, GridPrediction, GridShape, ShapeError};

/// 置信度阈值超出 [0, 1]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("置信度阈值必须位于 [0, 1] 区间内, 实际为 {0}")]
pub struct ThresholdRangeError(pub f32);

/// 检查阈值范围，NaN 同样视为越界
pub fn check_threshold(threshold: f32) -> Result<f32, ThresholdRangeError> {
  if (0.0..=1.0).contains(&threshold) {
    Ok(threshold)
  } else {
    Err(ThresholdRangeError(threshold))
  }
}

/// 模型像素空间中的一个检测结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
  pub class_index: usize,
  pub confidence: f32,
  pub x1: f32,
  pub y1: f32,
  pub x2: f32,
  pub y2: f32,
}

impl Detection {
  pub fn centre(&self) -> (f32, f32) {
    ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
  }

  pub fn bbox(&self) -> [f32; 4] {
    [self.x1, self.y1, self.x2, self.y2]
  }
}

/// 单元内被选中的候选框，坐标仍是相对单元的归一化值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBoxCandidate {
  pub confidence: f32,
  pub center_x: f32,
  pub center_y: f32,
  pub width: f32,
  pub height: f32,
  pub class_index: usize,
  pub row: usize,
  pub col: usize,
}

/// 网格解码器
#[derive(Debug, Clone, Copy)]
pub struct GridDecoder {
  shape: GridShape,
  input_size: f32,
  threshold: f32,
}

impl GridDecoder {
  /// `input_size` 为模型输入的边长（像素），单元大小为 `input_size / S`
  pub fn new(shape: GridShape, input_size: f32, threshold: f32) -> Result<Self, ThresholdRangeError> {
    Ok(Self {
      shape,
      input_size,
      threshold: check_threshold(threshold)?,
    })
  }

  pub fn shape(&self) -> GridShape {
    self.shape
  }

  pub fn threshold(&self) -> f32 {
    self.threshold
  }

  pub fn cell_size(&self) -> f32 {
    self.input_size / self.shape.grid_size as f32
  }

  /// 逐单元（行优先）惰性解码
  pub fn decode<'a>(&self, grid: &'a GridPrediction) -> Result<Decode<'a>, ShapeError> {
    grid.check_shape(self.shape)?;
    Ok(Decode {
      grid,
      decoder: *self,
      next_cell: 0,
    })
  }

  /// 选出单元内置信度最高的预测框；未达到阈值时返回 None
  pub fn select_candidate(&self, grid: &GridPrediction, row: usize, col: usize) -> Option<CellBoxCandidate> {
    let cell = grid.cell(row, col);

    let mut best_box = 0;
    for b in 1..self.shape.boxes_per_cell {
      if cell[b * BOX_CHANNELS] > cell[best_box * BOX_CHANNELS] {
        best_box = b;
      }
    }

    let base = best_box * BOX_CHANNELS;
    let confidence = cell[base];
    if confidence.is_nan() || confidence < self.threshold {
      return None;
    }

    Some(CellBoxCandidate {
      confidence,
      center_x: cell[base + 1],
      center_y: cell[base + 2],
      width: cell[base + 3],
      height: cell[base + 4],
      class_index: argmax(cell.slice(ndarray::s![self.shape.class_offset()..])),
      row,
      col,
    })
  }

  /// 单元相对坐标转换为模型像素坐标
  pub fn to_detection(&self, candidate: &CellBoxCandidate) -> Detection {
    let cell_size = self.cell_size();

    let centre_x = candidate.center_x * cell_size + cell_size * candidate.col as f32;
    let centre_y = candidate.center_y * cell_size + cell_size * candidate.row as f32;
    let width = candidate.width * self.input_size;
    let height = candidate.height * self.input_size;

    Detection {
      class_index: candidate.class_index,
      confidence: candidate.confidence,
      x1: centre_x - width / 2.0,
      y1: centre_y - height / 2.0,
      x2: centre_x + width / 2.0,
      y2: centre_y + height / 2.0,
    }
  }
}

/// 类别分数取最大值，并列时取最小索引
fn argmax(scores: ArrayView1<'_, f32>) -> usize {
  let mut best = 0;
  for (idx, &score) in scores.iter().enumerate().skip(1) {
    if score > scores[best] {
      best = idx;
    }
  }
  best
}

/// 解码迭代器，按行优先顺序产出检测结果
pub struct Decode<'a> {
  grid: &'a GridPrediction,
  decoder: GridDecoder,
  next_cell: usize,
}

impl Iterator for Decode<'_> {
  type Item = Detection;

  fn next(&mut self) -> Option<Self::Item> {
    let grid_size = self.decoder.shape.grid_size;
    while self.next_cell < grid_size * grid_size {
      let (row, col) = (self.next_cell / grid_size, self.next_cell % grid_size);
      self.next_cell += 1;

      if let Some(candidate) = self.decoder.select_candidate(self.grid, row, col) {
        return Some(self.decoder.to_detection(&candidate));
      }
    }
    None
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let grid_size = self.decoder.shape.grid_size;
    (0, Some(grid_size * grid_size - self.next_cell))
  }
}
