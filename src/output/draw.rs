// 该文件是 YoloGrid 项目的一部分。
// src/output/draw.rs - 检测框绘制
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

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use thiserror::Error;
use tracing::debug;

use crate::{
  frame::AsSourceImage,
  model::{DetectResult, MODEL_INPUT_SIZE, WithLabel},
  output::geometry::{ScaleRatio, ScaledDetection, to_source_space},
};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_BACKGROUND_HEIGHT: i64 = 20;
const LABEL_SCORE_WIDTH: i64 = 45; // 为置信度数字预留的宽度
const LABEL_TEXT_OFFSET: i64 = 18;
const LABEL_TEXT_COLOR: [u8; 3] = [0, 0, 0]; // 黑色

/// 内嵌的默认字体
const DEFAULT_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("无法读取字体文件: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体无效: {0}")]
  InvalidFont(String),
}

fn parse_font(data: Vec<u8>) -> Result<FontVec, DrawError> {
  FontVec::try_from_vec(data).map_err(|e| DrawError::InvalidFont(e.to_string()))
}

fn load_font(path: impl AsRef<Path>) -> Result<FontVec, DrawError> {
  parse_font(std::fs::read(path.as_ref())?)
}

pub struct Draw {
  font_size: f32,
  font: FontVec,
  text_color: [u8; 3],
}

impl Draw {
  fn with_font(font: FontVec) -> Self {
    Self {
      font_size: LABEL_FONT_SIZE,
      font,
      text_color: LABEL_TEXT_COLOR,
    }
  }

  /// 使用内嵌的 DejaVu Sans 字体
  pub fn embedded() -> Result<Self, DrawError> {
    debug!("使用内嵌字体");
    Ok(Self::with_font(parse_font(DEFAULT_FONT.to_vec())?))
  }

  pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, DrawError> {
    debug!("使用字体文件: {}", path.as_ref().display());
    Ok(Self::with_font(load_font(path)?))
  }

  fn text_width(&self, text: &str) -> i64 {
    text_size(PxScale::from(self.font_size), &self.font, text).0 as i64
  }

  /// 绘制边框、标签背景和标签文字，超出图像的部分被裁剪，坐标本身不做修改
  pub fn draw_scaled_detection<T: WithLabel>(
    &self,
    image: &mut RgbImage,
    scaled: &ScaledDetection,
    kind: &T,
  ) {
    let color = Rgb(kind.color());
    let name = kind.to_label_str();
    let (x1, y1) = (scaled.x1 as i64, scaled.y1 as i64);

    // 边框，两个角点都包含在内
    if let Some(outline) = clipped_rect(image, x1, y1, scaled.x2 as i64, scaled.y2 as i64) {
      draw_hollow_rect_mut(image, outline, color);
    }

    // 边框上方的标签背景，完全在图像外时连同文字一起跳过
    let label_width = self.text_width(&name) + LABEL_SCORE_WIDTH;
    let background = clipped_rect(
      image,
      x1,
      y1 - LABEL_BACKGROUND_HEIGHT,
      x1 + label_width,
      y1,
    );
    let Some(background) = background else {
      return;
    };
    draw_filled_rect_mut(image, background, color);

    // 背景可见时文字原点离图像不远
    let (Ok(text_x), Ok(text_y)) = (i32::try_from(x1), i32::try_from(y1 - LABEL_TEXT_OFFSET)) else {
      return;
    };
    let label = format!("{} {:.2}", name, scaled.confidence);
    draw_text_mut(
      image,
      Rgb(self.text_color),
      text_x,
      text_y,
      PxScale::from(self.font_size),
      &self.font,
      &label,
    );
  }

  /// 按检测顺序依次绘制，缩放比例由图像尺寸一次算出
  pub fn draw_detections_on_image<T: WithLabel>(&self, image: &mut RgbImage, result: &DetectResult<T>) {
    let ratio = ScaleRatio::from_dimensions(image.dimensions(), (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE));
    for item in result.items.iter() {
      let scaled = to_source_space(&item.detection, ratio);
      debug!(
        "绘制 {} {:.2} at ({}, {}) - ({}, {})",
        item.kind.to_label_str(),
        scaled.confidence,
        scaled.x1,
        scaled.y1,
        scaled.x2,
        scaled.y2
      );
      self.draw_scaled_detection(image, &scaled, &item.kind);
    }
  }

  pub fn draw_detection<F: AsSourceImage, T: WithLabel>(
    &self,
    frame: &F,
    result: &DetectResult<T>,
  ) -> RgbImage {
    let mut image = frame.source_image().clone();
    self.draw_detections_on_image(&mut image, result);
    image
  }
}

/// 包含两个角点的矩形，裁剪到图像外一像素的范围内
///
/// 图像外的边保持在图像外，不会被画到图像边界上；与图像没有交集时返回 `None`。
fn clipped_rect(image: &RgbImage, x1: i64, y1: i64, x2: i64, y2: i64) -> Option<Rect> {
  let (width, height) = (image.width() as i64, image.height() as i64);
  let (left, right) = (x1.min(x2), x1.max(x2));
  let (top, bottom) = (y1.min(y2), y1.max(y2));
  if right < 0 || bottom < 0 || left >= width || top >= height {
    return None;
  }

  let (left, right) = (left.max(-1), right.min(width));
  let (top, bottom) = (top.max(-1), bottom.min(height));
  let rect = Rect::at(i32::try_from(left).ok()?, i32::try_from(top).ok()?).of_size(
    u32::try_from(right - left + 1).ok()?,
    u32::try_from(bottom - top + 1).ok()?,
  );
  Some(rect)
}
