// 该文件是 YoloGrid 项目的一部分。
// src/frame.rs - NHWC 帧定义
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

use image::{RgbImage, imageops::FilterType};

const RGB_CHANNELS: usize = 3;

pub trait AsNhwcFrame<const W: u32, const H: u32> {
  fn as_nhwc(&self) -> &[u8];
}

/// 可以取得原始尺寸图像的帧
pub trait AsSourceImage {
  fn source_image(&self) -> &RgbImage;
}

/// 模型输入帧，W x H x 3，NHWC 排列的 RGB 字节
#[derive(Debug, Clone)]
pub struct RgbNhwcFrame<const W: u32, const H: u32> {
  data: Box<[u8]>,
}

impl<const W: u32, const H: u32> RgbNhwcFrame<W, H> {
  /// 最近邻缩放到模型输入尺寸
  pub fn resize_from(image: &RgbImage) -> Self {
    let resized = if image.dimensions() == (W, H) {
      image.clone()
    } else {
      image::imageops::resize(image, W, H, FilterType::Nearest)
    };

    Self {
      data: resized.into_raw().into_boxed_slice(),
    }
  }

  pub fn height(&self) -> usize {
    H as usize
  }

  pub fn width(&self) -> usize {
    W as usize
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }
}

impl<const W: u32, const H: u32> AsNhwcFrame<W, H> for RgbNhwcFrame<W, H> {
  fn as_nhwc(&self) -> &[u8] {
    &self.data
  }
}

/// 原始图像及其对应的模型输入帧
#[derive(Debug, Clone)]
pub struct SourceFrame<const W: u32, const H: u32> {
  source: RgbImage,
  input: RgbNhwcFrame<W, H>,
}

impl<const W: u32, const H: u32> From<RgbImage> for SourceFrame<W, H> {
  fn from(source: RgbImage) -> Self {
    let input = RgbNhwcFrame::resize_from(&source);
    Self { source, input }
  }
}

impl<const W: u32, const H: u32> SourceFrame<W, H> {
  pub fn input(&self) -> &RgbNhwcFrame<W, H> {
    &self.input
  }

  pub fn dimensions(&self) -> (u32, u32) {
    self.source.dimensions()
  }
}

impl<const W: u32, const H: u32> AsNhwcFrame<W, H> for SourceFrame<W, H> {
  fn as_nhwc(&self) -> &[u8] {
    self.input.as_nhwc()
  }
}

impl<const W: u32, const H: u32> AsSourceImage for SourceFrame<W, H> {
  fn source_image(&self) -> &RgbImage {
    &self.source
  }
}
