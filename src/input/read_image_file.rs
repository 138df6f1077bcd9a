// 该文件是 YoloGrid 项目的一部分。
// src/input/read_image_file.rs - 读取图像文件
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

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};

use crate::frame::SourceFrame;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("无法读取图像文件 {0}: {1}")]
  IoError(PathBuf, std::io::Error),
  #[error("无法解码图像文件 {0}: {1}")]
  ImageLoadError(PathBuf, image::ImageError),
}

pub struct ImageFileInput {
  image: Option<RgbImage>,
}

impl ImageFileInput {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageFileInputError> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
      .map_err(|e| {
        error!("打开图像文件失败: {}", path.display());
        ImageFileInputError::IoError(path.to_path_buf(), e)
      })?
      .with_guessed_format()
      .map_err(|e| ImageFileInputError::IoError(path.to_path_buf(), e))?
      .decode()
      .map_err(|e| {
        error!("解码图像文件失败: {}", path.display());
        ImageFileInputError::ImageLoadError(path.to_path_buf(), e)
      })?
      .to_rgb8();

    debug!(
      "读取图像 {}: {}x{}",
      path.display(),
      image.width(),
      image.height()
    );

    Ok(Self { image: Some(image) })
  }

  /// 已加载图像的尺寸，图像被取走后返回 None
  pub fn dimensions(&self) -> Option<(u32, u32)> {
    self.image.as_ref().map(|image| image.dimensions())
  }

  pub fn into_frames<const W: u32, const H: u32>(self) -> ImageFileFrames<W, H> {
    ImageFileFrames { inner: self }
  }
}

impl From<RgbImage> for ImageFileInput {
  fn from(image: RgbImage) -> Self {
    Self { image: Some(image) }
  }
}

/// 只产出一帧的迭代器
pub struct ImageFileFrames<const W: u32, const H: u32> {
  inner: ImageFileInput,
}

impl<const W: u32, const H: u32> Iterator for ImageFileFrames<W, H> {
  type Item = SourceFrame<W, H>;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.image.take().map(SourceFrame::from)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ImageFileInput::open(dir.path().join("missing.png"));
    assert!(matches!(result, Err(ImageFileInputError::IoError(..))));
  }

  #[test]
  fn undecodable_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let result = ImageFileInput::open(&path);
    assert!(matches!(result, Err(ImageFileInputError::ImageLoadError(..))));
  }

  #[test]
  fn yields_a_single_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.png");
    RgbImage::from_pixel(40, 30, Rgb([1, 2, 3])).save(&path).unwrap();

    let input = ImageFileInput::open(&path).unwrap();
    assert_eq!(input.dimensions(), Some((40, 30)));

    let mut frames = input.into_frames::<16, 16>();
    let frame = frames.next().unwrap();
    assert_eq!(frame.dimensions(), (40, 30));
    assert!(frames.next().is_none());
  }
}
