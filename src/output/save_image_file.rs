// 该文件是 YoloGrid 项目的一部分。
// src/output/save_image_file.rs - 保存标注后的图像文件
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

use thiserror::Error;
use tracing::info;

use crate::{
  frame::AsSourceImage,
  model::{DetectResult, MODEL_INPUT_SIZE, WithLabel},
  output::{Render, draw::Draw, geometry::ScaleRatio, record::Record},
};

pub struct SaveImageFileOutput {
  path: PathBuf,
  record_path: Option<PathBuf>,
  draw: Draw,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
}

impl SaveImageFileOutput {
  pub fn new(path: impl AsRef<Path>, draw: Draw) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
      record_path: None,
      draw,
    }
  }

  /// 同时把检测结果写入 JSON 文件
  pub fn with_record(mut self, record_path: Option<PathBuf>) -> Self {
    self.record_path = record_path;
    self
  }

  fn ensure_parent(path: &Path) -> Result<(), SaveImageFileError> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    Ok(())
  }

  fn save_image(&self, image: image::RgbImage) -> Result<(), SaveImageFileError> {
    Self::ensure_parent(&self.path)?;
    image.save(&self.path)?;
    info!("保存图像到文件: {}", self.path.display());
    Ok(())
  }
}

impl<F: AsSourceImage, T: WithLabel> Render<F, DetectResult<T>> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, frame: &F, result: &DetectResult<T>) -> Result<(), Self::Error> {
    let image = self.draw.draw_detection(frame, result);
    let dimensions = image.dimensions();

    // 图像保存成功后才写入记录
    self.save_image(image)?;

    if let Some(record_path) = &self.record_path {
      let record = Record {
        image_size: dimensions,
        ratio: ScaleRatio::from_dimensions(dimensions, (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE)),
      };
      Self::ensure_parent(record_path)?;
      record.record(result, record_path)?;
      info!("保存检测记录到文件: {}", record_path.display());
    }

    Ok(())
  }
}
