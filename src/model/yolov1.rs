// 该文件是 YoloGrid 项目的一部分。
// src/model/yolov1.rs - YOLOv1 网格检测模型
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

use rknpu::{Context, InitFlags, TensorType};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
  frame::AsNhwcFrame,
  model::{
    DetectResult, GridDecoder, GridPrediction, MODEL_INPUT_SIZE, Model, ShapeError,
    ThresholdRangeError, WithLabel, YOLOV1_GRID,
  },
};

const YOLOV1_NUM_INPUTS: u32 = 1;
const YOLOV1_NUM_OUTPUTS: u32 = 1;
const YOLOV1_DEFAULT_THRESHOLD: f32 = 0.5;

pub struct YoloV1<Frame, T> {
  context: Context,
  decoder: GridDecoder,
  _phantom: std::marker::PhantomData<(Frame, T)>,
}

#[derive(Error, Debug)]
pub enum YoloV1Error {
  #[error("模型加载错误: {0}")]
  ModelLoadError(#[from] std::io::Error),
  #[error("模型无效: {0}, 错误: {1}")]
  ModelInvalid(String, rknpu::Error),
  #[error("RKNN 错误: {0}")]
  RknnError(#[from] rknpu::Error),
  #[error("输出形状错误: {0}")]
  ShapeError(#[from] ShapeError),
  #[error("阈值错误: {0}")]
  ThresholdError(#[from] ThresholdRangeError),
}

impl YoloV1Error {
  pub fn invalid(msg: &str, e: rknpu::Error) -> Self {
    YoloV1Error::ModelInvalid(msg.to_string(), e)
  }
}

/// 模型构建器，推理设备通过 `flags` 显式指定
pub struct YoloV1Builder {
  model_path: PathBuf,
  flags: InitFlags,
  threshold: f32,
}

impl YoloV1Builder {
  pub fn new(model_path: impl AsRef<Path>) -> Self {
    Self {
      model_path: model_path.as_ref().to_path_buf(),
      flags: InitFlags::default(),
      threshold: YOLOV1_DEFAULT_THRESHOLD,
    }
  }

  pub fn flags(mut self, flags: InitFlags) -> Self {
    self.flags = flags;
    self
  }

  pub fn threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn build<Frame, T>(self) -> Result<YoloV1<Frame, T>, YoloV1Error> {
    let decoder = GridDecoder::new(YOLOV1_GRID, MODEL_INPUT_SIZE as f32, self.threshold)?;

    info!("加载模型文件: {}", self.model_path.display());
    let model_data = std::fs::read(&self.model_path)?;
    debug!(
      "模型文件大小: {:.2} MB",
      model_data.len() as f64 / (1024.0 * 1024.0)
    );

    info!("创建 RKNN 推理上下文");
    let context = Context::new(&model_data, self.flags)?;
    info!("模型加载完成");

    match context.sdk_version() {
      Ok(version) => {
        if let Ok(api_ver) = version.api_version() {
          debug!("模型 API 版本: {}", api_ver);
        }
        if let Ok(drv_ver) = version.driver_version() {
          debug!("模型驱动版本: {}", drv_ver);
        }
      }
      Err(e) => {
        error!("查询 SDK 版本失败: {}", e);
        return Err(YoloV1Error::invalid("无法查询 SDK 版本", e));
      }
    }

    let num_inputs = context
      .num_inputs()
      .map_err(|e| YoloV1Error::invalid("无法获取输入数量", e))?;
    let num_outputs = context
      .num_outputs()
      .map_err(|e| YoloV1Error::invalid("无法获取输出数量", e))?;

    for (kind, expected, actual) in [
      ("输入", YOLOV1_NUM_INPUTS, num_inputs),
      ("输出", YOLOV1_NUM_OUTPUTS, num_outputs),
    ] {
      if expected != actual {
        let msg = format!("预期模型{}数量为 {}, 实际为 {}", kind, expected, actual);
        error!("{}", msg);
        return Err(YoloV1Error::invalid(&msg, rknpu::Error::InvalidModel));
      }
    }

    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);
    debug!("置信度阈值: {}", decoder.threshold());

    Ok(YoloV1 {
      context,
      decoder,
      _phantom: std::marker::PhantomData,
    })
  }
}

impl<Frame, T> Model for YoloV1<Frame, T>
where
  Frame: AsNhwcFrame<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>,
  T: WithLabel,
{
  type Input = Frame;
  type Output = DetectResult<T>;
  type Error = YoloV1Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!("设置模型输入");
    self.context.set_input(
      0,
      input.as_nhwc(),
      rknpu::TensorFormat::NHWC,
      TensorType::UInt8,
    )?;

    debug!("执行模型推理");
    self.context.run()?;

    debug!("获取模型输出");
    let output = self.context.get_outputs()?;
    let tensor = output.get_f32(0)?;
    debug!("输出张量大小: {}", tensor.len());

    let grid = GridPrediction::from_slice(YOLOV1_GRID, &tensor)?;
    let result = DetectResult::from_detections(self.decoder.decode(&grid)?);

    debug!("检测到 {} 个物体", result.len());
    debug!("检测结果: {:?}", result.items);

    Ok(result)
  }
}
