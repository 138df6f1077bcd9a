// 该文件是 YoloGrid 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use yolo_grid::{
  frame::SourceFrame,
  input::ImageFileInput,
  model::{BddLabel, MODEL_INPUT_SIZE, YoloV1, YoloV1Builder, decoder::check_threshold},
  output::{SaveImageFileOutput, draw::Draw},
  task::{OneShotTask, Task},
};

type Frame = SourceFrame<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>;

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("模型权重路径: {}", args.weights.display());
  info!("输入图像: {}", args.input.display());
  info!("输出图像: {}", args.output.display());
  info!("置信度阈值: {}", args.threshold);

  let threshold = check_threshold(args.threshold)?;

  info!("读取输入图像...");
  let input = ImageFileInput::open(&args.input)?;

  info!("加载模型...");
  let model: YoloV1<Frame, BddLabel> = YoloV1Builder::new(&args.weights)
    .threshold(threshold)
    .build()?;

  let draw = match &args.font {
    Some(font) => Draw::from_font_file(font)?,
    None => Draw::embedded()?,
  };
  let output = SaveImageFileOutput::new(&args.output, draw).with_record(args.record.clone());

  OneShotTask.run_task(
    input.into_frames::<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>(),
    model,
    output,
  )?;

  info!("处理完成，输出文件: {}", args.output.display());
  Ok(())
}
