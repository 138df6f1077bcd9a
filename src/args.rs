// 该文件是 YoloGrid 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;

/// YOLOv1 单张图像目标检测
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// RKNN 模型权重文件路径
  #[arg(short, long, value_name = "FILE")]
  pub weights: PathBuf,

  /// 预测框置信度阈值 (0.0 - 1.0)
  #[arg(short, long, default_value = "0.5", value_name = "THRESHOLD")]
  pub threshold: f32,

  /// 输入图像路径
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// 输出图像路径
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// 标签字体文件（TTF/OTF），缺省时查找系统字体
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 将检测结果另存为 JSON 文件
  #[arg(long, value_name = "FILE")]
  pub record: Option<PathBuf>,
}
