// 该文件是 YoloGrid 项目的一部分。
// tests/pipeline_tests.rs - 解码与渲染流程测试
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

#![cfg(feature = "save_image_file")]

use image::{Rgb, RgbImage};
use serde_json::Value;

use yolo_grid::{
  frame::SourceFrame,
  input::ImageFileInput,
  model::{
    BddLabel, DetectResult, GridDecoder, GridPrediction, GridShape, MODEL_INPUT_SIZE, Model,
    ShapeError, WithLabel, YOLOV1_GRID,
  },
  output::{SaveImageFileOutput, draw::Draw},
  task::{OneShotTask, Task},
};

type Frame = SourceFrame<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>;

/// 返回固定网格预测的模型
struct FixedGridModel {
  grid: GridPrediction,
  decoder: GridDecoder,
}

impl FixedGridModel {
  fn new(grid: GridPrediction, threshold: f32) -> Self {
    Self {
      grid,
      decoder: GridDecoder::new(YOLOV1_GRID, MODEL_INPUT_SIZE as f32, threshold).unwrap(),
    }
  }
}

impl Model for FixedGridModel {
  type Input = Frame;
  type Output = DetectResult<BddLabel>;
  type Error = ShapeError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    Ok(DetectResult::from_detections(self.decoder.decode(&self.grid)?))
  }
}

fn single_detection_grid() -> GridPrediction {
  let mut grid = GridPrediction::zeros(YOLOV1_GRID);
  // 单元 (row 7, col 7), 框 0, 宽高为输入的 1/8
  for (channel, value) in [0.9, 0.5, 0.5, 0.125, 0.125].into_iter().enumerate() {
    grid.set(7, 7, channel, value).unwrap();
  }
  grid.set(7, 7, YOLOV1_GRID.class_offset() + 3, 1.0).unwrap();
  grid
}

fn write_input(dir: &std::path::Path, width: u32, height: u32) -> std::path::PathBuf {
  let path = dir.join("input.png");
  RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    .save(&path)
    .unwrap();
  path
}

#[test]
fn one_shot_writes_annotated_image_and_record() {
  let dir = tempfile::tempdir().unwrap();
  let input_path = write_input(dir.path(), 896, 448);
  let output_path = dir.path().join("out").join("annotated.png");
  let record_path = dir.path().join("out").join("detections.json");

  let input = ImageFileInput::open(&input_path).unwrap();
  let model = FixedGridModel::new(single_detection_grid(), 0.5);
  let output = SaveImageFileOutput::new(&output_path, Draw::embedded().unwrap())
    .with_record(Some(record_path.clone()));

  OneShotTask
    .run_task(
      input.into_frames::<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>(),
      model,
      output,
    )
    .unwrap();

  let annotated = image::open(&output_path).unwrap().to_rgb8();
  assert_eq!(annotated.dimensions(), (896, 448));

  // 模型空间 (212, 212)-(268, 268)，x 方向放大两倍
  let color = Rgb(BddLabel::TrafficSign.color());
  assert_eq!(*annotated.get_pixel(424, 240), color);
  assert_eq!(*annotated.get_pixel(536, 240), color);
  assert_eq!(*annotated.get_pixel(480, 240), Rgb([255, 255, 255]));

  let record: Value = serde_json::from_str(&std::fs::read_to_string(&record_path).unwrap()).unwrap();
  let detections = record["detections"].as_array().unwrap();
  assert_eq!(detections.len(), 1);
  assert_eq!(detections[0]["class_id"], 3);
  assert_eq!(detections[0]["class_name"], "traffic sign");
  assert_eq!(detections[0]["bbox"], serde_json::json!([424, 212, 536, 268]));
}

#[test]
fn shape_error_aborts_before_drawing() {
  let dir = tempfile::tempdir().unwrap();
  let input_path = write_input(dir.path(), 64, 64);
  let output_path = dir.path().join("annotated.png");

  let input = ImageFileInput::open(&input_path).unwrap();
  let model = FixedGridModel::new(GridPrediction::zeros(GridShape::new(7, 2, 20)), 0.5);
  let output = SaveImageFileOutput::new(&output_path, Draw::embedded().unwrap());

  let result = OneShotTask.run_task(
    input.into_frames::<MODEL_INPUT_SIZE, MODEL_INPUT_SIZE>(),
    model,
    output,
  );

  assert!(result.is_err());
  assert!(!output_path.exists());
}

#[test]
fn overlapping_neighbours_are_all_kept() {
  let mut grid = GridPrediction::zeros(YOLOV1_GRID);
  for col in [4, 5] {
    for (channel, value) in [0.8, 0.9, 0.5, 0.3, 0.3].into_iter().enumerate() {
      grid.set(2, col, channel, value).unwrap();
    }
  }

  let decoder = GridDecoder::new(YOLOV1_GRID, MODEL_INPUT_SIZE as f32, 0.5).unwrap();
  let result = DetectResult::<BddLabel>::from_detections(decoder.decode(&grid).unwrap());

  assert_eq!(result.len(), 2);
  assert!(result.items.iter().all(|item| item.kind == BddLabel::OtherVehicle));
}

#[test]
fn all_zero_grid_with_zero_threshold_fills_every_cell() {
  let grid = GridPrediction::zeros(YOLOV1_GRID);
  let decoder = GridDecoder::new(YOLOV1_GRID, MODEL_INPUT_SIZE as f32, 0.0).unwrap();
  assert_eq!(decoder.decode(&grid).unwrap().count(), 14 * 14);
}
