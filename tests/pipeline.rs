use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use inception_classify::{
    AssetPaths, ClassifyError, Classifier, GraphRuntime, PreprocessConfig, Processor,
    classify_image,
};
use ndarray::{Array4, ArrayD, Axis, IxDyn};

/// Scores each colour channel by its mean value, padded with fixed scores so
/// the vocabulary is larger than five.
struct ChannelScorer {
    input_shape: Vec<Option<usize>>,
    runs: Arc<AtomicUsize>,
}

impl ChannelScorer {
    fn new() -> Self {
        Self {
            input_shape: PreprocessConfig::inception()
                .input_shape()
                .iter()
                .copied()
                .map(Some)
                .collect(),
            runs: Arc::default(),
        }
    }
}

impl GraphRuntime for ChannelScorer {
    fn name(&self) -> &'static str {
        "channel-scorer"
    }

    fn input_name(&self) -> &str {
        "input"
    }

    fn output_name(&self) -> &str {
        "output"
    }

    fn input_shape(&self) -> &[Option<usize>] {
        &self.input_shape
    }

    fn run(&self, input: Array4<f32>) -> inception_classify::Result<ArrayD<f32>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut scores: Vec<f32> = (0..3)
            .map(|c| {
                let channel = input.index_axis(Axis(3), c);
                (channel.mean().unwrap_or(0.0) + 117.0) / 255.0
            })
            .collect();
        scores.extend([0.25, 0.2, 0.15, 0.1]);
        Ok(ArrayD::from_shape_vec(IxDyn(&[1, scores.len()]), scores).unwrap())
    }
}

fn vocabulary() -> Vec<String> {
    ["red", "green", "blue", "quarter", "fifth", "sixth", "tenth"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn png(rgb: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(320, 240, Rgb(rgb)));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

fn classifier() -> Classifier {
    Classifier::new(Box::new(ChannelScorer::new()), vocabulary(), Processor::default())
}

#[test]
fn ranks_top_five() -> Result<()> {
    let predictions = classifier().classify(&png([255, 128, 0]))?;
    let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["red", "green", "quarter", "fifth", "sixth"]);
    assert!((predictions[0].probability - 1.0).abs() < 0.01);
    assert!(predictions.windows(2).all(|w| w[0].probability >= w[1].probability));
    Ok(())
}

#[test]
fn same_image_same_answer() -> Result<()> {
    let classifier = classifier();
    let image = png([12, 200, 99]);
    let first = classifier.classify(&image)?;
    let second = classifier.classify(&image)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn classify_file_reads_the_image() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile()?;
    file.write_all(&png([0, 0, 255]))?;
    let predictions = classifier().classify_file(file.path())?;
    assert_eq!(predictions[0].label, "blue");
    Ok(())
}

#[test]
fn non_image_bytes_never_reach_the_graph() {
    let graph = ChannelScorer::new();
    let runs = Arc::clone(&graph.runs);
    let classifier = Classifier::new(Box::new(graph), vocabulary(), Processor::default());
    let err = classifier.classify(b"GIF89a but not really").unwrap_err();
    assert!(matches!(err, ClassifyError::Decode(_)), "got {err:?}");
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn small_vocabulary_is_reported() {
    let classifier = Classifier::new(
        Box::new(ChannelScorer::new()),
        vec!["cat".into(), "dog".into(), "car".into()],
        Processor::default(),
    );
    let err = classifier.classify(&png([1, 2, 3])).unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::NotEnoughClasses { needed: 5, available: 3 }
    ));
}

#[test]
fn input_geometry_must_match_the_graph() {
    let classifier = Classifier::new(
        Box::new(ChannelScorer::new()),
        vocabulary(),
        Processor::new(PreprocessConfig {
            mean: 117.0,
            height: 299,
            width: 299,
        }),
    );
    let err = classifier.classify(&png([1, 2, 3])).unwrap_err();
    assert!(matches!(err, ClassifyError::Shape { .. }), "got {err:?}");
}

#[test]
fn missing_model_fails_before_inference() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let image = dir.path().join("cat.png");
    std::fs::write(&image, png([9, 9, 9]))?;
    let paths = AssetPaths {
        model: dir.path().join("tensorflow_inception_graph.pb"),
        labels: dir.path().join("labels.txt"),
    };
    match classify_image(&paths, &image) {
        Err(ClassifyError::Io { path, .. }) => assert_eq!(path, paths.model),
        other => panic!("expected Io error for the model, got {other:?}"),
    }
    Ok(())
}

#[test]
fn classifier_can_move_across_threads() -> Result<()> {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let classifier = classifier();
    assert_send_sync(&classifier);
    let image = png([255, 0, 0]);
    let predictions = std::thread::spawn(move || classifier.classify(&image)).join().unwrap()?;
    assert_eq!(predictions[0].label, "red");
    Ok(())
}
