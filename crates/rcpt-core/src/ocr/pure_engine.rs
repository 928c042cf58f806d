//! Pure Rust OCR recognizer using `pure-onnx-ocr`.

use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::RecognitionError;
use crate::models::config::OcrConfig;

use super::{RecognizedText, Recognizer};

/// Recognizer backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
    language: String,
}

/// Regions whose tops are this close (in pixels) share a text line.
const ROW_TOLERANCE: f64 = 10.0;

/// A recognized region with its top-left corner, for reading order.
struct Region {
    x: f64,
    y: f64,
    text: String,
}

impl PureOcrRecognizer {
    /// Load detection, recognition and dictionary files from
    /// `config.model_dir`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, RecognitionError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(RecognitionError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognitionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {}",
            config.model_dir.display()
        );

        Ok(Self {
            engine,
            language: config.language.clone(),
        })
    }
}

impl Recognizer for PureOcrRecognizer {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, RecognitionError> {
        let start = Instant::now();

        let image = image::load_from_memory(image)
            .map_err(|e| RecognitionError::InvalidImage(e.to_string()))?;
        let (width, height) = image.dimensions();
        debug!("Recognizing receipt image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| RecognitionError::Engine(format!("pure-onnx-ocr: {}", e)))?;

        let regions: Vec<Region> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                Region {
                    x,
                    y,
                    text: r.text.replace("[UNK]", " "),
                }
            })
            .collect();
        let region_count = regions.len();

        let text = layout_lines(regions);

        info!(
            "OCR complete: {} regions in {}ms",
            region_count,
            start.elapsed().as_millis()
        );

        Ok(RecognizedText::new(text, self.language.clone()))
    }
}

/// Join regions into text lines in reading order.
///
/// Regions on the same row (tops within [`ROW_TOLERANCE`] of the row's first
/// region) are joined left to right with a space; rows are joined top to
/// bottom with newlines.
fn layout_lines(mut regions: Vec<Region>) -> String {
    regions.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut rows: Vec<Vec<Region>> = Vec::new();
    for region in regions {
        match rows.last_mut() {
            Some(row) if region.y - row[0].y <= ROW_TOLERANCE => row.push(region),
            _ => rows.push(vec![region]),
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            row.iter()
                .map(|r| r.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| {
            (x.min(c.x), y.min(c.y))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::rules::AmountMatcher;
    use pretty_assertions::assert_eq;

    fn region(x: f64, y: f64, text: &str) -> Region {
        Region {
            x,
            y,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_same_row_regions_share_a_line() {
        let regions = vec![
            region(200.0, 102.0, "Rs. 542.00"),
            region(10.0, 60.0, "Tea Rs 20"),
            region(10.0, 100.0, "Total:"),
        ];
        assert_eq!(layout_lines(regions), "Tea Rs 20\nTotal: Rs. 542.00");
    }

    #[test]
    fn test_total_bias_survives_layout() {
        let text = layout_lines(vec![
            region(10.0, 60.0, "Tea Rs 20"),
            region(10.0, 100.0, "Total:"),
            region(200.0, 97.0, "Rs. 542.00"),
        ]);
        let found = AmountMatcher::new().find_total(&text).unwrap();
        assert_eq!(found.value.raw, "542.00");
    }

    #[test]
    fn test_rows_split_beyond_tolerance() {
        let regions = vec![
            region(10.0, 0.0, "SuperMart"),
            region(10.0, 25.0, "Store: SuperMart Grocers"),
            region(10.0, 50.0, "   "),
        ];
        assert_eq!(layout_lines(regions), "SuperMart\nStore: SuperMart Grocers");
    }

    #[test]
    fn test_empty_regions() {
        assert_eq!(layout_lines(Vec::new()), "");
    }
}
