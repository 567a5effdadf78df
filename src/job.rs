//! One conversion job: decode an image file, convert it, write the SVG.
//!
//! Every job carries its own UUID and derives its output names from it, so
//! concurrent jobs never write to the same file even when their inputs
//! share a name.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use uuid::Uuid;

use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::{convert, render, ConvertResult};

/// A single image-to-drawing conversion with its own output paths.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub input: PathBuf,
    /// `<out_dir>/<input stem>-<id>.svg`
    pub svg_path: PathBuf,
    /// Where a preview PNG goes if requested, next to the SVG.
    pub preview_path: PathBuf,
}

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub id: Uuid,
    pub svg_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub paths: usize,
    pub points: usize,
    pub contours: usize,
    pub hatches: usize,
    /// Pen-down and pen-up distances, in source units.
    pub pen_down: f64,
    pub travel: f64,
}

impl Job {
    pub fn new(input: &Path, out_dir: &Path) -> Self {
        let id = Uuid::new_v4();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "drawing".to_string());
        let base = format!("{}-{}", stem, id.as_simple());
        Self {
            id,
            input: input.to_path_buf(),
            svg_path: out_dir.join(format!("{}.svg", base)),
            preview_path: out_dir.join(format!("{}.png", base)),
        }
    }

    /// Decode the input, convert it, and write the outputs.
    ///
    /// `preview` is the preview resolution in pixels per millimeter;
    /// `None` skips the preview.
    pub fn run(&self, config: &PlotConfig, preview: Option<f32>) -> Result<JobReport, PlotError> {
        let image = load(&self.input)?;
        let result = convert(&image, config)?;
        self.write(&result, preview)
    }

    fn write(&self, result: &ConvertResult, preview: Option<f32>) -> Result<JobReport, PlotError> {
        std::fs::write(&self.svg_path, result.drawing.to_svg())?;
        log::info!("job {}: wrote {}", self.id, self.svg_path.display());

        let preview_path = match preview {
            Some(px_per_mm) => {
                render::write_preview(&result.drawing, px_per_mm, &self.preview_path)?;
                Some(self.preview_path.clone())
            }
            None => None,
        };

        Ok(JobReport {
            id: self.id,
            svg_path: self.svg_path.clone(),
            preview_path,
            paths: result.drawing.paths.len(),
            points: result.drawing.point_count(),
            contours: result.contours,
            hatches: result.hatches,
            pen_down: result.pen_down,
            travel: result.travel,
        })
    }
}

/// Open and decode an image file. Decoding is the caller's side of the
/// pipeline, so this is the only place `DecodeUnavailable` comes from.
pub fn load(path: &Path) -> Result<DynamicImage, PlotError> {
    ImageReader::open(path)
        .map_err(|e| PlotError::DecodeUnavailable(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| PlotError::DecodeUnavailable(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| PlotError::DecodeUnavailable(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_name_gets_distinct_outputs() {
        let out = Path::new("/tmp/plots");
        let a = Job::new(Path::new("/uploads/a/photo.png"), out);
        let b = Job::new(Path::new("/uploads/b/photo.png"), out);
        assert_ne!(a.id, b.id);
        assert_ne!(a.svg_path, b.svg_path);
        assert_ne!(a.preview_path, b.preview_path);
        assert_eq!(a.svg_path.parent(), Some(out));
    }

    #[test]
    fn output_name_keeps_input_stem() {
        let job = Job::new(Path::new("portrait.jpeg"), Path::new("."));
        let name = job.svg_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("portrait-"));
        assert!(name.ends_with(".svg"));
        assert!(name.contains(&job.id.as_simple().to_string()));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = load(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, PlotError::DecodeUnavailable(_)));
    }
}
