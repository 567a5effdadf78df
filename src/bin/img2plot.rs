use clap::Parser;
use img2plot::job::Job;
use img2plot::{edges, Canvas, PlotConfig};
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img2plot", about = "Raster image to plotter-ready SVG line drawing")]
struct Cli {
    /// Input image paths (PNG, JPEG, BMP, ...)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory; each job writes <stem>-<job id>.svg
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Longest-edge working size in pixels
    #[arg(short, long, default_value = "1024")]
    resolution: u32,

    /// Contour scale factor (0 = no contours)
    #[arg(long, default_value = "1")]
    contours: f64,

    /// How many times contours are drawn
    #[arg(long, default_value = "5")]
    repeat_contours: u32,

    /// Hatch cell size (0 = no hatching)
    #[arg(long, default_value = "0")]
    hatch: f64,

    /// How many times hatching is drawn
    #[arg(long, default_value = "1")]
    repeat_hatch: u32,

    /// Drawing width on the canvas, in mm
    #[arg(long, default_value = "30")]
    width_mm: f64,

    /// Drawing height on the canvas, in mm
    #[arg(long, default_value = "30")]
    height_mm: f64,

    /// Horizontal offset of the drawing, in mm
    #[arg(long, default_value = "80")]
    offset_x_mm: f64,

    /// Vertical offset of the drawing, in mm
    #[arg(long, default_value = "80")]
    offset_y_mm: f64,

    /// Also write a PNG preview at this many pixels per mm
    #[arg(long)]
    preview: Option<f32>,

    /// Use the Sobel fallback instead of Canny edge detection
    #[arg(long)]
    no_accel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let accelerated = edges::init_acceleration(!cli.no_accel);

    let config = PlotConfig {
        resolution: cli.resolution,
        draw_contours: cli.contours,
        repeat_contours: cli.repeat_contours,
        draw_hatch: cli.hatch,
        repeat_hatch: cli.repeat_hatch,
        canvas: Canvas {
            width_mm: cli.width_mm,
            height_mm: cli.height_mm,
            offset_x_mm: cli.offset_x_mm,
            offset_y_mm: cli.offset_y_mm,
        },
    };
    config.validate()?;
    std::fs::create_dir_all(&cli.out_dir)?;

    // Header
    eprintln!();
    eprintln!(
        "  img2plot \u{00b7} {} image(s) \u{00b7} {} edges",
        cli.inputs.len(),
        if accelerated { "canny" } else { "sobel" }
    );
    eprintln!();

    // One independent job per input; jobs share nothing but the config.
    let jobs: Vec<Job> = cli.inputs.iter().map(|input| Job::new(input, &cli.out_dir)).collect();
    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| (job, job.run(&config, cli.preview)))
        .collect();

    let mut failed = 0;
    for (job, result) in &results {
        match result {
            Ok(report) => {
                eprintln!(
                    "  \u{2713} {}  {} contours + {} hatch \u{00b7} {} paths \u{00b7} {} points \u{00b7} {:.0} down / {:.0} up",
                    job.input.display(),
                    report.contours,
                    report.hatches,
                    report.paths,
                    report.points,
                    report.pen_down,
                    report.travel,
                );
                eprintln!("    {}", report.svg_path.display());
                if let Some(preview) = &report.preview_path {
                    eprintln!("    {}", preview.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("  \u{2717} {}  {}", job.input.display(), e);
            }
        }
    }
    eprintln!();

    if failed > 0 {
        return Err(format!("{} of {} job(s) failed", failed, results.len()).into());
    }
    Ok(())
}
