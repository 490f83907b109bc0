//! Evaluation CLI: run anomaly detection over a labeled dataset and report
//! the confusion matrix, precision/recall/accuracy/F1 and latency per subset.

use clap::Parser;
use edgeval::{
    client::DetectorClient,
    dataset::{category_dir, discover_images, Category},
    error::EdgevalError,
    eval::{render_confusion_table, ConfusionCounts, Label, MetricsReport, Outcome},
    Config,
};
use std::path::PathBuf;
use std::time::Instant;

/// Evaluate an anomaly-detection model over `<root>/<subset>/<category>/*`.
#[derive(Parser, Debug)]
#[command(name = "evaluate")]
struct Args {
    /// Location of the dataset root.
    #[arg(long)]
    dataset: PathBuf,

    /// Detector target name from config.toml ([detector.targets.<name>]).
    #[arg(long)]
    target: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load()?;

    let target = config.detector_target(&args.target).ok_or_else(|| {
        let mut known: Vec<&str> = config
            .detector
            .targets
            .keys()
            .map(String::as_str)
            .collect();
        known.sort_unstable();
        anyhow::anyhow!(
            "Unknown detector target '{}'. Configured targets: {}",
            args.target,
            known.join(", ")
        )
    })?;
    let client = DetectorClient::new(target.endpoint.clone(), target.model_id.clone());

    // One independent accumulator per subset; subsets never share counts.
    for subset in &config.evaluation.subsets {
        let start = Instant::now();
        let mut counts = ConfusionCounts::new();

        for category in Category::ALL {
            let dir = category_dir(&args.dataset, subset, category);
            let image_files = discover_images(&dir)?;
            log::info!(
                "{} [{}]: {} image(s)",
                subset,
                category.dir_name(),
                image_files.len()
            );

            for image_file in &image_files {
                let detection = client.detect_anomalies(image_file).await?;
                counts.record(Outcome {
                    truth: category.expected_label(),
                    predicted: Label::from_anomalous(detection.is_anomalous),
                });
            }
        }
        let elapsed = start.elapsed();

        let report = match MetricsReport::from_run(&counts, elapsed) {
            Ok(report) => report,
            Err(EdgevalError::EmptyRun) => {
                log::warn!("No images found for subset '{}'; skipping metrics", subset);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!("\n=== Results for {} [{}] ===", args.target, subset);
        print!("{}", render_confusion_table(&counts));
        println!("Precision: {:.6}", report.precision);
        println!("Recall:    {:.6}", report.recall);
        println!("F1 Score:  {:.6}", report.f1_score);
        println!("Accuracy:  {:.6}", report.accuracy);
        println!(
            "Average latency per image (seconds): {:.6}",
            report.avg_latency_seconds
        );
    }

    Ok(())
}
