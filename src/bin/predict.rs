//! Agent driver CLI: load a model, describe it, list loaded models, predict
//! over every image in a dataset directory, then unload.

use clap::Parser;
use edgeval::{client::AgentClient, dataset::discover_images, error::EdgevalError, Config};
use std::path::PathBuf;
use std::time::Instant;

/// Exercise the model-management/inference agent over an image dataset.
#[derive(Parser, Debug)]
#[command(name = "predict")]
struct Args {
    /// Location of the dataset (flat directory of images).
    #[arg(long)]
    dataset: PathBuf,

    /// Directory to save prediction responses as JSON (optional).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load()?;
    let client = AgentClient::new(config.agent.endpoint.clone());
    let model_name = &config.agent.model_name;

    // A model left loaded by a previous run is expected, not fatal.
    match client.load_model(&config.agent.model_path, model_name).await {
        Ok(()) => {}
        Err(EdgevalError::ModelAlreadyLoaded(name)) => {
            log::warn!("Model '{}' already loaded; continuing", name);
        }
        Err(e) => return Err(e.into()),
    }

    let model = client.describe_model(model_name).await?;
    println!(
        "Model '{}': {} input tensor(s), {} output tensor(s)",
        model.name,
        model.input_tensor_metadatas.len(),
        model.output_tensor_metadatas.len()
    );

    let models = client.list_models().await?;
    println!("Agent reports {} loaded model(s):", models.len());
    for m in &models {
        println!("  {}", m.name);
    }

    if let Some(ref output) = args.output {
        std::fs::create_dir_all(output)?;
    }

    let image_files = discover_images(&args.dataset)?;
    if image_files.is_empty() {
        anyhow::bail!("No images found in {}", args.dataset.display());
    }

    for image_file in &image_files {
        let start = Instant::now();
        let response = client.predict(&model, image_file).await?;
        let duration = start.elapsed();

        println!(
            "{}: {} output tensor(s) in {:?}",
            image_file.display(),
            response.tensors.len(),
            duration
        );

        if let Some(ref output) = args.output {
            let stem = image_file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("prediction");
            let path = output.join(format!("{}.json", stem));
            std::fs::write(&path, serde_json::to_string_pretty(&response)?)?;
            log::debug!("Wrote prediction to {}", path.display());
        }
    }

    client.unload_model(model_name).await?;
    println!("Done: {} image(s) predicted.", image_files.len());

    Ok(())
}
