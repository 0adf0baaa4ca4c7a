use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;

use churnguard::{init_logger, web, Args, ChurnClassifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    info!("=== Starting Churn Prediction App ===");

    // The model is a startup precondition: without it nothing is served
    let start_time = Instant::now();
    let mut builder = ChurnClassifier::builder().with_runtime_config(args.runtime_config());
    if let Some(hex) = &args.model_sha256 {
        builder = builder.with_expected_sha256(hex.clone());
    }
    let classifier = builder
        .with_model_path(&args.model)
        .and_then(|b| b.build())
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;

    let model_info = classifier.info();
    info!(
        "=== Model Ready: {} (took {:.2?}) ===",
        model_info.description,
        start_time.elapsed()
    );

    web::serve(args.bind, Arc::new(classifier))
        .await
        .with_context(|| format!("server on {} stopped", args.bind))
}
