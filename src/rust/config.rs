//! Command-line and environment configuration for the server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use ort::session::builder::GraphOptimizationLevel;

use crate::artifact::DEFAULT_MODEL_PATH;
use crate::runtime::RuntimeConfig;

/// Customer churn prediction web app
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the trained classifier (.json XGBoost model or .onnx graph)
    #[arg(short, long, env = "CHURNGUARD_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Address the web app listens on
    #[arg(short, long, env = "CHURNGUARD_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Refuse to start unless the model file has this SHA-256 digest (hex)
    #[arg(long, env = "CHURNGUARD_MODEL_SHA256")]
    pub model_sha256: Option<String>,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, default_value = "0")]
    pub intra_threads: usize,

    /// ONNX Runtime inter-op threads (0 lets the runtime decide)
    #[arg(long, default_value = "0")]
    pub inter_threads: usize,
}

impl Args {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}
