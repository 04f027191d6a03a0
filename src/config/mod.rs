use std::env;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_MODEL_PATH: &str = "model.json";
const DEFAULT_VECTORIZER_PATH: &str = "vectorizer.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Artifacts
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .context("PORT must be a valid port number")?,

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.into())
                .into(),
            vectorizer_path: env::var("VECTORIZER_PATH")
                .unwrap_or_else(|_| DEFAULT_VECTORIZER_PATH.into())
                .into(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
