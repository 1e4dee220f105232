use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Condition;
use clap::{Parser, ValueEnum};

use crate::preprocessing::Normalization;

const DEFAULT_MODEL_FILE: &str = "model_VGG16_v4.onnx";
const DEFAULT_UPLOAD_DIR: &str = "uploaded_images";
const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CorsPolicy {
    /// A single allowed origin, scoped to `/api/*`.
    Restricted,
    /// Any origin, method and header on every response.
    Open,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Bird species image classification service")]
pub struct Config {
    #[arg(long, env = "CLASSIFIER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(short, long, env = "CLASSIFIER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory the model and upload paths are resolved against.
    /// Defaults to the directory holding the executable.
    #[arg(long, env = "CLASSIFIER_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// ONNX model file
    #[arg(short, long, env = "CLASSIFIER_MODEL")]
    pub model: Option<PathBuf>,

    /// Label file, one class name per line, in model output order
    #[arg(long, env = "CLASSIFIER_LABELS")]
    pub labels: Option<PathBuf>,

    #[arg(long, env = "CLASSIFIER_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Directory holding index.html
    #[arg(long, env = "CLASSIFIER_STATIC_DIR", default_value = ".")]
    pub static_dir: PathBuf,

    #[arg(long, env = "CLASSIFIER_CORS", value_enum, default_value_t = CorsPolicy::Restricted)]
    pub cors: CorsPolicy,

    #[arg(long, env = "CLASSIFIER_ALLOWED_ORIGIN", default_value = "http://127.0.0.1:3000")]
    pub allowed_origin: String,

    #[arg(long, env = "CLASSIFIER_NORMALIZATION", value_enum, default_value_t = Normalization::Caffe)]
    pub normalization: Normalization,

    /// Store uploads under a generated name instead of the client's filename
    #[arg(long, env = "CLASSIFIER_UNIQUE_FILENAMES")]
    pub unique_filenames: bool,

    #[arg(long, env = "CLASSIFIER_WORKERS")]
    pub workers: Option<usize>,
}

impl Config {
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.base_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(self.model.as_ref(), DEFAULT_MODEL_FILE)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.resolve(self.upload_dir.as_ref(), DEFAULT_UPLOAD_DIR)
    }

    pub fn labels_path(&self) -> Option<PathBuf> {
        self.labels.as_ref().map(|p| self.resolve(Some(p), ""))
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(INDEX_FILE)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    fn resolve(&self, path: Option<&PathBuf>, default: &str) -> PathBuf {
        match path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.base_dir().join(p),
            None => self.base_dir().join(default),
        }
    }
}

impl CorsPolicy {
    /// Middleware for the `/api` scope, active only under the restricted policy.
    pub fn api_cors(&self, allowed_origin: &str) -> Condition<Cors> {
        let cors = Cors::default()
            .allowed_origin(allowed_origin)
            .allow_any_method()
            .allow_any_header();
        Condition::new(!self.is_open(), cors)
    }

    /// Middleware for the whole application, active only under the open policy.
    pub fn app_cors(&self) -> Condition<Cors> {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .send_wildcard();
        Condition::new(self.is_open(), cors)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, CorsPolicy::Open)
    }
}
