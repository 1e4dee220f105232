mod classifier;
mod config;
mod error;
mod handlers;
mod labels;
mod models;
mod preprocessing;
mod routes;
mod upload;

use std::io;

use actix_web::{web, HttpServer};
use clap::Parser;

use classifier::{Classifier, OnnxPredictor};
use config::Config;
use handlers::AppState;
use labels::LabelTable;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn load_classifier(config: &Config) -> io::Result<Classifier> {
    let labels = match config.labels_path() {
        Some(path) => LabelTable::from_file(&path)
            .map_err(|e| startup_error(&format!("Failed to read labels from {}", path.display()), e))?,
        None => LabelTable::builtin(),
    };

    let model_path = config.model_path();
    log::info!("Loading model from {}", model_path.display());
    let predictor = OnnxPredictor::load(&model_path, config.normalization.input_shape())
        .map_err(|e| startup_error("Failed to load ONNX model", e))?;

    let classifier = Classifier::new(Box::new(predictor), labels, config.normalization);
    log::info!(
        "Model ready ({:?} preprocessing, {} classes)",
        config.normalization,
        classifier.labels().len()
    );
    Ok(classifier)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let classifier = load_classifier(&config)?;

    let upload_dir = config.upload_dir();
    upload::ensure_upload_dir(&upload_dir)
        .map_err(|e| startup_error(&format!("Could not create {}", upload_dir.display()), e))?;

    let state = web::Data::new(AppState {
        classifier,
        upload_dir,
        index_path: config.index_path(),
        unique_filenames: config.unique_filenames,
    });

    let cors = config.cors;
    let allowed_origin = config.allowed_origin.clone();
    match cors {
        config::CorsPolicy::Restricted => log::info!("CORS restricted to {} on /api", allowed_origin),
        config::CorsPolicy::Open => log::info!("CORS open to any origin"),
    }

    let (host, port) = config.bind_addr();
    log::info!("Server running at http://{}:{}", host, port);

    let mut server = HttpServer::new(move || routes::build_app(state.clone(), cors, &allowed_origin));
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((host, port))?.run().await
}
