use actix_web::web;
use clap::Parser;
use homeval_api::{AppState, RestApi};
use homeval_core::{ArtifactPaths, PredictionContext};
use homeval_geocode::{GeocodingAdapter, NominatimClient, NominatimConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// House price estimation service
#[derive(Parser, Debug)]
#[command(name = "homeval")]
#[command(about = "Estimate house prices from a coordinate and optional specs", long_about = None)]
struct Args {
    /// Address to bind the HTTP API to
    #[arg(long, env = "HOMEVAL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, env = "HOMEVAL_PORT", default_value_t = 8000)]
    port: u16,

    /// Directory holding the model artifacts
    #[arg(short, long, env = "HOMEVAL_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Model artifact (defaults to <data-dir>/house_price_model.json)
    #[arg(long, env = "HOMEVAL_MODEL_FILE")]
    model_file: Option<PathBuf>,

    /// Feature column list (defaults to <data-dir>/model_columns.json)
    #[arg(long, env = "HOMEVAL_COLUMNS_FILE")]
    columns_file: Option<PathBuf>,

    /// Neighborhood averages (defaults to <data-dir>/neighborhood_averages.csv)
    #[arg(long, env = "HOMEVAL_LOOKUP_FILE")]
    lookup_file: Option<PathBuf>,

    /// Nominatim base URL
    #[arg(long, env = "HOMEVAL_GEOCODER_URL", default_value = homeval_geocode::nominatim::DEFAULT_NOMINATIM_URL)]
    geocoder_url: String,

    /// User-Agent sent to the geocoder
    #[arg(long, env = "HOMEVAL_USER_AGENT", default_value = homeval_geocode::nominatim::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Geocoder request timeout in seconds
    #[arg(long, env = "HOMEVAL_GEOCODER_TIMEOUT_SECS", default_value_t = homeval_geocode::nominatim::DEFAULT_TIMEOUT_SECS)]
    geocoder_timeout_secs: u64,

    /// Keep serving when the artifacts fail to load; /predict answers 503
    #[arg(long, env = "HOMEVAL_ALLOW_DEGRADED")]
    allow_degraded: bool,

    /// Log level
    #[arg(long, env = "HOMEVAL_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.data_dir);
        ArtifactPaths {
            model: self.model_file.clone().unwrap_or(defaults.model),
            columns: self.columns_file.clone().unwrap_or(defaults.columns),
            lookup: self.lookup_file.clone().unwrap_or(defaults.lookup),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting homeval v{}", env!("CARGO_PKG_VERSION"));
    let paths = args.artifact_paths();
    info!("Model: {:?}", paths.model);
    info!("Columns: {:?}", paths.columns);
    info!("Lookup table: {:?}", paths.lookup);

    let geocoder = NominatimClient::new(NominatimConfig {
        base_url: args.geocoder_url.clone(),
        user_agent: args.user_agent.clone(),
        timeout: Duration::from_secs(args.geocoder_timeout_secs),
    })?;
    let geocoder = GeocodingAdapter::new(Arc::new(geocoder));

    let state = match PredictionContext::load(&paths) {
        Ok(context) => AppState::ready(Arc::new(context), geocoder),
        Err(e) if args.allow_degraded => {
            error!("CRITICAL: could not load model artifacts: {}", e);
            error!("Serving in degraded mode; /predict will answer 503");
            AppState::not_ready(e.to_string())
        }
        Err(e) => return Err(e.into()),
    };
    let state = web::Data::new(state);

    let host = args.host.clone();
    let port = args.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, &host, port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("homeval started successfully");
    info!("HTTP API: http://localhost:{}/", args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
