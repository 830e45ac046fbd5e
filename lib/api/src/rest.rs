use crate::dto::PredictRequest;
use crate::error::ApiError;
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use tracing::Instrument;
use uuid::Uuid;

pub const LIVENESS_MESSAGE: &str = "House Price API is Running!";

pub struct RestApi;

impl RestApi {
    pub async fn start(state: web::Data<AppState>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register the routes and the JSON body error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(home))
        .route("/ready", web::get().to(ready))
        .route("/predict", web::post().to(predict));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let e = ApiError::Validation(err.to_string());
    e.log();
    e.into()
}

async fn home() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": LIVENESS_MESSAGE
    })))
}

async fn ready(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    match state.get_ref() {
        AppState::Ready(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "ready"
        }))),
        AppState::NotReady { reason } => {
            tracing::warn!("Readiness check failed: {}", reason);
            Err(ApiError::NotReady)
        }
    }
}

async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);

    async move {
        let service = state.service()?;
        let response = service.predict(&req).await?;
        Ok::<_, ApiError>(HttpResponse::Ok().json(response))
    }
    .instrument(span)
    .await
    .map_err(|e| {
        e.log();
        e
    })
}
