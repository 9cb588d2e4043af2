use crate::error::ApiError;
use crate::upload::read_upload;
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use reqsift_detector::{ArtifactSummary, Detector};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Filename hint for the anomalous-rows download
pub const BAD_REQUESTS_FILENAME: &str = "bad_requests.csv";

/// Filename hint for the fully annotated download
pub const PREDICTIONS_FILENAME: &str = "predictions.csv";

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Default cap on an uploaded table, 16 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct UploadLimit(usize);

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    version: &'static str,
    anomalous_label: &'a str,
    model: ArtifactSummary,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(detector: Detector, config: ApiConfig) -> std::io::Result<()> {
        let limit = config.max_upload_bytes;
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(Self::routes(detector.clone(), limit))
        })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
    }

    /// Run the server on its own actix system, blocking the calling thread
    /// until it stops. Bind failures are returned to the caller.
    pub fn run(detector: Detector, config: ApiConfig) -> std::io::Result<()> {
        actix_web::rt::System::new().block_on(Self::start(detector, config))
    }

    /// Register the app data and every route. Shared by the server and tests.
    pub fn routes(
        detector: Detector,
        max_upload_bytes: usize,
    ) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(detector))
                .app_data(web::Data::new(UploadLimit(max_upload_bytes)))
                .route("/", web::get().to(index))
                .route("/healthcheck", web::get().to(healthcheck))
                .route("/predict-bad/", web::post().to(predict_bad))
                .route("/predict/", web::post().to(predict_all))
                .route("/summary/", web::post().to(summary));
        }
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("reqsift bad request detector")
}

async fn healthcheck(detector: web::Data<Detector>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        anomalous_label: detector.anomalous_label(),
        model: detector.artifacts().summary(),
    }))
}

async fn predict_bad(
    req: HttpRequest,
    payload: web::Payload,
    detector: web::Data<Detector>,
    limit: web::Data<UploadLimit>,
) -> Result<HttpResponse, ApiError> {
    let span = info_span!("predict_bad", request_id = %Uuid::new_v4());
    async move {
        let body = read_upload(&req, payload, limit.0).await?;
        let csv = detector.detect_csv(&body)?;
        info!(upload_bytes = body.len(), response_bytes = csv.len(), "bad requests exported");
        Ok::<_, ApiError>(csv_attachment(csv, BAD_REQUESTS_FILENAME))
    }
    .instrument(span)
    .await
}

async fn predict_all(
    req: HttpRequest,
    payload: web::Payload,
    detector: web::Data<Detector>,
    limit: web::Data<UploadLimit>,
) -> Result<HttpResponse, ApiError> {
    let span = info_span!("predict", request_id = %Uuid::new_v4());
    async move {
        let body = read_upload(&req, payload, limit.0).await?;
        let csv = detector.annotate_csv(&body)?;
        info!(upload_bytes = body.len(), response_bytes = csv.len(), "predictions exported");
        Ok::<_, ApiError>(csv_attachment(csv, PREDICTIONS_FILENAME))
    }
    .instrument(span)
    .await
}

async fn summary(
    req: HttpRequest,
    payload: web::Payload,
    detector: web::Data<Detector>,
    limit: web::Data<UploadLimit>,
) -> Result<HttpResponse, ApiError> {
    let span = info_span!("summary", request_id = %Uuid::new_v4());
    async move {
        let body = read_upload(&req, payload, limit.0).await?;
        let summary = detector.summarize_csv(&body)?;
        info!(total = summary.total, anomalous = summary.anomalous, "summary computed");
        Ok::<_, ApiError>(HttpResponse::Ok().json(summary))
    }
    .instrument(span)
    .await
}

fn csv_attachment(body: Vec<u8>, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename.to_string())],
        })
        .body(body)
}
