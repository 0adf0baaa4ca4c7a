//! HTTP surface: the form page, its submission, a JSON twin and a health probe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use log::{debug, error, info};
use serde::Serialize;

use crate::classifier::{ChurnClassifier, ChurnError, ClassifierInfo};
use crate::form::RawSelections;
use crate::page::PageView;
use crate::record::{self, CustomerRecord};
use crate::risk::{PredictionResult, RiskTier};

/// Message shown when inference itself fails; details go to the log.
const PREDICTION_FAILED: &str = "Prediction failed. Please try again.";

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    classifier: Arc<ChurnClassifier>,
    info: Arc<ClassifierInfo>,
}

impl AppState {
    pub fn new(classifier: Arc<ChurnClassifier>) -> Self {
        let info = Arc::new(classifier.info());
        Self { classifier, info }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub record: CustomerRecord,
    pub probability: f32,
    pub churn: bool,
    pub label: &'static str,
    pub tier: RiskTier,
    pub advice: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// A failed submission, rendered as the status code and message the user sees.
#[derive(Debug)]
pub struct AppError(ChurnError);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ChurnError::InvalidLabel { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match &self.0 {
            ChurnError::InvalidLabel { .. } => self.0.to_string(),
            _ => PREDICTION_FAILED.to_string(),
        }
    }
}

impl From<ChurnError> for AppError {
    fn from(err: ChurnError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.user_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn router(classifier: Arc<ChurnClassifier>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/health", get(health))
        .with_state(AppState::new(classifier))
}

/// Serves the app until the process is stopped.
pub async fn serve(addr: SocketAddr, classifier: Arc<ChurnClassifier>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("churnguard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(classifier)).await
}

/// Clamps, encodes and scores one submission.
fn score(
    classifier: &ChurnClassifier,
    raw: RawSelections,
) -> Result<(CustomerRecord, PredictionResult), AppError> {
    debug!("Submission: {:?}", raw);
    let customer = record::build(&raw.clamped())?;
    let result = classifier.predict(&customer).map_err(|e| {
        error!("Prediction failed for {:?}: {}", customer, e);
        e
    })?;
    info!(
        "Scored customer: probability {:.4}, churn {}",
        result.probability, result.churn
    );
    Ok((customer, result))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let selections = RawSelections::default();
    Html(PageView::form(&selections, &state.info).render())
}

async fn predict_form(
    State(state): State<AppState>,
    Form(raw): Form<RawSelections>,
) -> (StatusCode, Html<String>) {
    let shown = raw.clone().clamped();
    let mut view = PageView::form(&shown, &state.info);

    let status = match score(&state.classifier, raw) {
        Ok((_, result)) => {
            view.result = Some(result);
            StatusCode::OK
        }
        Err(err) => {
            view.error = Some(err.user_message());
            err.status()
        }
    };
    (status, Html(view.render()))
}

async fn predict_json(
    State(state): State<AppState>,
    Json(raw): Json<RawSelections>,
) -> Result<Json<PredictionResponse>, AppError> {
    let (record, result) = score(&state.classifier, raw)?;
    let presentation = result.present();
    Ok(Json(PredictionResponse {
        record,
        probability: result.probability,
        churn: result.churn,
        label: presentation.label,
        tier: presentation.tier,
        advice: presentation.advice,
    }))
}

async fn health() -> &'static str {
    "ok"
}
