//! HTTP API for uploads and dataset access
//!
//! Thin transport layer over the pipeline and the dataset store. The routes
//! mirror the service's external interface:
//!
//! - `POST /dataset/upload/{domain}?filename=...`: raw upload body; runs the
//!   pipeline and stores the result
//! - `GET /dataset/datasets`: list the caller's datasets, newest first
//! - `GET /dataset/dataset/{id}`: fetch one dataset, owner-scoped
//! - `GET /health`: liveness probe
//!
//! The caller's opaque user id arrives in the `x-user-id` header, supplied by
//! the identity-provider collaborator; no credential validation happens here.
//! Multipart decoding is likewise the transport collaborator's job: the
//! upload body is the already-decoded byte buffer, and the declared filename
//! rides in the query string.
//!
//! Every pipeline failure maps to a structured JSON error with a
//! human-readable message; persistence failures surface as 502 rather than
//! being retried or masked.

use crate::error::UtilstatError;
use crate::pipeline::process_upload;
use crate::store::{DatasetStore, NewDataset};
use crate::types::Domain;
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Upload body size limit; the transport owns this bound, not the pipeline.
const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadQuery {
    filename: String,
}

/// Build the API route tree over the given store
pub fn routes(
    store: Arc<dyn DatasetStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let upload = warp::path!("dataset" / "upload" / String)
        .and(warp::post())
        .and(owner_header())
        .and(warp::query::<UploadQuery>())
        .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
        .and(warp::body::bytes())
        .and(with_store(store.clone()))
        .and_then(handle_upload);

    let list = warp::path!("dataset" / "datasets")
        .and(warp::get())
        .and(owner_header())
        .and(with_store(store.clone()))
        .and_then(handle_list);

    let fetch = warp::path!("dataset" / "dataset" / Uuid)
        .and(warp::get())
        .and(owner_header())
        .and(with_store(store))
        .and_then(handle_fetch);

    health.or(upload).or(list).or(fetch)
}

/// Run the API server until shutdown
pub async fn run(store: Arc<dyn DatasetStore>, addr: SocketAddr) -> crate::error::Result<()> {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "x-user-id"])
        .allow_methods(vec!["POST", "GET", "OPTIONS"]);

    let routes = routes(store)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_rejection);

    info!("utilstat listening on http://{addr}");
    warp::serve(routes).run(addr).await;
    Ok(())
}

fn with_store(
    store: Arc<dyn DatasetStore>,
) -> impl Filter<Extract = (Arc<dyn DatasetStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// Opaque authenticated-user id from the identity provider collaborator.
fn owner_header() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("x-user-id")
}

async fn handle_upload(
    domain: String,
    owner: Option<String>,
    query: UploadQuery,
    body: Bytes,
    store: Arc<dyn DatasetStore>,
) -> Result<Response, Rejection> {
    let Some(owner_id) = owner else {
        return Ok(error_reply(
            StatusCode::UNAUTHORIZED,
            "missing x-user-id header",
        ));
    };

    let domain: Domain = match domain.parse() {
        Ok(domain) => domain,
        Err(message) => return Ok(error_reply(StatusCode::BAD_REQUEST, &message)),
    };

    debug!(
        "upload request: domain={domain}, filename={}, {} bytes",
        query.filename,
        body.len()
    );

    let extension = Path::new(&query.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    let upload = match process_upload(&body, extension, domain) {
        Ok(upload) => upload,
        Err(err) => return Ok(pipeline_error_reply(&err)),
    };

    let dataset = match store
        .insert(NewDataset {
            owner_id,
            filename: query.filename,
            domain,
            records: upload.records,
            analysis: upload.analysis,
            metadata: upload.metadata,
        })
        .await
    {
        Ok(dataset) => dataset,
        Err(err) => return Ok(pipeline_error_reply(&err)),
    };

    let reply = warp::reply::json(&serde_json::json!({
        "message": "File processed and saved successfully",
        "datasetId": dataset.id,
        "analysis": dataset.analysis,
        "metadata": dataset.metadata,
    }));
    Ok(reply.into_response())
}

async fn handle_list(
    owner: Option<String>,
    store: Arc<dyn DatasetStore>,
) -> Result<Response, Rejection> {
    let Some(owner_id) = owner else {
        return Ok(error_reply(
            StatusCode::UNAUTHORIZED,
            "missing x-user-id header",
        ));
    };

    match store.list(&owner_id).await {
        Ok(summaries) => Ok(warp::reply::json(&summaries).into_response()),
        Err(err) => Ok(pipeline_error_reply(&err)),
    }
}

async fn handle_fetch(
    id: Uuid,
    owner: Option<String>,
    store: Arc<dyn DatasetStore>,
) -> Result<Response, Rejection> {
    let Some(owner_id) = owner else {
        return Ok(error_reply(
            StatusCode::UNAUTHORIZED,
            "missing x-user-id header",
        ));
    };

    match store.fetch(&owner_id, id).await {
        Ok(Some(dataset)) => Ok(warp::reply::json(&dataset).into_response()),
        Ok(None) => Ok(pipeline_error_reply(&UtilstatError::DatasetNotFound)),
        Err(err) => Ok(pipeline_error_reply(&err)),
    }
}

/// Map a pipeline/store failure to its response status.
fn status_for(err: &UtilstatError) -> StatusCode {
    match err {
        UtilstatError::UnsupportedFormat(_)
        | UtilstatError::EmptyDataset
        | UtilstatError::MissingRequiredColumns(_)
        | UtilstatError::EmptyAggregation => StatusCode::BAD_REQUEST,
        UtilstatError::DatasetNotFound => StatusCode::NOT_FOUND,
        UtilstatError::Persistence(_) => StatusCode::BAD_GATEWAY,
        UtilstatError::Io(_) | UtilstatError::Csv(_) | UtilstatError::Spreadsheet(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn pipeline_error_reply(err: &UtilstatError) -> Response {
    let status = status_for(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("upload processing failed: {err}");
    } else {
        debug!("request rejected: {err}");
    }
    error_reply(status, &err.to_string())
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
    .into_response()
}

/// Render transport-level rejections as JSON like everything else.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "upload exceeds the size limit".to_string(),
        )
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, invalid.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else if let Some(forbidden) = err.find::<warp::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, forbidden.to_string())
    } else {
        error!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&UtilstatError::EmptyDataset),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&UtilstatError::UnsupportedFormat("pdf".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&UtilstatError::DatasetNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&UtilstatError::Persistence("down".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
