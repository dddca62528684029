//! Handler bodies shared by customers, services and orders.
//!
//! Every operation validates its input before touching storage, and update and
//! delete confirm the target exists before mutating it.

use axum::http::StatusCode;
use axum::response::Response;
use models::Record;
use serde::de::DeserializeOwned;
use service::errors::ServiceError;
use service::repository::CrudRepository;
use tracing::{debug, info};

use crate::response::{handle_internal_error, handle_web_error, send_data, send_success, WebError};

pub fn parse_id(raw: &str) -> Result<i64, WebError> {
    raw.parse::<i64>()
        .map_err(|_| handle_web_error(StatusCode::BAD_REQUEST, format!("Incorrect parameter for id: {raw}")))
}

pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, WebError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejected request body");
        handle_web_error(StatusCode::BAD_REQUEST, "Couldn't parse JSON data")
    })
}

/// Map a failed mutation: validation → 400, missing row → 404, storage → 500 with `failure`.
pub fn mutation_error(e: ServiceError, failure: &str) -> WebError {
    match &e {
        ServiceError::Validation(msg) => handle_web_error(StatusCode::BAD_REQUEST, msg.clone()),
        ServiceError::NotFound(msg) => handle_web_error(StatusCode::NOT_FOUND, msg.clone()),
        ServiceError::Storage(_) => {
            handle_internal_error("Database access error", &e);
            handle_web_error(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}

/// 404 with "The <entity> doesn't exist" unless `id` can be read back.
pub async fn ensure_exists<T: Record>(repo: &dyn CrudRepository<T>, id: i64) -> Result<(), WebError> {
    repo.get_by_id(id).await.map(|_| ()).map_err(|e| {
        if !e.is_not_found() {
            handle_internal_error("Database access error", &e);
        }
        handle_web_error(StatusCode::NOT_FOUND, format!("The {} doesn't exist", T::ENTITY))
    })
}

pub async fn get_one<T: Record>(repo: &dyn CrudRepository<T>, raw_id: &str) -> Result<Response, WebError> {
    let id = parse_id(raw_id)?;
    let record = repo.get_by_id(id).await.map_err(|e| {
        handle_internal_error("Database access error", &e);
        handle_web_error(
            StatusCode::NOT_FOUND,
            format!("There is no {} with id {} in the database", T::ENTITY, id),
        )
    })?;
    send_data(&record)
}

pub async fn get_all<T: Record>(repo: &dyn CrudRepository<T>) -> Result<Response, WebError> {
    let records = repo.get_all().await.map_err(|e| {
        handle_internal_error("Database access error", &e);
        handle_web_error(
            StatusCode::NOT_FOUND,
            format!("Couldn't extract any entry from the {} database", T::COLLECTION),
        )
    })?;
    debug!(collection = T::COLLECTION, count = records.len(), "listed records");
    send_data(&records)
}

pub async fn add<T: Record>(repo: &dyn CrudRepository<T>, body: &[u8]) -> Result<Response, WebError> {
    let record: T = parse_body(body)?;
    const FAILURE: &str = "Couldn't add data to the database";
    record.validate().map_err(|e| mutation_error(e.into(), FAILURE))?;
    let id = repo.add(&record).await.map_err(|e| mutation_error(e, FAILURE))?;
    info!(entity = T::ENTITY, id, "added record");
    Ok(send_success("Added successfully"))
}

pub async fn update<T: Record>(repo: &dyn CrudRepository<T>, body: &[u8]) -> Result<Response, WebError> {
    let record: T = parse_body(body)?;
    const FAILURE: &str = "Couldn't update data in the database";
    record.validate().map_err(|e| mutation_error(e.into(), FAILURE))?;
    ensure_exists(repo, record.id()).await?;
    repo.update(&record).await.map_err(|e| mutation_error(e, FAILURE))?;
    info!(entity = T::ENTITY, id = record.id(), "updated record");
    Ok(send_success("Updated successfully"))
}

pub async fn delete<T: Record>(repo: &dyn CrudRepository<T>, raw_id: &str) -> Result<Response, WebError> {
    let id = parse_id(raw_id)?;
    ensure_exists(repo, id).await?;
    repo.delete(id)
        .await
        .map_err(|e| mutation_error(e, &format!("Couldn't delete the {} from the database", T::ENTITY)))?;
    info!(entity = T::ENTITY, id, "deleted record");
    Ok(send_success("Deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Service;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Incorrect parameter for id: abc");
        assert!(parse_id("").is_err());
    }

    #[test]
    fn mutation_errors_follow_the_taxonomy() {
        let invalid = Service { price: -1.0, ..Default::default() };
        let err = mutation_error(invalid.validate().unwrap_err().into(), "Couldn't add data to the database");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "price must be a non-negative number, got -1");

        let err = mutation_error(ServiceError::Storage("disk full".into()), "Couldn't add data to the database");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Couldn't add data to the database");

        let err = mutation_error(ServiceError::not_found("order"), "unused");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_body::<Service>(b"{\"title\":").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Couldn't parse JSON data");
    }
}
