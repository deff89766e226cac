pub mod person_service;

use std::io::Cursor;
use std::sync::Arc;

use log::error;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::Response;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;
use crate::persistence::{self, DbContext};
use person_service::{PersonService, PersonServiceApi};

/// Generic result type
pub type Result<T> = std::result::Result<T, Error>;

/// Generic error type
#[derive(Debug, Error)]
pub enum Error {
    /// all errors originating from the persistence layer
    #[error("Persistence error: {0}")]
    Persistence(#[from] persistence::Error),

    /// errors that stem from validation
    #[error("Validation Error: {0}")]
    Validation(String),

    /// the person a request was aimed at does not, or no longer, exist
    #[error("person not found")]
    NotFound,

    /// the given id does not parse as a person identifier
    #[error("malformed id")]
    MalformedId,
}

/// Map from service errors directly to rocket status codes. This allows us to
/// write handlers that return `Result<T, service::Error>` and still return the
/// correct status code.
impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &rocket::Request) -> rocket::response::Result<'o> {
        match self {
            // handle all persistence errors as InternalServerError, the
            // client can't do anything about them anyway
            Error::Persistence(e) => {
                error!("{e}");
                Status::InternalServerError.respond_to(req)
            }
            Error::Validation(msg) => build_error_response(Status::BadRequest, &msg),
            Error::MalformedId => build_error_response(Status::BadRequest, "malformed id"),
            Error::NotFound => build_error_response(Status::NotFound, "person not found"),
        }
    }
}

fn build_error_response<'o>(status: Status, msg: &str) -> rocket::response::Result<'o> {
    let body = json!({ "error": msg }).to_string();
    Response::build()
        .status(status)
        .header(ContentType::JSON)
        .sized_body(body.len(), Cursor::new(body))
        .ok()
}

/// A dependency container for all services that are used by the application
#[derive(Clone)]
pub struct ServiceContext {
    pub config: Config,
    pub person_service: Arc<dyn PersonServiceApi>,
}

impl ServiceContext {
    pub fn new(config: Config, person_service: PersonService) -> Self {
        Self {
            config,
            person_service: Arc::new(person_service),
        }
    }
}

/// building up the service context dependencies here for now. Later we can
/// modularize this and make it more flexible.
pub async fn create_service_context(config: Config, db: DbContext) -> Result<ServiceContext> {
    let person_service = PersonService::new(db.person_store);
    Ok(ServiceContext::new(config, person_service))
}
