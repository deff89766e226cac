use log::info;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catch, catchers, routes, Build, Config, Request, Response, Rocket};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::service::ServiceContext;
use api_docs::ApiDocs;

pub mod api_docs;
pub mod data;
mod handlers;

/// Error body shape for all failure responses
#[derive(Serialize, Debug, Clone)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

pub fn rocket_main(context: ServiceContext) -> Rocket<Build> {
    let conf = context.config.clone();
    let config = Figment::from(Config::default())
        .merge(("port", conf.http_port))
        .merge(("address", conf.http_address.to_owned()));

    let rocket = rocket::custom(config)
        .register("/", catchers![default_catcher, not_found])
        .manage(context)
        .mount(
            "/api",
            routes![
                handlers::persons::list_persons,
                handlers::persons::person_detail,
                handlers::persons::create_person,
                handlers::persons::update_person,
                handlers::persons::remove_person,
                handlers::persons::phonebook_info,
            ],
        )
        .mount(
            "/",
            SwaggerUi::new("/swagger-ui/<_..>").url("/api-docs/openapi.json", ApiDocs::openapi()),
        )
        .attach(Cors);

    info!("HTTP Server Listening on {}", conf.http_listen_url());

    rocket
}

struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, OPTIONS, PUT, DELETE",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        status.reason().unwrap_or("Unknown error").to_string(),
    ))
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(format!(
        "We couldn't find the requested path '{}'",
        req.uri()
    )))
}
