use rocket::http::{ContentType, Status};
use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, Responder, State};

use crate::service::person_service::Person;
use crate::service::{Result, ServiceContext};
use crate::util::date::now;
use crate::web::data::PersonPayload;

/// A person lookup either carries the person or nothing at all. Absence
/// is reported as 204, not as an error.
#[derive(Responder)]
pub enum PersonDetailResponse {
    Found(Json<Person>),
    Absent(NoContent),
}

#[utoipa::path(
    tag = "Persons",
    description = "Get all persons in the phonebook",
    responses(
        (status = 200, description = "List of persons", body = Vec<Person>)
    )
)]
#[get("/persons")]
pub async fn list_persons(state: &State<ServiceContext>) -> Result<Json<Vec<Person>>> {
    let persons: Vec<Person> = state.person_service.list_all().await?;
    Ok(Json(persons))
}

#[utoipa::path(
    tag = "Persons",
    description = "Get a single person by id",
    params(
        ("id" = String, description = "Id of the person to fetch")
    ),
    responses(
        (status = 200, description = "The person", body = Person),
        (status = 204, description = "No person with this id"),
        (status = 400, description = "Malformed id")
    )
)]
#[get("/persons/<id>")]
pub async fn person_detail(
    state: &State<ServiceContext>,
    id: &str,
) -> Result<PersonDetailResponse> {
    match state.person_service.get_by_id(id).await? {
        Some(person) => Ok(PersonDetailResponse::Found(Json(person))),
        None => Ok(PersonDetailResponse::Absent(NoContent)),
    }
}

#[utoipa::path(
    tag = "Persons",
    description = "Add a person, overwriting the number of an existing person with the same name",
    request_body = PersonPayload,
    responses(
        (status = 200, description = "The created or overwritten person", body = Person),
        (status = 400, description = "Validation failed")
    )
)]
#[post("/persons", format = "json", data = "<payload>")]
pub async fn create_person(
    state: &State<ServiceContext>,
    payload: Json<PersonPayload>,
) -> Result<Json<Person>> {
    let payload = payload.0;
    let person = state
        .person_service
        .create(&payload.name, &payload.number)
        .await?;
    Ok(Json(person))
}

#[utoipa::path(
    tag = "Persons",
    description = "Replace name and number of the person with the given id",
    params(
        ("id" = String, description = "Id of the person to update")
    ),
    request_body = PersonPayload,
    responses(
        (status = 200, description = "The updated person", body = Person),
        (status = 400, description = "Validation failed or malformed id"),
        (status = 404, description = "No person with this id")
    )
)]
#[put("/persons/<id>", format = "json", data = "<payload>")]
pub async fn update_person(
    state: &State<ServiceContext>,
    id: &str,
    payload: Json<PersonPayload>,
) -> Result<Json<Person>> {
    let payload = payload.0;
    let person = state
        .person_service
        .update_by_id(id, &payload.name, &payload.number)
        .await?;
    Ok(Json(person))
}

#[utoipa::path(
    tag = "Persons",
    description = "Delete the person with the given id, deleting an absent id is fine",
    params(
        ("id" = String, description = "Id of the person to delete")
    ),
    responses(
        (status = 204, description = "The person is gone")
    )
)]
#[delete("/persons/<id>")]
pub async fn remove_person(state: &State<ServiceContext>, id: &str) -> Result<Status> {
    state.person_service.delete_by_id(id).await?;
    Ok(Status::NoContent)
}

#[utoipa::path(
    tag = "Info",
    description = "Human readable phonebook summary",
    responses(
        (status = 200, description = "Entry count and current time")
    )
)]
#[get("/info")]
pub async fn phonebook_info(state: &State<ServiceContext>) -> Result<(ContentType, String)> {
    let count = state.person_service.count().await?;
    Ok((
        ContentType::HTML,
        format!("<p>Phonebook has info for {}</p><p>{}</p>", count, now()),
    ))
}
