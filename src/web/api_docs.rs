use super::handlers;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Phonebook API",
        description = "Allows to list, add, update and delete phonebook entries",
        version = "1.0.0",
    ),
    paths(
        handlers::persons::list_persons,
        handlers::persons::person_detail,
        handlers::persons::create_person,
        handlers::persons::update_person,
        handlers::persons::remove_person,
        handlers::persons::phonebook_info,
    )
)]
pub struct ApiDocs;
