use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::{MIN_NAME_LENGTH, MIN_NUMBER_LENGTH};
use crate::persistence::PersonStoreApi;

use super::{Error, Result};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PersonServiceApi: Send + Sync {
    /// Returns all persons in the phonebook.
    async fn list_all(&self) -> Result<Vec<Person>>;

    /// Returns the person with the given id, or None if there is none.
    /// Absence is not an error, callers decide what it means to them.
    async fn get_by_id(&self, id: &str) -> Result<Option<Person>>;

    /// Validates and stores a new person. If a person with the same name
    /// already exists, the submission overwrites that person's number
    /// instead of inserting a duplicate. The name check happens on every
    /// create, regardless of what the client intended, so the collection
    /// never holds two persons with the same name.
    async fn create(&self, name: &str, number: &str) -> Result<Person>;

    /// Validates and replaces name and number of the person with the
    /// given id, keeping the id.
    async fn update_by_id(&self, id: &str, name: &str, number: &str) -> Result<Person>;

    /// Removes the person with the given id. Deleting an id that is
    /// already gone is fine.
    async fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Returns how many persons are stored.
    async fn count(&self) -> Result<u64>;
}

/// The person service manages the phonebook entries and decides whether a
/// submitted name/number pair creates a new person or overwrites an
/// existing same-named one.
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStoreApi>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStoreApi>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PersonServiceApi for PersonService {
    async fn list_all(&self) -> Result<Vec<Person>> {
        Ok(self.store.get_all().await?)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Person>> {
        validate_id(id)?;
        Ok(self.store.get_by_id(id).await?)
    }

    async fn create(&self, name: &str, number: &str) -> Result<Person> {
        validate_person(name, number)?;

        // Find-then-write is not atomic. Two concurrent creates with the
        // same new name can both pass the check and insert, writes are
        // expected to come from a single user session.
        if let Some(existing) = self.store.find_by_name(name).await? {
            let person = Person {
                id: existing.id.to_owned(),
                name: name.to_owned(),
                number: number.to_owned(),
            };
            return Ok(self.store.update(&existing.id, person).await?);
        }

        let person = Person {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            number: number.to_owned(),
        };
        Ok(self.store.insert(person).await?)
    }

    async fn update_by_id(&self, id: &str, name: &str, number: &str) -> Result<Person> {
        validate_id(id)?;
        validate_person(name, number)?;

        if self.store.get_by_id(id).await?.is_none() {
            return Err(Error::NotFound);
        }

        let person = Person {
            id: id.to_owned(),
            name: name.to_owned(),
            number: number.to_owned(),
        };
        Ok(self.store.update(id, person).await?)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        self.store.delete(id).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.store.count().await?)
    }
}

/// A stored name/number record, the sole domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub number: String,
}

/// The one validation routine every write path goes through, exactly once
/// per write.
pub fn validate_person(name: &str, number: &str) -> Result<()> {
    if name.len() < MIN_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "name `{name}` is shorter than the minimum allowed length ({MIN_NAME_LENGTH})"
        )));
    }
    if number.len() < MIN_NUMBER_LENGTH {
        return Err(Error::Validation(format!(
            "number `{number}` is shorter than the minimum allowed length ({MIN_NUMBER_LENGTH})"
        )));
    }
    if !is_valid_number(number) {
        return Err(Error::Validation(format!(
            "number `{number}` must be 2 or 3 digits, followed by a dash and digits"
        )));
    }
    Ok(())
}

// 2 or 3 leading digits, a single dash, then digits only. The trailing
// digit count is bounded by the overall minimum length check.
fn is_valid_number(number: &str) -> bool {
    match number.split_once('-') {
        Some((prefix, rest)) => {
            (prefix.len() == 2 || prefix.len() == 3)
                && prefix.chars().all(|c| c.is_ascii_digit())
                && !rest.is_empty()
                && rest.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn validate_id(id: &str) -> Result<()> {
    Uuid::parse_str(id).map_err(|_| Error::MalformedId)?;
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::persistence::db::{get_memory_db, person::SurrealPersonStore};
    use crate::persistence::person::MockPersonStoreApi;

    fn get_service(mock_storage: MockPersonStoreApi) -> PersonService {
        PersonService::new(Arc::new(mock_storage))
    }

    #[test]
    fn number_format() {
        assert!(is_valid_number("09-1234567"));
        assert!(is_valid_number("040-123456"));
        assert!(!is_valid_number("12345"));
        assert!(!is_valid_number("1234-5678"));
        assert!(!is_valid_number("abcd-efghi"));
        assert!(!is_valid_number("09-123-456"));
        assert!(!is_valid_number("09-"));
    }

    #[test]
    fn validate_person_rejects_short_name() {
        let result = validate_person("Al", "09-1234567");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn validate_person_rejects_short_number() {
        let result = validate_person("Ada", "09-1234");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn create_assigns_fresh_id() {
        let mut store = MockPersonStoreApi::new();
        store.expect_find_by_name().returning(|_| Ok(None));
        store.expect_insert().returning(|person| Ok(person));

        let result = get_service(store)
            .create("Ada", "09-1234567")
            .await
            .expect("could not create person");

        assert!(Uuid::parse_str(&result.id).is_ok());
        assert_eq!(&result.name, "Ada");
        assert_eq!(&result.number, "09-1234567");
    }

    #[tokio::test]
    async fn create_rejects_invalid_number_before_store_access() {
        // no expectations set, any store access would panic
        let store = MockPersonStoreApi::new();
        let result = get_service(store).create("Ada", "abcd-efghi").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn create_overwrites_same_named_person() {
        let existing = Person {
            id: Uuid::new_v4().to_string(),
            name: "Ada".to_string(),
            number: "09-1234567".to_string(),
        };
        let existing_id = existing.id.to_owned();

        let mut store = MockPersonStoreApi::new();
        store
            .expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        // the update has to target the found duplicate's id
        store
            .expect_update()
            .withf(move |id, person| id == existing_id && person.id == existing_id)
            .returning(|_, person| Ok(person));
        store.expect_insert().times(0);

        let result = get_service(store)
            .create("Ada", "09-7654321")
            .await
            .expect("could not create person");
        assert_eq!(&result.number, "09-7654321");
    }

    #[tokio::test]
    async fn update_by_id_rejects_malformed_id() {
        let store = MockPersonStoreApi::new();
        let result = get_service(store)
            .update_by_id("not-an-id", "Ada", "09-1234567")
            .await;
        assert!(matches!(result, Err(Error::MalformedId)));
    }

    #[tokio::test]
    async fn update_by_id_fails_for_vanished_person() {
        let mut store = MockPersonStoreApi::new();
        store.expect_get_by_id().returning(|_| Ok(None));

        let result = get_service(store)
            .update_by_id(&Uuid::new_v4().to_string(), "Ada", "09-1234567")
            .await;
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn delete_by_id_calls_store() {
        let mut store = MockPersonStoreApi::new();
        store.expect_delete().returning(|_| Ok(()));
        let result = get_service(store)
            .delete_by_id(&Uuid::new_v4().to_string())
            .await;
        assert!(result.is_ok());
    }

    async fn get_mem_service() -> PersonService {
        let mem_db = get_memory_db("test", "person_service")
            .await
            .expect("could not create get_memory_db");
        PersonService::new(Arc::new(SurrealPersonStore::new(mem_db)))
    }

    #[tokio::test]
    async fn reconciliation_keeps_one_person_per_name() {
        let service = get_mem_service().await;

        let created = service
            .create("Ada", "09-1234567")
            .await
            .expect("could not create person");
        let overwritten = service
            .create("Ada", "09-7654321")
            .await
            .expect("could not overwrite person");

        assert_eq!(created.id, overwritten.id);
        assert_eq!(&overwritten.number, "09-7654321");
        assert_eq!(service.count().await.expect("could not count"), 1);

        let stored = service
            .get_by_id(&created.id)
            .await
            .expect("could not query person")
            .expect("could not find person");
        assert_eq!(&stored.number, "09-7654321");
    }

    #[tokio::test]
    async fn round_trip_create_and_get() {
        let service = get_mem_service().await;
        let created = service
            .create("Ada", "09-1234567")
            .await
            .expect("could not create person");
        let stored = service
            .get_by_id(&created.id)
            .await
            .expect("could not query person")
            .expect("could not find person");
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn delete_of_absent_id_keeps_count() {
        let service = get_mem_service().await;
        service
            .create("Ada", "09-1234567")
            .await
            .expect("could not create person");

        service
            .delete_by_id(&Uuid::new_v4().to_string())
            .await
            .expect("could not delete absent person");
        assert_eq!(service.count().await.expect("could not count"), 1);
    }
}
