use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::Result;
use crate::service::person_service::Person;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PersonStoreApi: Send + Sync {
    /// Returns all persons in the phonebook.
    async fn get_all(&self) -> Result<Vec<Person>>;

    /// Returns the person stored under the given id, if there is one.
    async fn get_by_id(&self, id: &str) -> Result<Option<Person>>;

    /// Returns the person with the given name, if there is one. Names are
    /// matched exactly, case-sensitive.
    async fn find_by_name(&self, name: &str) -> Result<Option<Person>>;

    /// Stores a new person under its id.
    async fn insert(&self, person: Person) -> Result<Person>;

    /// Replaces name and number of the person stored under the given id.
    async fn update(&self, id: &str, person: Person) -> Result<Person>;

    /// Removes the person with the given id. Removing an id that is not
    /// present is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Returns the number of stored persons.
    async fn count(&self) -> Result<u64>;
}
