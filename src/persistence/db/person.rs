use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use super::super::{Error, Result};
use crate::{persistence::PersonStoreApi, service::person_service::Person};

#[derive(Clone)]
pub struct SurrealPersonStore {
    db: Surreal<Any>,
}

impl SurrealPersonStore {
    const TABLE: &'static str = "persons";

    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonStoreApi for SurrealPersonStore {
    async fn get_all(&self) -> Result<Vec<Person>> {
        let all: Vec<PersonDb> = self.db.select(Self::TABLE).await?;
        Ok(all.into_iter().map(|p| p.into()).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Person>> {
        let result: Option<PersonDb> = self.db.select((Self::TABLE, id)).await?;
        Ok(result.map(|p| p.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Person>> {
        let result: Vec<PersonDb> = self
            .db
            .query("SELECT * FROM type::table($table) WHERE name = $name LIMIT 1")
            .bind(("table", Self::TABLE))
            .bind(("name", name.to_owned()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next().map(|p| p.into()))
    }

    async fn insert(&self, person: Person) -> Result<Person> {
        let id = person.id.to_owned();
        let entity: PersonContentDb = person.into();
        let result: Option<PersonDb> = self
            .db
            .insert((Self::TABLE, id.to_owned()))
            .content(entity)
            .await?;

        match result {
            Some(p) => Ok(p.into()),
            None => Err(Error::InsertFailed(format!(
                "{} with id {}",
                Self::TABLE,
                id
            ))),
        }
    }

    async fn update(&self, id: &str, person: Person) -> Result<Person> {
        let entity: PersonContentDb = person.into();
        let result: Option<PersonDb> = self
            .db
            .update((Self::TABLE, id))
            .content(entity)
            .await?;

        match result {
            Some(p) => Ok(p.into()),
            None => Err(Error::NoSuchEntity("person".to_string(), id.to_string())),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _: Option<PersonDb> = self.db.delete((Self::TABLE, id)).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let result: Option<CountDb> = self
            .db
            .query("SELECT count() FROM type::table($table) GROUP ALL")
            .bind(("table", Self::TABLE))
            .await?
            .take(0)?;
        Ok(result.map(|c| c.count).unwrap_or(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersonDb {
    pub id: Thing,
    pub name: String,
    pub number: String,
}

/// The writable fields of a person row. The record id is part of the
/// resource key, not of the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersonContentDb {
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CountDb {
    pub count: u64,
}

impl From<PersonDb> for Person {
    fn from(value: PersonDb) -> Self {
        Self {
            id: value.id.id.to_raw(),
            name: value.name,
            number: value.number,
        }
    }
}

impl From<Person> for PersonContentDb {
    fn from(value: Person) -> Self {
        Self {
            name: value.name,
            number: value.number,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::persistence::db::get_memory_db;

    pub fn get_baseline_person() -> Person {
        Person {
            id: Uuid::new_v4().to_string(),
            name: "Ada".to_string(),
            number: "09-1234567".to_string(),
        }
    }

    async fn get_store() -> SurrealPersonStore {
        let mem_db = get_memory_db("test", "person")
            .await
            .expect("could not create get_memory_db");
        SurrealPersonStore::new(mem_db)
    }

    #[tokio::test]
    async fn test_insert_person_and_get_by_id() {
        let store = get_store().await;
        let person = get_baseline_person();
        store
            .insert(person.clone())
            .await
            .expect("could not insert person");

        let stored = store
            .get_by_id(&person.id)
            .await
            .expect("could not query person")
            .expect("could not find inserted person");

        assert_eq!(stored, person);
    }

    #[tokio::test]
    async fn test_get_by_id_returns_none_for_absent_id() {
        let store = get_store().await;
        let empty = store
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .expect("could not query person");
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let store = get_store().await;
        let person = get_baseline_person();
        store
            .insert(person.clone())
            .await
            .expect("could not insert person");

        let found = store
            .find_by_name("Ada")
            .await
            .expect("could not query person by name");
        assert_eq!(found, Some(person));

        let missing = store
            .find_by_name("Grace")
            .await
            .expect("could not query person by name");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_person() {
        let store = get_store().await;
        let person = get_baseline_person();
        store
            .insert(person.clone())
            .await
            .expect("could not insert person");

        let mut data = person.clone();
        data.number = "09-7654321".to_string();
        let updated = store
            .update(&person.id, data)
            .await
            .expect("could not update person");

        assert_eq!(updated.id, person.id);
        assert_eq!(&updated.number, "09-7654321");

        let stored = store
            .get_by_id(&person.id)
            .await
            .expect("could not query person")
            .expect("could not find updated person");
        assert_eq!(&stored.number, "09-7654321");
    }

    #[tokio::test]
    async fn test_update_absent_person_fails() {
        let store = get_store().await;
        let person = get_baseline_person();
        let id = person.id.to_owned();
        let result = store.update(&id, person).await;
        assert!(matches!(result, Err(Error::NoSuchEntity(_, _))));
    }

    #[tokio::test]
    async fn test_delete_person_is_idempotent() {
        let store = get_store().await;
        let person = get_baseline_person();
        store
            .insert(person.clone())
            .await
            .expect("could not insert person");
        assert_eq!(store.count().await.expect("could not count"), 1);

        store
            .delete(&person.id)
            .await
            .expect("could not delete person");
        assert_eq!(store.count().await.expect("could not count"), 0);

        // deleting again is not an error and does not change the count
        store
            .delete(&person.id)
            .await
            .expect("could not delete absent person");
        assert_eq!(store.count().await.expect("could not count"), 0);
    }

    #[tokio::test]
    async fn test_count() {
        let store = get_store().await;
        assert_eq!(store.count().await.expect("could not count"), 0);

        let person = get_baseline_person();
        let mut person2 = get_baseline_person();
        person2.id = Uuid::new_v4().to_string();
        person2.name = "Grace".to_string();

        store
            .insert(person)
            .await
            .expect("could not insert person");
        store
            .insert(person2)
            .await
            .expect("could not insert person");

        assert_eq!(store.count().await.expect("could not count"), 2);
    }
}
