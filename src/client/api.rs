use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{Error, Result};
use crate::service::person_service::Person;
use crate::web::data::PersonPayload;

/// The client side view of the phonebook REST api.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PhonebookApi: Send + Sync {
    /// Fetches the full list of persons.
    async fn get_all(&self) -> Result<Vec<Person>>;

    /// Creates a new person. The server may overwrite a same-named
    /// existing person instead, the returned person is what it decided.
    async fn create(&self, payload: &PersonPayload) -> Result<Person>;

    /// Replaces the person with the given id.
    async fn update(&self, id: &str, payload: &PersonPayload) -> Result<Person>;

    /// Deletes the person with the given id.
    async fn delete(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// PhonebookApi against a running phonebook server.
#[derive(Clone)]
pub struct RestPhonebookApi {
    base_url: String,
    client: reqwest::Client,
}

impl RestPhonebookApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    fn persons_url(&self) -> String {
        format!("{}/persons", self.base_url)
    }

    /// Turns the error statuses the app reacts to into client errors and
    /// leaves everything else to error_for_status.
    async fn checked(response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::Gone),
            StatusCode::BAD_REQUEST => {
                let body: ApiErrorBody = response.json().await?;
                Err(Error::Rejected(body.error))
            }
            _ => Ok(response.error_for_status()?),
        }
    }
}

#[async_trait]
impl PhonebookApi for RestPhonebookApi {
    async fn get_all(&self) -> Result<Vec<Person>> {
        let response = self.client.get(self.persons_url()).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn create(&self, payload: &PersonPayload) -> Result<Person> {
        let response = self
            .client
            .post(self.persons_url())
            .json(payload)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn update(&self, id: &str, payload: &PersonPayload) -> Result<Person> {
        let response = self
            .client
            .put(format!("{}/{}", self.persons_url(), id))
            .json(payload)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.persons_url(), id))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}
