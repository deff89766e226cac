use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::constants::NOTICE_TIMEOUT_SECONDS;
use crate::service::person_service::Person;
use crate::web::data::PersonPayload;
use api::PhonebookApi;

pub mod api;
pub mod terminal;

/// Generic client result type
pub type Result<T> = std::result::Result<T, Error>;

/// Generic client error type
#[derive(Debug, Error)]
pub enum Error {
    /// transport level errors talking to the phonebook server
    #[error("Phonebook API error: {0}")]
    Api(#[from] reqwest::Error),

    /// the server rejected the submission, carries the server's reason
    #[error("{0}")]
    Rejected(String),

    /// the record the request was aimed at no longer exists on the server
    #[error("person is gone")]
    Gone,
}

/// Explicit severity tag for a transient notice. Presentation keys off
/// this tag, never off the message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient user notice that expires on its own.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Notice {
    fn new(message: String, severity: Severity) -> Self {
        Self {
            message,
            severity,
            shown_at: Instant::now(),
        }
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < Duration::from_secs(NOTICE_TIMEOUT_SECONDS)
    }
}

/// Where a form submission currently stands. The overwrite confirmation
/// is a state of its own instead of a blocking call into the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Editing,
    AwaitingConfirmation { existing_id: String },
}

/// What the UI should do after a call to submit().
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// the person was created on the server and appended to the local list
    Added,
    /// a person with the same name exists, ask the user before overwriting
    ConfirmOverwrite(String),
    /// the server rejected the submission, a notice was shown
    Rejected,
}

/// Client side state of the phonebook: the local copy of the person list,
/// the pending form fields, the filter string and the transient notice.
/// The local list is a cache, the server stays the source of truth. It is
/// replaced wholesale by refresh() and patched after every successful
/// mutation.
pub struct PhonebookApp {
    api: Arc<dyn PhonebookApi>,
    persons: Vec<Person>,
    pub new_name: String,
    pub new_number: String,
    pub filter: String,
    notice: Option<Notice>,
    submission: Submission,
}

impl PhonebookApp {
    pub fn new(api: Arc<dyn PhonebookApi>) -> Self {
        Self {
            api,
            persons: Vec::new(),
            new_name: String::new(),
            new_number: String::new(),
            filter: String::new(),
            notice: None,
            submission: Submission::Editing,
        }
    }

    /// Replaces the whole local list with a fresh fetch from the server.
    pub async fn refresh(&mut self) -> Result<()> {
        self.persons = self.api.get_all().await?;
        Ok(())
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// The persons the list view should show: all of them while the
    /// filter is empty, otherwise those whose name equals the filter,
    /// compared case-insensitively. Equality, not substring containment.
    pub fn visible_persons(&self) -> Vec<&Person> {
        if self.filter.is_empty() {
            return self.persons.iter().collect();
        }
        let filter = self.filter.to_lowercase();
        self.persons
            .iter()
            .filter(|person| person.name.to_lowercase() == filter)
            .collect()
    }

    /// The currently visible notice, if it hasn't expired yet.
    pub fn notice(&self) -> Option<&Notice> {
        let now = Instant::now();
        self.notice.as_ref().filter(|n| n.is_active_at(now))
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Submits the current form fields. If a person with the exact same
    /// name is already in the local list, nothing is sent yet and the
    /// caller gets a confirmation prompt to put in front of the user,
    /// answered via confirm_overwrite() or cancel_submission(). The
    /// server runs its own name check either way.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if let Some(existing) = self.persons.iter().find(|p| p.name == self.new_name) {
            let prompt = format!(
                "{} is already added to phonebook, replace the old number with a new one ?",
                existing.name
            );
            self.submission = Submission::AwaitingConfirmation {
                existing_id: existing.id.to_owned(),
            };
            return Ok(SubmitOutcome::ConfirmOverwrite(prompt));
        }

        let payload = PersonPayload {
            name: self.new_name.to_owned(),
            number: self.new_number.to_owned(),
        };
        match self.api.create(&payload).await {
            Ok(created) => {
                self.show_notice(format!("Added {}", created.name), Severity::Success);
                self.persons.push(created);
                self.clear_form();
                Ok(SubmitOutcome::Added)
            }
            Err(Error::Rejected(msg)) => {
                self.show_notice(msg, Severity::Error);
                Ok(SubmitOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    /// The user agreed to overwrite the same-named person found by
    /// submit(). Sends the update against that person's id and patches
    /// the local list with the server's answer.
    pub async fn confirm_overwrite(&mut self) -> Result<()> {
        let existing_id =
            match std::mem::replace(&mut self.submission, Submission::Editing) {
                Submission::AwaitingConfirmation { existing_id } => existing_id,
                Submission::Editing => return Ok(()),
            };

        let payload = PersonPayload {
            name: self.new_name.to_owned(),
            number: self.new_number.to_owned(),
        };
        match self.api.update(&existing_id, &payload).await {
            Ok(updated) => {
                for person in self.persons.iter_mut() {
                    if person.id == existing_id {
                        *person = updated.clone();
                    }
                }
                self.show_notice(format!("Updated {}", updated.name), Severity::Success);
                self.clear_form();
            }
            Err(Error::Gone) => {
                // the stale entry stays in the local list until the next
                // refresh
                self.show_notice(
                    format!(
                        "Information of {} has already been removed from server",
                        payload.name
                    ),
                    Severity::Error,
                );
            }
            Err(Error::Rejected(msg)) => {
                self.show_notice(msg, Severity::Error);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// The user declined the overwrite. Nothing is sent, local state is
    /// untouched.
    pub fn cancel_submission(&mut self) {
        self.submission = Submission::Editing;
    }

    /// The confirmation question to put in front of the user before
    /// deleting, naming the person. None if the id isn't in the list.
    pub fn delete_prompt(&self, id: &str) -> Option<String> {
        self.persons
            .iter()
            .find(|p| p.id == id)
            .map(|p| format!("Delete {}?", p.name))
    }

    /// The user confirmed the deletion. The entry is dropped from the
    /// local list as soon as the request went through.
    pub async fn confirm_delete(&mut self, id: &str) -> Result<()> {
        self.api.delete(id).await?;
        self.persons.retain(|p| p.id != id);
        Ok(())
    }

    fn show_notice(&mut self, message: String, severity: Severity) {
        self.notice = Some(Notice::new(message, severity));
    }

    fn clear_form(&mut self) {
        self.new_name.clear();
        self.new_number.clear();
    }
}
