//! A scriptable stand-in for the remote mailbox, used by pipeline tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use crate::{
    gmail::{ListPage, MailSession, Profile, ProviderError, Query},
    mailbox::MessageMetadata,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub search: String,
    pub cursor: Option<String>,
    pub page_size: u32,
}

/// Everything the fake was asked to do, in call order per kind.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub lists: Vec<ListCall>,
    pub metadata_fetches: Vec<String>,
    pub single_deletes: Vec<String>,
    pub batch_deletes: Vec<Vec<String>>,
    pub batch_trashes: Vec<Vec<String>>,
}

impl CallLog {
    pub fn mutation_calls(&self) -> usize {
        self.single_deletes.len() + self.batch_deletes.len() + self.batch_trashes.len()
    }
}

#[derive(Default)]
pub struct FakeSession {
    pages: Mutex<VecDeque<Result<ListPage, ProviderError>>>,
    metadata: HashMap<String, MessageMetadata>,
    batch_failures: HashMap<usize, ProviderError>,
    delete_failures: HashMap<String, ProviderError>,
    log: Mutex<CallLog>,
}

impl FakeSession {
    pub fn with_pages(pages: impl IntoIterator<Item = ListPage>) -> Self {
        let session = Self::default();
        for page in pages {
            session.pages.lock().unwrap().push_back(Ok(page));
        }
        session
    }

    pub fn push_page_error(&self, error: ProviderError) {
        self.pages.lock().unwrap().push_back(Err(error));
    }

    pub fn insert_metadata(&mut self, metadata: MessageMetadata) {
        self.metadata.insert(metadata.id().clone(), metadata);
    }

    /// Fails the nth batch mutation (delete and trash counted together).
    pub fn fail_batch(&mut self, index: usize, error: ProviderError) {
        self.batch_failures.insert(index, error);
    }

    pub fn fail_delete(&mut self, id: impl Into<String>, error: ProviderError) {
        self.delete_failures.insert(id.into(), error);
    }

    pub fn log(&self) -> CallLog {
        self.log.lock().unwrap().clone()
    }

    fn batch_outcome(&self, index: usize) -> Result<(), ProviderError> {
        match self.batch_failures.get(&index) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl MailSession for FakeSession {
    async fn list_messages(
        &self,
        query: &Query,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage, ProviderError> {
        self.log.lock().unwrap().lists.push(ListCall {
            search: query.to_search_string(),
            cursor: cursor.map(ToString::to_string),
            page_size,
        });

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ListPage::default()))
    }

    async fn message_metadata(
        &self,
        id: &str,
        _header_names: &[&str],
    ) -> Result<MessageMetadata, ProviderError> {
        self.log
            .lock()
            .unwrap()
            .metadata_fetches
            .push(id.to_string());

        self.metadata
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn delete_message(&self, id: &str) -> Result<(), ProviderError> {
        self.log.lock().unwrap().single_deletes.push(id.to_string());

        match self.delete_failures.get(id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<(), ProviderError> {
        let index = {
            let mut log = self.log.lock().unwrap();
            log.batch_deletes.push(ids.to_vec());
            log.batch_deletes.len() + log.batch_trashes.len() - 1
        };

        self.batch_outcome(index)
    }

    async fn batch_trash(&self, ids: &[String]) -> Result<(), ProviderError> {
        let index = {
            let mut log = self.log.lock().unwrap();
            log.batch_trashes.push(ids.to_vec());
            log.batch_deletes.len() + log.batch_trashes.len() - 1
        };

        self.batch_outcome(index)
    }

    async fn profile(&self) -> Result<Profile, ProviderError> {
        Ok(Profile::new("fake@example.com", Some(42)))
    }
}
