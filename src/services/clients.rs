//! Client management service

use crate::{
    error::AppResult,
    models::client::{Client, ClientQuery, CreateClient, UpdateClient},
    repository::Repository,
    services::integrity::IntegrityGuard,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
    integrity: IntegrityGuard,
}

impl ClientsService {
    pub fn new(repository: Repository, integrity: IntegrityGuard) -> Self {
        Self {
            repository,
            integrity,
        }
    }

    /// Get client by ID
    pub async fn get(&self, id: i32) -> AppResult<Client> {
        self.repository.clients.get_by_id(id).await
    }

    /// Search clients
    pub async fn search(&self, query: &ClientQuery) -> AppResult<(Vec<Client>, i64)> {
        self.repository.clients.search(query).await
    }

    /// Create client
    pub async fn create(&self, data: &CreateClient) -> AppResult<Client> {
        self.repository.clients.create(data).await
    }

    /// Update client (partial)
    pub async fn update(&self, id: i32, data: &UpdateClient) -> AppResult<Client> {
        self.repository.clients.update(id, data).await
    }

    /// Delete client, guarded against live references
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.integrity.check_client_deletable(id).await?;
        self.repository.clients.delete(id).await
    }
}
