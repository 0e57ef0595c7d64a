//! Business logic services

pub mod book_instances;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub book_instances: book_instances::BookInstanceService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            book_instances: book_instances::BookInstanceService::new(repository.clone()),
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}
