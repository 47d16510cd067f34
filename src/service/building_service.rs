//! Building listing, creation and cascading deletion.

use std::sync::Arc;

use uuid::Uuid;

use super::cascade::{CascadeSummary, delete_building_cascade};
use crate::domain::{Building, EventWithBuilding, NewBuilding, Page, PageRequest};
use crate::error::AppError;
use crate::persistence::Store;

/// Orchestrates building operations over a [`Store`].
#[derive(Debug, Clone)]
pub struct BuildingService {
    store: Arc<dyn Store>,
}

impl BuildingService {
    /// Creates a new `BuildingService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Lists buildings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn list(&self, page: PageRequest) -> Result<Page<Building>, AppError> {
        self.store.list_buildings(page).await
    }

    /// Creates a building.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a check constraint rejects the row.
    pub async fn create(&self, new: NewBuilding) -> Result<Building, AppError> {
        let building = self.store.insert_building(new).await?;
        tracing::info!(building_id = %building.id, name = %building.name, "building created");
        Ok(building)
    }

    /// Deletes a building with all of its events and their logs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the building does not exist, or
    /// the store error that aborted the cascade.
    pub async fn delete(&self, id: Uuid) -> Result<CascadeSummary, AppError> {
        if self.store.find_building(id).await?.is_none() {
            return Err(AppError::NotFound("Building"));
        }
        let summary = delete_building_cascade(self.store.as_ref(), id).await?;
        tracing::info!(
            building_id = %id,
            events_deleted = summary.events_deleted,
            logs_deleted = summary.logs_deleted,
            "building deleted"
        );
        Ok(summary)
    }

    /// Events held in a building. Empty for unknown buildings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn events(&self, id: Uuid) -> Result<Vec<EventWithBuilding>, AppError> {
        self.store.events_by_building(id).await
    }
}
