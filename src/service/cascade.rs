//! Building deletion across events and event logs in one transaction.

use uuid::Uuid;

use crate::error::AppError;
use crate::persistence::{CascadeStore, CascadeTx};

/// Row counts removed by a successful cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Events that were held in the building.
    pub events_deleted: u64,
    /// Logs of those events.
    pub logs_deleted: u64,
}

/// Deletes a building, its events and their logs atomically.
///
/// Either everything is gone afterwards or nothing changed: the
/// transaction is only committed after every step succeeded, and is
/// rolled back on drop otherwise.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the building row is already gone
/// when the transaction reaches it, or the first error raised by the
/// store. In both cases nothing is committed.
pub async fn delete_building_cascade<S: CascadeStore + ?Sized>(
    store: &S,
    building_id: Uuid,
) -> Result<CascadeSummary, AppError> {
    let mut tx = store.begin_cascade().await?;
    match run_steps(tx.as_mut(), building_id).await {
        Ok(summary) => {
            tx.commit().await?;
            Ok(summary)
        }
        Err(err) => {
            tracing::warn!(%building_id, error = %err, "building cascade rolled back");
            drop(tx);
            Err(err)
        }
    }
}

async fn run_steps(tx: &mut dyn CascadeTx, building_id: Uuid) -> Result<CascadeSummary, AppError> {
    let events = tx.events_for_building(building_id).await?;
    let mut logs_deleted = 0;
    for event_id in &events {
        logs_deleted += tx.delete_logs_for_event(*event_id).await?;
    }
    let events_deleted = tx.delete_events_for_building(building_id).await?;
    if tx.delete_building(building_id).await? == 0 {
        return Err(AppError::NotFound("Building"));
    }
    Ok(CascadeSummary {
        events_deleted,
        logs_deleted,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::domain::{NewBuilding, NewEvent, NewProfile, PageRequest};
    use crate::persistence::{
        BuildingRepository, EventLogRepository, EventRepository, MemoryStore, ProfileRepository,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        LoadEvents,
        DeleteLogs,
        DeleteEvents,
        DeleteBuilding,
        Commit,
    }

    /// Wraps the memory store and fails the transaction at `fail_at`.
    #[derive(Debug)]
    struct FailingCascade<'a> {
        inner: &'a MemoryStore,
        fail_at: Step,
    }

    struct FailingTx {
        inner: Box<dyn CascadeTx>,
        fail_at: Step,
    }

    impl FailingTx {
        fn check(&self, step: Step) -> Result<(), AppError> {
            if self.fail_at == step {
                return Err(AppError::Persistence(format!("injected failure at {step:?}")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CascadeStore for FailingCascade<'_> {
        async fn begin_cascade(&self) -> Result<Box<dyn CascadeTx>, AppError> {
            let inner = self.inner.begin_cascade().await?;
            Ok(Box::new(FailingTx {
                inner,
                fail_at: self.fail_at,
            }))
        }
    }

    #[async_trait]
    impl CascadeTx for FailingTx {
        async fn events_for_building(&mut self, id: Uuid) -> Result<Vec<Uuid>, AppError> {
            self.check(Step::LoadEvents)?;
            self.inner.events_for_building(id).await
        }

        async fn delete_logs_for_event(&mut self, id: Uuid) -> Result<u64, AppError> {
            self.check(Step::DeleteLogs)?;
            self.inner.delete_logs_for_event(id).await
        }

        async fn delete_events_for_building(&mut self, id: Uuid) -> Result<u64, AppError> {
            self.check(Step::DeleteEvents)?;
            self.inner.delete_events_for_building(id).await
        }

        async fn delete_building(&mut self, id: Uuid) -> Result<u64, AppError> {
            self.check(Step::DeleteBuilding)?;
            self.inner.delete_building(id).await
        }

        async fn commit(self: Box<Self>) -> Result<(), AppError> {
            self.check(Step::Commit)?;
            self.inner.commit().await
        }
    }

    struct Seeded {
        store: MemoryStore,
        building: Uuid,
        events: Vec<Uuid>,
    }

    /// One building holding two events with two logs each.
    async fn seeded() -> Seeded {
        let store = MemoryStore::new();
        let actor = Uuid::new_v4();
        let Ok(_) = store
            .insert_profile(NewProfile {
                id: actor,
                email: "actor@umass.edu".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
        else {
            panic!("insert profile");
        };
        let Ok(building) = store
            .insert_building(NewBuilding {
                name: "B1".to_string(),
                thumbnail: None,
                address: None,
                latitude: 42.36,
                longitude: -71.05,
            })
            .await
        else {
            panic!("insert building");
        };
        let mut events = Vec::new();
        for name in ["E1", "E2"] {
            let Ok(event) = store
                .insert_event_audited(
                    NewEvent {
                        name: name.to_string(),
                        description: None,
                        date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap_or_default(),
                        time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
                        building_id: Some(building.id),
                        room_number: None,
                        organization_id: None,
                        thumbnail: None,
                        attendance: 0,
                    },
                    actor,
                )
                .await
            else {
                panic!("insert event");
            };
            let Ok(_) = store
                .update_event_audited(
                    event.id,
                    crate::domain::EventPatch {
                        attendance: Some(5),
                        ..Default::default()
                    },
                    actor,
                )
                .await
            else {
                panic!("update event");
            };
            events.push(event.id);
        }
        Seeded {
            store,
            building: building.id,
            events,
        }
    }

    async fn log_count(store: &MemoryStore, event_id: Uuid) -> i64 {
        let Ok(page) = store.logs_by_event(event_id, PageRequest::default()).await else {
            panic!("logs");
        };
        page.total
    }

    #[tokio::test]
    async fn cascade_removes_building_events_and_logs() {
        let seeded = seeded().await;
        let Ok(summary) = delete_building_cascade(&seeded.store, seeded.building).await else {
            panic!("cascade failed");
        };
        assert_eq!(
            summary,
            CascadeSummary {
                events_deleted: 2,
                logs_deleted: 4
            }
        );
        assert!(matches!(seeded.store.find_building(seeded.building).await, Ok(None)));
        for id in &seeded.events {
            assert!(matches!(seeded.store.find_event(*id).await, Ok(None)));
            assert_eq!(log_count(&seeded.store, *id).await, 0);
        }
        let Ok(left) = seeded.store.events_by_building(seeded.building).await else {
            panic!("events by building");
        };
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn missing_building_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            delete_building_cascade(&store, Uuid::new_v4()).await,
            Err(AppError::NotFound("Building"))
        );
    }

    #[tokio::test]
    async fn failure_at_any_step_leaves_everything_in_place() {
        for fail_at in [
            Step::LoadEvents,
            Step::DeleteLogs,
            Step::DeleteEvents,
            Step::DeleteBuilding,
            Step::Commit,
        ] {
            let seeded = seeded().await;
            let failing = FailingCascade {
                inner: &seeded.store,
                fail_at,
            };
            let result = delete_building_cascade(&failing, seeded.building).await;
            assert!(matches!(result, Err(AppError::Persistence(_))), "{fail_at:?}");

            assert!(
                matches!(seeded.store.find_building(seeded.building).await, Ok(Some(_))),
                "{fail_at:?}"
            );
            for id in &seeded.events {
                assert!(
                    matches!(seeded.store.find_event(*id).await, Ok(Some(_))),
                    "{fail_at:?}"
                );
                assert_eq!(log_count(&seeded.store, *id).await, 2, "{fail_at:?}");
            }
        }
    }
}
