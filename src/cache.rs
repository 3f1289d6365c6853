use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;

use crate::entities::sport;

/// Read-through cache of sport rows keyed by id.
///
/// Sports are the hottest lookup in the system (every team and event row
/// embeds a sport name) and change rarely. The cache is warmed at startup,
/// refreshed on every sport write, and never assumed consistent with the
/// store between requests: a miss always falls through to the database.
#[derive(Debug, Clone, Default)]
pub struct SportCache {
    inner: Arc<DashMap<Uuid, sport::Model>>,
}

impl SportCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every sport row into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn warm(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let sports = sport::Entity::find().all(db).await?;
        for s in sports {
            self.inner.insert(s.id, s);
        }
        Ok(())
    }

    /// Look up a sport by id, falling through to the database on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback query fails.
    pub async fn get(
        &self,
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<sport::Model>, DbErr> {
        if let Some(hit) = self.inner.get(&id) {
            return Ok(Some(hit.clone()));
        }

        let fetched = sport::Entity::find_by_id(id).one(db).await?;
        if let Some(ref s) = fetched {
            self.inner.insert(s.id, s.clone());
        }
        Ok(fetched)
    }

    /// Store or refresh a sport row after a successful write.
    pub fn put(&self, sport: sport::Model) {
        self.inner.insert(sport.id, sport);
    }

    /// Drop a sport row after deletion.
    pub fn remove(&self, id: Uuid) {
        self.inner.remove(&id);
    }
}
