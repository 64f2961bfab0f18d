//! Report cache repository.

use std::sync::Arc;

use crate::entities::{ReportCache, report_cache};
use chrono::{DateTime, Utc};
use opsboard_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Report cache repository for database operations.
#[derive(Clone)]
pub struct ReportCacheRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportCacheRepository {
    /// Create a new report cache repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetch a cache row by key, if it exists and has not expired.
    pub async fn get_fresh(
        &self,
        cache_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<report_cache::Model>> {
        ReportCache::find()
            .filter(report_cache::Column::CacheKey.eq(cache_key))
            .filter(report_cache::Column::ExpiresAt.gt(now))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a payload under a key, replacing any previous row.
    pub async fn put(&self, model: report_cache::ActiveModel, cache_key: &str) -> AppResult<()> {
        ReportCache::delete_many()
            .filter(report_cache::Column::CacheKey.eq(cache_key))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every cache row past its expiry.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = ReportCache::delete_many()
            .filter(report_cache::Column::ExpiresAt.lt(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
