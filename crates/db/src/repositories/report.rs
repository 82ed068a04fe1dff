//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {id}")))
    }

    /// List reports, newest first.
    pub async fn find_all(
        &self,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(report::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed against a target, newest first.
    pub async fn find_by_target(
        &self,
        target_kind: &str,
        target_id: i64,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::TargetKind.eq(target_kind))
            .filter(report::Column::TargetId.eq(target_id))
            .order_by_desc(report::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed by a user, newest first.
    pub async fn find_by_reporter(
        &self,
        reporter_id: i64,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::ReportedBy.eq(reporter_id))
            .order_by_desc(report::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
