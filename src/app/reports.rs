use std::sync::Arc;

use crate::app::error::{EngagementError, EngagementResult};
use crate::domain::moderation::{
    NewReport, Report, ReportResolution, ReportTarget, ReportTargetKind,
};
use crate::infra::store::{EngagementStore, StoreError};

/// Open → Resolved, one way.
#[derive(Clone)]
pub struct ReportWorkflow {
    store: Arc<dyn EngagementStore>,
}

impl ReportWorkflow {
    pub fn new(store: Arc<dyn EngagementStore>) -> Self {
        Self { store }
    }

    pub async fn report(
        &self,
        reporter_id: i64,
        target: ReportTarget,
        category_id: i64,
    ) -> EngagementResult<Report> {
        if target.kind == ReportTargetKind::User && target.id == reporter_id {
            return Err(EngagementError::bad_param("cannot report yourself"));
        }

        self.store
            .get_author(reporter_id)
            .await
            .map_err(EngagementError::internal)?
            .ok_or(EngagementError::NotFound("reporter"))?;

        let target_owner = self.target_owner(target).await?;
        if target_owner == reporter_id {
            return Err(EngagementError::bad_param("cannot report your own content"));
        }

        self.store
            .get_report_category(category_id)
            .await
            .map_err(EngagementError::internal)?
            .ok_or(EngagementError::NotFound("report category"))?;

        let report = self
            .store
            .create_report(NewReport {
                target,
                reporter_id,
                category_id,
            })
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("report category"),
                other => EngagementError::internal(other),
            })?;

        tracing::info!(
            report_id = report.id,
            target_kind = target.kind.as_db(),
            target_id = target.id,
            "report filed"
        );
        Ok(report)
    }

    pub async fn resolve(&self, report_id: i64, resolver_id: i64) -> EngagementResult<Report> {
        let resolution = self
            .store
            .resolve_report(report_id, resolver_id)
            .await
            .map_err(EngagementError::internal)?;
        match resolution {
            ReportResolution::Resolved(report) => Ok(report),
            ReportResolution::AlreadyResolved => {
                Err(EngagementError::Conflict("report already resolved"))
            }
            ReportResolution::Missing => Err(EngagementError::NotFound("report")),
        }
    }

    pub async fn get(&self, report_id: i64) -> EngagementResult<Report> {
        self.store
            .get_report(report_id)
            .await
            .map_err(EngagementError::internal)?
            .ok_or(EngagementError::NotFound("report"))
    }

    pub async fn list_open(&self) -> EngagementResult<Vec<Report>> {
        self.store
            .list_open_reports()
            .await
            .map_err(EngagementError::internal)
    }

    /// The user accountable for the reported target.
    async fn target_owner(&self, target: ReportTarget) -> EngagementResult<i64> {
        match target.kind {
            ReportTargetKind::User => self
                .store
                .get_author(target.id)
                .await
                .map_err(EngagementError::internal)?
                .map(|author| author.id)
                .ok_or(EngagementError::NotFound("user")),
            ReportTargetKind::Thread => self
                .store
                .get_thread(target.id)
                .await
                .map_err(EngagementError::internal)?
                .filter(|thread| !thread.is_deleted())
                .map(|thread| thread.user_id)
                .ok_or(EngagementError::NotFound("thread")),
            ReportTargetKind::Comment => self
                .store
                .get_comment(target.id)
                .await
                .map_err(EngagementError::internal)?
                .filter(|comment| comment.deleted_at.is_none())
                .map(|comment| comment.user_id)
                .ok_or(EngagementError::NotFound("comment")),
        }
    }
}
