use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTargetKind {
    Thread,
    Comment,
    User,
}

impl ReportTargetKind {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "thread" => Some(Self::Thread),
            "comment" => Some(Self::Comment),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Thread => "thread",
            Self::Comment => "comment",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTarget {
    pub kind: ReportTargetKind,
    pub id: i64,
}

impl ReportTarget {
    pub fn thread(id: i64) -> Self {
        Self { kind: ReportTargetKind::Thread, id }
    }

    pub fn comment(id: i64) -> Self {
        Self { kind: ReportTargetKind::Comment, id }
    }

    pub fn user(id: i64) -> Self {
        Self { kind: ReportTargetKind::User, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub target: ReportTarget,
    pub reporter_id: i64,
    pub category_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub resolved_by: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
}

impl Report {
    pub fn status(&self) -> ReportStatus {
        match self.resolved_by {
            Some(_) => ReportStatus::Resolved,
            None => ReportStatus::Open,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub target: ReportTarget,
    pub reporter_id: i64,
    pub category_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportCategory {
    pub id: i64,
    pub name: String,
}

/// Outcome of attaching a resolver to a report.
#[derive(Debug, Clone)]
pub enum ReportResolution {
    Resolved(Report),
    AlreadyResolved,
    Missing,
}
