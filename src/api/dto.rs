use serde::{Deserialize, Serialize};

use crate::application::FileReport;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Unchanged,
    Changed,
    Written,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResultDto {
    pub path: String,
    pub status: FileStatus,
    pub removed_statements: usize,
    pub removed_comments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummaryDto {
    pub files: Vec<FileResultDto>,
    pub processed: usize,
    pub changed: usize,
    pub failed: usize,
    pub removed_statements: usize,
    pub removed_comments: usize,
}

impl From<&FileReport> for FileResultDto {
    fn from(report: &FileReport) -> Self {
        let status = if report.written {
            FileStatus::Written
        } else if report.changed {
            FileStatus::Changed
        } else {
            FileStatus::Unchanged
        };
        FileResultDto {
            path: report.path.display().to_string(),
            status,
            removed_statements: report.removed_statements,
            removed_comments: report.removed_comments,
            error: None,
        }
    }
}

impl From<&Error> for FileResultDto {
    fn from(err: &Error) -> Self {
        FileResultDto {
            path: err.path().display().to_string(),
            status: FileStatus::Failed,
            removed_statements: 0,
            removed_comments: 0,
            error: Some(err.to_string()),
        }
    }
}

impl RunSummaryDto {
    pub fn from_results(results: &[Result<FileReport, Error>]) -> Self {
        let files: Vec<FileResultDto> = results
            .iter()
            .map(|result| match result {
                Ok(report) => FileResultDto::from(report),
                Err(err) => FileResultDto::from(err),
            })
            .collect();

        RunSummaryDto {
            processed: files.len(),
            changed: files
                .iter()
                .filter(|f| matches!(f.status, FileStatus::Changed | FileStatus::Written))
                .count(),
            failed: files.iter().filter(|f| f.status == FileStatus::Failed).count(),
            removed_statements: files.iter().map(|f| f.removed_statements).sum(),
            removed_comments: files.iter().map(|f| f.removed_comments).sum(),
            files,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
