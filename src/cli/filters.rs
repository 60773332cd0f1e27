//! Filter enums for list commands

use clap::ValueEnum;

use crate::entities::{BuildStatus, QualityStatus};

/// Vehicle review status filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum QualityFilter {
    Pending,
    Approved,
    Rejected,
    /// Everything except rejected records - default
    #[default]
    Active,
    All,
}

impl QualityFilter {
    pub fn matches(&self, status: QualityStatus) -> bool {
        match self {
            QualityFilter::Pending => status == QualityStatus::Pending,
            QualityFilter::Approved => status == QualityStatus::Approved,
            QualityFilter::Rejected => status == QualityStatus::Rejected,
            QualityFilter::Active => status != QualityStatus::Rejected,
            QualityFilter::All => true,
        }
    }
}

/// Build status filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StatusFilter {
    Draft,
    Complete,
    #[default]
    All,
}

impl StatusFilter {
    pub fn matches(&self, status: BuildStatus) -> bool {
        match self {
            StatusFilter::Draft => status == BuildStatus::Draft,
            StatusFilter::Complete => status == BuildStatus::Complete,
            StatusFilter::All => true,
        }
    }
}
