pub mod cron_projector;
pub mod cron_utils;
pub mod job_aggregator;
pub mod role_view_service;
pub mod status_classifier;

pub use cron_projector::*;
pub use cron_utils::*;
pub use job_aggregator::*;
pub use role_view_service::*;
pub use status_classifier::*;
