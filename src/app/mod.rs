mod submission;
mod transform_service;

pub use submission::{
    BUSY_NOTICE, COMPLETED_NOTICE, EditorSink, HostError, Notifier, SubmissionController,
    SubmissionFailure, SubmissionGuard, SubmissionReport, SubmissionTicket,
};
pub use transform_service::TransformService;
