pub mod admin_service;
pub mod applicant_service;
pub mod application_service;
pub mod dashboard_service;
pub mod job_service;
