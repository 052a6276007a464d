pub mod admin_dto;
pub mod applicant_dto;
pub mod application_dto;
pub mod job_dto;
