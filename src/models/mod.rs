pub mod applicant;
pub mod application;
pub mod job;
pub mod lenient;
pub mod role;
pub mod stats;
