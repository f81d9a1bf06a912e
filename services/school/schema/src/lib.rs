//! sea-orm entities for the school service.

pub mod certificate_jobs;
pub mod enrollments;
pub mod lessons;
pub mod profiles;
pub mod subjects;
pub mod users;
