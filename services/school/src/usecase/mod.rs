pub mod access;
pub mod certificate;
pub mod enrollment;
pub mod lesson;
pub mod marks;
pub mod subject;
pub mod user;
