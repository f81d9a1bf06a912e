use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCertificateJobRepository, DbEnrollmentRepository, DbLessonRepository, DbSubjectRepository,
    DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub base_url: String,
    pub certificates_dir: PathBuf,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn subject_repo(&self) -> DbSubjectRepository {
        DbSubjectRepository {
            db: self.db.clone(),
        }
    }

    pub fn lesson_repo(&self) -> DbLessonRepository {
        DbLessonRepository {
            db: self.db.clone(),
        }
    }

    pub fn enrollment_repo(&self) -> DbEnrollmentRepository {
        DbEnrollmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn certificate_job_repo(&self) -> DbCertificateJobRepository {
        DbCertificateJobRepository {
            db: self.db.clone(),
        }
    }
}
