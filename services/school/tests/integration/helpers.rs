use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;
use campus_domain::role::Role;

use campus_school::domain::repository::{
    CertificateJobRepository, CertificateRenderer, EnrollmentRepository, LessonRepository, Mailer,
    SubjectRepository, UserRepository,
};
use campus_school::domain::types::{
    CertificateData, CertificateJob, DEFAULT_AVATAR, Enrollment, Lesson, Profile, StudentMark,
    Subject, SubjectMark, User,
};
use campus_school::error::SchoolServiceError;

// ── TestSchool ───────────────────────────────────────────────────────────────

/// In-memory backing store shared by all mock repositories, so use cases that
/// compose several repositories see one consistent world.
#[derive(Clone, Default)]
pub struct TestSchool {
    pub users: Arc<Mutex<Vec<User>>>,
    pub profiles: Arc<Mutex<Vec<Profile>>>,
    pub subjects: Arc<Mutex<Vec<Subject>>>,
    pub lessons: Arc<Mutex<Vec<Lesson>>>,
    pub enrollments: Arc<Mutex<Vec<Enrollment>>>,
    pub jobs: Arc<Mutex<Vec<CertificateJob>>>,
}

impl TestSchool {
    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo {
            users: Arc::clone(&self.users),
            profiles: Arc::clone(&self.profiles),
        }
    }

    pub fn subject_repo(&self) -> MockSubjectRepo {
        MockSubjectRepo {
            subjects: Arc::clone(&self.subjects),
            enrollments: Arc::clone(&self.enrollments),
        }
    }

    pub fn lesson_repo(&self) -> MockLessonRepo {
        MockLessonRepo {
            lessons: Arc::clone(&self.lessons),
        }
    }

    pub fn enrollment_repo(&self) -> MockEnrollmentRepo {
        MockEnrollmentRepo {
            enrollments: Arc::clone(&self.enrollments),
            users: Arc::clone(&self.users),
            subjects: Arc::clone(&self.subjects),
        }
    }

    pub fn job_repo(&self) -> MockCertificateJobRepo {
        MockCertificateJobRepo {
            jobs: Arc::clone(&self.jobs),
        }
    }

    pub fn add_user(&self, username: &str, role: Role) -> Uuid {
        let id = Uuid::now_v7();
        let now = Utc::now();
        self.users.lock().unwrap().push(User {
            id,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            created_at: now,
        });
        self.profiles.lock().unwrap().push(Profile {
            user_id: id,
            role,
            bio: None,
            avatar_path: DEFAULT_AVATAR.to_owned(),
            created_at: now,
        });
        id
    }

    pub fn add_student(&self, username: &str) -> Uuid {
        self.add_user(username, Role::Student)
    }

    pub fn add_teacher(&self, username: &str) -> Uuid {
        self.add_user(username, Role::Teacher)
    }

    pub fn add_subject(&self, code: &str, name: &str, teacher_id: Uuid) -> Subject {
        let subject = Subject {
            id: Uuid::now_v7(),
            code: code.parse().unwrap(),
            name: name.to_owned(),
            teacher_id,
            created_at: Utc::now(),
        };
        self.subjects.lock().unwrap().push(subject.clone());
        subject
    }

    pub fn add_lesson(&self, subject_id: Uuid, title: &str) -> Lesson {
        let lesson = Lesson {
            id: Uuid::now_v7(),
            subject_id,
            title: title.to_owned(),
            content: None,
            created_at: Utc::now(),
        };
        self.lessons.lock().unwrap().push(lesson.clone());
        lesson
    }

    pub fn enroll(&self, student_id: Uuid, subject_id: Uuid) -> Uuid {
        let id = Uuid::now_v7();
        self.enrollments.lock().unwrap().push(Enrollment {
            id,
            student_id,
            subject_id,
            enrolled_at: Utc::now().date_naive(),
            mark: None,
        });
        id
    }

    pub fn set_mark(&self, enrollment_id: Uuid, mark: i16) {
        let mut rows = self.enrollments.lock().unwrap();
        let row = rows.iter_mut().find(|e| e.id == enrollment_id).unwrap();
        row.mark = Some(Mark::new(mark).unwrap());
    }

    pub fn mark_of(&self, enrollment_id: Uuid) -> Option<Mark> {
        self.enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == enrollment_id)
            .unwrap()
            .mark
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub profiles: Arc<Mutex<Vec<Profile>>>,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, SchoolServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, SchoolServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SchoolServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, SchoolServiceError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create_with_profile(
        &self,
        user: &User,
        profile: &Profile,
    ) -> Result<(), SchoolServiceError> {
        self.users.lock().unwrap().push(user.clone());
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }

    async fn update_bio(&self, user_id: Uuid, bio: &str) -> Result<(), SchoolServiceError> {
        if let Some(p) = self
            .profiles
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.user_id == user_id)
        {
            p.bio = Some(bio.to_owned());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SchoolServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        self.profiles.lock().unwrap().retain(|p| p.user_id != id);
        Ok(users.len() < before)
    }
}

// ── MockSubjectRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSubjectRepo {
    pub subjects: Arc<Mutex<Vec<Subject>>>,
    pub enrollments: Arc<Mutex<Vec<Enrollment>>>,
}

impl SubjectRepository for MockSubjectRepo {
    async fn find_by_code(
        &self,
        code: &SubjectCode,
    ) -> Result<Option<Subject>, SchoolServiceError> {
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.code == code)
            .cloned())
    }

    async fn list_taught_by(&self, teacher_id: Uuid) -> Result<Vec<Subject>, SchoolServiceError> {
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn list_enrolled_in(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Subject>, SchoolServiceError> {
        let enrolled: Vec<Uuid> = self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.student_id == student_id)
            .map(|e| e.subject_id)
            .collect();
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .iter()
            .filter(|s| enrolled.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn create(&self, subject: &Subject) -> Result<(), SchoolServiceError> {
        self.subjects.lock().unwrap().push(subject.clone());
        Ok(())
    }
}

// ── MockLessonRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockLessonRepo {
    pub lessons: Arc<Mutex<Vec<Lesson>>>,
}

impl LessonRepository for MockLessonRepo {
    async fn find(
        &self,
        subject_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<Lesson>, SchoolServiceError> {
        Ok(self
            .lessons
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == lesson_id && l.subject_id == subject_id)
            .cloned())
    }

    async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<Lesson>, SchoolServiceError> {
        Ok(self
            .lessons
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn create(&self, lesson: &Lesson) -> Result<(), SchoolServiceError> {
        self.lessons.lock().unwrap().push(lesson.clone());
        Ok(())
    }

    async fn update(&self, lesson: &Lesson) -> Result<(), SchoolServiceError> {
        let mut lessons = self.lessons.lock().unwrap();
        if let Some(l) = lessons.iter_mut().find(|l| l.id == lesson.id) {
            *l = lesson.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        subject_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<bool, SchoolServiceError> {
        let mut lessons = self.lessons.lock().unwrap();
        let before = lessons.len();
        lessons.retain(|l| !(l.id == lesson_id && l.subject_id == subject_id));
        Ok(lessons.len() < before)
    }
}

// ── MockEnrollmentRepo ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockEnrollmentRepo {
    pub enrollments: Arc<Mutex<Vec<Enrollment>>>,
    pub users: Arc<Mutex<Vec<User>>>,
    pub subjects: Arc<Mutex<Vec<Subject>>>,
}

impl EnrollmentRepository for MockEnrollmentRepo {
    async fn find_for_student_subject(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<Enrollment>, SchoolServiceError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.student_id == student_id && e.subject_id == subject_id)
            .cloned())
    }

    async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<Enrollment>, SchoolServiceError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), SchoolServiceError> {
        self.enrollments.lock().unwrap().push(enrollment.clone());
        Ok(())
    }

    async fn delete(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool, SchoolServiceError> {
        let mut rows = self.enrollments.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.student_id == student_id && e.subject_id == subject_id));
        Ok(rows.len() < before)
    }

    async fn list_subject_marks(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<SubjectMark>, SchoolServiceError> {
        let users = self.users.lock().unwrap();
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .map(|e| {
                let student = users.iter().find(|u| u.id == e.student_id).unwrap();
                SubjectMark {
                    enrollment_id: e.id,
                    student_id: student.id,
                    student_username: student.username.clone(),
                    enrolled_at: e.enrolled_at,
                    mark: e.mark,
                }
            })
            .collect())
    }

    async fn list_student_marks(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentMark>, SchoolServiceError> {
        let subjects = self.subjects.lock().unwrap();
        let mut rows: Vec<StudentMark> = self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.student_id == student_id)
            .map(|e| {
                let subject = subjects.iter().find(|s| s.id == e.subject_id).unwrap();
                StudentMark {
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    mark: e.mark,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.subject_code.as_str().cmp(b.subject_code.as_str()));
        Ok(rows)
    }

    async fn update_marks(&self, updates: &[(Uuid, Mark)]) -> Result<(), SchoolServiceError> {
        let mut rows = self.enrollments.lock().unwrap();
        for (enrollment_id, mark) in updates {
            let row = rows.iter_mut().find(|e| e.id == *enrollment_id).unwrap();
            row.mark = Some(*mark);
        }
        Ok(())
    }
}

// ── MockCertificateJobRepo ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCertificateJobRepo {
    pub jobs: Arc<Mutex<Vec<CertificateJob>>>,
}

impl CertificateJobRepository for MockCertificateJobRepo {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), SchoolServiceError> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<CertificateJob>, SchoolServiceError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.processed_at.is_none() && j.failed_at.is_none() && j.next_attempt_at <= now)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            job.processed_at = Some(now);
        }
        Ok(())
    }

    async fn record_retry(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            job.attempts = attempts;
            job.last_error = Some(error.to_owned());
            job.next_attempt_at = next_attempt_at;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            job.last_error = Some(error.to_owned());
            job.failed_at = Some(now);
        }
        Ok(())
    }
}

// ── Renderer and mailer doubles ──────────────────────────────────────────────

/// Writes a stub PDF so downstream steps see a real file on disk.
#[derive(Clone, Default)]
pub struct StubRenderer {
    pub rendered: Arc<Mutex<Vec<CertificateData>>>,
}

impl CertificateRenderer for StubRenderer {
    async fn render(
        &self,
        certificate: &CertificateData,
        path: &Path,
    ) -> Result<(), SchoolServiceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"%PDF-1.4 stub").unwrap();
        self.rendered.lock().unwrap().push(certificate.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<(String, String, String, std::path::PathBuf)>>>,
}

impl Mailer for RecordingMailer {
    async fn send_certificate(
        &self,
        to: &str,
        username: &str,
        base_url: &str,
        pdf_path: &Path,
    ) -> Result<(), SchoolServiceError> {
        self.sent.lock().unwrap().push((
            to.to_owned(),
            username.to_owned(),
            base_url.to_owned(),
            pdf_path.to_path_buf(),
        ));
        Ok(())
    }
}
