use sea_orm::Database;
use tracing::info;

use campus_school::config::SchoolConfig;
use campus_school::infra::mail::SmtpMailer;
use campus_school::infra::pdf::PdfCertificateRenderer;
use campus_school::router::build_router;
use campus_school::state::AppState;
use campus_school::worker::CertificateWorker;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SchoolConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer =
        SmtpMailer::from_url(&config.smtp_url, &config.mail_from).expect("invalid SMTP config");

    let state = AppState {
        db,
        base_url: config.base_url.clone(),
        certificates_dir: config.certificates_dir.clone(),
    };

    // Spawn the certificate worker
    let worker = CertificateWorker {
        jobs: state.certificate_job_repo(),
        enrollments: state.enrollment_repo(),
        renderer: PdfCertificateRenderer,
        mailer,
        certificates_dir: config.certificates_dir,
    };
    tokio::spawn(worker.run());

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.school_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("school service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
