use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context as _;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::domain::repository::CertificateRenderer;
use crate::domain::types::CertificateData;
use crate::error::SchoolServiceError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const FIRST_ROW_Y: f32 = 224.0;
const PAGE_TOP_Y: f32 = 270.0;
const BOTTOM_Y: f32 = 20.0;
const ROW_STEP: f32 = 7.0;

/// Renders an A4 grade certificate with the built-in Helvetica faces, so no
/// font assets ship with the binary. Long transcripts continue on extra pages.
#[derive(Clone)]
pub struct PdfCertificateRenderer;

impl CertificateRenderer for PdfCertificateRenderer {
    async fn render(
        &self,
        certificate: &CertificateData,
        path: &Path,
    ) -> Result<(), SchoolServiceError> {
        let certificate = certificate.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || render_blocking(&certificate, &path))
            .await
            .context("join pdf render task")??;
        Ok(())
    }
}

/// Vertical position for each transcript row. `true` marks a row that starts
/// a new page; the cursor never drops below `BOTTOM_Y`.
fn row_positions(count: usize) -> Vec<(bool, f32)> {
    let mut out = Vec::with_capacity(count);
    let mut y = FIRST_ROW_Y;
    for _ in 0..count {
        if y < BOTTOM_Y {
            out.push((true, PAGE_TOP_Y));
            y = PAGE_TOP_Y - ROW_STEP;
        } else {
            out.push((false, y));
            y -= ROW_STEP;
        }
    }
    out
}

fn render_blocking(certificate: &CertificateData, path: &Path) -> Result<(), SchoolServiceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("create certificates dir")?;
    }

    let (doc, page, layer) = PdfDocument::new(
        "Grade Certificate",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "certificate",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("load builtin font")?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("load builtin bold font")?;
    let mut layer = doc.get_page(page).get_layer(layer);

    layer.use_text("Grade Certificate", 24.0, Mm(20.0), Mm(270.0), &bold);
    layer.use_text(
        format!("Student: {}", certificate.username),
        12.0,
        Mm(20.0),
        Mm(256.0),
        &regular,
    );
    layer.use_text(
        format!("Issued on: {}", certificate.issued_on),
        12.0,
        Mm(20.0),
        Mm(249.0),
        &regular,
    );

    layer.use_text("Subject", 12.0, Mm(20.0), Mm(232.0), &bold);
    layer.use_text("Mark", 12.0, Mm(160.0), Mm(232.0), &bold);

    let positions = row_positions(certificate.rows.len());
    for (row, (page_break, y)) in certificate.rows.iter().zip(positions) {
        if page_break {
            let (page, inner) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "certificate");
            layer = doc.get_page(page).get_layer(inner);
        }
        layer.use_text(
            format!("{} {}", row.subject_code, row.subject_name),
            11.0,
            Mm(20.0),
            Mm(y),
            &regular,
        );
        layer.use_text(
            row.mark.value().to_string(),
            11.0,
            Mm(160.0),
            Mm(y),
            &regular,
        );
    }

    let file = File::create(path).context("create certificate file")?;
    doc.save(&mut BufWriter::new(file))
        .context("write certificate pdf")?;
    Ok(())
}
