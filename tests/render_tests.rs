//! Render-pipeline integration tests
//!
//! Exercises the service-layer report assembly and all three renderers
//! without a database: projected DTOs in, document bytes out.

use std::time::Duration;

use recaudacion_rs::reports::{
    self, attachment_filename, branding, Orientation, RenderOptions, NO_RESULTS_MESSAGE,
};
use recaudacion_rs::services::cedula_service;
use recaudacion_rs::services::recibo_service::{self, ReciboDto};

fn sample_recibos() -> Vec<ReciboDto> {
    vec![
        ReciboDto {
            recibo: 40211,
            fecha: "250115".to_string(),
            neto: 1000.5,
            descuento: 100.0,
            concepto: "IMPUESTO PREDIAL".to_string(),
            contribuyente: "JUAN PÉREZ".to_string(),
            porcentaje: Some("10".to_string()),
            pago: Some("EF".to_string()),
        },
        ReciboDto {
            recibo: 40212,
            fecha: "250116".to_string(),
            neto: 250.0,
            descuento: 0.0,
            concepto: "AGUA POTABLE, TOMA DOMICILIARIA CON SERVICIO MEDIDO".to_string(),
            contribuyente: "MARIA LOPEZ".to_string(),
            porcentaje: None,
            pago: None,
        },
    ]
}

#[test]
fn pdf_report_renders_valid_bytes() {
    let recibos = sample_recibos();
    let table = recibo_service::build_report("250101", "250131", None, &recibos);
    let bytes =
        reports::pdf::render_pdf(&table, &RenderOptions::default()).expect("pdf renders");

    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn pdf_report_paginates_large_result_sets() {
    let mut recibos = Vec::new();
    for i in 0..250 {
        let mut r = sample_recibos().remove(0);
        r.recibo = i;
        recibos.push(r);
    }
    let table = recibo_service::build_report("250101", "251231", None, &recibos);
    let bytes =
        reports::pdf::render_pdf(&table, &RenderOptions::default()).expect("pdf renders");

    // each physical page carries its own /Page object; "/Pages" nodes are
    // subtracted since "/Page" matches inside them too
    let text = String::from_utf8_lossy(&bytes);
    let pages = text.matches("/Page").count() - text.matches("/Pages").count();
    assert!(pages > 1, "expected a paginated document, got {pages} page(s)");
}

#[test]
fn pdf_empty_result_is_a_valid_document() {
    let table = recibo_service::build_report("250101", "250131", Some("NADIE"), &[]);
    assert!(table.rows.is_empty());
    assert_eq!(NO_RESULTS_MESSAGE, "No se encontraron registros");

    let bytes =
        reports::pdf::render_pdf(&table, &RenderOptions::default()).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_undecodable_logo_is_omitted_not_fatal() {
    let recibos = sample_recibos();
    let table = recibo_service::build_report("250101", "250131", None, &recibos);
    let options = RenderOptions {
        logo: Some(vec![0x00, 0x01, 0x02, 0x03]),
        ..RenderOptions::default()
    };
    let bytes = reports::pdf::render_pdf(&table, &options).expect("pdf renders without logo");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn cedula_report_renders_landscape() {
    let table = cedula_service::build_report("250201", "250228", None, &[]);
    let options = RenderOptions {
        orientation: Orientation::Landscape,
        ..RenderOptions::default()
    };
    let bytes = reports::pdf::render_pdf(&table, &options).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn xlsx_report_renders_valid_bytes() {
    let recibos = sample_recibos();
    let table = recibo_service::build_report("250101", "250131", None, &recibos);
    let bytes = reports::xlsx::render_xlsx(&table).expect("xlsx renders");

    // xlsx files are zip archives
    assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
}

#[test]
fn xlsx_empty_result_renders() {
    let table = recibo_service::build_report("250101", "250131", None, &[]);
    let bytes = reports::xlsx::render_xlsx(&table).expect("xlsx renders");
    assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
}

#[test]
fn csv_export_totals_match_column_sums() {
    let recibos = sample_recibos();
    let table = recibo_service::build_report("250101", "250131", None, &recibos);
    let bytes = reports::csv::render_csv(&table).expect("csv renders");
    let text = String::from_utf8(bytes).expect("utf-8");

    let last_line = text.lines().last().expect("totals line");
    assert!(last_line.starts_with("Totales"));
    assert!(last_line.contains("$1,250.50"));
    assert!(last_line.contains("$100.00"));
}

#[test]
fn attachment_filenames_embed_range_and_filter() {
    assert_eq!(
        attachment_filename("recibos", "250101", "250131", Some("Juan Pérez"), "pdf"),
        "recibos_250101_250131_JUAN_PÉREZ.pdf"
    );
    assert_eq!(
        attachment_filename("cedulas", "250201", "250228", None, "pdf"),
        "cedulas_250201_250228.pdf"
    );
}

#[tokio::test]
async fn logo_fetch_failure_degrades_to_none() {
    let logo = branding::fetch_logo("http://127.0.0.1:9/escudo.png", Duration::from_secs(1)).await;
    assert!(logo.is_none());
}
