//! Receipt service
//!
//! Projects receipt rows into JSON DTOs for the list/aggregate endpoints and
//! assembles the receipt report table (display formatting plus the recomputed
//! totals row) for the renderers.

use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::recibo_repo::{self, Recibo, ReciboQueryError};
use crate::reports::{CellAlign, ReportTable};

use super::display::{format_codigo, format_currency, format_fecha};

/// Receipt DTO returned by the JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReciboDto {
    pub recibo: i64,
    pub fecha: String,
    pub neto: f64,
    pub descuento: f64,
    pub concepto: String,
    pub contribuyente: String,
    pub porcentaje: Option<String>,
    pub pago: Option<String>,
}

/// Aggregate totals DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalesDto {
    pub desde: String,
    pub hasta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribuyente: Option<String>,
    pub total_neto: f64,
    pub total_descuento: f64,
    pub cancelados: i64,
}

/// Per-account totals DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuentaTotalesDto {
    pub cuenta: String,
    pub total_neto: f64,
    pub total_descuento: f64,
    pub registros: i64,
}

/// Errors that can occur during receipt service operations
#[derive(Debug, Error)]
pub enum ReciboServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] ReciboQueryError),
}

/// List receipts in a date range, optionally filtered by payer substring
pub async fn list_by_range(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<ReciboDto>, ReciboServiceError> {
    let recibos = recibo_repo::find_by_date_range(pool, desde, hasta, contribuyente, limit).await?;
    Ok(recibos.into_iter().map(to_dto).collect())
}

/// List today's receipts (today in the server's local timezone)
pub async fn list_hoy(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<ReciboDto>, ReciboServiceError> {
    let hoy = Local::now().format("%y%m%d").to_string();
    let recibos = recibo_repo::find_by_fecha(pool, &hoy, limit).await?;
    Ok(recibos.into_iter().map(to_dto).collect())
}

/// Aggregate net/discount totals for a range
pub async fn totales(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
) -> Result<TotalesDto, ReciboServiceError> {
    let t = recibo_repo::sum_totals(pool, desde, hasta, contribuyente).await?;
    Ok(TotalesDto {
        desde: desde.to_string(),
        hasta: hasta.to_string(),
        contribuyente: contribuyente.map(|c| c.to_string()),
        total_neto: t.total_neto,
        total_descuento: t.total_descuento,
        cancelados: t.cancelados,
    })
}

/// Aggregate totals grouped by account name
pub async fn totales_por_cuenta(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
) -> Result<Vec<CuentaTotalesDto>, ReciboServiceError> {
    let cuentas = recibo_repo::sum_by_cuenta(pool, desde, hasta).await?;
    Ok(cuentas
        .into_iter()
        .map(|c| CuentaTotalesDto {
            cuenta: c.cuenta,
            total_neto: c.total_neto,
            total_descuento: c.total_descuento,
            registros: c.registros,
        })
        .collect())
}

fn to_dto(r: Recibo) -> ReciboDto {
    ReciboDto {
        recibo: r.recibo,
        fecha: r.fecha,
        neto: r.neto,
        descuento: r.descuento,
        concepto: r.concepto,
        contribuyente: r.contribuyente,
        porcentaje: r.porcentaje,
        pago: r.pago,
    }
}

/// Assemble the receipt report table
///
/// The totals row is recomputed here from the data rows; the renderers only
/// style it.
pub fn build_report(
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    recibos: &[ReciboDto],
) -> ReportTable {
    let subtitle = match contribuyente.map(str::trim) {
        Some(c) if !c.is_empty() => format!(
            "Del {} al {}, contribuyente: {}",
            format_fecha(desde),
            format_fecha(hasta),
            c
        ),
        _ => format!("Del {} al {}", format_fecha(desde), format_fecha(hasta)),
    };

    let rows: Vec<Vec<String>> = recibos
        .iter()
        .map(|r| {
            vec![
                r.recibo.to_string(),
                format_fecha(&r.fecha),
                r.concepto.clone(),
                r.contribuyente.clone(),
                format_codigo(r.porcentaje.as_deref()),
                format_codigo(r.pago.as_deref()),
                format_currency(r.descuento),
                format_currency(r.neto),
            ]
        })
        .collect();

    let totals = (!recibos.is_empty()).then(|| {
        let total_descuento: f64 = recibos.iter().map(|r| r.descuento).sum();
        let total_neto: f64 = recibos.iter().map(|r| r.neto).sum();
        vec![
            "Totales".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format_currency(total_descuento),
            format_currency(total_neto),
        ]
    });

    ReportTable {
        title: "Recibos de caja".to_string(),
        subtitle,
        headers: ["Recibo", "Fecha", "Concepto", "Contribuyente", "% Desc.", "Pago", "Descuento", "Neto"]
            .into_iter()
            .map(String::from)
            .collect(),
        rows,
        align: vec![
            CellAlign::Right,
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Right,
            CellAlign::Left,
            CellAlign::Right,
            CellAlign::Right,
        ],
        totals,
        widths: Some(vec![1.3, 1.5, 3.2, 3.0, 1.0, 1.0, 1.6, 1.8]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(recibo: i64, neto: f64, descuento: f64) -> ReciboDto {
        ReciboDto {
            recibo,
            fecha: "250115".to_string(),
            neto,
            descuento,
            concepto: "PREDIAL".to_string(),
            contribuyente: "JUAN PEREZ".to_string(),
            porcentaje: None,
            pago: Some("EF".to_string()),
        }
    }

    #[test]
    fn test_build_report_totals_row() {
        let recibos = vec![sample(1, 1000.5, 100.0), sample(2, 250.0, 25.5)];
        let table = build_report("250101", "250131", None, &recibos);

        let totals = table.totals.expect("totals row expected");
        assert_eq!(totals[7], "$1,250.50");
        assert_eq!(totals[6], "$125.50");
        assert_eq!(totals[0], "Totales");
    }

    #[test]
    fn test_build_report_rows_formatted() {
        let recibos = vec![sample(12345, 1500.0, 0.0)];
        let table = build_report("250101", "250131", Some("PEREZ"), &recibos);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "15-01-2025");
        assert_eq!(table.rows[0][4], "0");
        assert_eq!(table.rows[0][5], "EF");
        assert_eq!(table.rows[0][7], "$1,500.00");
        assert!(table.subtitle.contains("PEREZ"));
    }

    #[test]
    fn test_build_report_empty_has_no_totals() {
        let table = build_report("250101", "250131", None, &[]);
        assert!(table.rows.is_empty());
        assert!(table.totals.is_none());
    }
}
