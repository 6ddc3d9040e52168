//! Levy-notice service
//!
//! Projects cédula rows into JSON DTOs (folio and amount derivation happen
//! here) and assembles the levy-notice report table.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::repos::cedula_repo::{self, Cedula, CedulaQueryError};
use crate::reports::{CellAlign, ReportTable};

use super::display::{format_currency, format_fecha};

/// Levy-notice DTO returned by the JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CedulaDto {
    /// First six characters of the notice code
    pub folio: String,
    pub motivo: String,
    pub fecha: String,
    pub contribuyente: String,
    pub domicilio: String,
    pub precio: f64,
    pub cantidad: f64,
    /// Derived: `precio * cantidad`
    pub importe: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recibo: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_recibo: Option<String>,
    pub folio_electronico: String,
}

/// Errors that can occur during levy-notice service operations
#[derive(Debug, Error)]
pub enum CedulaServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] CedulaQueryError),
}

/// List levy notices in a date range, optionally filtered by payer substring
pub async fn list_by_range(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<CedulaDto>, CedulaServiceError> {
    let cedulas = cedula_repo::find_by_date_range(pool, desde, hasta, contribuyente, limit).await?;
    Ok(cedulas.into_iter().map(to_dto).collect())
}

fn to_dto(c: Cedula) -> CedulaDto {
    CedulaDto {
        folio: c.cedula.chars().take(6).collect(),
        motivo: c.motivo,
        fecha: c.fecha,
        contribuyente: c.contribuyente,
        domicilio: c.domicilio,
        precio: c.precio,
        cantidad: c.cantidad,
        importe: c.precio * c.cantidad,
        recibo: c.recibo,
        fecha_recibo: c.fecha_recibo,
        folio_electronico: c.folio_electronico,
    }
}

/// Assemble the levy-notice report table (landscape: wide address/motive text)
pub fn build_report(
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    cedulas: &[CedulaDto],
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

    let rows: Vec<Vec<String>> = cedulas
        .iter()
        .map(|c| {
            vec![
                c.folio.clone(),
                c.motivo.clone(),
                format_fecha(&c.fecha),
                c.contribuyente.clone(),
                c.domicilio.clone(),
                format_currency(c.precio),
                format!("{:.0}", c.cantidad),
                format_currency(c.importe),
            ]
        })
        .collect();

    let totals = (!cedulas.is_empty()).then(|| {
        let total_importe: f64 = cedulas.iter().map(|c| c.importe).sum();
        vec![
            "Totales".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format_currency(total_importe),
        ]
    });

    ReportTable {
        title: "Cédulas de cobro".to_string(),
        subtitle,
        headers: ["Folio", "Motivo", "Fecha", "Contribuyente", "Domicilio", "P. unitario", "Cantidad", "Importe"]
            .into_iter()
            .map(String::from)
            .collect(),
        rows,
        align: vec![
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Left,
            CellAlign::Right,
            CellAlign::Right,
            CellAlign::Right,
        ],
        totals,
        widths: Some(vec![1.1, 2.6, 1.3, 2.4, 3.0, 1.3, 1.0, 1.4]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cedula() -> Cedula {
        Cedula {
            cedula: "C04571-2025-OBRAS".to_string(),
            motivo: "LIMPIEZA DE LOTE BALDIO".to_string(),
            fecha: "250210".to_string(),
            contribuyente: "MARIA LOPEZ".to_string(),
            domicilio: "AV. JUAREZ 123, COL. CENTRO".to_string(),
            precio: 12.5,
            cantidad: 4.0,
            recibo: None,
            fecha_recibo: None,
            folio_electronico: "FE-0099".to_string(),
        }
    }

    #[test]
    fn test_importe_derivation() {
        let dto = to_dto(sample_cedula());
        assert_eq!(dto.importe, 50.0);
    }

    #[test]
    fn test_folio_is_first_six_chars() {
        let dto = to_dto(sample_cedula());
        assert_eq!(dto.folio, "C04571");

        let mut corta = sample_cedula();
        corta.cedula = "C99".to_string();
        assert_eq!(to_dto(corta).folio, "C99");
    }

    #[test]
    fn test_build_report_totals_importe() {
        let dtos: Vec<CedulaDto> = vec![to_dto(sample_cedula()), to_dto(sample_cedula())];
        let table = build_report("250201", "250228", None, &dtos);

        let totals = table.totals.expect("totals row expected");
        assert_eq!(totals[7], "$100.00");
    }
}
