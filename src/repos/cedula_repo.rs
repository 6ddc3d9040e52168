//! Repository for levy-notice ("cédula") queries
//!
//! Read-only queries against `tearce01`. Same date convention as the receipt
//! repository: compact `YYMMDD` strings compared lexicographically.

use sqlx::{FromRow, PgPool};
use thiserror::Error;

/// Errors that can occur during levy-notice query operations
#[derive(Debug, Error)]
pub enum CedulaQueryError {
    #[error("Invalid date range: desde {desde} is after hasta {hasta}")]
    InvalidDateRange { desde: String, hasta: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Levy-notice row as stored in `tearce01`
///
/// `cedula` is the full notice code; its first six characters are the folio.
/// `recibo`/`fecha_recibo` are set once the notice is settled by a receipt.
#[derive(Debug, Clone, FromRow)]
pub struct Cedula {
    pub cedula: String,
    pub motivo: String,
    pub fecha: String,
    pub contribuyente: String,
    pub domicilio: String,
    pub precio: f64,
    pub cantidad: f64,
    pub recibo: Option<i64>,
    pub fecha_recibo: Option<String>,
    pub folio_electronico: String,
}

/// Query levy notices within a date range, newest first
pub async fn find_by_date_range(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<Cedula>, CedulaQueryError> {
    if desde > hasta {
        return Err(CedulaQueryError::InvalidDateRange {
            desde: desde.to_string(),
            hasta: hasta.to_string(),
        });
    }

    let cedulas = sqlx::query_as::<_, Cedula>(
        r#"
        SELECT
            id_cedula AS cedula,
            id_motivo AS motivo,
            id_fecha AS fecha,
            id_contribuyente AS contribuyente,
            id_domicilio AS domicilio,
            id_precio::float8 AS precio,
            id_cantidad::float8 AS cantidad,
            id_recibo AS recibo,
            id_fecha_recibo AS fecha_recibo,
            folio_electronico
        FROM tearce01
        WHERE id_fecha BETWEEN $1 AND $2
          AND ($3::text IS NULL OR id_contribuyente ILIKE '%' || $3 || '%')
        ORDER BY id_fecha DESC
        LIMIT $4
        "#,
    )
    .bind(desde)
    .bind(hasta)
    .bind(contribuyente)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(cedulas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cedula_query_error_display() {
        let err = CedulaQueryError::InvalidDateRange {
            desde: "251231".to_string(),
            hasta: "250101".to_string(),
        };
        assert!(err.to_string().contains("251231"));
        assert!(err.to_string().contains("is after"));
    }
}
