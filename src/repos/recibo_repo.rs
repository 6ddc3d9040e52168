//! Repository for receipt ("recibo") queries over the legacy treasury schema
//!
//! Read-only, parameterized queries against `tearmo01` (receipts) and the
//! `tearct01` account catalog. Dates are compact `YYMMDD` strings compared
//! lexicographically, matching the storage format. An empty result set is
//! returned as an empty vector, never as an error.

use sqlx::{FromRow, PgPool};
use thiserror::Error;

/// Errors that can occur during receipt query operations
#[derive(Debug, Error)]
pub enum ReciboQueryError {
    #[error("Invalid date range: desde {desde} is after hasta {hasta}")]
    InvalidDateRange { desde: String, hasta: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Receipt row as stored in `tearmo01`
#[derive(Debug, Clone, FromRow)]
pub struct Recibo {
    pub recibo: i64,
    /// Compact `YYMMDD` date string
    pub fecha: String,
    pub neto: f64,
    pub descuento: f64,
    pub concepto: String,
    pub contribuyente: String,
    pub porcentaje: Option<String>,
    pub pago: Option<String>,
}

/// Aggregate totals over a date range (active rows only, cancelled counted apart)
#[derive(Debug, Clone, FromRow)]
pub struct ReciboTotales {
    pub total_neto: f64,
    pub total_descuento: f64,
    pub cancelados: i64,
}

/// Per-account totals row
#[derive(Debug, Clone, FromRow)]
pub struct CuentaTotales {
    pub cuenta: String,
    pub total_neto: f64,
    pub total_descuento: f64,
    pub registros: i64,
}

/// Query receipts within a date range, newest first
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `desde` - Range start, compact `YYMMDD` (inclusive)
/// * `hasta` - Range end, compact `YYMMDD` (inclusive)
/// * `contribuyente` - Optional case-insensitive payer-name substring
/// * `limit` - Optional row cap; `None` = unbounded
pub async fn find_by_date_range(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<Recibo>, ReciboQueryError> {
    if desde > hasta {
        return Err(ReciboQueryError::InvalidDateRange {
            desde: desde.to_string(),
            hasta: hasta.to_string(),
        });
    }

    let recibos = sqlx::query_as::<_, Recibo>(
        r#"
        SELECT
            id_recibo AS recibo,
            id_fecha AS fecha,
            id_neto::float8 AS neto,
            id_descuento::float8 AS descuento,
            id_concepto1 AS concepto,
            id_contribuyente AS contribuyente,
            id_porcentaje AS porcentaje,
            id_pago AS pago
        FROM tearmo01
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

    Ok(recibos)
}

/// Query receipts for a single date (used for the "today" listing)
pub async fn find_by_fecha(
    pool: &PgPool,
    fecha: &str,
    limit: Option<i64>,
) -> Result<Vec<Recibo>, ReciboQueryError> {
    let recibos = sqlx::query_as::<_, Recibo>(
        r#"
        SELECT
            id_recibo AS recibo,
            id_fecha AS fecha,
            id_neto::float8 AS neto,
            id_descuento::float8 AS descuento,
            id_concepto1 AS concepto,
            id_contribuyente AS contribuyente,
            id_porcentaje AS porcentaje,
            id_pago AS pago
        FROM tearmo01
        WHERE id_fecha = $1
        ORDER BY id_recibo DESC
        LIMIT $2
        "#,
    )
    .bind(fecha)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(recibos)
}

/// Aggregate net/discount totals over a date range
///
/// Sums cover active rows (`id_status = 'A'`) and coalesce to zero when
/// nothing matches; cancelled rows (`id_status = 'C'`) are counted separately.
pub async fn sum_totals(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
    contribuyente: Option<&str>,
) -> Result<ReciboTotales, ReciboQueryError> {
    if desde > hasta {
        return Err(ReciboQueryError::InvalidDateRange {
            desde: desde.to_string(),
            hasta: hasta.to_string(),
        });
    }

    let totales = sqlx::query_as::<_, ReciboTotales>(
        r#"
        SELECT
            COALESCE(SUM(id_neto) FILTER (WHERE id_status = 'A'), 0)::float8 AS total_neto,
            COALESCE(SUM(id_descuento) FILTER (WHERE id_status = 'A'), 0)::float8 AS total_descuento,
            COUNT(*) FILTER (WHERE id_status = 'C') AS cancelados
        FROM tearmo01
        WHERE id_fecha BETWEEN $1 AND $2
          AND ($3::text IS NULL OR id_contribuyente ILIKE '%' || $3 || '%')
        "#,
    )
    .bind(desde)
    .bind(hasta)
    .bind(contribuyente)
    .fetch_one(pool)
    .await?;

    Ok(totales)
}

/// Aggregate totals per account over a date range
///
/// Joins the `tearct01` account catalog by account code, groups by account
/// name, and restricts to active rows. Ordered by account name ascending.
pub async fn sum_by_cuenta(
    pool: &PgPool,
    desde: &str,
    hasta: &str,
) -> Result<Vec<CuentaTotales>, ReciboQueryError> {
    if desde > hasta {
        return Err(ReciboQueryError::InvalidDateRange {
            desde: desde.to_string(),
            hasta: hasta.to_string(),
        });
    }

    let cuentas = sqlx::query_as::<_, CuentaTotales>(
        r#"
        SELECT
            c.nombre_cuenta AS cuenta,
            COALESCE(SUM(m.id_neto), 0)::float8 AS total_neto,
            COALESCE(SUM(m.id_descuento), 0)::float8 AS total_descuento,
            COUNT(*) AS registros
        FROM tearmo01 m
        INNER JOIN tearct01 c ON c.id_cuenta = m.id_cuenta
        WHERE m.id_fecha BETWEEN $1 AND $2
          AND m.id_status = 'A'
        GROUP BY c.nombre_cuenta
        ORDER BY c.nombre_cuenta ASC
        "#,
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;

    Ok(cuentas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recibo_query_error_display() {
        let err = ReciboQueryError::InvalidDateRange {
            desde: "250301".to_string(),
            hasta: "250101".to_string(),
        };
        assert!(err.to_string().contains("250301"));
        assert!(err.to_string().contains("is after"));
    }
}
