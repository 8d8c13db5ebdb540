use crate::error::AppError;
use crate::exporter::models::{DbConfig, UserRow};
use futures::{Stream, StreamExt, TryStreamExt};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{ConnectOptions, Connection, Row};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

pub const USERS_BY_GENDER: &str = "SELECT id, first_name FROM users WHERE gender=$1";
pub const EXPORTED_GENDER: &str = "Female";

/// Open a single unencrypted connection and make sure the server answers.
pub async fn connect(cfg: &DbConfig, password: &str, port: u16) -> Result<PgConnection, AppError> {
    let opts = PgConnectOptions::new()
        .host(&cfg.endpoint)
        .port(port)
        .username(&cfg.user)
        .password(password)
        .database(&cfg.name)
        .ssl_mode(PgSslMode::Disable);
    let mut conn = opts.connect().await?;
    conn.ping().await?;
    info!(host = %cfg.endpoint, port, database = %cfg.name, "connected to DB");
    Ok(conn)
}

/// Cursor over the exported users, decoded one row at a time.
pub fn stream_users<'c>(
    conn: &'c mut PgConnection,
) -> impl Stream<Item = Result<UserRow, AppError>> + Unpin + 'c {
    sqlx::query(USERS_BY_GENDER)
        .bind(EXPORTED_GENDER)
        .fetch(conn)
        .map(|row| row.map_err(AppError::from).and_then(|row| row_to_model(&row)))
}

/// Write each row as one text line; returns the number of lines written.
pub async fn write_rows<S, W>(mut rows: S, out: &mut W) -> Result<u64, AppError>
where
    S: Stream<Item = Result<UserRow, AppError>> + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut count = 0u64;
    while let Some(row) = rows.try_next().await? {
        debug!(id = row.id, "writing row");
        out.write_all(format!("{row}\n").as_bytes()).await?;
        count += 1;
    }
    out.flush().await?;
    Ok(count)
}

fn row_to_model(row: &PgRow) -> Result<UserRow, AppError> {
    // `serial` columns are INT4, `bigserial` INT8.
    let id = match row.try_get::<i32, _>("id") {
        Ok(id) => i64::from(id),
        Err(_) => row.try_get::<i64, _>("id")?,
    };
    let first_name: String = row.try_get("first_name")?;
    Ok(UserRow { id, first_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn row(id: i64, name: &str) -> Result<UserRow, AppError> {
        Ok(UserRow {
            id,
            first_name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn writes_one_line_per_row() {
        let rows = stream::iter(vec![row(1, "Alice"), row(42, "Zoë")]);
        let mut out = Vec::new();

        let count = write_rows(rows, &mut out).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id: 1 firstName: Alice\nid: 42 firstName: Zoë\n"
        );
    }

    #[tokio::test]
    async fn zero_rows_write_nothing() {
        let rows = stream::iter(Vec::<Result<UserRow, AppError>>::new());
        let mut out = Vec::new();

        assert_eq!(write_rows(rows, &mut out).await.unwrap(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn cursor_error_stops_the_export() {
        let rows = stream::iter(vec![
            row(1, "Alice"),
            Err(AppError::DatabaseError(sqlx::Error::RowNotFound)),
            row(3, "Carol"),
        ]);
        let mut out = Vec::new();

        let err = write_rows(rows, &mut out).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(String::from_utf8(out).unwrap(), "id: 1 firstName: Alice\n");
    }
}
