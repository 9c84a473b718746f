use std::sync::Arc;

use diesel::sqlite::SqliteConnection;
use diesel_async::{
    AsyncConnection, RunQueryDsl, sync_connection_wrapper::SyncConnectionWrapper,
};

use crate::error::AppError;

pub type Connection = SyncConnectionWrapper<SqliteConnection>;

const CONNECTION_PRAGMAS: [&str; 2] = ["PRAGMA foreign_keys = ON", "PRAGMA busy_timeout = 5000"];

/// Opens a new connection to the SQLite store at `url`.
pub async fn establish(url: &str) -> Result<Connection, AppError> {
    let mut conn = Connection::establish(url).await?;

    for pragma in CONNECTION_PRAGMAS {
        diesel::sql_query(pragma).execute(&mut conn).await?;
    }

    Ok(conn)
}

/// Store handle scoped to a single request.
///
/// The connection is opened on first use and closed when the handle is
/// dropped, so a request holds at most one connection and never outlives it.
pub struct Db {
    url: Arc<str>,
    conn: Option<Connection>,
}

impl Db {
    pub fn new(url: Arc<str>) -> Self {
        Db { url, conn: None }
    }

    pub async fn conn(&mut self) -> Result<&mut Connection, AppError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::trace!(url = %self.url, "opening store connection");
                establish(&self.url).await?
            }
        };

        Ok(self.conn.insert(conn))
    }
}

#[cfg(test)]
mod tests {
    use diesel::{QueryableByName, sql_types::BigInt};

    use super::*;

    #[derive(QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = BigInt)]
        foreign_keys: i64,
    }

    #[tokio::test]
    async fn connection_is_opened_lazily_and_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("lazy.db");
        let mut db = Db::new(Arc::from(url.to_str().unwrap()));

        assert!(db.conn.is_none());
        db.conn().await.unwrap();
        assert!(db.conn.is_some());

        let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
            .get_result(db.conn().await.unwrap())
            .await
            .unwrap();
        assert_eq!(pragma.foreign_keys, 1);
    }
}
