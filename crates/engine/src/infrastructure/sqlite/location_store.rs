//! SQLite-backed location storage.
//!
//! The tree is stored as an adjacency list (`parent_id` column). Subtree and
//! ancestor queries use recursive CTEs, so they always reflect the parent
//! pointers as currently committed.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use loctree_domain::{
    Area, BuildingName, Location, LocationId, LocationName, LocationNode, LocationNumber,
};

use crate::infrastructure::ports::{
    LocationStore, RepoError, LOCATION_NAME_FIELD, LOCATION_NUMBER_FIELD,
};

const COLUMNS: &str = "l.id, l.building, l.location_name, l.location_number, l.area, l.parent_id";

/// SQLite implementation of the location store.
pub struct SqliteLocationStore {
    pool: SqlitePool,
}

impl SqliteLocationStore {
    /// Connect to `database_url` (e.g. `sqlite:locations.db` or
    /// `sqlite::memory:`), creating the file and schema when missing.
    pub async fn connect(database_url: &str) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepoError::database("connect", e))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            // Every in-memory connection is its own database; keep exactly one alive.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and make sure the schema exists.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                id TEXT PRIMARY KEY NOT NULL,
                building TEXT NOT NULL,
                location_name TEXT NOT NULL UNIQUE,
                location_number TEXT NOT NULL UNIQUE,
                area REAL NOT NULL CHECK (area > 0),
                parent_id TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_locations_parent ON locations (parent_id)")
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;

        Ok(Self { pool })
    }

    async fn fetch_many(
        &self,
        operation: &'static str,
        sql: &str,
        binds: &[String],
    ) -> Result<Vec<Location>, RepoError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(value.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        rows.iter().map(row_to_location).collect()
    }

    async fn fetch_one(
        &self,
        operation: &'static str,
        sql: &str,
        bind: String,
    ) -> Result<Option<Location>, RepoError> {
        let row = sqlx::query(sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        row.as_ref().map(row_to_location).transpose()
    }
}

fn row_to_location(row: &SqliteRow) -> Result<Location, RepoError> {
    let get_str = |column: &str| -> Result<String, RepoError> {
        row.try_get::<String, _>(column)
            .map_err(RepoError::serialization)
    };

    let id: LocationId = get_str("id")?
        .parse()
        .map_err(RepoError::serialization)?;
    let parent_id = row
        .try_get::<Option<String>, _>("parent_id")
        .map_err(RepoError::serialization)?
        .map(|raw| raw.parse::<LocationId>())
        .transpose()
        .map_err(RepoError::serialization)?;
    let area: f64 = row.try_get("area").map_err(RepoError::serialization)?;

    Ok(Location::from_parts(
        id,
        BuildingName::new(get_str("building")?).map_err(RepoError::serialization)?,
        LocationName::new(get_str("location_name")?).map_err(RepoError::serialization)?,
        LocationNumber::new(get_str("location_number")?).map_err(RepoError::serialization)?,
        Area::new(area).map_err(RepoError::serialization)?,
        parent_id,
    ))
}

/// Map a write failure, recognising unique-constraint violations.
fn write_error(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            // SQLite reports "UNIQUE constraint failed: locations.<column>".
            let message = db_err.message();
            let field = if message.contains("location_name") {
                Some(LOCATION_NAME_FIELD)
            } else if message.contains("location_number") {
                Some(LOCATION_NUMBER_FIELD)
            } else {
                None
            };
            return RepoError::duplicate(field);
        }
    }
    RepoError::database(operation, err)
}

#[async_trait]
impl LocationStore for SqliteLocationStore {
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM locations l WHERE l.id = ?");
        self.fetch_one("get_location", &sql, id.to_string()).await
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Location>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM locations l WHERE l.location_number = ?");
        self.fetch_one("find_by_number", &sql, number.to_string())
            .await
    }

    async fn find_roots(&self) -> Result<Vec<LocationNode>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM locations l");
        let all = self.fetch_many("find_roots", &sql, &[]).await?;
        Ok(LocationNode::forest(all))
    }

    async fn find_children(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM locations l WHERE l.parent_id = ? ORDER BY l.location_number"
        );
        self.fetch_many("find_children", &sql, &[id.to_string()])
            .await
    }

    async fn find_descendants(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        // UNION (not UNION ALL) deduplicates, so the walk terminates even on
        // corrupted data containing a cycle.
        let sql = format!(
            r#"
            WITH RECURSIVE subtree(id) AS (
                SELECT id FROM locations WHERE parent_id = ?
                UNION
                SELECT c.id FROM locations c JOIN subtree s ON c.parent_id = s.id
            )
            SELECT {COLUMNS}
            FROM subtree s JOIN locations l ON l.id = s.id
            WHERE l.id <> ?
            ORDER BY l.location_number
            "#
        );
        let id = id.to_string();
        self.fetch_many("find_descendants", &sql, &[id.clone(), id])
            .await
    }

    async fn find_ancestors(&self, id: LocationId) -> Result<Vec<Location>, RepoError> {
        // Depth is bounded by the row count: a forest chain can never be longer.
        let sql = format!(
            r#"
            WITH RECURSIVE chain(id, depth) AS (
                SELECT parent_id, 1 FROM locations
                WHERE id = ? AND parent_id IS NOT NULL
                UNION ALL
                SELECT p.parent_id, c.depth + 1
                FROM locations p JOIN chain c ON p.id = c.id
                WHERE p.parent_id IS NOT NULL
                  AND c.depth < (SELECT COUNT(*) FROM locations)
            )
            SELECT {COLUMNS}
            FROM chain c JOIN locations l ON l.id = c.id
            WHERE l.id <> ?
            ORDER BY c.depth
            "#
        );
        let id = id.to_string();
        self.fetch_many("find_ancestors", &sql, &[id.clone(), id])
            .await
    }

    async fn save(&self, location: &Location) -> Result<Location, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO locations (id, building, location_name, location_number, area, parent_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                building = excluded.building,
                location_name = excluded.location_name,
                location_number = excluded.location_number,
                area = excluded.area,
                parent_id = excluded.parent_id
            "#,
        )
        .bind(location.id().to_string())
        .bind(location.building().as_str())
        .bind(location.location_name().as_str())
        .bind(location.location_number().as_str())
        .bind(location.area().value())
        .bind(location.parent_id().map(|p| p.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("save", e))?;

        Ok(location.clone())
    }

    async fn update_location(&self, location: &Location) -> Result<Location, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET building = ?, location_name = ?, location_number = ?, area = ?, parent_id = ?
            WHERE id = ?
            "#,
        )
        .bind(location.building().as_str())
        .bind(location.location_name().as_str())
        .bind(location.location_number().as_str())
        .bind(location.area().value())
        .bind(location.parent_id().map(|p| p.to_string()))
        .bind(location.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update_location", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Location", location.id()));
        }
        Ok(location.clone())
    }

    async fn remove_all(&self, ids: &[LocationId]) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("remove_all", e))?;

        for id in ids {
            let result = sqlx::query("DELETE FROM locations WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("remove_all", e))?;

            if result.rows_affected() == 0 {
                // Dropping `tx` rolls back everything removed so far.
                return Err(RepoError::not_found("Location", id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("remove_all", e))?;
        Ok(())
    }
}
