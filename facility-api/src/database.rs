use std::str::FromStr;

use sanitation_core::{Facility, FacilityStatus, NewFacility, Rating};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const CREATE_FACILITIES: &str = r#"
CREATE TABLE IF NOT EXISTS facilities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    score INTEGER NOT NULL,
    grade TEXT NOT NULL,
    status TEXT NOT NULL
)
"#;

const FACILITY_COLUMNS: &str = "id, name, lat, lng, score, grade, status";

/// Demonstration rows inserted into an empty table: `(id, name, lat, lng, score, status)`.
const SEED_FACILITIES: [(i64, &str, f64, f64, u8, FacilityStatus); 5] = [
    (1, "Zero Mile Public Toilet", 21.1498, 79.0806, 92, FacilityStatus::Open),
    (2, "Sitabuldi Restroom", 21.1450, 79.0820, 63, FacilityStatus::Open),
    (3, "Maharajbagh Zoo Toilet", 21.1400, 79.0750, 81, FacilityStatus::Open),
    (4, "Vidhan Bhavan Facility", 21.1550, 79.0850, 22, FacilityStatus::Closed),
    (5, "RBI Square Restroom", 21.1510, 79.0780, 44, FacilityStatus::Open),
];

#[derive(sqlx::FromRow)]
struct FacilityRow {
    id: i64,
    name: String,
    lat: f64,
    lng: f64,
    score: i64,
    grade: String,
    status: String,
}

impl TryFrom<FacilityRow> for Facility {
    type Error = sqlx::Error;

    fn try_from(row: FacilityRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<FacilityStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        // the grade column is derived from score; trust the score
        let rating = Rating::from_score(row.score.clamp(0, 100) as u8);
        if rating.grade().as_str() != row.grade {
            tracing::warn!(
                "Facility {} has grade {} stored for score {}; using {}",
                row.id,
                row.grade,
                row.score,
                rating.grade()
            );
        }

        Ok(Facility {
            id: row.id,
            name: row.name,
            lat: row.lat,
            lng: row.lng,
            rating,
            status,
        })
    }
}

/// Facility records in SQLite.
///
/// Every statement runs on its own pooled connection; concurrent rating
/// updates of the same facility are last-write-wins.
#[derive(Clone)]
pub struct FacilityStore {
    pool: SqlitePool,
}

impl FacilityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Ok(Self::new(pool))
    }

    /// Create the table and seed it when empty.
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_FACILITIES).execute(&self.pool).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM facilities")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            tracing::debug!("Found {count} facilities; skipping seeding");
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for (id, name, lat, lng, score, status) in SEED_FACILITIES {
            let rating = Rating::from_score(score);

            sqlx::query(
                "INSERT INTO facilities (id, name, lat, lng, score, grade, status) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(lat)
            .bind(lng)
            .bind(i64::from(rating.score()))
            .bind(rating.grade().as_str())
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!("Seeded {} demonstration facilities", SEED_FACILITIES.len());
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Facility>, sqlx::Error> {
        let rows: Vec<FacilityRow> =
            sqlx::query_as(&format!("SELECT {FACILITY_COLUMNS} FROM facilities ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Facility::try_from).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Facility>, sqlx::Error> {
        let row: Option<FacilityRow> =
            sqlx::query_as(&format!("SELECT {FACILITY_COLUMNS} FROM facilities WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Facility::try_from).transpose()
    }

    /// Insert a new facility. It always starts open with a perfect rating.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, facility: NewFacility) -> Result<Facility, sqlx::Error> {
        let rating = Rating::perfect();

        let row: FacilityRow = sqlx::query_as(&format!(
            "INSERT INTO facilities (name, lat, lng, score, grade, status) VALUES (?, ?, ?, ?, ?, ?) RETURNING {FACILITY_COLUMNS}"
        ))
        .bind(&facility.name)
        .bind(facility.lat)
        .bind(facility.lng)
        .bind(i64::from(rating.score()))
        .bind(rating.grade().as_str())
        .bind(FacilityStatus::Open.as_str())
        .fetch_one(&self.pool)
        .await?;

        Facility::try_from(row)
    }

    /// Store a new score and its grade in one statement.
    ///
    /// Returns `None` if there is no such facility.
    #[tracing::instrument(skip(self))]
    pub async fn update_rating(
        &self,
        id: i64,
        rating: Rating,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let row: Option<FacilityRow> = sqlx::query_as(&format!(
            "UPDATE facilities SET score = ?, grade = ? WHERE id = ? RETURNING {FACILITY_COLUMNS}"
        ))
        .bind(i64::from(rating.score()))
        .bind(rating.grade().as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Facility::try_from).transpose()
    }
}
