use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use super::fault;
use super::run;
use crate::domain::errors::StorageError;
use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Genres;
use crate::domain::movie::models::Movie;
use crate::domain::movie::models::MovieFilter;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::models::NewMovie;
use crate::domain::movie::models::Runtime;
use crate::domain::movie::models::Title;
use crate::domain::movie::models::Year;
use crate::domain::movie::ports::MovieRepository;

pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn movie_from_row(row: &PgRow) -> Result<Movie, StorageError> {
    let read = |e: sqlx::Error| fault("movies.decode", e);
    let corrupt = |e: MovieError| fault("movies.decode", e);

    Ok(Movie {
        id: MovieId(row.try_get("id").map_err(read)?),
        created_at: row.try_get("created_at").map_err(read)?,
        title: Title::new(row.try_get("title").map_err(read)?)
            .map_err(|e| corrupt(e.into()))?,
        year: Year::new(row.try_get("year").map_err(read)?).map_err(|e| corrupt(e.into()))?,
        runtime: Runtime::new(row.try_get("runtime").map_err(read)?)
            .map_err(|e| corrupt(e.into()))?,
        genres: Genres::new(row.try_get("genres").map_err(read)?)
            .map_err(|e| corrupt(e.into()))?,
        version: row.try_get("version").map_err(read)?,
    })
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn insert(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        let row = run(
            "movies.insert",
            sqlx::query(
                r#"
                INSERT INTO movies (title, year, runtime, genres)
                VALUES ($1, $2, $3, $4)
                RETURNING id, created_at, version
                "#,
            )
            .bind(movie.title.as_str())
            .bind(movie.year.value())
            .bind(movie.runtime.minutes())
            .bind(movie.genres.as_slice())
            .fetch_one(&self.pool),
        )
        .await?;

        let read = |e: sqlx::Error| MovieError::Storage(fault("movies.insert", e));

        Ok(Movie {
            id: MovieId(row.try_get("id").map_err(read)?),
            created_at: row.try_get("created_at").map_err(read)?,
            title: movie.title,
            year: movie.year,
            runtime: movie.runtime,
            genres: movie.genres,
            version: row.try_get("version").map_err(read)?,
        })
    }

    async fn get(&self, id: MovieId) -> Result<Option<Movie>, MovieError> {
        let row = run(
            "movies.get",
            sqlx::query(
                r#"
                SELECT id, created_at, title, year, runtime, genres, version
                FROM movies
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(movie_from_row).transpose()?)
    }

    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, u64), MovieError> {
        // Column and direction come from a closed set, never from raw input.
        let query = format!(
            r#"
            SELECT count(*) OVER() AS total, id, created_at, title, year, runtime, genres, version
            FROM movies
            WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '')
              AND (genres @> $2 OR $2 = '{{}}')
            ORDER BY {} {}, id ASC
            LIMIT $3 OFFSET $4
            "#,
            filter.sort.column.as_column(),
            if filter.sort.descending { "DESC" } else { "ASC" },
        );

        let rows = run(
            "movies.list",
            sqlx::query(&query)
                .bind(filter.title.as_deref().unwrap_or(""))
                .bind(&filter.genres)
                .bind(filter.limit())
                .bind(filter.offset())
                .fetch_all(&self.pool),
        )
        .await?;

        let total = match rows.first() {
            Some(row) => row
                .try_get::<i64, _>("total")
                .map_err(|e| fault("movies.list", e))?,
            None => 0,
        };

        let movies = rows
            .iter()
            .map(movie_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((movies, u64::try_from(total).unwrap_or(0)))
    }

    async fn update(&self, movie: &Movie) -> Result<i32, MovieError> {
        let row = run(
            "movies.update",
            sqlx::query(
                r#"
                UPDATE movies
                SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
                WHERE id = $5 AND version = $6
                RETURNING version
                "#,
            )
            .bind(movie.title.as_str())
            .bind(movie.year.value())
            .bind(movie.runtime.minutes())
            .bind(movie.genres.as_slice())
            .bind(movie.id.0)
            .bind(movie.version)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(MovieError::EditConflict)?;

        Ok(row
            .try_get("version")
            .map_err(|e| fault("movies.update", e))?)
    }

    async fn delete(&self, id: MovieId) -> Result<(), MovieError> {
        let result = run(
            "movies.delete",
            sqlx::query(
                r#"
                DELETE FROM movies
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(MovieError::NotFound);
        }
        Ok(())
    }
}
