pub mod schema;
pub mod seed;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions},
    FromRow, Sqlite,
};

use crate::models::{
    Admin, Candidate, CandidateResult, Constituency, Election, FamilyMember, MediaLink,
    PartyAlliance, Poll, PollOption, Post, VoterStats,
};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Stored document decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Timestamp decode error: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("Data integrity error: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        schema::create_schema(&pool).await?;
        schema::verify_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database for tests.
    pub async fn create_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        schema::create_schema(&pool).await?;
        Ok(Self { pool })
    }

    // ---- candidates ----

    pub async fn insert_candidate(&self, candidate: &Candidate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidates
                (id, name, name_bn, party, constituency, photo_url, biography, education,
                 occupation, assets, liabilities, criminal_cases, family_json, media_json,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.name_bn)
        .bind(&candidate.party)
        .bind(&candidate.constituency)
        .bind(&candidate.photo_url)
        .bind(&candidate.biography)
        .bind(&candidate.education)
        .bind(&candidate.occupation)
        .bind(&candidate.assets)
        .bind(&candidate.liabilities)
        .bind(&candidate.criminal_cases)
        .bind(serde_json::to_string(&candidate.family)?)
        .bind(serde_json::to_string(&candidate.media)?)
        .bind(candidate.created_at.to_rfc3339())
        .bind(candidate.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_candidates(
        &self,
        party: Option<&str>,
        constituency: Option<&str>,
    ) -> Result<Vec<Candidate>> {
        let mut sql = String::from(
            "SELECT id, name, name_bn, party, constituency, photo_url, biography, education, \
             occupation, assets, liabilities, criminal_cases, family_json, media_json, \
             created_at, updated_at FROM candidates WHERE 1=1",
        );
        if party.is_some() {
            sql.push_str(" AND party = ?");
        }
        if constituency.is_some() {
            sql.push_str(" AND constituency = ?");
        }
        sql.push_str(" ORDER BY constituency, name");

        let mut query = sqlx::query_as::<_, CandidateRow>(&sql);
        if let Some(party) = party {
            query = query.bind(party);
        }
        if let Some(constituency) = constituency {
            query = query.bind(constituency);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Candidate::try_from).collect()
    }

    pub async fn get_candidate(&self, id: &str) -> Result<Candidate> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, name, name_bn, party, constituency, photo_url, biography, education,
                   occupation, assets, liabilities, criminal_cases, family_json, media_json,
                   created_at, updated_at
            FROM candidates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Candidate::try_from(row)
    }

    /// Full-document replacement; the id and `created_at` survive.
    pub async fn update_candidate(&self, candidate: &Candidate) -> Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE candidates SET
                name = ?, name_bn = ?, party = ?, constituency = ?, photo_url = ?,
                biography = ?, education = ?, occupation = ?, assets = ?, liabilities = ?,
                criminal_cases = ?, family_json = ?, media_json = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&candidate.name)
        .bind(&candidate.name_bn)
        .bind(&candidate.party)
        .bind(&candidate.constituency)
        .bind(&candidate.photo_url)
        .bind(&candidate.biography)
        .bind(&candidate.education)
        .bind(&candidate.occupation)
        .bind(&candidate.assets)
        .bind(&candidate.liabilities)
        .bind(&candidate.criminal_cases)
        .bind(serde_json::to_string(&candidate.family)?)
        .bind(serde_json::to_string(&candidate.media)?)
        .bind(candidate.updated_at.to_rfc3339())
        .bind(&candidate.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_candidate(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM candidates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    // ---- elections ----

    pub async fn insert_election(&self, election: &Election) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO elections (id, parliament, name, date, results_json, stats_json)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&election.id)
        .bind(election.parliament)
        .bind(&election.name)
        .bind(election.date.format("%Y-%m-%d").to_string())
        .bind(serde_json::to_string(&election.results)?)
        .bind(option_json(&election.stats)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_elections(&self) -> Result<Vec<Election>> {
        let rows = sqlx::query_as::<_, ElectionRow>(
            "SELECT id, parliament, name, date, results_json, stats_json \
             FROM elections ORDER BY parliament",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Election::try_from).collect()
    }

    pub async fn get_election(&self, parliament: i64) -> Result<Election> {
        let row = sqlx::query_as::<_, ElectionRow>(
            "SELECT id, parliament, name, date, results_json, stats_json \
             FROM elections WHERE parliament = ?",
        )
        .bind(parliament)
        .fetch_one(&self.pool)
        .await?;

        Election::try_from(row)
    }

    /// Full-document replacement keyed by parliament number.
    pub async fn update_election(&self, election: &Election) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE elections SET name = ?, date = ?, results_json = ?, stats_json = ? \
             WHERE parliament = ?",
        )
        .bind(&election.name)
        .bind(election.date.format("%Y-%m-%d").to_string())
        .bind(serde_json::to_string(&election.results)?)
        .bind(option_json(&election.stats)?)
        .bind(election.parliament)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_election(&self, parliament: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM elections WHERE parliament = ?")
            .bind(parliament)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    /// Per-election result lines keyed by parliament number, the
    /// classifier's input.
    pub async fn get_winner_records(&self) -> Result<Vec<(i64, Vec<CandidateResult>)>> {
        let elections = self.get_elections().await?;
        Ok(elections
            .into_iter()
            .map(|e| (e.parliament, e.results))
            .collect())
    }

    // ---- constituencies ----

    pub async fn insert_constituency(&self, constituency: &Constituency) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO constituencies (id, seat, name, division, district, results_json, stats_json)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&constituency.id)
        .bind(constituency.seat)
        .bind(&constituency.name)
        .bind(&constituency.division)
        .bind(&constituency.district)
        .bind(serde_json::to_string(&constituency.results)?)
        .bind(option_json(&constituency.stats)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_constituencies(
        &self,
        division: Option<&str>,
        district: Option<&str>,
    ) -> Result<Vec<Constituency>> {
        let mut sql = String::from(
            "SELECT id, seat, name, division, district, results_json, stats_json \
             FROM constituencies WHERE 1=1",
        );
        if division.is_some() {
            sql.push_str(" AND division = ?");
        }
        if district.is_some() {
            sql.push_str(" AND district = ?");
        }
        sql.push_str(" ORDER BY seat");

        let mut query = sqlx::query_as::<_, ConstituencyRow>(&sql);
        if let Some(division) = division {
            query = query.bind(division);
        }
        if let Some(district) = district {
            query = query.bind(district);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Constituency::try_from).collect()
    }

    pub async fn get_constituency(&self, seat: i64) -> Result<Constituency> {
        let row = sqlx::query_as::<_, ConstituencyRow>(
            "SELECT id, seat, name, division, district, results_json, stats_json \
             FROM constituencies WHERE seat = ?",
        )
        .bind(seat)
        .fetch_one(&self.pool)
        .await?;

        Constituency::try_from(row)
    }

    /// Full-document replacement keyed by seat number.
    pub async fn update_constituency(&self, constituency: &Constituency) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE constituencies SET name = ?, division = ?, district = ?, \
             results_json = ?, stats_json = ? WHERE seat = ?",
        )
        .bind(&constituency.name)
        .bind(&constituency.division)
        .bind(&constituency.district)
        .bind(serde_json::to_string(&constituency.results)?)
        .bind(option_json(&constituency.stats)?)
        .bind(constituency.seat)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_constituency(&self, seat: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM constituencies WHERE seat = ?")
            .bind(seat)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    // ---- party alliances ----

    pub async fn insert_alliance(&self, alliance: &PartyAlliance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO alliances (id, party, alliance, candidate_count, parliament)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alliance.id)
        .bind(&alliance.party)
        .bind(&alliance.alliance)
        .bind(alliance.candidate_count)
        .bind(alliance.parliament)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_alliances(&self, parliament: Option<i64>) -> Result<Vec<PartyAlliance>> {
        let rows = match parliament {
            Some(parliament) => {
                sqlx::query_as::<_, AllianceRow>(
                    "SELECT id, party, alliance, candidate_count, parliament \
                     FROM alliances WHERE parliament = ? ORDER BY alliance, party",
                )
                .bind(parliament)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AllianceRow>(
                    "SELECT id, party, alliance, candidate_count, parliament \
                     FROM alliances ORDER BY parliament, alliance, party",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(PartyAlliance::from).collect())
    }

    pub async fn update_alliance(&self, alliance: &PartyAlliance) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE alliances SET party = ?, alliance = ?, candidate_count = ?, parliament = ? \
             WHERE id = ?",
        )
        .bind(&alliance.party)
        .bind(&alliance.alliance)
        .bind(alliance.candidate_count)
        .bind(alliance.parliament)
        .bind(&alliance.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_alliance(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM alliances WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    // ---- polls ----

    pub async fn insert_poll(&self, poll: &Poll) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO polls (id, question_en, question_bn, options_json, open, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&poll.id)
        .bind(&poll.question_en)
        .bind(&poll.question_bn)
        .bind(serde_json::to_string(&poll.options)?)
        .bind(poll.open)
        .bind(poll.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_polls(&self) -> Result<Vec<Poll>> {
        let rows = sqlx::query_as::<_, PollRow>(
            "SELECT id, question_en, question_bn, options_json, open, created_at \
             FROM polls ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Poll::try_from).collect()
    }

    pub async fn get_poll(&self, id: &str) -> Result<Poll> {
        let row = sqlx::query_as::<_, PollRow>(
            "SELECT id, question_en, question_bn, options_json, open, created_at \
             FROM polls WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Poll::try_from(row)
    }

    /// Increment one option's counter and return the updated poll. The
    /// increment runs as a single UPDATE; there is no read-modify-write
    /// window between concurrent votes.
    pub async fn vote_poll(&self, id: &str, option: usize) -> Result<Poll> {
        let option = option as i64;
        let updated = sqlx::query(
            r#"
            UPDATE polls
            SET options_json = json_set(
                options_json,
                '$[' || ? || '].votes',
                COALESCE(json_extract(options_json, '$[' || ? || '].votes'), 0) + 1
            )
            WHERE id = ? AND open = 1 AND ? < json_array_length(options_json)
            "#,
        )
        .bind(option)
        .bind(option)
        .bind(id)
        .bind(option)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            // Work out which precondition failed; missing ids surface as
            // RowNotFound from the fetch.
            let poll = self.get_poll(id).await?;
            if !poll.open {
                return Err(DatabaseError::Integrity("poll is closed".to_string()));
            }
            return Err(DatabaseError::Integrity("option out of range".to_string()));
        }

        self.get_poll(id).await
    }

    /// Replace a poll's question and options; the open flag and creation
    /// time stay as stored.
    pub async fn update_poll(&self, poll: &Poll) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE polls SET question_en = ?, question_bn = ?, options_json = ? WHERE id = ?",
        )
        .bind(&poll.question_en)
        .bind(&poll.question_bn)
        .bind(serde_json::to_string(&poll.options)?)
        .bind(&poll.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn close_poll(&self, id: &str) -> Result<()> {
        let updated = sqlx::query("UPDATE polls SET open = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_poll(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM polls WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    // ---- posts ----

    pub async fn insert_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, title, body, cover_url, tags_json, published, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.cover_url)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(post.published)
        .bind(post.published_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_posts(&self, published_only: bool) -> Result<Vec<Post>> {
        let sql = if published_only {
            "SELECT id, slug, title, body, cover_url, tags_json, published, published_at \
             FROM posts WHERE published = 1 ORDER BY published_at DESC"
        } else {
            "SELECT id, slug, title, body, cover_url, tags_json, published, published_at \
             FROM posts ORDER BY published_at DESC"
        };

        let rows = sqlx::query_as::<_, PostRow>(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Post::try_from).collect()
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, slug, title, body, cover_url, tags_json, published, published_at \
             FROM posts WHERE slug = ?",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Post::try_from(row)
    }

    pub async fn update_post(&self, post: &Post) -> Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE posts SET
                title = ?, body = ?, cover_url = ?, tags_json = ?, published = ?, published_at = ?
            WHERE slug = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.cover_url)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(post.published)
        .bind(post.published_at.map(|t| t.to_rfc3339()))
        .bind(&post.slug)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn delete_post(&self, slug: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM posts WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    // ---- admins ----

    pub async fn insert_admin(&self, admin: &Admin) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, email, name, verification_code, code_expires_at, created_at)
            VALUES (?, ?, ?, NULL, NULL, ?)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.email)
        .bind(&admin.name)
        .bind(admin.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, name, verification_code, code_expires_at, created_at \
             FROM admins WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    pub async fn get_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, name, verification_code, code_expires_at, created_at \
             FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    pub async fn set_verification_code(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE admins SET verification_code = ?, code_expires_at = ? WHERE email = ?")
            .bind(code)
            .bind(expires_at.to_rfc3339())
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Codes are one-shot: cleared the moment a login succeeds.
    pub async fn clear_verification_code(&self, email: &str) -> Result<()> {
        sqlx::query(
            "UPDATE admins SET verification_code = NULL, code_expires_at = NULL WHERE email = ?",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn option_json<T: serde::Serialize>(value: &Option<T>) -> Result<Option<String>> {
    Ok(match value {
        Some(v) => Some(serde_json::to_string(v)?),
        None => None,
    })
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

// Row types mirror the table layout; embedded documents travel as JSON text.

#[derive(FromRow)]
struct CandidateRow {
    id: String,
    name: String,
    name_bn: Option<String>,
    party: String,
    constituency: String,
    photo_url: Option<String>,
    biography: Option<String>,
    education: Option<String>,
    occupation: Option<String>,
    assets: Option<String>,
    liabilities: Option<String>,
    criminal_cases: Option<String>,
    family_json: String,
    media_json: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = DatabaseError;

    fn try_from(row: CandidateRow) -> Result<Self> {
        let family: Vec<FamilyMember> = serde_json::from_str(&row.family_json)?;
        let media: Vec<MediaLink> = serde_json::from_str(&row.media_json)?;
        Ok(Candidate {
            id: row.id,
            name: row.name,
            name_bn: row.name_bn,
            party: row.party,
            constituency: row.constituency,
            photo_url: row.photo_url,
            biography: row.biography,
            education: row.education,
            occupation: row.occupation,
            assets: row.assets,
            liabilities: row.liabilities,
            criminal_cases: row.criminal_cases,
            family,
            media,
            created_at: parse_utc(&row.created_at)?,
            updated_at: parse_utc(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ElectionRow {
    id: String,
    parliament: i64,
    name: String,
    date: String,
    results_json: String,
    stats_json: Option<String>,
}

impl TryFrom<ElectionRow> for Election {
    type Error = DatabaseError;

    fn try_from(row: ElectionRow) -> Result<Self> {
        let results: Vec<CandidateResult> = serde_json::from_str(&row.results_json)?;
        let stats: Option<VoterStats> = row
            .stats_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(Election {
            id: row.id,
            parliament: row.parliament,
            name: row.name,
            date: NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")?,
            results,
            stats,
        })
    }
}

#[derive(FromRow)]
struct ConstituencyRow {
    id: String,
    seat: i64,
    name: String,
    division: String,
    district: String,
    results_json: String,
    stats_json: Option<String>,
}

impl TryFrom<ConstituencyRow> for Constituency {
    type Error = DatabaseError;

    fn try_from(row: ConstituencyRow) -> Result<Self> {
        let results: Vec<CandidateResult> = serde_json::from_str(&row.results_json)?;
        let stats: Option<VoterStats> = row
            .stats_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(Constituency {
            id: row.id,
            seat: row.seat,
            name: row.name,
            division: row.division,
            district: row.district,
            results,
            stats,
        })
    }
}

#[derive(FromRow)]
struct AllianceRow {
    id: String,
    party: String,
    alliance: String,
    candidate_count: i64,
    parliament: i64,
}

impl From<AllianceRow> for PartyAlliance {
    fn from(row: AllianceRow) -> Self {
        PartyAlliance {
            id: row.id,
            party: row.party,
            alliance: row.alliance,
            candidate_count: row.candidate_count,
            parliament: row.parliament,
        }
    }
}

#[derive(FromRow)]
struct PollRow {
    id: String,
    question_en: String,
    question_bn: String,
    options_json: String,
    open: bool,
    created_at: String,
}

impl TryFrom<PollRow> for Poll {
    type Error = DatabaseError;

    fn try_from(row: PollRow) -> Result<Self> {
        let options: Vec<PollOption> = serde_json::from_str(&row.options_json)?;
        Ok(Poll {
            id: row.id,
            question_en: row.question_en,
            question_bn: row.question_bn,
            options,
            open: row.open,
            created_at: parse_utc(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct PostRow {
    id: String,
    slug: String,
    title: String,
    body: String,
    cover_url: Option<String>,
    tags_json: String,
    published: bool,
    published_at: Option<String>,
}

impl TryFrom<PostRow> for Post {
    type Error = DatabaseError;

    fn try_from(row: PostRow) -> Result<Self> {
        let tags: Vec<String> = serde_json::from_str(&row.tags_json)?;
        Ok(Post {
            id: row.id,
            slug: row.slug,
            title: row.title,
            body: row.body,
            cover_url: row.cover_url,
            tags,
            published: row.published,
            published_at: row.published_at.as_deref().map(parse_utc).transpose()?,
        })
    }
}

#[derive(FromRow)]
struct AdminRow {
    id: String,
    email: String,
    name: String,
    verification_code: Option<String>,
    code_expires_at: Option<String>,
    created_at: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = DatabaseError;

    fn try_from(row: AdminRow) -> Result<Self> {
        Ok(Admin {
            id: row.id,
            email: row.email,
            name: row.name,
            verification_code: row.verification_code,
            code_expires_at: row.code_expires_at.as_deref().map(parse_utc).transpose()?,
            created_at: parse_utc(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateInput, ElectionInput, PollInput, PostInput};

    fn sample_candidate_input() -> CandidateInput {
        CandidateInput {
            name: "Rahim Uddin".to_string(),
            name_bn: Some("রহিম উদ্দিন".to_string()),
            party: "AL".to_string(),
            constituency: "Dhaka-10".to_string(),
            photo_url: None,
            biography: Some("Former mayor.".to_string()),
            education: Some("MA, Dhaka University".to_string()),
            occupation: Some("Businessman".to_string()),
            assets: None,
            liabilities: None,
            criminal_cases: None,
            family: vec![FamilyMember {
                name: "Karima Uddin".to_string(),
                relation: "spouse".to_string(),
                photo_url: None,
            }],
            media: vec![MediaLink {
                title: "Interview".to_string(),
                url: "https://example.org/interview".to_string(),
                kind: "video".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn candidate_round_trip() {
        let db = Database::create_in_memory().await.unwrap();
        let candidate = Candidate::from_input(sample_candidate_input());
        db.insert_candidate(&candidate).await.unwrap();

        let fetched = db.get_candidate(&candidate.id).await.unwrap();
        assert_eq!(fetched.name, candidate.name);
        assert_eq!(fetched.party, candidate.party);
        assert_eq!(fetched.constituency, candidate.constituency);
        assert_eq!(fetched.family.len(), 1);
        assert_eq!(fetched.family[0].relation, "spouse");
        assert_eq!(fetched.media[0].kind, "video");
    }

    #[tokio::test]
    async fn candidate_filters_apply() {
        let db = Database::create_in_memory().await.unwrap();
        let a = Candidate::from_input(sample_candidate_input());
        let mut b = Candidate::from_input(sample_candidate_input());
        b.party = "BNP".to_string();
        b.constituency = "Bogra-4".to_string();
        db.insert_candidate(&a).await.unwrap();
        db.insert_candidate(&b).await.unwrap();

        let al = db.get_candidates(Some("AL"), None).await.unwrap();
        assert_eq!(al.len(), 1);
        let bogra = db.get_candidates(None, Some("Bogra-4")).await.unwrap();
        assert_eq!(bogra.len(), 1);
        assert_eq!(bogra[0].party, "BNP");
        let all = db.get_candidates(None, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn missing_candidate_is_row_not_found() {
        let db = Database::create_in_memory().await.unwrap();
        let err = db.get_candidate("no-such-id").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::RowNotFound)));
    }

    fn sample_poll_input() -> PollInput {
        PollInput {
            question_en: "Who will win?".to_string(),
            question_bn: "কে জিতবে?".to_string(),
            options: vec![
                PollOption {
                    label_en: "AL".to_string(),
                    label_bn: "আওয়ামী লীগ".to_string(),
                    votes: 0,
                },
                PollOption {
                    label_en: "BNP".to_string(),
                    label_bn: "বিএনপি".to_string(),
                    votes: 0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn poll_vote_increments_one_counter() {
        let db = Database::create_in_memory().await.unwrap();
        let poll = Poll::from_input(sample_poll_input());
        db.insert_poll(&poll).await.unwrap();

        db.vote_poll(&poll.id, 1).await.unwrap();
        let updated = db.vote_poll(&poll.id, 1).await.unwrap();
        assert_eq!(updated.options[0].votes, 0);
        assert_eq!(updated.options[1].votes, 2);

        let err = db.vote_poll(&poll.id, 7).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Integrity(_)));

        db.close_poll(&poll.id).await.unwrap();
        let err = db.vote_poll(&poll.id, 0).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Integrity(_)));
    }

    #[tokio::test]
    async fn concurrent_poll_votes_all_land() {
        // File-backed pool so votes really run on separate connections.
        let path = std::env::temp_dir().join(format!("votebd-test-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite:{}", path.display());
        let db = Database::new(&url).await.unwrap();

        let poll = Poll::from_input(sample_poll_input());
        db.insert_poll(&poll).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..100usize {
            let db = db.clone();
            let id = poll.id.clone();
            handles.push(tokio::spawn(async move { db.vote_poll(&id, i % 2).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let tallied = db.get_poll(&poll.id).await.unwrap();
        assert_eq!(tallied.options[0].votes, 50);
        assert_eq!(tallied.options[1].votes, 50);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn updated_candidate_timestamp_matches_row() {
        let db = Database::create_in_memory().await.unwrap();
        let candidate = Candidate::from_input(sample_candidate_input());
        db.insert_candidate(&candidate).await.unwrap();

        let mut edited = candidate.clone();
        edited.occupation = Some("Teacher".to_string());
        edited.updated_at = Utc::now() + chrono::Duration::seconds(5);
        db.update_candidate(&edited).await.unwrap();

        let stored = db.get_candidate(&candidate.id).await.unwrap();
        assert_eq!(stored.occupation.as_deref(), Some("Teacher"));
        assert_eq!(stored.updated_at, edited.updated_at);
        assert_eq!(stored.created_at, candidate.created_at);
    }

    #[tokio::test]
    async fn election_update_replaces_document() {
        let db = Database::create_in_memory().await.unwrap();
        let election = Election::from_input(ElectionInput {
            parliament: 12,
            name: "12th General Election".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            results: vec![],
            stats: None,
        });
        db.insert_election(&election).await.unwrap();

        let mut edited = election.clone();
        edited.results = vec![CandidateResult {
            constituency: "Dhaka-10".to_string(),
            candidate_name: "Rahim Uddin".to_string(),
            party: "AL".to_string(),
            votes: 81_234,
            winner: true,
        }];
        db.update_election(&edited).await.unwrap();

        let stored = db.get_election(12).await.unwrap();
        assert_eq!(stored.results.len(), 1);
        assert!(stored.results[0].winner);

        let mut missing = edited.clone();
        missing.parliament = 99;
        let err = db.update_election(&missing).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn constituency_and_alliance_updates_apply() {
        let db = Database::create_in_memory().await.unwrap();

        let constituency = Constituency::from_input(crate::models::ConstituencyInput {
            seat: 183,
            name: "Dhaka-10".to_string(),
            division: "Dhaka".to_string(),
            district: "Dhaka".to_string(),
            results: vec![],
            stats: None,
        });
        db.insert_constituency(&constituency).await.unwrap();

        let mut edited = constituency.clone();
        edited.district = "Dhaka Metropolitan".to_string();
        db.update_constituency(&edited).await.unwrap();
        let stored = db.get_constituency(183).await.unwrap();
        assert_eq!(stored.district, "Dhaka Metropolitan");

        let alliance = PartyAlliance::from_input(crate::models::PartyAllianceInput {
            party: "JP".to_string(),
            alliance: "Grand Alliance".to_string(),
            candidate_count: 26,
            parliament: 12,
        });
        db.insert_alliance(&alliance).await.unwrap();

        let mut edited = alliance.clone();
        edited.candidate_count = 11;
        db.update_alliance(&edited).await.unwrap();
        let stored = db.get_alliances(Some(12)).await.unwrap();
        assert_eq!(stored[0].candidate_count, 11);
    }

    #[tokio::test]
    async fn poll_update_keeps_echoed_tallies() {
        let db = Database::create_in_memory().await.unwrap();
        let poll = Poll::from_input(sample_poll_input());
        db.insert_poll(&poll).await.unwrap();
        let voted = db.vote_poll(&poll.id, 0).await.unwrap();

        let mut edited = voted.clone();
        edited.question_en = "Who takes the 13th parliament?".to_string();
        db.update_poll(&edited).await.unwrap();

        let stored = db.get_poll(&poll.id).await.unwrap();
        assert_eq!(stored.question_en, "Who takes the 13th parliament?");
        assert_eq!(stored.options[0].votes, 1);
        assert!(stored.open);

        let mut missing = edited.clone();
        missing.id = "no-such-poll".to_string();
        let err = db.update_poll(&missing).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn post_publish_filter() {
        let db = Database::create_in_memory().await.unwrap();
        let published = Post::from_input(PostInput {
            slug: "election-night".to_string(),
            title: "Election night".to_string(),
            body: "Counting begins.".to_string(),
            cover_url: None,
            tags: vec!["news".to_string()],
            published: true,
        });
        let draft = Post::from_input(PostInput {
            slug: "draft-analysis".to_string(),
            title: "Draft".to_string(),
            body: "wip".to_string(),
            cover_url: None,
            tags: vec![],
            published: false,
        });
        db.insert_post(&published).await.unwrap();
        db.insert_post(&draft).await.unwrap();

        assert_eq!(db.get_posts(true).await.unwrap().len(), 1);
        assert_eq!(db.get_posts(false).await.unwrap().len(), 2);
        assert_eq!(
            db.get_post("election-night").await.unwrap().title,
            "Election night"
        );
    }

    #[tokio::test]
    async fn election_round_trip_and_winner_records() {
        let db = Database::create_in_memory().await.unwrap();
        let election = Election::from_input(ElectionInput {
            parliament: 12,
            name: "12th General Election".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            results: vec![CandidateResult {
                constituency: "Dhaka-10".to_string(),
                candidate_name: "Rahim Uddin".to_string(),
                party: "AL".to_string(),
                votes: 81_234,
                winner: true,
            }],
            stats: Some(VoterStats {
                registered_voters: 119_000_000,
                votes_cast: 49_000_000,
                turnout_pct: 41.2,
            }),
        });
        db.insert_election(&election).await.unwrap();

        let fetched = db.get_election(12).await.unwrap();
        assert_eq!(fetched.results.len(), 1);
        assert!(fetched.results[0].winner);
        assert_eq!(fetched.stats.unwrap().votes_cast, 49_000_000);

        let records = db.get_winner_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, 12);
    }

    #[tokio::test]
    async fn admin_code_lifecycle() {
        let db = Database::create_in_memory().await.unwrap();
        let admin = Admin::new("editor@votebd.org", "Editor");
        db.insert_admin(&admin).await.unwrap();

        let expires = Utc::now() + chrono::Duration::minutes(10);
        db.set_verification_code("editor@votebd.org", "123456", expires)
            .await
            .unwrap();

        let stored = db
            .get_admin_by_email("editor@votebd.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.verification_code.as_deref(), Some("123456"));

        db.clear_verification_code("editor@votebd.org").await.unwrap();
        let cleared = db
            .get_admin_by_email("editor@votebd.org")
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.verification_code.is_none());

        assert!(db
            .get_admin_by_email("nobody@votebd.org")
            .await
            .unwrap()
            .is_none());
    }
}
