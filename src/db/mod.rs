use std::str::FromStr;
use std::time::Duration;

use chrono::SecondsFormat;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, SqlitePool};

use crate::policy::{self, PollQuestion, Timestamp};

mod transaction;

pub use transaction::PollsTransaction;

const CREATE_QUESTION_TABLE: &str = "\
    create table if not exists question ( \
        id integer primary key autoincrement, \
        question_text varchar(200) not null, \
        pub_date text not null \
    )";

const CREATE_CHOICE_TABLE: &str = "\
    create table if not exists choice ( \
        id integer primary key autoincrement, \
        question_id integer not null references question(id) on delete cascade, \
        choice_text varchar(200) not null, \
        votes integer not null default 0 check (votes >= 0) \
    )";

const CREATE_CHOICE_INDEX: &str =
    "create index if not exists choice_question_id on choice(question_id)";

#[derive(Clone)]
pub struct PollsDb {
    pool: SqlitePool
}

#[derive(sqlx::FromRow, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(Clone))]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: Timestamp,
}

impl Question {
    pub fn was_published_recently(&self, now: Timestamp) -> bool {
        policy::is_recently_published(now, self.pub_date)
    }
}

#[derive(sqlx::FromRow, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(Clone))]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i64,
}

/// A question row joined with the size of its choice set.
#[derive(sqlx::FromRow, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(Clone))]
pub struct QuestionSummary {
    pub id: i64,
    pub question_text: String,
    pub pub_date: Timestamp,
    pub choice_count: i64,
}

impl QuestionSummary {
    pub fn was_published_recently(&self, now: Timestamp) -> bool {
        policy::is_recently_published(now, self.pub_date)
    }
}

impl PollQuestion for QuestionSummary {
    fn pub_date(&self) -> Timestamp {
        self.pub_date
    }

    fn choice_count(&self) -> usize {
        self.choice_count.max(0) as usize
    }
}

#[derive(Debug)]
pub enum InsertChoiceErr {
    QuestionNotFound,
    SqliteErr(sqlx::Error),
}

impl From<sqlx::Error> for InsertChoiceErr {
    fn from(e: sqlx::Error) -> InsertChoiceErr {
        if e.as_database_error()
            .map(|de| de.is_foreign_key_violation())
            .unwrap_or(false)
            {
                InsertChoiceErr::QuestionNotFound
            } else {
                InsertChoiceErr::SqliteErr(e)
            }
    }
}

/// Fixed-width UTC text, so stored timestamps compare in SQL by plain
/// string order.
pub fn db_timestamp(t: Timestamp) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Opens a pool on `db_url`, creating the database file if it is missing.
pub async fn connect(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .test_before_acquire(true)
        .connect_with(options)
        .await
}

impl PollsDb {
    pub fn new(db_pool: SqlitePool) -> PollsDb {
        PollsDb{ pool: db_pool }
    }

    pub async fn new_transaction(&self) -> Result<PollsTransaction<'static>, sqlx::Error> {
        PollsTransaction::new(&self.pool).await
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for statement in [CREATE_QUESTION_TABLE, CREATE_CHOICE_TABLE, CREATE_CHOICE_INDEX] {
            (&mut *tx).execute(statement).await?;
        }
        tx.commit().await
    }

    /// Inserts a question together with its initial choices.
    pub async fn create_question(&self, question_text: &str, pub_date: Timestamp, choices: &[String])
    -> Result<i64, sqlx::Error> {
        let mut tx = self.new_transaction().await?;
        let question_id = tx.insert_question(question_text, pub_date).await?;
        for choice_text in choices {
            tx.insert_choice(question_id, choice_text).await?;
        }
        tx.commit().await?;
        Ok(question_id)
    }

    pub async fn add_choice(&self, question_id: i64, choice_text: &str) -> Result<i64, InsertChoiceErr> {
        let mut tx = self.new_transaction().await?;
        let choice_id = tx.insert_choice(question_id, choice_text).await?;
        tx.commit().await?;
        Ok(choice_id)
    }

    /// Returns false when no question had that id.
    pub async fn delete_question(&self, question_id: i64) -> Result<bool, sqlx::Error> {
        let done = sqlx::query("delete from question where id = ?")
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn select_question_summaries(&self) -> Result<Vec<QuestionSummary>, sqlx::Error> {
        let mut tx = self.new_transaction().await?;
        tx.select_question_summaries().await
    }
}
