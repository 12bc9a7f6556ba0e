use sqlx::{Sqlite, SqlitePool, Transaction};

use super::*;

pub struct PollsTransaction<'a>{
    tx: Transaction<'a, Sqlite>,
}

impl PollsTransaction<'static> {

    pub async fn new(db: &SqlitePool) -> Result<PollsTransaction<'static>, sqlx::Error> {
        Ok(PollsTransaction {
            tx: db.begin().await?
        })
    }
}

impl<'a> PollsTransaction<'a> {

    pub async fn select_question(&mut self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "select id, question_text, pub_date from question where id = ?"
        ).bind(id)
        .fetch_optional(&mut *self.tx)
        .await
    }

    pub async fn select_question_summaries(&mut self) -> Result<Vec<QuestionSummary>, sqlx::Error> {
        sqlx::query_as::<_, QuestionSummary>(
            "select q.id, q.question_text, q.pub_date, count(c.id) as choice_count \
            from question q left join choice c on c.question_id = q.id \
            group by q.id, q.question_text, q.pub_date"
        )
        .fetch_all(&mut *self.tx)
        .await
    }

    /// Published questions with at least one choice, newest first.
    pub async fn select_listable_summaries(&mut self, now: Timestamp, limit: i64)
    -> Result<Vec<QuestionSummary>, sqlx::Error> {
        sqlx::query_as::<_, QuestionSummary>(
            "select q.id, q.question_text, q.pub_date, count(c.id) as choice_count \
            from question q join choice c on c.question_id = q.id \
            where q.pub_date <= ? \
            group by q.id, q.question_text, q.pub_date \
            order by q.pub_date desc, q.id desc \
            limit ?"
        ).bind(db_timestamp(now))
        .bind(limit)
        .fetch_all(&mut *self.tx)
        .await
    }

    pub async fn insert_question(&mut self, question_text: &str, pub_date: Timestamp)
    -> Result<i64, sqlx::Error> {
        let done = sqlx::query("insert into question(question_text, pub_date) values (?, ?)")
            .bind(question_text)
            .bind(db_timestamp(pub_date))
            .execute(&mut *self.tx)
            .await?;
        Ok(done.last_insert_rowid())
    }

    pub async fn select_choices(&mut self, question_id: i64) -> Result<Vec<Choice>, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "select id, question_id, choice_text, votes from choice where question_id = ? order by id"
        ).bind(question_id)
        .fetch_all(&mut *self.tx)
        .await
    }

    pub async fn select_choice(&mut self, question_id: i64, choice_id: i64)
    -> Result<Option<Choice>, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "select id, question_id, choice_text, votes from choice where id = ? and question_id = ?"
        ).bind(choice_id)
        .bind(question_id)
        .fetch_optional(&mut *self.tx)
        .await
    }

    pub async fn insert_choice(&mut self, question_id: i64, choice_text: &str)
    -> Result<i64, sqlx::Error> {
        let done = sqlx::query("insert into choice(question_id, choice_text, votes) values (?, ?, 0)")
            .bind(question_id)
            .bind(choice_text)
            .execute(&mut *self.tx)
            .await?;
        Ok(done.last_insert_rowid())
    }

    /// Adds one vote in a single statement. Returns false when the choice
    /// does not belong to the question.
    pub async fn increment_votes(&mut self, question_id: i64, choice_id: i64)
    -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "update choice set votes = votes + 1 where id = ? and question_id = ?"
        ).bind(choice_id)
        .bind(question_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(done.rows_affected() == 1)
    }

    pub async fn commit(self)-> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}
