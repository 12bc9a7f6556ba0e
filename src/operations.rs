use async_trait::async_trait;

use crate::db::{self, PollsDb};
use crate::model::*;
use crate::policy::{self, Timestamp};

#[cfg(test)]
use mockall::automock;

/// How many questions the index page shows.
pub const INDEX_LIMIT: usize = 5;

#[derive(Debug)]
pub enum GetQuestionsError {
    Unexpected,
}

impl From<sqlx::Error> for GetQuestionsError {
    fn from(e: sqlx::Error) -> Self {
        log_sql_error(e);
        Self::Unexpected
    }
}

#[derive(Debug)]
pub enum GetQuestionError {
    NotFound,
    Unexpected,
}

impl From<sqlx::Error> for GetQuestionError {
    fn from(e: sqlx::Error) -> Self {
        log_sql_error(e);
        Self::Unexpected
    }
}

#[derive(Debug)]
pub enum VoteError {
    NotFound,
    /// No choice, or one from another question. Carries the question so the
    /// form can be shown again.
    NoChoiceSelected(QuestionDetail),
    Unexpected,
}

impl From<sqlx::Error> for VoteError {
    fn from(e: sqlx::Error) -> Self {
        log_sql_error(e);
        Self::Unexpected
    }
}

impl From<GetQuestionError> for VoteError {
    fn from(e: GetQuestionError) -> Self {
        match e {
            GetQuestionError::NotFound => Self::NotFound,
            GetQuestionError::Unexpected => Self::Unexpected,
        }
    }
}

fn log_sql_error(e: sqlx::Error) {
    error!("unexpected sql error: {:?}", e);
    if let Some(e) = e.into_database_error() {
        error!("{}", e.message())
    };
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PollOperationsT {
    /// Listable questions as of `now`, newest first.
    async fn latest_questions(&self, now: Timestamp) -> Result<Vec<QuestionListing>, GetQuestionsError>;
    /// A viewable question and its choices.
    async fn get_question(&self, id: i64, now: Timestamp) -> Result<QuestionDetail, GetQuestionError>;
    async fn vote(&self, question_id: i64, choice_id: Option<i64>, now: Timestamp) -> Result<(), VoteError>;
}

#[derive(Clone)]
pub struct PollOperations {
    db: PollsDb,
}

impl PollOperations {
    pub fn new(db: PollsDb) -> PollOperations {
        PollOperations {
            db
        }
    }
}

async fn select_viewable_question(
    tx: &mut db::PollsTransaction<'_>,
    id: i64,
    now: Timestamp,
) -> Result<QuestionDetail, GetQuestionError> {
    let question = tx.select_question(id)
        .await?
        .ok_or(GetQuestionError::NotFound)?;

    let choices = tx.select_choices(id)
        .await?
        .into_iter()
        .map(|c| Choice {
            id: c.id,
            choice_text: c.choice_text,
            votes: c.votes,
        })
        .collect();

    let detail = QuestionDetail {
        id: question.id,
        question_text: question.question_text,
        pub_date: question.pub_date,
        choices,
    };

    if !policy::is_viewable(now, &detail) {
        return Err(GetQuestionError::NotFound);
    }
    Ok(detail)
}

#[async_trait]
impl PollOperationsT for PollOperations {

    async fn latest_questions(&self, now: Timestamp) -> Result<Vec<QuestionListing>, GetQuestionsError> {
        let mut transaction = self.db.new_transaction()
        .await?;

        let questions = transaction.select_listable_summaries(now, INDEX_LIMIT as i64)
        .await?
        .into_iter()
        .filter(|q| policy::is_listable(now, q))
        .map(|q| QuestionListing {
            id: q.id,
            question_text: q.question_text,
            pub_date: q.pub_date,
        })
        .collect();

        Ok(questions)
    }

    async fn get_question(&self, id: i64, now: Timestamp) -> Result<QuestionDetail, GetQuestionError> {
        let mut transaction = self.db.new_transaction()
        .await?;

        select_viewable_question(&mut transaction, id, now).await
    }

    async fn vote(&self, question_id: i64, choice_id: Option<i64>, now: Timestamp) -> Result<(), VoteError> {
        let mut tx = self.db.new_transaction().await?;

        // Write before reading so this transaction takes the write lock first.
        // A hidden question drops `tx`, which rolls the increment back.
        let counted = match choice_id {
            Some(choice_id) => tx.increment_votes(question_id, choice_id).await?,
            None => false,
        };

        let question = select_viewable_question(&mut tx, question_id, now).await?;
        if !counted {
            return Err(VoteError::NoChoiceSelected(question));
        }

        tx.commit().await?;
        info!("vote recorded question_id={} choice_id={:?}", question_id, choice_id);
        Ok(())
    }
}
