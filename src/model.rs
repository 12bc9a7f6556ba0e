use serde::{Deserialize, Serialize};

use crate::policy::{PollQuestion, Timestamp};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionListing {
    pub id: i64,
    pub question_text: String,
    pub pub_date: Timestamp,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionDetail {
    pub id: i64,
    pub question_text: String,
    pub pub_date: Timestamp,
    pub choices: Vec<Choice>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub choice_text: String,
    pub votes: i64,
}

impl PollQuestion for QuestionDetail {
    fn pub_date(&self) -> Timestamp {
        self.pub_date
    }

    fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

/// Body of `POST /polls/{question_id}/vote/`.
///
/// Anything in `choice` that is not an integer counts as no selection.
#[derive(Deserialize, Serialize, Debug, Default)]
#[cfg_attr(test, derive(Clone))]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    pub fn choice_id(&self) -> Option<i64> {
        self.choice
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_choice_id() {
        let form = VoteForm { choice: Some("42".to_owned()) };
        assert_eq!(Some(42), form.choice_id());
    }

    #[test]
    fn missing_or_garbage_choice() {
        assert_eq!(None, VoteForm::default().choice_id());
        assert_eq!(None, VoteForm { choice: Some("".to_owned()) }.choice_id());
        assert_eq!(None, VoteForm { choice: Some("cake".to_owned()) }.choice_id());
    }
}
