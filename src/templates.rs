use askama::Template;

use crate::model::{QuestionDetail, QuestionListing};

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

#[derive(Template)]
#[template(path = "polls/index.html")]
pub struct IndexTemplate<'a> {
    pub latest_question_list: &'a [QuestionListing],
}

#[derive(Template)]
#[template(path = "polls/detail.html")]
pub struct DetailTemplate<'a> {
    pub question: &'a QuestionDetail,
    pub error_message: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "polls/results.html")]
pub struct ResultsTemplate<'a> {
    pub question: &'a QuestionDetail,
}
