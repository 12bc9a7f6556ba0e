use actix_web::{HttpResponse, Result, web};
use actix_web::http::header;
use actix_web::web::{Data, Form, Path, ServiceConfig};
use askama::Template;
use chrono::Utc;

use crate::model::*;
use crate::operations::*;
use crate::templates::{DetailTemplate, IndexTemplate, NO_CHOICE_SELECTED, ResultsTemplate};

pub const INDEX_PATH: &str = "/polls/";
pub const DETAIL_PATH: &str = "/polls/{question_id}/";
pub const RESULTS_PATH: &str = "/polls/{question_id}/results/";
pub const VOTE_PATH: &str = "/polls/{question_id}/vote/";

pub fn results_url(question_id: i64) -> String {
    format!("/polls/{}/results/", question_id)
}

fn render(template: &impl Template) -> Result<HttpResponse> {
    let body = template.render()
        .map_err(|e| {
            error!("failed to render template: {:?}", e);
            actix_web::error::ErrorInternalServerError("")
        })?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn map_get_question_error(e: GetQuestionError) -> actix_web::Error {
    match e {
        GetQuestionError::NotFound =>
            actix_web::error::ErrorNotFound(""),
        GetQuestionError::Unexpected =>
            actix_web::error::ErrorInternalServerError(""),
    }
}

async fn index_handler<A: 'static + PollOperationsT>(
    ops: Data<A>) -> Result<HttpResponse>
{
    let questions = ops.latest_questions(Utc::now())
        .await
        .map_err(|e| match e {
            GetQuestionsError::Unexpected =>
                actix_web::error::ErrorInternalServerError(""),
        })?;
    render(&IndexTemplate { latest_question_list: &questions })
}

async fn detail_handler<A: 'static + PollOperationsT>(
    ops: Data<A>,
    path: Path<i64>) -> Result<HttpResponse>
{
    let question = ops.get_question(path.into_inner(), Utc::now())
        .await
        .map_err(map_get_question_error)?;
    render(&DetailTemplate { question: &question, error_message: None })
}

async fn results_handler<A: 'static + PollOperationsT>(
    ops: Data<A>,
    path: Path<i64>) -> Result<HttpResponse>
{
    let question = ops.get_question(path.into_inner(), Utc::now())
        .await
        .map_err(map_get_question_error)?;
    render(&ResultsTemplate { question: &question })
}

async fn vote_handler<A: 'static + PollOperationsT>(
    ops: Data<A>,
    path: Path<i64>,
    body: Option<Form<VoteForm>>) -> Result<HttpResponse>
{
    let question_id = path.into_inner();
    // A missing or unreadable body is a vote without a choice.
    let form = body.map(Form::into_inner).unwrap_or_default();
    match ops.vote(question_id, form.choice_id(), Utc::now()).await {
        Ok(()) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, results_url(question_id)))
            .finish()),
        Err(VoteError::NoChoiceSelected(question)) =>
            render(&DetailTemplate { question: &question, error_message: Some(NO_CHOICE_SELECTED) }),
        Err(VoteError::NotFound) => Err(actix_web::error::ErrorNotFound("")),
        Err(VoteError::Unexpected) => Err(actix_web::error::ErrorInternalServerError("")),
    }
}

pub fn config<A: 'static + PollOperationsT>(cfg: &mut ServiceConfig) {
    cfg.route(INDEX_PATH, web::get().to(index_handler::<A>))
        .route(DETAIL_PATH, web::get().to(detail_handler::<A>))
        .route(RESULTS_PATH, web::get().to(results_handler::<A>))
        .route(VOTE_PATH, web::post().to(vote_handler::<A>))
    ;
}
