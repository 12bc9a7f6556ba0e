//! Data entry for the polls site: create, list and delete questions and choices.

use std::{
    fmt::{self, Display},
    error::Error,
    process::ExitCode,
};

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use log::{error, info};

use polls::config::Config;
use polls::db::{self, InsertChoiceErr, PollsDb};

const MAX_TEXT_LEN: usize = 200;

#[derive(Parser)]
#[command(name = "polls-admin", about = "Manage poll questions and choices")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a question, optionally with choices
    AddQuestion {
        #[arg(long)]
        text: String,
        /// Publish date offset from now, in days (negative for the past)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        days: i64,
        #[arg(long = "choice")]
        choices: Vec<String>,
    },
    /// Add a choice to an existing question
    AddChoice {
        #[arg(long)]
        question: i64,
        #[arg(long)]
        text: String,
    },
    /// List every question, published or not
    List,
    /// Delete a question and its choices
    DeleteQuestion {
        #[arg(long)]
        question: i64,
    },
}

#[derive(Debug)]
enum AdminError {
    TextTooLong(String),
    QuestionNotFound(i64),
    Sqlite(sqlx::Error),
}

impl Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdminError::TextTooLong(text) =>
                write!(f, "Text longer than {} characters: [{}]", MAX_TEXT_LEN, text),
            AdminError::QuestionNotFound(id) => write!(f, "Question {} not found", id),
            AdminError::Sqlite(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl Error for AdminError {}

impl From<sqlx::Error> for AdminError {
    fn from(e: sqlx::Error) -> Self {
        AdminError::Sqlite(e)
    }
}

fn check_len(text: &str) -> Result<(), AdminError> {
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(AdminError::TextTooLong(text.to_owned()));
    }
    Ok(())
}

async fn run(db: &PollsDb, command: Command) -> Result<(), AdminError> {
    match command {
        Command::AddQuestion { text, days, choices } => {
            check_len(&text)?;
            for choice in choices.iter() {
                check_len(choice)?;
            }
            let pub_date = Utc::now() + Duration::days(days);
            let id = db.create_question(&text, pub_date, &choices).await?;
            info!("Created question {} with {} choices", id, choices.len());
            println!("{}", id);
        }
        Command::AddChoice { question, text } => {
            check_len(&text)?;
            let id = db.add_choice(question, &text)
                .await
                .map_err(|e| match e {
                    InsertChoiceErr::QuestionNotFound => AdminError::QuestionNotFound(question),
                    InsertChoiceErr::SqliteErr(e) => AdminError::Sqlite(e),
                })?;
            info!("Added choice {} to question {}", id, question);
            println!("{}", id);
        }
        Command::List => {
            let now = Utc::now();
            let mut questions = db.select_question_summaries().await?;
            questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
            for q in questions {
                println!("{}\t{}\t{} choices\trecent={}\t{}",
                    q.id,
                    q.pub_date.to_rfc3339(),
                    q.choice_count,
                    q.was_published_recently(now),
                    q.question_text);
            }
        }
        Command::DeleteQuestion { question } => {
            if !db.delete_question(question).await? {
                return Err(AdminError::QuestionNotFound(question));
            }
            info!("Deleted question {}", question);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = async {
        let config = Config::load()?;
        let pool = db::connect(&config.db_url).await?;
        let db = PollsDb::new(pool);
        db.init_schema().await?;
        run(&db, cli.command).await?;
        Ok::<(), Box<dyn Error>>(())
    }.await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
