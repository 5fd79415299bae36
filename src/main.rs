// Mock Interview - terminal entry point
//
// Usage: mock-interview [--hr | --technical] [topic...]
// Answers are read line by line from stdin; `/end` ends the session.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_interview::commands::{
    end_session, start_session, submit_answer, AnswerRequest, EndSessionRequest,
    StartSessionRequest,
};
use mock_interview::models::interview::{FeedbackRecord, SessionSummary};
use mock_interview::state::AppState;

const END_COMMAND: &str = "/end";

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args() -> StartSessionRequest {
    let mut category = None;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--hr" => category = Some("hr".to_string()),
            "--technical" => category = Some("technical".to_string()),
            _ => words.push(arg),
        }
    }

    let topic = if words.is_empty() {
        "Mock interview".to_string()
    } else {
        words.join(" ")
    };

    StartSessionRequest {
        topic,
        user_id: None,
        category,
    }
}

fn print_feedback(feedback: &FeedbackRecord) {
    println!("\nScore: {}/10", feedback.score);
    if !feedback.feedback.is_empty() {
        println!("{}", feedback.feedback);
    }
    for strength in &feedback.strengths {
        println!("  + {}", strength);
    }
    for improvement in &feedback.improvements {
        println!("  - {}", improvement);
    }
}

fn print_summary(summary: &SessionSummary) {
    println!(
        "\n=== Interview summary ({}/10, {}) ===",
        summary.overall_score,
        summary.overall_rating.label()
    );
    println!("{}", summary.summary);
    if !summary.strengths.is_empty() {
        println!("\nStrengths:");
        for strength in &summary.strengths {
            println!("  + {}", strength);
        }
    }
    if !summary.improvements.is_empty() {
        println!("\nImprovements:");
        for improvement in &summary.improvements {
            println!("  - {}", improvement);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let state = AppState::new();
    state.initialize().await?;

    let config = state.get_config().await?;
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.model,
        "Starting mock-interview"
    );

    let started = start_session(&state, parse_args())
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    let session_id = started.session_id;
    println!("{}", started.current_question);
    println!("(type {} to finish)", END_COMMAND);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }
        if answer == END_COMMAND {
            break;
        }

        let request = AnswerRequest {
            session_id: session_id.clone(),
            answer: answer.to_string(),
        };
        match submit_answer(&state, request).await.into_result() {
            Ok(outcome) => {
                if let Some(feedback) = &outcome.feedback {
                    print_feedback(feedback);
                }
                if let Some(summary) = &outcome.summary {
                    print_summary(summary);
                    return Ok(());
                }
                if let Some(question) = &outcome.current_question {
                    println!("\n{}", question);
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    let summary = end_session(&state, EndSessionRequest { session_id })
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    print_summary(&summary);

    Ok(())
}
