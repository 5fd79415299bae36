//! Prompt Builder
//!
//! Pure functions that turn session context into prompts for the text
//! generator, plus the fixed lines the interviewer says without asking it.

use mock_interview_core::InterviewCategory;

/// Fallback used when question generation yields nothing usable
pub const FALLBACK_QUESTION: &str =
    "Let's continue. Can you tell me about a challenge you faced in your field and how you overcame it?";

/// Greeting that opens a session and asks for the role to prepare for
pub fn greeting(category: Option<InterviewCategory>) -> &'static str {
    match category {
        Some(InterviewCategory::Technical) => {
            "Hello, I'm your technical interviewer. What role are you applying for so we can start your prep?"
        }
        Some(InterviewCategory::Hr) => {
            "Hello, I'm your HR interviewer. What role are you applying for so we can start your prep?"
        }
        None => {
            "Welcome to your mock interview! What kind of position or role would you like to prepare for today?"
        }
    }
}

/// Introductory line recorded right after the role is declared
pub fn introduction(category: InterviewCategory) -> &'static str {
    match category {
        InterviewCategory::Hr => {
            "Hello, I'm your HR interviewer. Let's start your HR/behavioral interview."
        }
        InterviewCategory::Technical => {
            "Hello, I'm your technical interviewer. Let's start your technical interview."
        }
    }
}

/// One prior exchange fed back into the question prompt
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub question: &'a str,
    /// Empty when the question was never answered
    pub answer: &'a str,
}

/// One graded exchange fed into the summary prompt
#[derive(Debug, Clone, Copy)]
pub struct GradedExchange<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub feedback: &'a str,
}

fn category_framing(category: InterviewCategory) -> &'static str {
    match category {
        InterviewCategory::Hr => {
            r#"This is an HR / behavioral interview.
- Do NOT ask technical, coding, algorithm or system design questions.
- Ask about past experience, teamwork, conflict, motivation and career goals.
- Frame questions so the candidate can answer with the STAR method (Situation, Task, Action, Result)."#
        }
        InterviewCategory::Technical => {
            r#"This is a technical interview.
- Ask short, concrete questions about implementation details, tools and trade-offs used in this role.
- Prefer one focused question over multi-part questions.
- Avoid generic behavioral questions."#
        }
    }
}

/// Build the prompt asking for the next interview question.
///
/// `history` is every prior exchange in turn order; it is empty for the first
/// substantive question.
pub fn build_question_prompt(
    role: &str,
    category: InterviewCategory,
    history: &[Exchange<'_>],
) -> String {
    let mut prompt = format!(
        r#"You are an AI-powered mock interviewer. You simulate an open-ended {category} interview for a candidate preparing for the role: "{role}".
Never answer the questions yourself. Never end the interview unless the candidate asks to.

{framing}
"#,
        category = category.as_str(),
        role = role.trim(),
        framing = category_framing(category),
    );

    if history.is_empty() {
        prompt.push_str("\nThis is the first question of the interview.\n");
    } else {
        prompt.push_str("\nConversation so far:\n");
        for (i, exchange) in history.iter().enumerate() {
            prompt.push_str(&format!("Q{}: {}\n", i + 1, exchange.question));
            let answer = if exchange.answer.trim().is_empty() {
                "(no answer)"
            } else {
                exchange.answer
            };
            prompt.push_str(&format!("A{}: {}\n", i + 1, answer));
        }
    }

    prompt.push_str(
        r#"
Adapt the difficulty: if the previous answer was poor, ask a simpler question; if it was excellent, ask a harder one.
Do not repeat previous questions.
Respond with ONLY the next question. No preamble, no numbering, no feedback."#,
    );

    prompt
}

/// Build the prompt asking for structured feedback on one answer
pub fn build_feedback_prompt(question: &str, answer: &str, category: InterviewCategory) -> String {
    format!(
        r#"You are an interview coach evaluating one answer from a {category} interview.

Question: {question}
Answer: {answer}

Return ONLY a JSON object with exactly these fields, and no surrounding prose:
{{
  "score": <integer from 1 to 10>,
  "strengths": ["<short strength>", ...],
  "improvements": ["<short improvement>", ...],
  "feedback": "<2-3 sentences of feedback>"
}}"#,
        category = category.as_str(),
        question = question,
        answer = answer,
    )
}

/// Build the prompt asking for the closing summary of a session
pub fn build_summary_prompt(
    topic: &str,
    category: Option<InterviewCategory>,
    exchanges: &[GradedExchange<'_>],
) -> String {
    let kind = category.map(|c| c.as_str()).unwrap_or("general");
    let mut prompt = format!(
        "You are an interview coach. Summarize this {} interview session about {}.\n\n",
        kind,
        topic.trim()
    );

    for exchange in exchanges {
        prompt.push_str(&format!("Q: {}\n", exchange.question));
        prompt.push_str(&format!("A: {}\n", exchange.answer));
        if !exchange.feedback.is_empty() {
            prompt.push_str(&format!("Feedback: {}\n", exchange.feedback));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Give a short overall summary of the candidate's performance and concrete improvement tips.",
    );
    prompt
}

/// Strip formatting the generator sometimes wraps a question in.
///
/// Returns `None` when nothing is left.
pub fn clean_question(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_start_matches("**Question:**")
        .trim_start_matches("Question:")
        .trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
