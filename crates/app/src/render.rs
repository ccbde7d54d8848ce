//! Plain-text rendering of engine snapshots.

use std::fmt::Write;

use services::progression::{CatalogResults, ProgressSnapshot, SimulationReview, StepView};
use services::{Screen, StepFeedback};
use sim_core::model::{HistoryEntry, InteractionPayload};

pub fn snapshot(snapshot: &ProgressSnapshot) -> String {
    let mut out = String::new();
    let title = snapshot.title.as_deref().unwrap_or("");
    let _ = writeln!(
        out,
        "\n== {title} ({}/{}) | score {} | streak {}{} | {} ==",
        snapshot.simulation_number,
        snapshot.simulation_total,
        snapshot.score,
        snapshot.streak,
        if snapshot.show_streak_badge { " \u{1f525}" } else { "" },
        snapshot.timer,
    );

    match snapshot.screen {
        Screen::Start => {
            if let Some(intro) = &snapshot.intro {
                if let Some(time) = &intro.estimated_time {
                    let _ = writeln!(out, "Estimated time: {time}");
                }
                if let Some(why) = &intro.why_it_matters {
                    let _ = writeln!(out, "{why}");
                }
            }
            let _ = writeln!(out, "Press Enter to begin.");
        }
        Screen::Step => {
            if let Some(step) = &snapshot.step {
                step_view(&mut out, step);
            }
        }
        Screen::SimResult => {
            if let Some(review) = &snapshot.review {
                review_view(&mut out, review);
            }
            let _ = writeln!(out, "Press Enter to continue.");
        }
        Screen::Results => {
            if let Some(results) = &snapshot.results {
                results_view(&mut out, results);
            }
        }
        Screen::NotFound => {
            let _ = writeln!(out, "Simulation not found.");
        }
    }
    out
}

pub fn feedback(feedback: &StepFeedback) -> String {
    let mut out = format!("-> {} (+{})", feedback.message, feedback.points);
    if let Some(percentile) = feedback.percentile {
        let _ = write!(out, " | faster than {percentile}% of candidates");
    }
    out
}

fn step_view(out: &mut String, step: &StepView) {
    let progress = &step.progress;
    let _ = writeln!(
        out,
        "Step {}/{} | scenario step {}/{} ({}%)",
        progress.step_number,
        progress.step_total,
        progress.scenario_position,
        progress.scenario_steps,
        progress.scenario_percent()
    );
    if let Some(scenario) = &step.scenario {
        let _ = writeln!(out, "[{}]", scenario.title);
        if let Some(context) = &scenario.workplace_context {
            let _ = writeln!(out, "{context}");
        }
    }
    if let Some(text) = step.bridge.as_ref().and_then(|bridge| bridge.text.as_deref()) {
        let _ = writeln!(out, "Previously: {text}");
    }
    let _ = writeln!(out, "\n{}", step.question);

    match &step.payload {
        InteractionPayload::Choice { options, .. }
        | InteractionPayload::ClickablePrompt { options, .. } => numbered(out, options),
        InteractionPayload::FillBlank {
            template, options, ..
        } => {
            let _ = writeln!(out, "{template}");
            numbered(out, options);
        }
        InteractionPayload::ViolatedPrinciples {
            prompt, principles, ..
        } => {
            if let Some(prompt) = prompt {
                let _ = writeln!(out, "> {prompt}");
            }
            numbered(out, principles);
            let _ = writeln!(out, "(pick every violated principle, e.g. `1,3`)");
        }
        InteractionPayload::FindError { segments } => {
            for (i, segment) in segments.iter().enumerate() {
                let _ = writeln!(out, "  {}) {}", i + 1, segment.text);
            }
        }
        InteractionPayload::TapSequence { .. } | InteractionPayload::Completion => {
            let _ = writeln!(out, "(press Enter when done)");
        }
    }

    if let Some(feedback) = &step.feedback {
        let _ = writeln!(out, "{}", self::feedback(feedback));
        let _ = writeln!(out, "Type `c` to continue.");
    }
}

fn numbered(out: &mut String, options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {option}", i + 1);
    }
}

fn review_view(out: &mut String, review: &SimulationReview) {
    let summary = &review.summary;
    let _ = writeln!(
        out,
        "{}: {} correct, {} partial, {} incorrect ({} pts)",
        review.title,
        summary.correct(),
        summary.partial(),
        summary.incorrect(),
        summary.points()
    );
    for entry in review.partial.iter().chain(&review.incorrect) {
        history_line(out, entry);
    }
    if let Some(end_state) = &review.end_state {
        let _ = writeln!(out, "{end_state}");
    }
    if let Some(next) = &review.next_title {
        let _ = writeln!(out, "Next up: {next}");
    }
}

fn history_line(out: &mut String, entry: &HistoryEntry) {
    let _ = writeln!(
        out,
        "  [{}] {} | you: {} | best: {}",
        entry.outcome.as_str(),
        entry.question,
        entry.submitted_answer,
        entry.best_answer.as_deref().unwrap_or("-")
    );
}

fn results_view(out: &mut String, results: &CatalogResults) {
    if let Some(review) = &results.last_review {
        review_view(out, review);
    }
    let _ = writeln!(out, "Total score: {}", results.total_score);
    for sim in &results.simulations {
        let _ = writeln!(out, "- {}", sim.title);
        for badge in &sim.badges {
            let _ = writeln!(out, "    badge: {badge}");
        }
        for deliverable in &sim.deliverables {
            let _ = writeln!(out, "    unlocked: {deliverable}");
        }
    }
}
