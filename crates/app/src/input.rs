//! Maps a typed line to an engine event for the current screen.

use services::progression::StepView;
use services::{Event, Screen};
use sim_core::model::{Answer, InteractionPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Event),
    Quit,
    Help,
    Invalid(String),
}

/// Interpret `line` on `screen`.
///
/// On a step, numbers are 1-based display positions: one number picks an
/// option, several (comma or space separated) form a selection. Completion
/// style interactions accept an empty line.
pub fn parse(line: &str, screen: Screen, step: Option<&StepView>) -> Command {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Command::Quit,
        "?" | "h" | "help" => return Command::Help,
        _ => {}
    }

    match screen {
        Screen::Start => Command::Dispatch(Event::StartSimulation),
        Screen::SimResult => Command::Dispatch(Event::Continue),
        Screen::Step => parse_step(trimmed, step),
        Screen::Results | Screen::NotFound => Command::Quit,
    }
}

fn parse_step(line: &str, step: Option<&StepView>) -> Command {
    if matches!(line, "c" | "continue") {
        return Command::Dispatch(Event::Continue);
    }

    let completes = step.is_some_and(|step| {
        matches!(
            step.payload,
            InteractionPayload::TapSequence { .. } | InteractionPayload::Completion
        )
    });
    if completes || line.eq_ignore_ascii_case("done") {
        return Command::Dispatch(Event::SubmitAnswer(Answer::Completed));
    }
    if line.is_empty() {
        return Command::Invalid("type an option number, or `done`".into());
    }

    let picks: Result<Vec<usize>, _> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<usize>())
        .collect();
    let Ok(picks) = picks else {
        return Command::Invalid(format!("not an option number: {line}"));
    };
    if picks.contains(&0) {
        return Command::Invalid("options are numbered from 1".into());
    }

    let display: Vec<usize> = picks.into_iter().map(|pick| pick - 1).collect();
    let answer = match display.as_slice() {
        [single] => Answer::Choice(*single),
        _ => Answer::Selection(display),
    };
    Command::Dispatch(Event::SubmitAnswer(answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_become_display_indices() {
        assert_eq!(
            parse(" 2 ", Screen::Step, None),
            Command::Dispatch(Event::SubmitAnswer(Answer::Choice(1)))
        );
        assert_eq!(
            parse("1,4 3", Screen::Step, None),
            Command::Dispatch(Event::SubmitAnswer(Answer::Selection(vec![0, 3, 2])))
        );
    }

    #[test]
    fn screens_outside_steps_map_to_navigation() {
        assert_eq!(
            parse("", Screen::Start, None),
            Command::Dispatch(Event::StartSimulation)
        );
        assert_eq!(
            parse("", Screen::SimResult, None),
            Command::Dispatch(Event::Continue)
        );
        assert_eq!(parse("", Screen::Results, None), Command::Quit);
        assert_eq!(parse("quit", Screen::Step, None), Command::Quit);
    }

    #[test]
    fn rejects_garbage_and_zero() {
        assert!(matches!(parse("abc", Screen::Step, None), Command::Invalid(_)));
        assert!(matches!(parse("0", Screen::Step, None), Command::Invalid(_)));
        assert!(matches!(parse("", Screen::Step, None), Command::Invalid(_)));
        assert_eq!(
            parse("done", Screen::Step, None),
            Command::Dispatch(Event::SubmitAnswer(Answer::Completed))
        );
    }
}
