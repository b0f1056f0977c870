//! Interactive persona and scenario selection.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use parley_application::{ChatSessionHost, FlowHandoff, Listing, Screen, SelectionFlow};
use parley_core::config::ClientConfig;
use parley_core::persona::Gender;
use parley_core::token::UsageToken;
use parley_core::voice::Voice;
use parley_core::{ParleyError, Result as ParleyResult};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

const PERSONA_COMMANDS: &[&str] = &["new", "list", "quit"];
const SCENARIO_COMMANDS: &[&str] = &["back", "list", "quit"];
const CREATE_COMMANDS: &[&str] = &[
    "name", "desc", "gender", "voice", "preview", "submit", "back", "list", "quit",
];

/// Completion and hints for the commands of the current screen.
struct SelectHelper {
    commands: &'static [&'static str],
}

impl Helper for SelectHelper {}

impl Completer for SelectHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for SelectHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or_default();
        if self.commands.iter().any(|cmd| *cmd == first) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for SelectHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for SelectHelper {}

fn commands_for(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::Personas | Screen::Finished => PERSONA_COMMANDS,
        Screen::Scenarios => SCENARIO_COMMANDS,
        Screen::Creating => CREATE_COMMANDS,
    }
}

pub async fn run(config: &ClientConfig) -> Result<()> {
    let context = super::enter_page(config).await?;
    let host = super::chat_host(config);
    let mut flow = SelectionFlow::new(Arc::clone(&context));

    let mut rl: Editor<SelectHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(SelectHelper {
        commands: PERSONA_COMMANDS,
    }));

    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!(
        "{}",
        "Pick a persona by number, 'new' to create one, or 'quit' to exit.".bright_black()
    );

    let mut shown: Option<Screen> = None;
    loop {
        let screen = flow.screen();
        if screen == Screen::Finished {
            break;
        }

        flow.load_current().await;
        if shown != Some(screen) {
            render(&flow);
            shown = Some(screen);
        }
        if let Some(helper) = rl.helper_mut() {
            helper.commands = commands_for(screen);
        }

        let prompt = match screen {
            Screen::Scenarios => "scenario> ",
            Screen::Creating => "create> ",
            _ => "persona> ",
        };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        if input == "quit" || input == "exit" {
            println!("{}", "Goodbye!".bright_green());
            break;
        }
        if input == "list" {
            render(&flow);
            continue;
        }

        let outcome = match screen {
            Screen::Personas => handle_personas(&mut flow, input).map(|_| None),
            Screen::Scenarios => handle_scenarios(&mut flow, input),
            Screen::Creating => handle_creating(&mut flow, input).await.map(|_| None),
            Screen::Finished => Ok(None),
        };

        match outcome {
            Ok(Some(handoff)) => {
                // The chat page is its own entry and gets a fresh token.
                match super::mint_token(config).await {
                    Ok(token) => {
                        start_chat(&host, &handoff, &token).await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "[Select] Could not mint chat token");
                        println!("{}", e.to_string().red());
                    }
                }
                break;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "[Select] Command failed");
                println!("{}", e.to_string().red());
            }
        }
    }

    Ok(())
}

/// Opens the chat for a finished selection. Failures are shown, never raised.
async fn start_chat(host: &ChatSessionHost, handoff: &FlowHandoff, token: &UsageToken) -> bool {
    let entry = match host.prepare_destination(&handoff.destination, Some(&handoff.persona), token)
    {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(error = %e, "[Select] Chat entry failed");
            println!("{}", e.to_string().red());
            return false;
        }
    };

    match super::chat::open(host, &entry).await {
        Ok(()) => entry.is_ready(),
        Err(e) => {
            tracing::warn!(error = %e, "[Select] Chat session failed");
            println!("{}", e.to_string().red());
            false
        }
    }
}

fn parse_index(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn handle_personas(flow: &mut SelectionFlow, input: &str) -> ParleyResult<()> {
    if input == "new" {
        return flow.start_creating();
    }

    let Listing::Items(personas) = flow.persona_list().render() else {
        return Err(ParleyError::validation("No personas to choose from"));
    };
    let index = parse_index(input, personas.len())
        .ok_or_else(|| ParleyError::validation(format!("Unknown command '{}'", input)))?;
    flow.select_persona(&personas[index].id)
}

fn handle_scenarios(flow: &mut SelectionFlow, input: &str) -> ParleyResult<Option<FlowHandoff>> {
    if input == "back" {
        flow.back()?;
        return Ok(None);
    }

    let Some(Listing::Items(scenarios)) = flow.scenario_list().map(|view| view.render()) else {
        return Err(ParleyError::validation("No scenarios to choose from"));
    };
    let index = parse_index(input, scenarios.len())
        .ok_or_else(|| ParleyError::validation(format!("Unknown command '{}'", input)))?;
    flow.select_scenario(&scenarios[index].id).map(Some)
}

async fn handle_creating(flow: &mut SelectionFlow, input: &str) -> ParleyResult<()> {
    let (command, arg) = match input.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (input, ""),
    };

    match command {
        "back" => flow.back(),
        "submit" => {
            let persona = flow.submit_creation().await?;
            println!(
                "{}",
                format!("Created persona '{}'", persona.name).bright_green()
            );
            Ok(())
        }
        "preview" => {
            let voice = pick_voice(flow, arg)?;
            let picker = match flow.creator() {
                Some(creator) => creator.voice_picker().clone(),
                None => return Err(ParleyError::internal("Creation form is not open")),
            };
            println!("{}", format!("Synthesizing a sample of {}...", voice.name).bright_black());
            let sample = picker.preview(&voice.id).await?;
            let path = std::env::temp_dir().join(format!(
                "parley-preview-{}.{}",
                voice.id,
                sample.file_extension()
            ));
            std::fs::write(&path, &sample.audio)?;
            println!(
                "{}",
                format!("Sample saved to {}", path.display()).bright_green()
            );
            Ok(())
        }
        "voice" => {
            let voice = pick_voice(flow, arg)?;
            if let Some(creator) = flow.creator_mut() {
                creator.select_voice(voice.id);
            }
            render(flow);
            Ok(())
        }
        "name" | "desc" | "gender" => {
            let gender = if command == "gender" {
                Some(arg.parse::<Gender>()?)
            } else {
                None
            };
            let Some(creator) = flow.creator_mut() else {
                return Err(ParleyError::internal("Creation form is not open"));
            };
            match (command, gender) {
                ("name", _) => creator.set_name(arg),
                ("desc", _) => creator.set_description(arg),
                (_, Some(gender)) => creator.set_gender(gender),
                _ => {}
            }
            render(flow);
            Ok(())
        }
        _ => Err(ParleyError::validation(format!(
            "Unknown command '{}'",
            command
        ))),
    }
}

fn pick_voice(flow: &SelectionFlow, arg: &str) -> ParleyResult<Voice> {
    let Some(creator) = flow.creator() else {
        return Err(ParleyError::internal("Creation form is not open"));
    };
    let voices = creator.voice_picker().voices();
    parse_index(arg, voices.len())
        .map(|index| voices[index].clone())
        .ok_or_else(|| ParleyError::validation(format!("No voice numbered '{}'", arg)))
}

fn render(flow: &SelectionFlow) {
    println!();
    match flow.screen() {
        Screen::Personas => {
            println!("{}", "Personas".bright_magenta().bold());
            render_listing(&flow.persona_list().render(), |p| {
                format!("{} ({}) {}", p.name, p.gender, p.description.bright_black())
            });
            println!("{}", "Number to select, 'new' to create.".bright_black());
        }
        Screen::Scenarios => {
            if let Some(persona) = flow.selected_persona() {
                println!(
                    "{}",
                    format!("Scenarios for {}", persona.name).bright_magenta().bold()
                );
            }
            if let Some(view) = flow.scenario_list() {
                render_listing(&view.render(), |s| match &s.description {
                    Some(description) => format!("{} {}", s.name, description.bright_black()),
                    None => s.name.clone(),
                });
            }
            println!("{}", "Number to start chatting, 'back' for personas.".bright_black());
        }
        Screen::Creating => render_form(flow),
        Screen::Finished => {}
    }
}

fn render_listing<T>(listing: &Listing<T>, line: impl Fn(&T) -> String) {
    match listing {
        Listing::Loading => println!("{}", "Loading...".bright_black()),
        Listing::Error(message) => println!("{}", message.red()),
        Listing::Empty(message) => println!("{}", message.yellow()),
        Listing::Items(items) => {
            for (i, item) in items.iter().enumerate() {
                println!("  {} {}", format!("{:>2}.", i + 1).bright_cyan(), line(item));
            }
        }
    }
}

fn render_form(flow: &SelectionFlow) {
    let Some(creator) = flow.creator() else {
        return;
    };
    let form = creator.form();
    let picker = creator.voice_picker();
    let unset = "(not set)".bright_black().to_string();

    println!("{}", "New persona".bright_magenta().bold());
    println!(
        "  name:        {}",
        if form.name.is_empty() { unset.clone() } else { form.name.clone() }
    );
    println!(
        "  description: {}",
        form.description.clone().unwrap_or_else(|| unset.clone())
    );
    println!("  gender:      {}", form.gender);
    let voice = form
        .voice_id
        .as_deref()
        .and_then(|id| picker.resolve(id).ok())
        .map(|voice| voice.name)
        .unwrap_or_else(|| unset.clone());
    println!("  voice:       {}", voice);

    println!("{}", "Voices".bright_magenta());
    if picker.is_loading() {
        println!("{}", "Loading...".bright_black());
    } else if let Some(error) = picker.error() {
        println!("{}", error.red());
    } else {
        for (i, voice) in picker.voices().iter().enumerate() {
            println!("  {} {}", format!("{:>2}.", i + 1).bright_cyan(), voice.name);
        }
    }

    if let Some(error) = creator.last_error() {
        println!("{}", error.red());
    }
    let hint = if creator.can_submit() {
        "Ready: 'submit' to create, 'back' to cancel."
    } else {
        "Set name, desc, gender, voice <n> (preview <n> to listen), then 'submit'."
    };
    println!("{}", hint.bright_black());
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use parley_application::RealtimeEngine;
    use parley_core::config::ChatConfig;
    use parley_core::persona::Persona;
    use parley_core::session::{ChatDestination, SessionAssembler, SessionConfiguration};
    use std::sync::Mutex;

    #[test]
    fn test_parse_index_is_one_based_and_bounded() {
        assert_eq!(parse_index("1", 3), Some(0));
        assert_eq!(parse_index("3", 3), Some(2));
        assert_eq!(parse_index("0", 3), None);
        assert_eq!(parse_index("4", 3), None);
        assert_eq!(parse_index("new", 3), None);
    }

    #[derive(Default)]
    struct RecordingEngine {
        opened: Mutex<usize>,
    }

    #[async_trait]
    impl RealtimeEngine for RecordingEngine {
        async fn open(&self, _config: &SessionConfiguration, _persona: &Persona) -> ParleyResult<()> {
            *self.opened.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn handoff() -> FlowHandoff {
        let persona = Persona {
            id: "p1".into(),
            name: "Ava".into(),
            description: String::new(),
            gender: Gender::Female,
            voice_id: "v1".into(),
        };
        FlowHandoff {
            destination: ChatDestination {
                persona_id: "p1".into(),
                scenario_id: "s1".into(),
                voice_id: Some("v1".into()),
            },
            persona,
        }
    }

    fn host(engine: Arc<RecordingEngine>) -> ChatSessionHost {
        ChatSessionHost::new(SessionAssembler::default(), &ChatConfig::default(), engine)
    }

    #[tokio::test]
    async fn test_expired_token_at_chat_entry_is_reported_not_raised() {
        let engine = Arc::new(RecordingEngine::default());
        let expired = UsageToken::new("tok", Utc::now() - Duration::seconds(1));

        assert!(!start_chat(&host(engine.clone()), &handoff(), &expired).await);
        assert_eq!(*engine.opened.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_valid_token_opens_chat() {
        let engine = Arc::new(RecordingEngine::default());
        let token = UsageToken::new("tok", Utc::now() + Duration::minutes(5));

        assert!(start_chat(&host(engine.clone()), &handoff(), &token).await);
        assert_eq!(*engine.opened.lock().unwrap(), 1);
    }

    #[test]
    fn test_commands_follow_screen() {
        assert!(commands_for(Screen::Creating).contains(&"submit"));
        assert!(!commands_for(Screen::Personas).contains(&"back"));
    }
}
