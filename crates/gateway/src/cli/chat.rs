//! `chatwidget chat`: interactive REPL command.
//!
//! Runs one widget session in the terminal against the configured topic
//! table and delivery backend, so the whole intake flow can be tried
//! without a browser. Supports a few slash-commands for inspecting state.

use std::sync::Arc;
use std::time::Duration;

use cw_domain::chat::{SessionId, Step};
use cw_domain::config::Config;
use cw_intake::WidgetController;

use crate::bootstrap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn chat(config: Arc<Config>) -> anyhow::Result<()> {
    // 1. Boot the shared state (topic table + delivery).
    let state = bootstrap::build_app_state(config.clone())?;
    let reply_delay = Duration::from_millis(config.widget.reply_delay_ms);

    // 2. Open the session.
    let user_agent = format!("chatwidget-cli/{}", env!("CARGO_PKG_VERSION"));
    let mut ctl = WidgetController::new(
        SessionId::new(),
        user_agent,
        state.topics.clone(),
        state.dispatcher.clone(),
    );

    // 3. Initialize rustyline editor with persistent history.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".chatwidget")
        .join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // 4. Banner on stderr, conversation on stdout.
    eprintln!("chatwidget interactive chat");
    eprintln!("Session: {}  |  Type /help for commands, Ctrl+D to exit", ctl.session_id());
    eprintln!();
    for message in ctl.messages() {
        println!("bot> {}", message.text);
    }

    // 5. REPL loop.
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // ── Slash commands ────────────────────────────────
                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &ctl) {
                        break;
                    }
                    continue;
                }

                // ── Visitor message → reply ──────────────────────
                let Some(turn) = ctl.submit(trimmed) else {
                    continue;
                };
                if !reply_delay.is_zero() {
                    tokio::time::sleep(reply_delay).await;
                }
                println!("bot> {}", turn.reply.text);

                if turn.completed_intake {
                    print_suggestions(&ctl);
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    // 6. Save history.
    rl.save_history(&history_path).ok();

    // 7. Let pending deliveries finish (each is bounded by the delivery timeout).
    state.dispatcher.flush().await;

    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command. Returns `true` if the REPL should exit.
fn handle_slash_command(input: &str, ctl: &WidgetController) -> bool {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/exit" | "/quit" => return true,

        "/state" => {
            let p = ctl.profile();
            eprintln!("Step:     {}", ctl.step());
            eprintln!("Name:     {}", or_dash(p.name()));
            eprintln!("Email:    {}", or_dash(p.email()));
            eprintln!("Phone:    {}", or_dash(p.phone()));
            eprintln!("Messages: {}", ctl.messages().len());
        }

        "/topics" => {
            if ctl.step() == Step::Freeform {
                print_suggestions(ctl);
            } else {
                eprintln!("Topics are available once your details are collected.");
            }
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /state           Show the intake step and collected details");
            eprintln!("  /topics          List suggested questions");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}

fn print_suggestions(ctl: &WidgetController) {
    let suggestions = ctl.suggestions();
    if suggestions.is_empty() {
        return;
    }
    eprintln!("Suggested questions:");
    for q in suggestions {
        eprintln!("  - {q}");
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
