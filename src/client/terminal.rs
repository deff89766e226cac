use std::io::BufRead;
use std::sync::Arc;

use anyhow::Result;
use log::error;
use tokio::sync::mpsc::Receiver;

use super::api::RestPhonebookApi;
use super::{PhonebookApp, Severity, SubmitOutcome};

/// A small interactive front end for the phonebook, driving the client
/// state machine from stdin.
pub async fn run_terminal_client(api_base_url: &str) -> Result<()> {
    let api = Arc::new(RestPhonebookApi::new(api_base_url));
    let mut app = PhonebookApp::new(api);
    if let Err(e) = app.refresh().await {
        error!("Could not load the phonebook: {e}");
    }

    // We need to use blocking stdin, because tokio's async stdin isn't meant
    // for interactive use-cases and will block forever on finishing the program
    let (stdin_tx, mut stdin_rx) = tokio::sync::mpsc::channel(100);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        if let Err(e) = stdin_tx.blocking_send(line) {
                            error!("Error handling stdin: {e}");
                        }
                    }
                }
                Err(e) => {
                    error!("Error reading line from stdin: {e}");
                }
            }
        }
    });

    print_help();
    while let Some(line) = stdin_rx.recv().await {
        if handle_input_line(&mut app, &mut stdin_rx, line).await? {
            break;
        }
    }
    Ok(())
}

fn print_help() {
    println!("Commands: LIST | FILTER [name] | ADD <name> <number> | DELETE <name> | EXIT");
}

/// Handles one command line. Returns true when the client should exit.
async fn handle_input_line(
    app: &mut PhonebookApp,
    stdin_rx: &mut Receiver<String>,
    line: String,
) -> Result<bool> {
    let mut args = line.split(' ');
    match args.next() {
        Some("LIST") => {
            print_persons(app);
        }
        Some("FILTER") => {
            app.filter = args.next().unwrap_or_default().to_string();
            print_persons(app);
        }
        Some("ADD") => {
            let name = match args.next() {
                Some(name) => String::from(name),
                None => {
                    error!("Expected name.");
                    return Ok(false);
                }
            };
            let number = match args.next() {
                Some(number) => String::from(number),
                None => {
                    error!("Expected number.");
                    return Ok(false);
                }
            };
            app.new_name = name;
            app.new_number = number;

            if let SubmitOutcome::ConfirmOverwrite(prompt) = app.submit().await? {
                if ask_confirmation(stdin_rx, &prompt).await {
                    app.confirm_overwrite().await?;
                } else {
                    app.cancel_submission();
                }
            }
            print_notice(app);
        }
        Some("DELETE") => {
            let name = match args.next() {
                Some(name) => String::from(name),
                None => {
                    error!("Expected name.");
                    return Ok(false);
                }
            };
            let id = match app.persons().iter().find(|p| p.name == name) {
                Some(person) => person.id.to_owned(),
                None => {
                    error!("No person named {name}.");
                    return Ok(false);
                }
            };
            if let Some(prompt) = app.delete_prompt(&id) {
                if ask_confirmation(stdin_rx, &prompt).await {
                    app.confirm_delete(&id).await?;
                }
            }
        }
        Some("EXIT") => return Ok(true),
        _ => print_help(),
    }
    Ok(false)
}

async fn ask_confirmation(stdin_rx: &mut Receiver<String>, prompt: &str) -> bool {
    println!("{prompt} [y/n]");
    match stdin_rx.recv().await {
        Some(answer) => answer.eq_ignore_ascii_case("y"),
        None => false,
    }
}

fn print_persons(app: &PhonebookApp) {
    for person in app.visible_persons() {
        println!("{} {}", person.name, person.number);
    }
}

fn print_notice(app: &PhonebookApp) {
    if let Some(notice) = app.notice() {
        match notice.severity {
            Severity::Success => println!("{}", notice.message),
            Severity::Error => eprintln!("{}", notice.message),
        }
    }
}
