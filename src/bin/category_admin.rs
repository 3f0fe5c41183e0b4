use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::admin::{
    CategoryDashboard, DeleteOutcome, HttpCategoryClient, SubmitOutcome,
};

/// Terminal front end for managing categories against a running storefront API.
#[derive(Debug, Parser)]
#[command(name = "category-admin", version)]
struct Args {
    /// Base URL of the storefront API.
    #[arg(long, env = "ADMIN_API_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Toggle,
    Edit(String),
    Name(String),
    Submit,
    Delete(String),
    Refresh,
    Help,
    Quit,
}

const HELP: &str = "commands: add | hide | edit <id> | name <text> | submit | delete <id> | refresh | help | quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let needs_arg = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("{word} needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };
    match word {
        "add" | "hide" | "toggle" => Ok(Command::Toggle),
        "edit" => needs_arg("an id").map(Command::Edit),
        // An empty name is allowed here so that submit can reject it.
        "name" => Ok(Command::Name(rest.to_string())),
        "submit" => Ok(Command::Submit),
        "delete" => needs_arg("an id").map(Command::Delete),
        "refresh" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(HELP.to_string()),
        other => Err(format!("unknown command {other}; {HELP}")),
    }
}

fn prompt(label: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,storefront_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let client = HttpCategoryClient::new(&args.base_url)?;
    let mut dashboard = CategoryDashboard::mount(client).await;

    loop {
        println!("\n{}", dashboard.render());
        let Some(line) = prompt("> ")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Toggle => dashboard.toggle_form(),
            Command::Edit(id) => {
                if !dashboard.begin_edit(&id) {
                    println!("no category {id} in the list");
                }
            }
            Command::Name(name) => dashboard.set_name(name),
            Command::Submit => match dashboard.submit().await {
                SubmitOutcome::Created(record) => println!("added {}", record.name),
                SubmitOutcome::Updated(record) => println!("updated {}", record.name),
                SubmitOutcome::FormClosed => println!("open the form first"),
                SubmitOutcome::Blocked | SubmitOutcome::Failed => {}
            },
            Command::Delete(id) => {
                let mut confirm = |question: &str| {
                    matches!(
                        prompt(&format!("{question} [y/N] ")),
                        Ok(Some(answer)) if answer.trim().eq_ignore_ascii_case("y")
                    )
                };
                match dashboard.delete(&id, &mut confirm).await {
                    DeleteOutcome::Deleted => println!("deleted {id}"),
                    DeleteOutcome::FormOpen => println!("close the form first"),
                    DeleteOutcome::Declined | DeleteOutcome::Failed => {}
                }
            }
            Command::Refresh => {
                dashboard.refresh().await;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("edit 1\n"), Ok(Command::Edit("1".into())));
        assert_eq!(
            parse_command("name  Home & Garden "),
            Ok(Command::Name("Home & Garden".into()))
        );
        assert_eq!(parse_command("delete 2"), Ok(Command::Delete("2".into())));
        assert_eq!(parse_command("add"), Ok(Command::Toggle));
    }

    #[test]
    fn blank_name_is_passed_through() {
        assert_eq!(parse_command("name"), Ok(Command::Name(String::new())));
    }

    #[test]
    fn rejects_missing_ids_and_unknown_words() {
        assert!(parse_command("edit").is_err());
        assert!(parse_command("delete   ").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
