#![forbid(unsafe_code)]

//! `fitclub-ctl`: operator CLI for a running `fitclub` server.
//!
//! Sends requests to the HTTP API and prints the JSON responses. Exits with
//! status 1 when the server rejects a request or cannot be reached.

use clap::{Parser, Subcommand};
use reqwest::{Client, Response};

#[derive(Debug, Parser)]
#[command(
    name = "fitclub-ctl",
    about = "Operator CLI for the fitclub server",
    version,
    long_about = None
)]
struct Cli {
    /// Base URL of the server.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the server is up.
    Health,

    /// Book a personal training session for a member.
    Book {
        /// Member making the booking.
        #[arg(long)]
        member: i64,
        /// Requested trainer.
        #[arg(long)]
        trainer: i64,
        /// Session date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Start time, `HH:MM`.
        #[arg(long)]
        start: String,
        /// End time, `HH:MM`.
        #[arg(long)]
        end: String,
        /// Optional notes for the trainer.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a member's scheduled session.
    Cancel {
        /// Member owning the session.
        #[arg(long)]
        member: i64,
        /// Session to cancel.
        #[arg(long)]
        session: i64,
    },

    /// List every room.
    Rooms,

    /// List eligible rooms free for a slot.
    FreeRooms {
        /// Date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Start time.
        #[arg(long)]
        start: String,
        /// End time.
        #[arg(long)]
        end: String,
    },

    /// Show a trainer's upcoming schedule.
    Schedule {
        /// Trainer id.
        #[arg(long)]
        trainer: i64,
    },

    /// Add a weekly availability window for a trainer.
    Availability {
        /// Trainer id.
        #[arg(long)]
        trainer: i64,
        /// Day name, e.g. `Monday`.
        #[arg(long)]
        day: String,
        /// Window start.
        #[arg(long)]
        start: String,
        /// Window end.
        #[arg(long)]
        end: String,
    },
}

fn main() {
    let args = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(execute(&args)) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Failed to reach server: {err}");
            eprintln!("Is fitclub running at '{}'?", args.server);
            std::process::exit(1);
        }
    }
}

/// Send the request for `args.command` and print the outcome.
///
/// Returns the process exit code.
async fn execute(args: &Cli) -> Result<i32, reqwest::Error> {
    let client = Client::new();
    let base = args.server.trim_end_matches('/');

    let response = match &args.command {
        Command::Health => client.get(format!("{base}/health")).send().await?,
        Command::Book {
            member,
            trainer,
            date,
            start,
            end,
            notes,
        } => {
            let trainer = trainer.to_string();
            let mut form = vec![
                ("trainer_id", trainer.as_str()),
                ("session_date", date.as_str()),
                ("start_time", start.as_str()),
                ("end_time", end.as_str()),
            ];
            if let Some(notes) = notes {
                form.push(("notes", notes.as_str()));
            }
            client
                .post(format!("{base}/members/{member}/sessions"))
                .form(&form)
                .send()
                .await?
        }
        Command::Cancel { member, session } => {
            client
                .post(format!("{base}/members/{member}/sessions/{session}/cancel"))
                .send()
                .await?
        }
        Command::Rooms => client.get(format!("{base}/admin/rooms")).send().await?,
        Command::FreeRooms { date, start, end } => {
            client
                .get(format!("{base}/rooms/free"))
                .query(&[
                    ("session_date", date.as_str()),
                    ("start_time", start.as_str()),
                    ("end_time", end.as_str()),
                ])
                .send()
                .await?
        }
        Command::Schedule { trainer } => {
            client
                .get(format!("{base}/trainers/{trainer}/schedule"))
                .send()
                .await?
        }
        Command::Availability {
            trainer,
            day,
            start,
            end,
        } => {
            client
                .post(format!("{base}/trainers/{trainer}/availability"))
                .form(&[
                    ("day_of_week", day.as_str()),
                    ("start_time", start.as_str()),
                    ("end_time", end.as_str()),
                ])
                .send()
                .await?
        }
    };

    report(response).await
}

/// Print a response body; rejections go to stderr with exit code 1.
async fn report(response: Response) -> Result<i32, reqwest::Error> {
    let status = response.status();
    let body = response.text().await?;
    let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();

    if status.is_success() {
        match parsed {
            Some(json) => println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            ),
            None => println!("{body}"),
        }
        return Ok(0);
    }

    let kind = parsed
        .as_ref()
        .and_then(|json| json.get("error"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("error");
    let message = parsed
        .as_ref()
        .and_then(|json| json.get("message"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or(body.as_str());
    eprintln!("Error ({status}): {kind}: {message}");
    Ok(1)
}
