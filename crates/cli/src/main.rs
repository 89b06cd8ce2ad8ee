//! Demobank CLI - Main entry point
//!
//! Terminal stand-in for the original dashboard page: reads line commands
//! from stdin while concurrently rendering the controller's event stream.

use clap::Parser;
use demobank_directory::demo_directory;
use demobank_session::{
    AccountView, EndReason, SessionController, SessionEvent, SESSION_SECONDS,
};
use rust_decimal::Decimal;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "demobank")]
#[command(about = "Demobank - Banking dashboard demo", long_about = None)]
struct Cli {
    /// Session timeout in seconds
    #[arg(long, default_value_t = SESSION_SECONDS)]
    timeout: u64,
}

fn render_refresh(view: &AccountView) {
    println!();
    println!("Welcome back, {}", view.first_name());
    println!("─────────────────────────────────────────────");

    // Most recent entry first, like the original history panel.
    for (i, line) in view.movements.iter().enumerate().rev() {
        println!(
            "{:>3} {:<10} {:<12} {:>12}{}",
            i + 1,
            line.kind,
            line.date_label,
            line.amount.round_dp(2),
            view.currency.symbol()
        );
    }

    let symbol = view.currency.symbol();
    println!("─────────────────────────────────────────────");
    println!(
        "Balance: {}{}   In: {}{}   Out: {}{}   Interest: {}{}",
        view.summary.balance.round_dp(2),
        symbol,
        view.summary.incomes.round_dp(2),
        symbol,
        view.summary.outgoing.round_dp(2),
        symbol,
        view.summary.interest.round_dp(2),
        symbol,
    );
}

fn render_tick(remaining: u64) {
    print!("\r⏳ {:02}:{:02} ", remaining / 60, remaining % 60);
    let _ = std::io::stdout().flush();
}

fn render_end(reason: EndReason) {
    println!();
    match reason {
        EndReason::Expired => println!("Session expired. Log in to get started"),
        EndReason::LoggedOut => println!("Logged out. Log in to get started"),
        EndReason::Closed => println!("Account closed. Goodbye"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login <username> <pin>     open a session (demo: js 1111, jd 2222)");
    println!("  transfer <username> <amt>  send money to another account");
    println!("  loan <amount>              request a loan (disbursed after a short delay)");
    println!("  close <username> <pin>     close the logged-in account");
    println!("  sort                       toggle history ordering");
    println!("  logout                     end the session");
    println!("  quit                       exit");
}

/// Dispatch one stdin line. Validation failures stay silent towards the
/// screen, exactly like the original UI; they are only visible at debug level.
async fn handle_line(controller: &SessionController, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(c) => c,
        None => return true,
    };
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("login", [username, pin]) => {
            if let Ok(pin) = pin.parse::<u32>() {
                if let Err(rejection) = controller.login(username, pin).await {
                    tracing::debug!(%rejection, "login rejected");
                }
            }
        }
        ("transfer", [to, amount]) => {
            if let Ok(amount) = amount.parse::<Decimal>() {
                if let Err(rejection) = controller.transfer(to, amount).await {
                    tracing::debug!(%rejection, "transfer rejected");
                }
            }
        }
        ("loan", [amount]) => {
            if let Ok(amount) = amount.parse::<Decimal>() {
                if let Err(rejection) = controller.request_loan(amount).await {
                    tracing::debug!(%rejection, "loan rejected");
                }
            }
        }
        ("close", [username, pin]) => {
            if let Ok(pin) = pin.parse::<u32>() {
                if let Err(rejection) = controller.close_account(username, pin).await {
                    tracing::debug!(%rejection, "close rejected");
                }
            }
        }
        ("sort", []) => controller.toggle_sort().await,
        ("logout", []) => {
            if let Err(rejection) = controller.logout().await {
                tracing::debug!(%rejection, "logout rejected");
            }
        }
        ("quit", []) | ("exit", []) => return false,
        ("help", []) => print_help(),
        _ => print_help(),
    }
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let (controller, mut events) = SessionController::with_timeout(demo_directory(), cli.timeout);

    println!("Demobank — log in to get started");
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(SessionEvent::Refresh(view)) => render_refresh(&view),
                    Some(SessionEvent::Tick { remaining }) => render_tick(remaining),
                    Some(SessionEvent::SessionEnded { reason }) => render_end(reason),
                    None => break,
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(&controller, &line).await {
                            break;
                        }
                    }
                    None => break, // stdin closed
                }
            }
        }
    }

    Ok(())
}
