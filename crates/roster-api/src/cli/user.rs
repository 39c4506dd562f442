//! User CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use roster_types::pull_request::PullRequestStatus;
use roster_types::user::UserId;

use crate::cli::print_json;
use crate::state::AppState;

/// User subcommands.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Mark a user active or inactive for future reviewer selection.
    SetActive {
        /// User id.
        id: String,

        /// `true` or `false`.
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },

    /// List pull requests the user is currently reviewing.
    Reviews {
        /// User id.
        id: String,
    },
}

/// Handle a user subcommand.
pub async fn handle_user_command(cmd: UserCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        UserCommand::SetActive { id, active } => {
            set_active(state, UserId::new(id), active, json).await
        }
        UserCommand::Reviews { id } => list_reviews(state, UserId::new(id), json).await,
    }
}

async fn set_active(state: &AppState, id: UserId, active: bool, json: bool) -> Result<()> {
    let user = state.user_service.set_user_active(&id, active).await?;

    if json {
        return print_json(&serde_json::json!({ "user": user }));
    }

    let label = if user.is_active {
        style("active").green()
    } else {
        style("inactive").yellow()
    };
    println!();
    println!(
        "  {} '{}' ({}) is now {}",
        style("ok").green(),
        style(&user.username).cyan(),
        user.team_name,
        label,
    );
    println!();
    Ok(())
}

async fn list_reviews(state: &AppState, id: UserId, json: bool) -> Result<()> {
    let reviews = state.user_service.get_user_reviews(&id).await?;

    if json {
        return print_json(&serde_json::json!({
            "user_id": id,
            "pull_requests": reviews,
        }));
    }

    println!();
    if reviews.is_empty() {
        println!(
            "  {} '{}' has no review assignments.",
            style("i").blue().bold(),
            style(&id).cyan(),
        );
        println!();
        return Ok(());
    }

    println!(
        "  Reviews for '{}' ({} pull requests)",
        style(&id).cyan().bold(),
        reviews.len(),
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("PR").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for pr in &reviews {
        let status_color = match pr.status {
            PullRequestStatus::Open => Color::Green,
            PullRequestStatus::Merged => Color::Magenta,
        };
        table.add_row(vec![
            Cell::new(pr.id.as_str()).fg(Color::Cyan),
            Cell::new(&pr.name),
            Cell::new(pr.author_id.as_str()),
            Cell::new(pr.status.to_string()).fg(status_color),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}
