//! Team CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use roster_types::team::{Team, TeamMember};
use roster_types::user::UserId;

use crate::cli::print_json;
use crate::state::AppState;

/// Team subcommands.
#[derive(Subcommand)]
pub enum TeamCommand {
    /// Create a team and upsert its members.
    Create {
        /// Team name.
        name: String,

        /// Member as `id:username`, or `id:username:inactive`. Repeatable.
        #[arg(short, long = "member", value_parser = parse_member)]
        members: Vec<TeamMember>,
    },

    /// Show a team and its members.
    Show {
        /// Team name.
        name: String,
    },
}

/// Handle a team subcommand.
pub async fn handle_team_command(cmd: TeamCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        TeamCommand::Create { name, members } => create_team(state, name, members, json).await,
        TeamCommand::Show { name } => show_team(state, &name, json).await,
    }
}

/// Parse `id:username[:inactive]`. A member is active unless marked otherwise.
pub fn parse_member(raw: &str) -> Result<TeamMember, String> {
    let mut parts = raw.splitn(3, ':');
    let id = parts.next().unwrap_or_default().trim();
    let username = parts
        .next()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| format!("expected id:username[:inactive], got '{raw}'"))?;
    if id.is_empty() {
        return Err(format!("missing user id in '{raw}'"));
    }

    let is_active = match parts.next().map(str::trim) {
        None | Some("active") => true,
        Some("inactive") => false,
        Some(other) => return Err(format!("unknown member flag '{other}' (use 'inactive')")),
    };

    Ok(TeamMember {
        user_id: UserId::from(id),
        username: username.to_string(),
        is_active,
    })
}

async fn create_team(
    state: &AppState,
    name: String,
    members: Vec<TeamMember>,
    json: bool,
) -> Result<()> {
    let team = state.team_service.create_team(Team { name, members }).await?;

    if json {
        return print_json(&serde_json::json!({ "team": team }));
    }

    println!();
    println!(
        "  {} Created team '{}' with {} member(s)",
        style("ok").green(),
        style(&team.name).cyan(),
        team.members.len(),
    );
    println!();
    Ok(())
}

async fn show_team(state: &AppState, name: &str, json: bool) -> Result<()> {
    let team = state.team_service.get_team(name).await?;

    if json {
        return print_json(&team);
    }

    println!();
    println!(
        "  Team '{}' ({} members)",
        style(&team.name).cyan().bold(),
        team.members.len(),
    );
    println!();

    if team.members.is_empty() {
        println!("  {} No members.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("User ID").fg(Color::White),
        Cell::new("Username").fg(Color::White),
        Cell::new("Active").fg(Color::White),
    ]);

    for member in &team.members {
        let (active, color) = if member.is_active {
            ("yes", Color::Green)
        } else {
            ("no", Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(member.user_id.as_str()).fg(Color::Cyan),
            Cell::new(&member.username),
            Cell::new(active).fg(color),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_defaults_to_active() {
        let member = parse_member("u1:alice").unwrap();
        assert_eq!(member.user_id, UserId::from("u1"));
        assert_eq!(member.username, "alice");
        assert!(member.is_active);
    }

    #[test]
    fn test_parse_member_inactive_flag() {
        assert!(!parse_member("u2:bob:inactive").unwrap().is_active);
        assert!(parse_member("u2:bob:active").unwrap().is_active);
    }

    #[test]
    fn test_parse_member_rejects_malformed() {
        assert!(parse_member("u1").is_err());
        assert!(parse_member(":alice").is_err());
        assert!(parse_member("u1:").is_err());
        assert!(parse_member("u1:alice:maybe").is_err());
    }
}
