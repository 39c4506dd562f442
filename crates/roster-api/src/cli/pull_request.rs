//! Pull request CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use roster_types::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
use roster_types::user::UserId;

use crate::cli::print_json;
use crate::state::AppState;

/// Pull request subcommands.
#[derive(Subcommand)]
pub enum PrCommand {
    /// Open a pull request and assign reviewers from the author's team.
    Create {
        /// Pull request id.
        id: String,

        /// Pull request title.
        name: String,

        /// Author user id.
        #[arg(short, long)]
        author: String,
    },

    /// Merge a pull request. Merging twice is a no-op.
    Merge {
        /// Pull request id.
        id: String,
    },

    /// Replace a reviewer with another active member of their team.
    Reassign {
        /// Pull request id.
        id: String,

        /// Reviewer to replace.
        old: String,
    },
}

/// Handle a pull request subcommand.
pub async fn handle_pr_command(cmd: PrCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        PrCommand::Create { id, name, author } => {
            let pr = state
                .pr_service
                .create_pr(PullRequestId::new(id), name, UserId::new(author))
                .await?;
            if json {
                return print_json(&serde_json::json!({ "pr": pr }));
            }
            print_pull_request("Created", &pr);
            Ok(())
        }
        PrCommand::Merge { id } => {
            let pr = state.pr_service.merge_pr(&PullRequestId::new(id)).await?;
            if json {
                return print_json(&serde_json::json!({ "pr": pr }));
            }
            print_pull_request("Merged", &pr);
            Ok(())
        }
        PrCommand::Reassign { id, old } => {
            let result = state
                .pr_service
                .reassign_reviewer(&PullRequestId::new(id), &UserId::new(old.clone()))
                .await?;
            if json {
                return print_json(&serde_json::json!({
                    "pr": result.pull_request,
                    "replaced_by": result.replaced_by,
                }));
            }
            println!();
            println!(
                "  {} Replaced '{}' with '{}'",
                style("ok").green(),
                style(&old).yellow(),
                style(&result.replaced_by).cyan(),
            );
            print_pull_request("Updated", &result.pull_request);
            Ok(())
        }
    }
}

fn print_pull_request(verb: &str, pr: &PullRequest) {
    let status = match pr.status {
        PullRequestStatus::Open => style(pr.status.to_string()).green(),
        PullRequestStatus::Merged => style(pr.status.to_string()).magenta(),
    };

    println!();
    println!(
        "  {} {} '{}' ({})",
        style("ok").green(),
        verb,
        style(pr.id.as_str()).cyan().bold(),
        pr.name,
    );
    println!();
    println!("  {:<10} {}", style("Author").dim(), pr.author_id);
    println!("  {:<10} {}", style("Status").dim(), status);
    println!(
        "  {:<10} {}",
        style("Created").dim(),
        pr.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(merged_at) = pr.merged_at {
        println!(
            "  {:<10} {}",
            style("Merged").dim(),
            merged_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let reviewers = if pr.assigned_reviewers.is_empty() {
        style("none".to_string()).dim()
    } else {
        style(
            pr.assigned_reviewers
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    };
    println!("  {:<10} {}", style("Reviewers").dim(), reviewers);
    println!();
}
