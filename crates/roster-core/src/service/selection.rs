//! Pure reviewer-selection rules.
//!
//! The store narrows candidates by team and activity; these functions apply
//! the remaining exclusions again so the invariants hold no matter what the
//! store returned.

use roster_types::pull_request::{PullRequest, MAX_REVIEWERS};
use roster_types::user::{User, UserId};

use super::picker::ReviewerPicker;

/// Choose up to [`MAX_REVIEWERS`] reviewers for a new pull request.
///
/// Shuffles the eligible pool and takes the first entries. An empty pool
/// yields an empty reviewer list.
pub fn choose_reviewers<R: ReviewerPicker + ?Sized>(
    pool: Vec<User>,
    author_id: &UserId,
    picker: &R,
) -> Vec<UserId> {
    let mut eligible: Vec<User> = pool
        .into_iter()
        .filter(|u| u.is_active && &u.id != author_id)
        .collect();

    picker.shuffle(&mut eligible);

    let mut chosen: Vec<UserId> = Vec::with_capacity(MAX_REVIEWERS);
    for user in eligible {
        if chosen.len() == MAX_REVIEWERS {
            break;
        }
        if !chosen.contains(&user.id) {
            chosen.push(user.id);
        }
    }
    chosen
}

/// Users who may replace `old` on `pr`: active, not `old`, not the author,
/// and not already assigned.
pub fn replacement_candidates(pool: Vec<User>, pr: &PullRequest, old: &UserId) -> Vec<User> {
    pool.into_iter()
        .filter(|u| {
            u.is_active && &u.id != old && u.id != pr.author_id && !pr.has_reviewer(&u.id)
        })
        .collect()
}

/// Pick one replacement uniformly, or `None` if there are no candidates.
pub fn pick_replacement<R: ReviewerPicker + ?Sized>(
    mut candidates: Vec<User>,
    picker: &R,
) -> Option<User> {
    if candidates.is_empty() {
        return None;
    }
    let index = picker.pick(candidates.len()).min(candidates.len() - 1);
    Some(candidates.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roster_types::pull_request::PullRequestId;

    /// Reverses on shuffle and always picks the last index.
    struct ReversePicker;

    impl ReviewerPicker for ReversePicker {
        fn shuffle(&self, candidates: &mut [User]) {
            candidates.reverse();
        }

        fn pick(&self, len: usize) -> usize {
            len - 1
        }
    }

    fn user(id: &str, active: bool) -> User {
        User {
            id: UserId::from(id),
            username: id.to_uppercase(),
            team_name: "alpha".to_string(),
            is_active: active,
        }
    }

    fn pr_with(author: &str, reviewers: &[&str]) -> PullRequest {
        PullRequest::open(
            PullRequestId::from("pr1"),
            "feat".to_string(),
            UserId::from(author),
            reviewers.iter().map(|r| UserId::from(*r)).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_choose_takes_at_most_two() {
        let pool = vec![user("u2", true), user("u3", true), user("u4", true)];
        let chosen = choose_reviewers(pool, &UserId::from("u1"), &ReversePicker);
        assert_eq!(chosen, vec![UserId::from("u4"), UserId::from("u3")]);
    }

    #[test]
    fn test_choose_excludes_author_and_inactive() {
        let pool = vec![user("u1", true), user("u2", false), user("u3", true)];
        let chosen = choose_reviewers(pool, &UserId::from("u1"), &ReversePicker);
        assert_eq!(chosen, vec![UserId::from("u3")]);
    }

    #[test]
    fn test_choose_empty_pool() {
        let chosen = choose_reviewers(Vec::new(), &UserId::from("u1"), &ReversePicker);
        assert!(chosen.is_empty());
    }

    #[test]
    fn test_replacement_excludes_assigned_author_and_old() {
        let pr = pr_with("u1", &["u2", "u3"]);
        let pool = vec![
            user("u1", true),
            user("u2", true),
            user("u3", true),
            user("u4", true),
            user("u5", false),
        ];
        let candidates = replacement_candidates(pool, &pr, &UserId::from("u2"));
        let ids: Vec<&str> = candidates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u4"]);
    }

    #[test]
    fn test_pick_replacement() {
        let picked = pick_replacement(vec![user("u4", true), user("u5", true)], &ReversePicker);
        assert_eq!(picked.unwrap().id, UserId::from("u5"));
        assert!(pick_replacement(Vec::new(), &ReversePicker).is_none());
    }
}
