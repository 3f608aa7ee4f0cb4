//! Smart-assign planner
//!
//! Picks the next assignee by current workload: the user with the fewest
//! assigned tasks that are not yet Done wins, ties broken by user id so the
//! result is deterministic for any given snapshot. The chosen user is then
//! folded into an ordinary compare-and-set, so two concurrent smart-assigns
//! on the same task collide on the version check rather than racing.

use crate::error::BoardError;
use crate::models::{Task, TaskStatus, User};

/// Number of open (not Done) tasks currently assigned to `user`.
fn active_load(user: &User, tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Done)
        .filter(|task| {
            task.assigned_user
                .as_ref()
                .is_some_and(|assignee| assignee.id == user.id)
        })
        .count()
}

/// Choose the least-loaded user, or fail when the directory is empty.
pub fn choose_assignee(users: &[User], tasks: &[Task]) -> Result<User, BoardError> {
    users
        .iter()
        .map(|user| (active_load(user, tasks), user))
        .min_by(|(load_a, user_a), (load_b, user_b)| {
            load_a.cmp(load_b).then_with(|| user_a.id.cmp(&user_b.id))
        })
        .map(|(_, user)| user.clone())
        .ok_or(BoardError::NoAssigneeAvailable)
}
