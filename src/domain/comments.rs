// Removal of commented-out debug prints.
// Works on comment text only: a comment that mentions a rule anywhere is
// dropped, whether it holds disabled code or prose.

use crate::domain::rules::RuleSet;
use crate::domain::syntax::CommentGroup;

/// Filter one group. Returns `None` when no comment survives, so that callers
/// never keep an empty group around.
pub fn scrub_group(group: &CommentGroup, rules: &RuleSet) -> Option<CommentGroup> {
    let kept: Vec<_> = group
        .comments
        .iter()
        .filter(|comment| !rules.mentioned_in(&comment.text))
        .cloned()
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(CommentGroup::new(kept))
    }
}

/// Filter a file's comment groups, preserving order.
pub fn filter_comments(groups: &[CommentGroup], rules: &RuleSet) -> Vec<CommentGroup> {
    groups
        .iter()
        .filter_map(|group| scrub_group(group, rules))
        .collect()
}

/// Number of individual comments across all groups.
pub fn comment_count(groups: &[CommentGroup]) -> usize {
    groups.iter().map(|group| group.comments.len()).sum()
}
