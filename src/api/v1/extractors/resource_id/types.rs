/**
 * Responsibility
 *  - one tag type + alias per resource, naming its path parameter
 *
 * Everything `pub` here is re-exported through ./mod.rs (pub use types::*).
 */
use super::core::{PathParam, ResourceId};

// posts
pub enum PostTag {}
impl PathParam for PostTag {
    const NAME: &'static str = "post_id";
}
pub type PostId = ResourceId<PostTag>;

// groups
pub enum GroupTag {}
impl PathParam for GroupTag {
    const NAME: &'static str = "group_id";
}
pub type GroupId = ResourceId<GroupTag>;

// comments (always nested under a post)
pub enum CommentTag {}
impl PathParam for CommentTag {
    const NAME: &'static str = "comment_id";
}
pub type CommentId = ResourceId<CommentTag>;
