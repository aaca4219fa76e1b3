//! In-memory store implementing every repository trait.
//!
//! Used when no `DATABASE_URL` is configured in development, and by the tests.
//! It mirrors the relational constraints the handlers depend on:
//! - `group_id` must reference an existing group (`RepoError::ForeignKey`)
//! - deleting a post deletes its comments
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repos::comment_repo::{CommentRepo, CommentRow, NewComment};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::group_repo::{GroupRepo, GroupRow};
use crate::repos::post_repo::{NewPost, PostChanges, PostRepo, PostRow};
use crate::repos::user_repo::{UserRepo, UserRow};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserRow>,
    groups: BTreeMap<i64, GroupRow>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    seq: Sequences,
}

// Per-table id sequences, starting at 1 like bigserial.
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    groups: i64,
    posts: i64,
    comments: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn username(&self, user_id: i64) -> RepoResult<String> {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .ok_or(RepoError::ForeignKey)
    }

    fn check_group(&self, group_id: Option<i64>) -> RepoResult<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(RepoError::ForeignKey),
            _ => Ok(()),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, username: &str, password_hash: &str) -> UserRow {
        let mut t = self.tables.write().await;
        let id = next(&mut t.seq.users);
        let row = UserRow {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        t.users.insert(id, row.clone());
        row
    }

    pub async fn insert_group(&self, title: &str, slug: &str, description: &str) -> GroupRow {
        let mut t = self.tables.write().await;
        let id = next(&mut t.seq.groups);
        let row = GroupRow {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
        };
        t.groups.insert(id, row.clone());
        row
    }

    /// Attach an uploaded image path to a post. Images are never written through the API.
    pub async fn set_post_image(&self, post_id: i64, path: Option<&str>) -> bool {
        let mut t = self.tables.write().await;
        match t.posts.get_mut(&post_id) {
            Some(post) => {
                post.image = path.map(str::to_string);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn list(&self) -> RepoResult<Vec<PostRow>> {
        let t = self.tables.read().await;
        Ok(t.posts.values().cloned().collect())
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let t = self.tables.read().await;
        Ok(t.posts.get(&post_id).cloned())
    }

    async fn create(&self, new: NewPost) -> RepoResult<PostRow> {
        let mut t = self.tables.write().await;
        t.check_group(new.group_id)?;
        let author = t.username(new.author_id)?;

        let id = next(&mut t.seq.posts);
        let row = PostRow {
            id,
            text: new.text,
            pub_date: Utc::now(),
            author_id: new.author_id,
            author,
            image: None,
            group_id: new.group_id,
        };
        t.posts.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, post_id: i64, changes: PostChanges) -> RepoResult<Option<PostRow>> {
        let mut t = self.tables.write().await;
        if let Some(group_id) = changes.group_id {
            t.check_group(group_id)?;
        }

        let Some(post) = t.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        if let Some(text) = changes.text {
            post.text = text;
        }
        if let Some(group_id) = changes.group_id {
            post.group_id = group_id;
        }
        Ok(Some(post.clone()))
    }

    async fn delete(&self, post_id: i64) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if t.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        t.comments.retain(|_, c| c.post_id != post_id);
        Ok(true)
    }
}

#[async_trait]
impl GroupRepo for MemoryStore {
    async fn list(&self) -> RepoResult<Vec<GroupRow>> {
        let t = self.tables.read().await;
        Ok(t.groups.values().cloned().collect())
    }

    async fn get(&self, group_id: i64) -> RepoResult<Option<GroupRow>> {
        let t = self.tables.read().await;
        Ok(t.groups.get(&group_id).cloned())
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn list_by_post(&self, post_id: i64) -> RepoResult<Vec<CommentRow>> {
        let t = self.tables.read().await;
        Ok(t.comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn get(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>> {
        let t = self.tables.read().await;
        Ok(t.comments
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }

    async fn create(&self, new: NewComment) -> RepoResult<CommentRow> {
        let mut t = self.tables.write().await;
        if !t.posts.contains_key(&new.post_id) {
            return Err(RepoError::ForeignKey);
        }
        let author = t.username(new.author_id)?;

        let id = next(&mut t.seq.comments);
        let row = CommentRow {
            id,
            post_id: new.post_id,
            author_id: new.author_id,
            author,
            text: new.text,
            created: Utc::now(),
        };
        t.comments.insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        text: Option<String>,
    ) -> RepoResult<Option<CommentRow>> {
        let mut t = self.tables.write().await;
        let Some(comment) = t
            .comments
            .get_mut(&comment_id)
            .filter(|c| c.post_id == post_id)
        else {
            return Ok(None);
        };
        if let Some(text) = text {
            comment.text = text;
        }
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, post_id: i64, comment_id: i64) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        let scoped = t
            .comments
            .get(&comment_id)
            .is_some_and(|c| c.post_id == post_id);
        if scoped {
            t.comments.remove(&comment_id);
        }
        Ok(scoped)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn get(&self, user_id: i64) -> RepoResult<Option<UserRow>> {
        let t = self.tables.read().await;
        Ok(t.users.get(&user_id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_post() -> (MemoryStore, UserRow, PostRow) {
        let store = MemoryStore::new();
        let user = store.insert_user("alice", "!").await;
        let post = PostRepo::create(
            &store,
            NewPost {
                text: "hello".to_string(),
                author_id: user.id,
                group_id: None,
            },
        )
        .await
        .unwrap();
        (store, user, post)
    }

    #[tokio::test]
    async fn post_create_resolves_author_name_and_assigns_ids() {
        let (store, user, post) = store_with_post().await;
        assert_eq!(post.id, 1);
        assert_eq!(post.author, "alice");
        assert_eq!(post.author_id, user.id);

        let second = PostRepo::create(
            &store,
            NewPost {
                text: "again".to_string(),
                author_id: user.id,
                group_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn post_with_unknown_group_is_a_foreign_key_error() {
        let (store, user, post) = store_with_post().await;

        let err = PostRepo::create(
            &store,
            NewPost {
                text: "x".to_string(),
                author_id: user.id,
                group_id: Some(42),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey));

        let err = PostRepo::update(
            &store,
            post.id,
            PostChanges {
                text: None,
                group_id: Some(Some(42)),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey));
    }

    #[tokio::test]
    async fn update_applies_tri_state_group() {
        let (store, _, post) = store_with_post().await;
        let group = store.insert_group("Cats", "cats", "About cats").await;

        let updated = PostRepo::update(
            &store,
            post.id,
            PostChanges {
                text: None,
                group_id: Some(Some(group.id)),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.group_id, Some(group.id));
        assert_eq!(updated.text, "hello");

        let kept = PostRepo::update(&store, post.id, PostChanges::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.group_id, Some(group.id));

        let cleared = PostRepo::update(
            &store,
            post.id,
            PostChanges {
                text: Some("bye".to_string()),
                group_id: Some(None),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(cleared.group_id, None);
        assert_eq!(cleared.text, "bye");
        assert_eq!(cleared.pub_date, post.pub_date);
    }

    #[tokio::test]
    async fn comments_are_scoped_by_post_and_cascade_on_post_delete() {
        let (store, user, post) = store_with_post().await;
        let comment = CommentRepo::create(
            &store,
            NewComment {
                post_id: post.id,
                author_id: user.id,
                text: "first".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(CommentRepo::get(&store, post.id + 1, comment.id)
            .await
            .unwrap()
            .is_none());
        assert!(!CommentRepo::delete(&store, post.id + 1, comment.id)
            .await
            .unwrap());
        assert!(CommentRepo::update(&store, post.id + 1, comment.id, None)
            .await
            .unwrap()
            .is_none());

        assert!(PostRepo::delete(&store, post.id).await.unwrap());
        assert!(CommentRepo::get(&store, post.id, comment.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_a_foreign_key_error() {
        let store = MemoryStore::new();
        let user = store.insert_user("bob", "!").await;
        let err = CommentRepo::create(
            &store,
            NewComment {
                post_id: 9,
                author_id: user.id,
                text: "orphan".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey));
    }

    #[tokio::test]
    async fn set_post_image_only_touches_existing_posts() {
        let (store, _, post) = store_with_post().await;
        assert!(store.set_post_image(post.id, Some("posts/cat.jpg")).await);
        assert!(!store.set_post_image(post.id + 1, Some("posts/dog.jpg")).await);

        let stored = PostRepo::get(&store, post.id).await.unwrap().unwrap();
        assert_eq!(stored.image.as_deref(), Some("posts/cat.jpg"));
    }
}
