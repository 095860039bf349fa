//! In-process store with the same constraint semantics as the Postgres
//! schema: unique usernames, owner-scoped writes, visible-category references
//! and cascade-null on category deletion.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    categories::{
        repo::CategoryRepo,
        repo_types::{CategoryFields, CategoryWithCount},
    },
    db::{CategoryId, NoteId, RepoError, RepoResult, UserId},
    notes::{
        repo::NoteRepo,
        repo_types::{NoteFields, NoteWithCategory},
    },
};

#[derive(Debug, Clone)]
struct CategoryRow {
    id: CategoryId,
    user_id: Option<UserId>,
    fields: CategoryFields,
}

#[derive(Debug, Clone)]
struct NoteRow {
    id: NoteId,
    user_id: UserId,
    category_id: Option<CategoryId>,
    title: String,
    content: String,
    created_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<CategoryRow>,
    notes: Vec<NoteRow>,
    last_id: i64,
}

impl Tables {
    // Ids start at 1 like an identity column.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn category_visible(&self, user_id: UserId, id: CategoryId) -> bool {
        self.categories
            .iter()
            .any(|c| c.id == id && c.user_id.map_or(true, |owner| owner == user_id))
    }

    fn category_ok(&self, user_id: UserId, category: Option<CategoryId>) -> bool {
        category.map_or(true, |id| self.category_visible(user_id, id))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock poisoned")
    }

    /// Seed a user directly, bypassing password hashing.
    pub fn add_user(&self, username: &str) -> UserId {
        let mut t = self.tables();
        let id = t.next_id();
        t.users.push(User {
            id,
            username: username.to_owned(),
            password_hash: String::new(),
            created_at: OffsetDateTime::now_utc(),
        });
        id
    }

    pub fn add_category(&self, user_id: UserId, name: &str) -> CategoryId {
        self.insert_category(Some(user_id), name)
    }

    /// Seed a category with no owner, visible to everyone.
    pub fn add_global_category(&self, name: &str) -> CategoryId {
        self.insert_category(None, name)
    }

    fn insert_category(&self, user_id: Option<UserId>, name: &str) -> CategoryId {
        let mut t = self.tables();
        let id = t.next_id();
        t.categories.push(CategoryRow {
            id,
            user_id,
            fields: CategoryFields {
                name: name.to_owned(),
                icon: "folder".to_owned(),
                theme_color: "#409eff".to_owned(),
            },
        });
        id
    }

    pub fn category_exists(&self, id: CategoryId) -> bool {
        self.tables().categories.iter().any(|c| c.id == id)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<UserId> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.username == username) {
            return Err(RepoError::DuplicateUsername);
        }
        let id = t.next_id();
        t.users.push(User {
            id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        let mut t = self.tables();
        let user = t
            .users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or(RepoError::UserNotFound)?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list_visible(&self, user_id: UserId) -> RepoResult<Vec<CategoryWithCount>> {
        let t = self.tables();
        let mut rows: Vec<CategoryWithCount> = t
            .categories
            .iter()
            .filter(|c| c.user_id.map_or(true, |owner| owner == user_id))
            .map(|c| CategoryWithCount {
                id: c.id,
                name: c.fields.name.clone(),
                icon: c.fields.icon.clone(),
                theme_color: c.fields.theme_color.clone(),
                note_count: t
                    .notes
                    .iter()
                    .filter(|n| n.user_id == user_id && n.category_id == Some(c.id))
                    .count() as i64,
            })
            .collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    async fn create(&self, user_id: UserId, fields: &CategoryFields) -> RepoResult<CategoryId> {
        let mut t = self.tables();
        let id = t.next_id();
        t.categories.push(CategoryRow {
            id,
            user_id: Some(user_id),
            fields: fields.clone(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> RepoResult<()> {
        let mut t = self.tables();
        let row = t
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == Some(user_id))
            .ok_or(RepoError::NotFoundOrForbidden)?;
        row.fields = fields.clone();
        Ok(())
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> RepoResult<()> {
        let mut t = self.tables();
        let before = t.categories.len();
        t.categories
            .retain(|c| !(c.id == id && c.user_id == Some(user_id)));
        if t.categories.len() == before {
            return Err(RepoError::NotFoundOrForbidden);
        }
        for note in t.notes.iter_mut().filter(|n| n.category_id == Some(id)) {
            note.category_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl NoteRepo for MemoryStore {
    async fn list(
        &self,
        user_id: UserId,
        category: Option<CategoryId>,
    ) -> RepoResult<Vec<NoteWithCategory>> {
        let t = self.tables();
        let mut rows: Vec<NoteWithCategory> = t
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| category.map_or(true, |id| n.category_id == Some(id)))
            .map(|n| {
                let joined = n
                    .category_id
                    .and_then(|id| t.categories.iter().find(|c| c.id == id));
                NoteWithCategory {
                    id: n.id,
                    user_id: n.user_id,
                    category_id: n.category_id,
                    title: n.title.clone(),
                    content: n.content.clone(),
                    created_at: n.created_at,
                    category_name: joined.map(|c| c.fields.name.clone()),
                    category_theme_color: joined.map(|c| c.fields.theme_color.clone()),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn count(&self, user_id: UserId) -> RepoResult<i64> {
        Ok(self
            .tables()
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .count() as i64)
    }

    async fn create(&self, user_id: UserId, fields: &NoteFields) -> RepoResult<NoteId> {
        let mut t = self.tables();
        if !t.category_ok(user_id, fields.category_id) {
            return Err(RepoError::CategoryMissing);
        }
        let id = t.next_id();
        t.notes.push(NoteRow {
            id,
            user_id,
            category_id: fields.category_id,
            title: fields.title.clone(),
            content: fields.content.clone(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn update(&self, user_id: UserId, id: NoteId, fields: &NoteFields) -> RepoResult<()> {
        let mut t = self.tables();
        if !t.category_ok(user_id, fields.category_id) {
            return Err(RepoError::CategoryMissing);
        }
        let note = t
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or(RepoError::NotFoundOrForbidden)?;
        note.title = fields.title.clone();
        note.content = fields.content.clone();
        note.category_id = fields.category_id;
        Ok(())
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> RepoResult<()> {
        let mut t = self.tables();
        let before = t.notes.len();
        t.notes.retain(|n| !(n.id == id && n.user_id == user_id));
        if t.notes.len() == before {
            return Err(RepoError::NotFoundOrForbidden);
        }
        Ok(())
    }
}
