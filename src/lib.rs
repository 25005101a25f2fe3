//! Client-side session state backed by a remote user table.
//!
//! A [`SessionManager`] authenticates users against a [`UserStore`],
//! mirrors the signed-in user into [`LocalStorage`], and reports outcomes as
//! booleans plus user-facing [`Notice`]s.

pub mod config;
pub mod notify;
pub mod session;
pub mod storage;
pub mod store;
pub mod user;

pub use config::{ConfigError, SessionConfig, StoreConfig};
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use session::{Session, SessionError, SessionManager, SessionScope};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
pub use store::{MemoryUserStore, RestUserStore, StoreError, UserStore};
pub use user::{NewUser, Role, User, UserRecord};
