//! User-facing notices raised by session operations.
//!
//! Notices are presentation side effects: callers decide success from the
//! boolean an operation returns, never from what was shown.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A localized (Indonesian) toast-style message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    UsernameNotFound,
    WrongPassword,
    LoginFailed,
    UsernameTaken,
    SignupFailed,
    UnexpectedError,
    AccountCreated,
    Welcome { name: String },
}

impl Notice {
    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::AccountCreated | Self::Welcome { .. } => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UsernameNotFound => "Username tidak ditemukan".to_owned(),
            Self::WrongPassword => "Password salah".to_owned(),
            Self::LoginFailed => "Terjadi kesalahan saat login".to_owned(),
            Self::UsernameTaken => "Username sudah digunakan".to_owned(),
            Self::SignupFailed => "Gagal membuat akun".to_owned(),
            Self::UnexpectedError => "Terjadi kesalahan, silakan coba lagi".to_owned(),
            Self::AccountCreated => "Akun berhasil dibuat, silakan login".to_owned(),
            Self::Welcome { name } => format!("Selamat datang, {name}!"),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Sink for notices. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Emits notices as tracing events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level() {
            NoticeLevel::Success => tracing::info!(notice = %notice, "session notice"),
            NoticeLevel::Error => tracing::warn!(notice = %notice, "session notice"),
        }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
