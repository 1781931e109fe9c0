//! Manager panel: block and unblock users.

use std::sync::Arc;
use std::time::Duration;

use filmoteka_api::{ApiError, FilmBackend};

use crate::confirm::{ConfirmDialog, ConfirmationGate};
use crate::navigator::{Navigation, Navigator};
use crate::toast::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Accepted; a page reload is scheduled.
    Done,
    Declined,
    Failed(String),
}

pub struct UserModeration<B, N> {
    backend: Arc<B>,
    navigator: Arc<N>,
    gate: Arc<ConfirmationGate>,
    notifier: Notifier,
    reload_delay: Duration,
}

impl<B: FilmBackend, N: Navigator + 'static> UserModeration<B, N> {
    pub fn new(
        backend: Arc<B>,
        navigator: Arc<N>,
        gate: Arc<ConfirmationGate>,
        notifier: Notifier,
        reload_delay: Duration,
    ) -> Self {
        Self {
            backend,
            navigator,
            gate,
            notifier,
            reload_delay,
        }
    }

    pub async fn block(&self, user_id: i64) -> ModerationOutcome {
        self.set_blocked(user_id, true).await
    }

    pub async fn unblock(&self, user_id: i64) -> ModerationOutcome {
        self.set_blocked(user_id, false).await
    }

    async fn set_blocked(&self, user_id: i64, blocked: bool) -> ModerationOutcome {
        let dialog = if blocked {
            ConfirmDialog::block_user()
        } else {
            ConfirmDialog::unblock_user()
        };
        if !self.gate.confirm(dialog).await {
            return ModerationOutcome::Declined;
        }

        match self.backend.set_user_blocked(user_id, blocked).await {
            Ok(()) => {
                tracing::info!(user_id, blocked, "User moderation applied");
                self.notifier.success(if blocked {
                    "✅ Пользователь заблокирован!"
                } else {
                    "✅ Пользователь разблокирован!"
                });
                let navigator = Arc::clone(&self.navigator);
                let delay = self.reload_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.navigate(Navigation::Reload);
                });
                ModerationOutcome::Done
            }
            Err(ApiError::MissingCsrf) => {
                tracing::warn!(user_id, "No CSRF token on the page, request not sent");
                self.notifier.error("❌ CSRF токен не найден!");
                ModerationOutcome::Failed(ApiError::MissingCsrf.user_message())
            }
            Err(e) => {
                tracing::error!(user_id, blocked, error = %e, "User moderation failed");
                let message = e.user_message();
                self.notifier.error(format!("❌ Ошибка: {message}"));
                ModerationOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmoteka_core::config::Palette;
    use filmoteka_core::models::NoticeKind;

    use crate::testing::{Call, RecordingNavigator, ScriptedBackend};

    struct Fixture {
        backend: Arc<ScriptedBackend>,
        navigator: Arc<RecordingNavigator>,
        gate: Arc<ConfirmationGate>,
        notifier: Notifier,
        panel: Arc<UserModeration<ScriptedBackend, RecordingNavigator>>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(ScriptedBackend::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let gate = Arc::new(ConfirmationGate::new());
        let notifier = Notifier::new(
            Palette::default(),
            Duration::from_secs(3),
            Duration::from_millis(300),
        );
        let panel = Arc::new(UserModeration::new(
            Arc::clone(&backend),
            Arc::clone(&navigator),
            Arc::clone(&gate),
            notifier.clone(),
            Duration::from_millis(1000),
        ));
        Fixture {
            backend,
            navigator,
            gate,
            notifier,
            panel,
        }
    }

    async fn run_confirmed(fx: &Fixture, blocked: bool) -> ModerationOutcome {
        let mut shown = fx.gate.subscribe();
        let task = {
            let panel = Arc::clone(&fx.panel);
            tokio::spawn(async move {
                if blocked {
                    panel.block(42).await
                } else {
                    panel.unblock(42).await
                }
            })
        };
        shown.wait_for(Option::is_some).await.unwrap();
        fx.gate.answer(true);
        task.await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_reloads_after_delay() {
        let fx = fixture();
        fx.backend.push_unit(Ok(()));

        assert_eq!(run_confirmed(&fx, true).await, ModerationOutcome::Done);
        assert_eq!(fx.backend.calls(), vec![Call::SetBlocked(42, true)]);
        assert_eq!(fx.notifier.visible()[0].message, "✅ Пользователь заблокирован!");
        assert!(fx.navigator.visits().is_empty());

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(fx.navigator.visits(), vec![Navigation::Reload]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_reported_honestly() {
        let fx = fixture();
        fx.backend.push_unit(Err(ApiError::Api {
            status: 500,
            message: "HTTP 500".into(),
        }));

        assert_eq!(
            run_confirmed(&fx, false).await,
            ModerationOutcome::Failed("HTTP 500".into())
        );
        let toast = &fx.notifier.visible()[0];
        assert_eq!(toast.kind, NoticeKind::Error);
        assert_eq!(toast.message, "❌ Ошибка: HTTP 500");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(fx.navigator.visits().is_empty(), "no reload after a failure");
    }

    #[tokio::test]
    async fn test_missing_csrf_token() {
        let fx = fixture();
        fx.backend.push_unit(Err(ApiError::MissingCsrf));

        assert!(matches!(run_confirmed(&fx, true).await, ModerationOutcome::Failed(_)));
        assert_eq!(fx.notifier.visible()[0].message, "❌ CSRF токен не найден!");
    }

    #[tokio::test]
    async fn test_declined_sends_nothing() {
        let fx = fixture();
        let mut shown = fx.gate.subscribe();
        let task = {
            let panel = Arc::clone(&fx.panel);
            tokio::spawn(async move { panel.unblock(42).await })
        };
        shown.wait_for(Option::is_some).await.unwrap();
        assert_eq!(
            fx.gate.current().unwrap().dialog,
            ConfirmDialog::unblock_user()
        );
        fx.gate.dismiss();

        assert_eq!(task.await.unwrap(), ModerationOutcome::Declined);
        assert!(fx.backend.calls().is_empty());
    }
}
