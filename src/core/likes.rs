use crate::domain::model::{LikeStatus, Pet, Post};
use crate::domain::ports::{PetSource, ToastSink};
use crate::utils::error::Result;

/// 畫面上的按讚狀態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeState {
    pub is_liked: bool,
    pub like_count: u64,
}

impl LikeState {
    pub fn toggled(self) -> Self {
        if self.is_liked {
            Self {
                is_liked: false,
                like_count: self.like_count.saturating_sub(1),
            }
        } else {
            Self {
                is_liked: true,
                like_count: self.like_count + 1,
            }
        }
    }

    /// 立即翻轉狀態，回傳保存舊值的 guard
    pub fn begin_toggle(&mut self) -> PendingLike {
        let previous = *self;
        *self = self.toggled();
        PendingLike { previous }
    }
}

impl From<LikeStatus> for LikeState {
    fn from(status: LikeStatus) -> Self {
        Self {
            is_liked: status.is_liked,
            like_count: status.like_count,
        }
    }
}

/// 尚未由伺服器確認的按讚
#[must_use = "an optimistic like must be committed or reverted"]
#[derive(Debug, Clone, Copy)]
pub struct PendingLike {
    previous: LikeState,
}

impl PendingLike {
    pub fn commit(self, state: &mut LikeState, server: LikeStatus) {
        *state = server.into();
    }

    pub fn revert(self, state: &mut LikeState) {
        *state = self.previous;
    }
}

pub trait Likeable {
    fn like_state(&self) -> LikeState;
    fn set_like_state(&mut self, state: LikeState);
}

impl Likeable for Pet {
    fn like_state(&self) -> LikeState {
        LikeState {
            is_liked: self.is_liked,
            like_count: self.like_count,
        }
    }

    fn set_like_state(&mut self, state: LikeState) {
        self.is_liked = state.is_liked;
        self.like_count = state.like_count;
    }
}

impl Likeable for Post {
    fn like_state(&self) -> LikeState {
        LikeState {
            is_liked: self.is_liked,
            like_count: self.like_count,
        }
    }

    fn set_like_state(&mut self, state: LikeState) {
        self.is_liked = state.is_liked;
        self.like_count = state.like_count;
    }
}

/// 樂觀按讚流程：`apply` 先收到翻轉後的狀態，再收到伺服器確認或還原後的狀態
pub async fn optimistic_toggle<S, T, F>(
    source: &S,
    toasts: &T,
    pet_id: &str,
    current: LikeState,
    mut apply: F,
) -> Result<LikeState>
where
    S: PetSource + ?Sized,
    T: ToastSink,
    F: FnMut(LikeState),
{
    let mut state = current;
    let pending = state.begin_toggle();
    apply(state);

    match source.toggle_like(pet_id).await {
        Ok(status) => {
            pending.commit(&mut state, status);
            apply(state);
            Ok(state)
        }
        Err(e) => {
            tracing::warn!("Like for pet {} failed, reverting: {}", pet_id, e);
            pending.revert(&mut state);
            apply(state);
            toasts.error(format!("Could not update like: {}", e.user_friendly_message()));
            Err(e)
        }
    }
}

/// 樂觀更新單一寵物的按讚
pub async fn toggle_pet_like<S, T>(source: &S, toasts: &T, pet: &mut Pet) -> Result<LikeState>
where
    S: PetSource + ?Sized,
    T: ToastSink,
{
    let pet_id = pet.id.clone();
    let current = pet.like_state();
    optimistic_toggle(source, toasts, &pet_id, current, |state| pet.set_like_state(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::toast::ToastLog;
    use crate::domain::model::{Insights, Page, PetFilters, PetStats};
    use crate::utils::error::ClientError;
    use async_trait::async_trait;

    #[test]
    fn test_toggle_flips_and_adjusts_count() {
        let state = LikeState {
            is_liked: false,
            like_count: 2,
        };
        assert_eq!(
            state.toggled(),
            LikeState {
                is_liked: true,
                like_count: 3
            }
        );
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_unlike_never_underflows() {
        let state = LikeState {
            is_liked: true,
            like_count: 0,
        };
        assert_eq!(state.toggled().like_count, 0);
    }

    #[test]
    fn test_begin_toggle_flips_immediately_and_revert_restores() {
        let mut state = LikeState::default();
        let pending = state.begin_toggle();
        assert!(state.is_liked);
        assert_eq!(state.like_count, 1);

        pending.revert(&mut state);
        assert_eq!(state, LikeState::default());
    }

    #[test]
    fn test_commit_takes_server_values() {
        let mut state = LikeState::default();
        let pending = state.begin_toggle();
        pending.commit(
            &mut state,
            LikeStatus {
                is_liked: true,
                like_count: 10,
            },
        );
        assert_eq!(state.like_count, 10);
    }

    struct LikeOnlySource {
        fail: bool,
    }

    #[async_trait]
    impl PetSource for LikeOnlySource {
        async fn list_pets(&self, _: &PetFilters, _: u32, _: u32) -> Result<Page<Pet>> {
            Ok(Page::default())
        }
        async fn trending(&self, _: u32) -> Result<Vec<Pet>> {
            Ok(vec![])
        }
        async fn recommended(&self, _: u32) -> Result<Vec<Pet>> {
            Ok(vec![])
        }
        async fn nearby(&self, _: Option<&str>, _: u32) -> Result<Vec<Pet>> {
            Ok(vec![])
        }
        async fn stats(&self) -> Result<PetStats> {
            Ok(PetStats::default())
        }
        async fn insights(&self) -> Result<Insights> {
            Ok(Insights::default())
        }
        async fn toggle_like(&self, _: &str) -> Result<LikeStatus> {
            if self.fail {
                Err(ClientError::from_status(500, "like failed"))
            } else {
                Ok(LikeStatus {
                    is_liked: true,
                    like_count: 8,
                })
            }
        }
    }

    fn pet() -> Pet {
        serde_json::from_value(serde_json::json!({"id": "p1", "name": "Rex", "likeCount": 3}))
            .unwrap()
    }

    #[test]
    fn test_pet_like_reverts_on_failure() {
        let toasts = ToastLog::new();
        let mut pet = pet();

        let result = tokio_test::block_on(toggle_pet_like(
            &LikeOnlySource { fail: true },
            &toasts,
            &mut pet,
        ));

        assert!(result.is_err());
        assert!(!pet.is_liked);
        assert_eq!(pet.like_count, 3);
        assert_eq!(toasts.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_optimistic_toggle_applies_flip_before_server_answer() {
        let toasts = ToastLog::new();
        let mut applied = Vec::new();
        let current = LikeState {
            is_liked: false,
            like_count: 3,
        };

        let result = optimistic_toggle(
            &LikeOnlySource { fail: true },
            &toasts,
            "p1",
            current,
            |state| applied.push(state),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(
            applied,
            vec![
                LikeState {
                    is_liked: true,
                    like_count: 4
                },
                current,
            ]
        );
        assert_eq!(toasts.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_pet_like_reconciles_with_server() {
        let toasts = ToastLog::new();
        let mut pet = pet();

        let state = toggle_pet_like(&LikeOnlySource { fail: false }, &toasts, &mut pet)
            .await
            .unwrap();

        assert!(state.is_liked);
        assert_eq!(pet.like_count, 8);
        assert!(toasts.snapshot().is_empty());
    }
}
