use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::db::repositories::Repository;
use crate::db::repositories::progress::ProgressRepository;
use crate::db::store::KeyValueStore;
use crate::scoring::notify::{NotifyResult, StreakEvent, StreakNotifier};

/// Streak tier shown next to a user's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flair {
    pub rank: i64,
    pub min: i64,
    /// Inclusive; `None` for the open-ended top tier.
    pub max: Option<i64>,
    pub name: &'static str,
    pub background_color: &'static str,
    pub dark_text: bool,
}

pub const FLAIRS: [Flair; 7] = [
    Flair {
        rank: 1,
        min: 0,
        max: Some(0),
        name: "Newbie",
        background_color: "#F94144",
        dark_text: true,
    },
    Flair {
        rank: 2,
        min: 1,
        max: Some(6),
        name: "Fresh Start",
        background_color: "#F3722C",
        dark_text: true,
    },
    Flair {
        rank: 3,
        min: 7,
        max: Some(30),
        name: "Weekly Warrior",
        background_color: "#F8961E",
        dark_text: true,
    },
    Flair {
        rank: 4,
        min: 31,
        max: Some(89),
        name: "Monthly Master",
        background_color: "#F9C74F",
        dark_text: true,
    },
    Flair {
        rank: 5,
        min: 90,
        max: Some(179),
        name: "Quatermaster",
        background_color: "#90BE6D",
        dark_text: true,
    },
    Flair {
        rank: 6,
        min: 180,
        max: Some(364),
        name: "Halfway Hero",
        background_color: "#43AA8B",
        dark_text: true,
    },
    Flair {
        rank: 7,
        min: 365,
        max: None,
        name: "Dedicated Puzzler",
        background_color: "#577590",
        dark_text: true,
    },
];

impl Flair {
    pub fn for_streak(streak: i64) -> Option<&'static Flair> {
        FLAIRS
            .iter()
            .find(|f| f.min <= streak && f.max.is_none_or(|max| streak <= max))
    }
}

/// Outcome of a successful flair promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlairUpgrade {
    pub username: String,
    pub previous_rank: i64,
    pub flair: &'static Flair,
    pub context: Option<String>,
}

/// Promotes the cached flair rank when a streak reaches a higher tier. Ranks never go down,
/// so a broken streak keeps the flair already earned.
#[derive(Clone)]
pub struct FlairNotifier {
    progress: ProgressRepository,
}

impl FlairNotifier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            progress: ProgressRepository::new(store),
        }
    }

    #[instrument(skip(self, event), fields(username = event.username, streak = event.streak))]
    pub async fn apply(&self, event: &StreakEvent) -> NotifyResult<Option<FlairUpgrade>> {
        let Some(target) = Flair::for_streak(event.streak) else {
            return Ok(None);
        };

        let current = self.progress.get_flair_rank(&event.username).await?;
        if current >= target.rank {
            return Ok(None);
        }

        self.progress
            .set_flair_rank(&event.username, target.rank)
            .await?;

        tracing::info!(
            previous_rank = current,
            rank = target.rank,
            flair = target.name,
            "flair upgraded"
        );

        Ok(Some(FlairUpgrade {
            username: event.username.clone(),
            previous_rank: current,
            flair: target,
            context: event.context.clone(),
        }))
    }
}

#[async_trait]
impl StreakNotifier for FlairNotifier {
    async fn notify(&self, event: StreakEvent) -> NotifyResult<()> {
        self.apply(&event).await.map(|_| ())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn event(streak: i64) -> StreakEvent {
        StreakEvent {
            username: "alice".to_string(),
            streak,
            context: Some("wordchain".to_string()),
        }
    }

    #[test]
    fn test_tiers_cover_every_streak() {
        let cases = [
            (0, "Newbie"),
            (1, "Fresh Start"),
            (6, "Fresh Start"),
            (7, "Weekly Warrior"),
            (30, "Weekly Warrior"),
            (31, "Monthly Master"),
            (90, "Quatermaster"),
            (364, "Halfway Hero"),
            (365, "Dedicated Puzzler"),
            (5000, "Dedicated Puzzler"),
        ];

        for (streak, name) in cases {
            assert_eq!(Flair::for_streak(streak).unwrap().name, name, "streak {streak}");
        }

        assert!(Flair::for_streak(-1).is_none());
    }

    #[tokio::test]
    async fn test_promotes_only_upwards() {
        let store = Arc::new(MemoryStore::new());
        let notifier = FlairNotifier::new(store.clone());

        let upgrade = notifier.apply(&event(1)).await.unwrap().unwrap();
        assert_eq!(upgrade.previous_rank, 0);
        assert_eq!(upgrade.flair.rank, 2);

        // same tier again: nothing to do
        assert!(notifier.apply(&event(3)).await.unwrap().is_none());

        let upgrade = notifier.apply(&event(7)).await.unwrap().unwrap();
        assert_eq!(upgrade.flair.name, "Weekly Warrior");

        // streak reset keeps the earned rank
        assert!(notifier.apply(&event(1)).await.unwrap().is_none());

        let progress = ProgressRepository::new(store);
        assert_eq!(progress.get_flair_rank("alice").await.unwrap(), 3);
    }
}
