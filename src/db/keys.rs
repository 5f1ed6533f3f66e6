/// Per-user hash keys, rendered as `user:{username}:{suffix}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKey {
    DailySolvedList,
    DailySolvedCount,
    Streak,
    LongestStreak,
    LastDailySolved,
    UserGeneratedSolved,
    CreatedPuzzles,
    Flair,
}

impl UserKey {
    const fn suffix(self) -> &'static str {
        match self {
            UserKey::DailySolvedList => "dailySolvedPuzzles",
            UserKey::DailySolvedCount => "dailySolvedCount",
            UserKey::Streak => "streak",
            UserKey::LongestStreak => "longestStreak",
            UserKey::LastDailySolved => "lastDailySolved",
            UserKey::UserGeneratedSolved => "solvedUGPuzzles",
            UserKey::CreatedPuzzles => "userGeneratedPuzzles",
            UserKey::Flair => "flair",
        }
    }

    pub fn with_name(self, username: &str) -> String {
        format!("user:{}:{}", username, self.suffix())
    }
}

impl core::fmt::Display for UserKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_user_key_schema() {
        let cases = [
            (UserKey::DailySolvedList, "user:alice:dailySolvedPuzzles"),
            (UserKey::DailySolvedCount, "user:alice:dailySolvedCount"),
            (UserKey::Streak, "user:alice:streak"),
            (UserKey::LongestStreak, "user:alice:longestStreak"),
            (UserKey::LastDailySolved, "user:alice:lastDailySolved"),
            (UserKey::UserGeneratedSolved, "user:alice:solvedUGPuzzles"),
            (UserKey::CreatedPuzzles, "user:alice:userGeneratedPuzzles"),
            (UserKey::Flair, "user:alice:flair"),
        ];

        for (key, expects) in cases {
            assert_eq!(key.with_name("alice"), expects);
        }
    }
}
