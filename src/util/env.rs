//! Environment configuration.
//!
//! Variables are read under the [`ENV_PREFIX`] prefix (after loading any `.env` file through
//! [`dotenvy`]) and deserialized with a small serde deserializer in the style of the [`envy`]
//! crate, so that numeric and enum fields parse straight out of their string values.
//!
//! [`envy`]: https://github.com/softprops/envy

use serde::Deserialize;
use serde::de::value::MapDeserializer;
use serde::de::{self, IntoDeserializer};
use thiserror::Error;

use crate::constants::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_REDIS_URL, ENV_PREFIX};
use crate::scoring::clock::SystemClock;
use crate::scoring::engine::{EngineConfig, SolveBucket};

#[inline]
fn default_redis_url() -> String {
    DEFAULT_REDIS_URL.to_string()
}

#[inline]
const fn default_leaderboard_limit() -> usize {
    DEFAULT_LEADERBOARD_LIMIT
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Env {
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default)]
    pub solve_bucket: SolveBucket,
    pub utc_offset_minutes: Option<i32>,
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,
    pub streak_context: Option<String>,
    pub log_filter: Option<String>,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Env {
    /// Loads `.env` if present, then reads `WORDCHAIN_*` from the process environment.
    pub fn new() -> EnvResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => (),
            Err(e) => return Err(e.into()),
        }

        Self::from_iter(std::env::vars())
    }

    /// Reads from an explicit set of variables, keeping only those under the prefix.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(vars: I) -> EnvResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars = vars.into_iter().filter_map(|(k, v)| {
            k.strip_prefix(ENV_PREFIX)
                .map(|stripped| (stripped.to_owned(), v))
        });

        let deserializer: MapDeserializer<'_, _, EnvDeserializeError> =
            MapDeserializer::new(vars.map(|(k, v)| (k.clone(), Val(k, v))));

        Ok(Env::deserialize(deserializer)?)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            bucket: self.solve_bucket,
            leaderboard_limit: self.leaderboard_limit,
            context: self.streak_context.clone(),
        }
    }

    pub fn clock(&self) -> EnvResult<SystemClock> {
        match self.utc_offset_minutes {
            Some(minutes) => SystemClock::with_offset_minutes(minutes)
                .ok_or(EnvErr::BadOffset(minutes)),
            None => Ok(SystemClock::local()),
        }
    }
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error(transparent)]
    Dotenvy(#[from] dotenvy::Error),

    #[error(transparent)]
    DeserializationError(#[from] EnvDeserializeError),

    #[error("utc offset of {0} minutes is out of range")]
    BadOffset(i32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvDeserializeError {
    #[error("env deserialization error: {0}")]
    Custom(String),

    #[error("missing environment variable: {0}")]
    MissingValue(String),
}

impl de::Error for EnvDeserializeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EnvDeserializeError::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        EnvDeserializeError::MissingValue(format!("{ENV_PREFIX}{field}"))
    }
}

/// A single variable value, tagged with its name for error messages.
struct Val(String, String);

impl<'de> IntoDeserializer<'de, EnvDeserializeError> for Val {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

macro_rules! forward_parsed_vals {
    ($($ty:ident => $method:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, EnvDeserializeError>
            where
                V: de::Visitor<'de>
            {
                match self.1.trim().parse::<$ty>() {
                    Ok(val) => val.into_deserializer().$method(visitor),
                    Err(e) => Err(de::Error::custom(format_args!(
                        "{}: while parsing '{}' (variable: {}{})",
                        e, self.1, ENV_PREFIX, self.0
                    ))),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Val {
    type Error = EnvDeserializeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.1.into_deserializer().deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        if self.1.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.1.trim().to_lowercase().into_deserializer())
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_parsed_vals! {
        bool => deserialize_bool,
        i32 => deserialize_i32,
        i64 => deserialize_i64,
        u32 => deserialize_u32,
        u64 => deserialize_u64,
    }

    serde::forward_to_deserialize_any! {
        char str string unit seq bytes byte_buf map unit_struct tuple_struct
        identifier tuple ignored_any i8 i16 u8 u16 f32 f64 struct
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let env = Env::from_iter(vars(&[("PATH", "/usr/bin")])).unwrap();

        assert_eq!(env.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(env.solve_bucket, SolveBucket::SolveDate);
        assert_eq!(env.leaderboard_limit, DEFAULT_LEADERBOARD_LIMIT);
        assert_eq!(env.utc_offset_minutes, None);
        assert_eq!(env.log_format, LogFormat::Pretty);
        assert_eq!(env.engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_prefixed_values_parse() {
        let env = Env::from_iter(vars(&[
            ("WORDCHAIN_REDIS_URL", "redis://cache:6380"),
            ("WORDCHAIN_SOLVE_BUCKET", "puzzle_date"),
            ("WORDCHAIN_UTC_OFFSET_MINUTES", "-300"),
            ("WORDCHAIN_LEADERBOARD_LIMIT", "25"),
            ("WORDCHAIN_STREAK_CONTEXT", "wordchain"),
            ("WORDCHAIN_LOG_FORMAT", "JSON"),
            ("REDIS_URL", "redis://ignored"),
        ]))
        .unwrap();

        assert_eq!(env.redis_url, "redis://cache:6380");
        assert_eq!(env.solve_bucket, SolveBucket::PuzzleDate);
        assert_eq!(env.utc_offset_minutes, Some(-300));
        assert_eq!(env.leaderboard_limit, 25);
        assert_eq!(env.log_format, LogFormat::Json);

        let config = env.engine_config();
        assert_eq!(config.bucket, SolveBucket::PuzzleDate);
        assert_eq!(config.context.as_deref(), Some("wordchain"));
        assert!(env.clock().is_ok());
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = Env::from_iter(vars(&[("WORDCHAIN_LEADERBOARD_LIMIT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("WORDCHAIN_LEADERBOARD_LIMIT"), "{err}");

        assert!(Env::from_iter(vars(&[("WORDCHAIN_SOLVE_BUCKET", "weekly")])).is_err());

        let env = Env::from_iter(vars(&[("WORDCHAIN_UTC_OFFSET_MINUTES", "99999")])).unwrap();
        assert!(matches!(env.clock(), Err(EnvErr::BadOffset(99999))));
    }
}
