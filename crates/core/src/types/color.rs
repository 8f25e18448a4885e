//! Collection color palette.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the palette's color names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown collection color: {0:?}")]
pub struct ColorError(pub String);

/// The closed set of colors a collection can be given.
///
/// Each color is stored and submitted by its variant name (`"Sunset"`) and
/// rendered through its [`style_token`](Self::style_token), a gradient class
/// string understood by the stylesheet.
///
/// ```
/// use taskdeck_core::CollectionColor;
///
/// let color: CollectionColor = "Snowflake".parse().unwrap();
/// assert_eq!(color.style_token(), "bg-gradient-to-r from-indigo-400 to-cyan-400");
/// assert!("snowflake".parse::<CollectionColor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionColor {
    Sunset,
    Poppy,
    Rosebud,
    Snowflake,
    Candy,
    Firtree,
    Metal,
    Powder,
}

impl CollectionColor {
    /// Every color, in picker order.
    pub const ALL: [Self; 8] = [
        Self::Sunset,
        Self::Poppy,
        Self::Rosebud,
        Self::Snowflake,
        Self::Candy,
        Self::Firtree,
        Self::Metal,
        Self::Powder,
    ];

    /// The variant name, used on the wire and in the database.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunset => "Sunset",
            Self::Poppy => "Poppy",
            Self::Rosebud => "Rosebud",
            Self::Snowflake => "Snowflake",
            Self::Candy => "Candy",
            Self::Firtree => "Firtree",
            Self::Metal => "Metal",
            Self::Powder => "Powder",
        }
    }

    /// CSS class string for the color's gradient.
    #[must_use]
    pub const fn style_token(self) -> &'static str {
        match self {
            Self::Sunset => "bg-gradient-to-r from-red-500 to-orange-500",
            Self::Poppy => "bg-gradient-to-r from-rose-400 to-red-500",
            Self::Rosebud => "bg-gradient-to-r from-violet-500 to-purple-500",
            Self::Snowflake => "bg-gradient-to-r from-indigo-400 to-cyan-400",
            Self::Candy => "bg-gradient-to-r from-yellow-400 via-pink-500 to-red-500",
            Self::Firtree => "bg-gradient-to-r from-emerald-500 to-emerald-900",
            Self::Metal => "bg-gradient-to-r from-slate-500 to-slate-800",
            Self::Powder => "bg-gradient-to-r from-violet-200 to-pink-200",
        }
    }
}

impl fmt::Display for CollectionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| ColorError(s.to_owned()))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CollectionColor {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CollectionColor {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CollectionColor {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.name(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_color_parses_from_its_name() {
        for color in CollectionColor::ALL {
            assert_eq!(color.name().parse::<CollectionColor>().unwrap(), color);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "sunset".parse::<CollectionColor>(),
            Err(ColorError("sunset".to_owned()))
        );
    }

    #[test]
    fn test_parse_rejects_style_token() {
        assert!(
            "bg-gradient-to-r from-red-500 to-orange-500"
                .parse::<CollectionColor>()
                .is_err()
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("".parse::<CollectionColor>().is_err());
    }

    #[test]
    fn test_style_tokens_are_distinct() {
        let mut tokens: Vec<_> = CollectionColor::ALL
            .iter()
            .map(|c| c.style_token())
            .collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), CollectionColor::ALL.len());
    }

    #[test]
    fn test_serde_uses_variant_name() {
        let json = serde_json::to_string(&CollectionColor::Candy).unwrap();
        assert_eq!(json, "\"Candy\"");

        let parsed: CollectionColor = serde_json::from_str("\"Metal\"").unwrap();
        assert_eq!(parsed, CollectionColor::Metal);
        assert!(serde_json::from_str::<CollectionColor>("\"Teal\"").is_err());
    }
}
