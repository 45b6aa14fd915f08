//! Stable-name helpers for enums that cross the process boundary

/// An enum whose values are transported by name, never by position.
///
/// Reordering or extending the enum must not change what an existing name
/// decodes to, so every variant carries an explicit, lower-case name.
pub trait StableName: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Human readable name of the enum, used in error messages.
    const KIND: &'static str;

    fn stable_name(&self) -> &'static str;

    /// Case-insensitive lookup by stable name.
    fn from_stable_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.stable_name().eq_ignore_ascii_case(name))
    }

    /// Comma separated list of accepted names.
    fn expected_names() -> String {
        Self::ALL
            .iter()
            .map(|variant| variant.stable_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Macro to implement [`StableName`] together with `Display`, `FromStr`
/// and case-insensitive serde support for a fieldless enum
///
/// Usage:
/// ```ignore
/// impl_stable_name!(
///     MyEnum, "my enum",
///     Variant1 => "variant1",
///     Variant2 => "variant2"
/// );
/// ```
#[macro_export]
macro_rules! impl_stable_name {
    ($enum_type:ty, $kind:expr, $($variant:ident => $str_val:expr),+ $(,)?) => {
        impl $crate::utils::StableName for $enum_type {
            const ALL: &'static [Self] = &[$(Self::$variant),+];
            const KIND: &'static str = $kind;

            fn stable_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str_val,)+
                }
            }
        }

        impl std::fmt::Display for $enum_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::utils::StableName::stable_name(self))
            }
        }

        impl std::str::FromStr for $enum_type {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::utils::StableName>::from_stable_name(s).ok_or_else(|| {
                    format!(
                        "unknown {} '{}', expected one of: {}",
                        $kind,
                        s,
                        <Self as $crate::utils::StableName>::expected_names()
                    )
                })
            }
        }

        impl serde::Serialize for $enum_type {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str($crate::utils::StableName::stable_name(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse::<Self>().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::StableName;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestEnum {
        First,
        Second,
        ThirdOption,
    }

    impl_stable_name!(
        TestEnum, "test enum",
        First => "first",
        Second => "second",
        ThirdOption => "third_option"
    );

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(TestEnum::from_stable_name("first"), Some(TestEnum::First));
        assert_eq!(TestEnum::from_stable_name("FIRST"), Some(TestEnum::First));
        assert_eq!(
            TestEnum::from_stable_name("Third_Option"),
            Some(TestEnum::ThirdOption)
        );
        assert_eq!(TestEnum::from_stable_name("0"), None);
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&TestEnum::ThirdOption).unwrap();
        assert_eq!(json, r#""third_option""#);

        let result: TestEnum = serde_json::from_str(r#""SeCoNd""#).unwrap();
        assert_eq!(result, TestEnum::Second);

        let result: Result<TestEnum, _> = serde_json::from_str(r#""invalid""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown test enum 'invalid'"));
        assert!(err.contains("expected one of: first, second, third_option"));
    }

    mod with_crate_result {
        use crate::error::{Error, Result};

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Mode {
            Fast,
            Slow,
        }

        impl_stable_name!(Mode, "mode", Fast => "fast", Slow => "slow");

        pub fn parse_mode(raw: &str) -> Result<Mode> {
            raw.parse().map_err(Error::Config)
        }
    }

    #[test]
    fn test_macro_ignores_result_alias_in_scope() {
        use with_crate_result::{Mode, parse_mode};

        assert_eq!(parse_mode("SLOW").unwrap(), Mode::Slow);
        assert!(parse_mode("medium").is_err());
        assert_eq!(serde_json::to_string(&Mode::Fast).unwrap(), r#""fast""#);
        let mode: Mode = serde_json::from_str(r#""fast""#).unwrap();
        assert_eq!(mode, Mode::Fast);
    }

    #[test]
    fn test_display_matches_stable_name() {
        assert_eq!(TestEnum::Second.to_string(), "second");
        assert_eq!("first".parse::<TestEnum>(), Ok(TestEnum::First));
    }
}
