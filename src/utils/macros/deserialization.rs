//! Case-insensitive enum deserialization.
//!
//! Config files written by hand tend to vary the casing of tagged enum
//! variants ("plain" vs "Plain"), so tagged enums in the config layer get
//! their `Deserialize` impl from this macro instead of deriving it.

/// Implements `Deserialize` for a `#[serde(tag = "type", content = "value")]`
/// enum, matching the type tag case-insensitively.
///
/// Each listed variant must hold a single value constructible via
/// `From<String>`.
#[macro_export]
macro_rules! impl_case_insensitive_enum {
    ($enum_name:ident, { $($variant_str:expr => $variant:ident),* $(,)? }) => {
        impl<'de> ::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use ::serde::de::{self, MapAccess, Visitor};
                use std::fmt;

                struct EnumVisitor;

                impl<'de> Visitor<'de> for EnumVisitor {
                    type Value = $enum_name;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(concat!("a struct with a `type` field for ", stringify!($enum_name)))
                    }

                    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                    where
                        M: MapAccess<'de>,
                    {
                        let mut type_: Option<String> = None;
                        let mut value: Option<::serde_json::Value> = None;

                        while let Some(key) = map.next_key::<String>()? {
                            if key == "type" {
                                type_ = Some(map.next_value()?);
                            } else if key == "value" {
                                value = Some(map.next_value()?);
                            } else {
                                let _: ::serde_json::Value = map.next_value()?;
                            }
                        }

                        let type_ = type_.ok_or_else(|| de::Error::missing_field("type"))?;
                        let value = value.ok_or_else(|| de::Error::missing_field("value"))?;

                        match type_.to_lowercase().as_str() {
                            $(
                                $variant_str => {
                                    let content = ::serde_json::from_value::<String>(value)
                                        .map_err(|e| de::Error::custom(format!(
                                            concat!("invalid ", $variant_str, " value: {}"), e
                                        )))?;
                                    Ok($enum_name::$variant(content.into()))
                                },
                            )*
                            _ => Err(de::Error::unknown_variant(
                                &type_,
                                &[$($variant_str),*],
                            )),
                        }
                    }
                }

                deserializer.deserialize_map(EnumVisitor)
            }
        }
    };
}
