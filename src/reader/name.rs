use convert_case::{Boundary, Case, Converter};
use serde::{Deserialize, Serialize};

/// Naming convention applied to every registered field name before it is
/// matched against the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameFormat {
    /// Names are matched exactly as registered.
    #[default]
    Original,
    SnakeCase,
    CamelCase,
    KebabCase,
}

impl NameFormat {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Original => name.to_owned(),
            Self::SnakeCase => convert(name, Case::Snake),
            Self::CamelCase => convert(name, Case::Camel),
            Self::KebabCase => convert(name, Case::Kebab),
        }
    }
}

/// Words split before an uppercase letter or at a separator; digits stay
/// attached to the word they follow or precede.
fn convert(name: &str, case: Case) -> String {
    Converter::new()
        .to_case(case)
        .remove_boundaries(&[Boundary::UpperDigit, Boundary::DigitLower, Boundary::LowerDigit])
        .convert(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(NameFormat::Original.apply("max_width"), "max_width");
        assert_eq!(NameFormat::SnakeCase.apply("maxWidth"), "max_width");
        assert_eq!(NameFormat::CamelCase.apply("max_width"), "maxWidth");
        assert_eq!(NameFormat::KebabCase.apply("max_width"), "max-width");
    }

    #[test]
    fn test_digits_stay_in_their_word() {
        assert_eq!(NameFormat::SnakeCase.apply("ipv4_addr"), "ipv4_addr");
        assert_eq!(NameFormat::SnakeCase.apply("ipv4Addr"), "ipv4_addr");
        assert_eq!(NameFormat::SnakeCase.apply("server2Port"), "server2_port");
        assert_eq!(NameFormat::SnakeCase.apply("http2"), "http2");
        assert_eq!(NameFormat::KebabCase.apply("ipv4_addr"), "ipv4-addr");
        assert_eq!(NameFormat::CamelCase.apply("server2_port"), "server2Port");
        assert_eq!(NameFormat::CamelCase.apply("ipv4_addr"), "ipv4Addr");
    }

    #[test]
    fn test_deserialize_from_settings() {
        let format: NameFormat = serde_json::from_str("\"kebab_case\"").unwrap();
        assert_eq!(format, NameFormat::KebabCase);
    }
}
