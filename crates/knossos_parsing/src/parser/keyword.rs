use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr};

/// The names of the built in forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Let,
    Edef,
    Def,
    If,
    Build,
    Tuple,
    /// `get$i$n`, only ever matched by prefix
    #[strum(serialize = "get$")]
    Get,
    Fold,
    Lam,
    Rule,
}

impl Keyword {
    /// Classifies the head of a list
    pub fn classify(name: &str) -> Option<Keyword> {
        if name.starts_with("get$") {
            return Some(Keyword::Get);
        }
        Keyword::from_str(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Keyword::classify("let"), Some(Keyword::Let));
        assert_eq!(Keyword::classify("edef"), Some(Keyword::Edef));
        assert_eq!(Keyword::classify("get$1$2"), Some(Keyword::Get));
        assert_eq!(Keyword::classify("get"), None);
        assert_eq!(Keyword::classify("Let"), None);
        assert_eq!(Keyword::classify("add"), None);
    }

    #[test]
    fn test_names() {
        let name: &'static str = Keyword::Build.into();
        assert_eq!(name, "build");
        assert_eq!(Keyword::Lam.to_string(), "lam");
    }
}
