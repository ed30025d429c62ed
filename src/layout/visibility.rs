use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

/// Which pages render a header or footer band.
#[derive(Clone, Default)]
pub enum Visibility {
    #[default]
    All,
    First,
    AllExceptFirst,
    None,
    Pages(BTreeSet<u32>),
    Predicate(Arc<dyn Fn(u32) -> bool + Send + Sync>),
}

impl Visibility {
    pub fn pages(pages: impl IntoIterator<Item = u32>) -> Self {
        Visibility::Pages(pages.into_iter().collect())
    }

    pub fn predicate(f: impl Fn(u32) -> bool + Send + Sync + 'static) -> Self {
        Visibility::Predicate(Arc::new(f))
    }

    /// Pages are numbered from 1.
    pub fn should_show(&self, page: u32) -> bool {
        match self {
            Visibility::All => true,
            Visibility::First => page == 1,
            Visibility::AllExceptFirst => page != 1,
            Visibility::None => false,
            Visibility::Pages(set) => set.contains(&page),
            Visibility::Predicate(f) => f(page),
        }
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::All => f.write_str("All"),
            Visibility::First => f.write_str("First"),
            Visibility::AllExceptFirst => f.write_str("AllExceptFirst"),
            Visibility::None => f.write_str("None"),
            Visibility::Pages(set) => f.debug_tuple("Pages").field(set).finish(),
            Visibility::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    /// `all`, `first`, `all-except-first`, `none`, or a page list like `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Visibility::All),
            "first" => Ok(Visibility::First),
            "all-except-first" => Ok(Visibility::AllExceptFirst),
            "none" => Ok(Visibility::None),
            list => list
                .split(',')
                .map(|p| {
                    p.trim()
                        .parse::<u32>()
                        .map_err(|_| format!("invalid page number {p:?} in visibility {s:?}"))
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Visibility::Pages),
        }
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pages(Vec<u32>),
            Named(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Pages(pages) => Ok(Visibility::pages(pages)),
            Repr::Named(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_policies() {
        assert!(Visibility::All.should_show(7));
        assert!(Visibility::First.should_show(1));
        assert!(!Visibility::First.should_show(2));
        assert!(!Visibility::AllExceptFirst.should_show(1));
        assert!(Visibility::AllExceptFirst.should_show(2));
        assert!(!Visibility::None.should_show(1));
    }

    #[test]
    fn page_list_parses() {
        let v: Visibility = "1, 3,5".parse().unwrap();
        assert!(v.should_show(3));
        assert!(!v.should_show(2));
        assert!("1,x".parse::<Visibility>().is_err());
    }

    #[test]
    fn predicate_is_consulted_every_time() {
        let even = Visibility::predicate(|p| p % 2 == 0);
        assert!(even.should_show(2));
        assert!(!even.should_show(3));
        assert!(even.should_show(2));
    }

    #[test]
    fn deserializes_from_name_or_array() {
        let named: Visibility = serde_json::from_str("\"all-except-first\"").unwrap();
        assert!(matches!(named, Visibility::AllExceptFirst));
        let listed: Visibility = serde_json::from_str("[2, 4]").unwrap();
        assert!(listed.should_show(4));
    }
}
