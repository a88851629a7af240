use std::fmt::{Display, Formatter};

use clap::ValueEnum;
use derive_builder::Builder;
use jiff::civil::Date;

/// Inbox categories the provider understands in `category:` search tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Promotions,
    Social,
    Updates,
    Primary,
}

impl Category {
    fn token(self) -> &'static str {
        match self {
            Self::Promotions => "promotions",
            Self::Social => "social",
            Self::Updates => "updates",
            Self::Primary => "primary",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A mailbox search, composed locally and rendered to the provider's
/// search-string syntax at the session boundary.
///
/// Day-boundary semantics of `after:`/`before:` are the provider's business;
/// this type only concatenates well-formed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct Query {
    unread_only: bool,
    #[builder(setter(strip_option))]
    after: Option<Date>,
    #[builder(setter(strip_option))]
    before: Option<Date>,
    #[builder(setter(strip_option))]
    category: Option<Category>,
}

impl Query {
    pub fn to_search_string(&self) -> String {
        let mut tokens = Vec::new();
        if self.unread_only {
            tokens.push("is:unread".to_string());
        }
        if let Some(category) = self.category {
            tokens.push(format!("category:{category}"));
        }
        if let Some(after) = self.after {
            tokens.push(format!("after:{}", format_date(after)));
        }
        if let Some(before) = self.before {
            tokens.push(format!("before:{}", format_date(before)));
        }

        tokens.join(" ")
    }
}

fn format_date(date: Date) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}
