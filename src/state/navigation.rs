//! Navigation-related state types.
//!
//! This module contains the page routes and the focus between the sidebar
//! and the main area.

use super::StateError;
use crate::crm::Collection;
use std::fmt;

/// Specifying the different foci.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    Sidebar,
    Main,
}

/// Specifying the different pages.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Route {
    Dashboard,
    Collection(Collection),
    Campaign(String),
    Email(String),
}

impl Route {
    /// Parse a path such as `/campaigns/42`. Unknown paths are rejected.
    ///
    pub fn parse(path: &str) -> Result<Route, StateError> {
        let unknown = || StateError::UnknownRoute(path.to_string());
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Dashboard);
        }
        let rest = trimmed.strip_prefix('/').ok_or_else(unknown)?;
        let mut segments = rest.split('/');
        let collection = segments
            .next()
            .and_then(Collection::from_key)
            .ok_or_else(unknown)?;
        match (segments.next(), segments.next()) {
            (None, _) => Ok(Route::Collection(collection)),
            (Some(id), None) if !id.is_empty() => match collection {
                Collection::Campaigns => Ok(Route::Campaign(id.to_string())),
                Collection::Emails => Ok(Route::Email(id.to_string())),
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }

    /// Format the route as a path.
    ///
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Collection(collection) => format!("/{}", collection.key()),
            Route::Campaign(id) => format!("/campaigns/{}", id),
            Route::Email(id) => format!("/emails/{}", id),
        }
    }

    /// Collection the page belongs to, if any. Detail pages belong to the
    /// collection of the record they show.
    ///
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Route::Dashboard => None,
            Route::Collection(collection) => Some(*collection),
            Route::Campaign(_) => Some(Collection::Campaigns),
            Route::Email(_) => Some(Collection::Emails),
        }
    }

    /// Title shown in the sidebar.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Collection(collection) => collection.title(),
            Route::Campaign(_) => "Campaign",
            Route::Email(_) => "Email",
        }
    }

    /// Top-level pages listed in the sidebar, in order.
    ///
    pub fn sidebar() -> Vec<Route> {
        std::iter::once(Route::Dashboard)
            .chain(Collection::ALL.iter().map(|c| Route::Collection(*c)))
            .collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_top_level_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Dashboard);
        assert_eq!(Route::parse("").unwrap(), Route::Dashboard);
        assert_eq!(
            Route::parse("/contacts").unwrap(),
            Route::Collection(Collection::Contacts)
        );
        assert_eq!(
            Route::parse("/templates/").unwrap(),
            Route::Collection(Collection::Templates)
        );
    }

    #[test]
    fn parse_detail_routes() {
        assert_eq!(
            Route::parse("/campaigns/1700000000000").unwrap(),
            Route::Campaign("1700000000000".to_string())
        );
        assert_eq!(
            Route::parse("/emails/e1").unwrap(),
            Route::Email("e1".to_string())
        );
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        assert!(Route::parse("/reports").is_err());
        assert!(Route::parse("contacts").is_err());
        assert!(Route::parse("/contacts/1").is_err());
        assert!(Route::parse("/emails/1/edit").is_err());
        assert!(matches!(
            Route::parse("/nope"),
            Err(StateError::UnknownRoute(path)) if path == "/nope"
        ));
    }

    #[test]
    fn path_round_trips_through_parse() {
        for route in Route::sidebar()
            .into_iter()
            .chain(vec![Route::Campaign("7".to_string()), Route::Email("8".to_string())])
        {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
    }

    #[test]
    fn sidebar_starts_with_dashboard() {
        let sidebar = Route::sidebar();
        assert_eq!(sidebar.len(), 10);
        assert_eq!(sidebar[0], Route::Dashboard);
        assert_eq!(sidebar[0].title(), "Dashboard");
        assert_eq!(Route::Email("1".to_string()).collection(), Some(Collection::Emails));
        assert_eq!(Route::Dashboard.to_string(), "/");
    }
}
