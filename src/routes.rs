//! Screen routes, the navigation menu and the sign-in guard.

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use tracing::{debug, info};

use crate::{
    i18n::Msg,
    lookup::{Clock, Debouncer},
};

pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Alarm,
    DatasourceMetric,
    StrategyGroup,
    StrategyList,
    Login,
    NotFound(String),
}

impl Route {
    /// Where visiting `/` lands.
    pub const HOME: Route = Route::Dashboard;
    /// Where a successful sign-in lands.
    pub const AFTER_LOGIN: Route = Route::Alarm;

    pub fn path(&self) -> &str {
        match self {
            Route::Dashboard => "/monitor/dashboard",
            Route::Alarm => "/monitor/alarm",
            Route::DatasourceMetric => "/datasource/metric",
            Route::StrategyGroup => "/strategy/group",
            Route::StrategyList => "/strategy/list",
            Route::Login => "/login",
            Route::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> Msg {
        match self {
            Route::Dashboard => Msg::MenuDashboard,
            Route::Alarm => Msg::MenuAlarm,
            Route::DatasourceMetric => Msg::MenuDatasourceMetric,
            Route::StrategyGroup => Msg::MenuStrategyGroup,
            Route::StrategyList => Msg::MenuStrategyList,
            Route::Login => Msg::Login,
            Route::NotFound(_) => Msg::PageNotFound,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::HOME,
            "/monitor/dashboard" => Route::Dashboard,
            "/monitor/alarm" => Route::Alarm,
            "/datasource/metric" => Route::DatasourceMetric,
            "/strategy/group" => Route::StrategyGroup,
            "/strategy/list" => Route::StrategyList,
            "/login" => Route::Login,
            other => Route::NotFound(other.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A parsed location: `#/strategy/list?keyword=cpu` or `/strategy/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub query: IndexMap<String, String>,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: IndexMap::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Ok(Self {
            route: Route::from_path(&path),
            query: parse_query(query),
        })
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn parse_query(query: &str) -> IndexMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: Msg,
    pub route: Option<&'static str>,
    pub children: &'static [MenuItem],
}

const fn leaf(label: Msg, path: &'static str) -> MenuItem {
    MenuItem {
        label,
        route: Some(path),
        children: &[],
    }
}

pub const MENU: &[MenuItem] = &[
    MenuItem {
        label: Msg::MenuMonitor,
        route: None,
        children: &[
            leaf(Msg::MenuAlarm, "/monitor/alarm"),
            leaf(Msg::MenuDashboard, "/monitor/dashboard"),
        ],
    },
    MenuItem {
        label: Msg::MenuDatasource,
        route: None,
        children: &[leaf(Msg::MenuDatasourceMetric, "/datasource/metric")],
    },
    MenuItem {
        label: Msg::MenuStrategy,
        route: None,
        children: &[
            leaf(Msg::MenuStrategyGroup, "/strategy/group"),
            leaf(Msg::MenuStrategyList, "/strategy/list"),
        ],
    },
];

/// Menu leaves in display order.
pub fn menu_routes() -> Vec<(Msg, Route)> {
    MENU.iter()
        .flat_map(|group| group.children.iter())
        .filter_map(|item| item.route.map(|path| (item.label, Route::from_path(path))))
        .collect()
}

/// Current location plus the guard that sends signed-out users to the
/// login screen after [`LOGIN_REDIRECT_DELAY`].
#[derive(Debug)]
pub struct Navigator {
    location: Location,
    redirect: Debouncer,
}

impl Navigator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_delay(LOGIN_REDIRECT_DELAY, clock)
    }

    pub fn with_delay(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            location: Location::new(Route::HOME),
            redirect: Debouncer::new(delay, clock),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn route(&self) -> &Route {
        &self.location.route
    }

    pub fn go(&mut self, location: Location, signed_in: bool) {
        debug!(to = %location.route, "navigate");
        self.location = location;
        self.guard(signed_in);
    }

    pub fn go_to(&mut self, route: Route, signed_in: bool) {
        self.go(Location::new(route), signed_in);
    }

    /// Re-evaluates the guard, e.g. after sign-out.
    pub fn guard(&mut self, signed_in: bool) {
        if signed_in || self.location.route.is_public() {
            self.redirect.reset();
        } else if !self.redirect.is_pending() {
            self.redirect.trigger();
        }
    }

    pub fn is_redirecting(&self) -> bool {
        self.redirect.is_pending()
    }

    /// Performs a due redirect. Returns true when the route changed.
    pub fn tick(&mut self) -> bool {
        if self.redirect.poll().is_none() {
            return false;
        }
        info!(from = %self.location.route, "redirecting to login");
        self.location = Location::new(Route::Login);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ManualClock;

    fn parse(raw: &str) -> Location {
        raw.parse().unwrap()
    }

    #[test]
    fn hash_locations_and_queries_are_decoded() {
        let location = parse("#/strategy/list?keyword=cpu%20usage&page=2&name=%E5%91%8A%E8%AD%A6");
        assert_eq!(location.route, Route::StrategyList);
        assert_eq!(location.param("keyword"), Some("cpu usage"));
        assert_eq!(location.param("page"), Some("2"));
        assert_eq!(location.param("name"), Some("告警"));
    }

    #[test]
    fn root_redirects_home_and_unknown_paths_fall_back() {
        assert_eq!(parse("/").route, Route::Dashboard);
        assert_eq!(parse("#/").route, Route::Dashboard);
        assert_eq!(parse("datasource/metric/").route, Route::DatasourceMetric);
        assert_eq!(
            parse("/notify/group").route,
            Route::NotFound("/notify/group".into())
        );
    }

    #[test]
    fn signed_out_visitors_reach_login_after_the_delay() {
        let clock = ManualClock::new();
        let mut nav = Navigator::new(Arc::new(clock.clone()));
        nav.go_to(Route::StrategyList, false);
        clock.advance(Duration::from_millis(999));
        assert!(!nav.tick());
        assert_eq!(nav.route(), &Route::StrategyList);
        clock.advance(Duration::from_millis(1));
        assert!(nav.tick());
        assert_eq!(nav.route(), &Route::Login);
    }

    #[test]
    fn signing_in_cancels_a_pending_redirect() {
        let clock = ManualClock::new();
        let mut nav = Navigator::new(Arc::new(clock.clone()));
        nav.go_to(Route::Alarm, false);
        nav.guard(true);
        clock.advance(Duration::from_secs(2));
        assert!(!nav.tick());
        assert_eq!(nav.route(), &Route::Alarm);
    }

    #[test]
    fn menu_lists_every_screen() {
        let routes: Vec<_> = menu_routes().into_iter().map(|(_, route)| route).collect();
        assert_eq!(
            routes,
            vec![
                Route::Alarm,
                Route::Dashboard,
                Route::DatasourceMetric,
                Route::StrategyGroup,
                Route::StrategyList
            ]
        );
    }
}
