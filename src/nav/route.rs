use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use super::NavError;

/// Every screen the app can show. The set is closed: navigation requests are
/// resolved against this list or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Home,
    Catalog,
    ProductDetail,
    Profile,
    Counter,
    Greeting,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Welcome,
        Route::Home,
        Route::Catalog,
        Route::ProductDetail,
        Route::Profile,
        Route::Counter,
        Route::Greeting,
    ];

    /// Stable key used in navigation requests and as the first path segment.
    pub fn name(self) -> &'static str {
        match self {
            Route::Welcome => "welcome",
            Route::Home => "home",
            Route::Catalog => "catalog",
            Route::ProductDetail => "product",
            Route::Profile => "profile",
            Route::Counter => "counter",
            Route::Greeting => "greeting",
        }
    }

    /// Path pattern. Placeholders occupy whole segments: `{name}`.
    pub fn template(self) -> &'static str {
        match self {
            Route::Welcome => "welcome",
            Route::Home => "home",
            Route::Catalog => "catalog",
            Route::ProductDetail => "product/{productId}",
            Route::Profile => "profile/{userName}",
            Route::Counter => "counter",
            Route::Greeting => "greeting",
        }
    }

    /// Heading shown in the screen border.
    pub fn title(self) -> &'static str {
        match self {
            Route::Welcome => "Welcome",
            Route::Home => "Home",
            Route::Catalog => "Catalog",
            Route::ProductDetail => "Product",
            Route::Profile => "Profile",
            Route::Counter => "Counter",
            Route::Greeting => "Greeting",
        }
    }

    pub fn from_name(name: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.name() == name)
    }

    pub fn placeholders(self) -> Vec<&'static str> {
        placeholders(self.template())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument values keyed by placeholder name. Values are kept in their path
/// form; integers are stored as decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteArgs(BTreeMap<String, String>);

impl RouteArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RouteArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = RouteArgs::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Names of the placeholders in `template`, in path order.
pub fn placeholders(template: &str) -> Vec<&str> {
    template.split('/').filter_map(placeholder_name).collect()
}

/// Substitute every placeholder in `template` with its value from `args`.
pub fn build_concrete(template: &str, args: &RouteArgs) -> Result<String, NavError> {
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|key| args.get(key).is_none())
    {
        return Err(NavError::MissingArgument {
            template: template.to_string(),
            argument: missing.to_string(),
        });
    }
    Ok(substitute(template, args))
}

/// Lenient substitution: missing values become empty segments. Values are
/// percent-encoded so a `/` inside one stays within its segment.
fn substitute(template: &str, args: &RouteArgs) -> String {
    template
        .split('/')
        .map(|segment| match placeholder_name(segment) {
            Some(key) => urlencoding::encode(args.get(key).unwrap_or_default()),
            None => Cow::Borrowed(segment),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Undo [`substitute`]'s encoding. Malformed escapes are kept verbatim.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// A route instance on the back stack: the route, its resolved arguments and
/// the concrete path they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    route: Route,
    args: RouteArgs,
    path: String,
}

impl Destination {
    /// Validate `args` against the route's template and resolve the path.
    /// Arguments that do not match a placeholder are dropped.
    pub fn resolve(route: Route, args: &RouteArgs) -> Result<Self, NavError> {
        let path = build_concrete(route.template(), args)?;
        let args = route
            .placeholders()
            .into_iter()
            .filter_map(|key| args.get(key).map(|value| (key, value)))
            .collect();
        Ok(Self { route, args, path })
    }

    /// Parse a concrete path such as `profile/Juan`. The first segment picks
    /// the route; placeholders without a matching segment resolve to empty
    /// strings so a malformed deep link still lands on a screen.
    pub fn from_path(path: &str) -> Option<Self> {
        let mut segments = path.trim_matches('/').split('/');
        let route = Route::from_name(segments.next()?)?;
        let values: Vec<&str> = segments.collect();

        let args = route
            .template()
            .split('/')
            .skip(1)
            .enumerate()
            .filter_map(|(idx, segment)| {
                placeholder_name(segment).map(|key| {
                    let value = values.get(idx).map(|raw| decode_segment(raw));
                    (key, value.unwrap_or_default())
                })
            })
            .collect();
        Some(Self::lenient(route, args))
    }

    fn lenient(route: Route, args: RouteArgs) -> Self {
        let path = substitute(route.template(), &args);
        Self { route, args, path }
    }

    pub fn welcome() -> Self {
        Self::lenient(Route::Welcome, RouteArgs::new())
    }

    pub fn home() -> Self {
        Self::lenient(Route::Home, RouteArgs::new())
    }

    pub fn catalog() -> Self {
        Self::lenient(Route::Catalog, RouteArgs::new())
    }

    pub fn product(product_id: i64) -> Self {
        Self::lenient(
            Route::ProductDetail,
            RouteArgs::new().with("productId", product_id),
        )
    }

    pub fn profile(user_name: &str) -> Self {
        Self::lenient(Route::Profile, RouteArgs::new().with("userName", user_name))
    }

    pub fn counter() -> Self {
        Self::lenient(Route::Counter, RouteArgs::new())
    }

    pub fn greeting() -> Self {
        Self::lenient(Route::Greeting, RouteArgs::new())
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn args(&self) -> &RouteArgs {
        &self.args
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Text argument, or `""` when absent.
    pub fn text_arg(&self, key: &str) -> &str {
        self.args.get(key).unwrap_or_default()
    }

    /// Integer argument, or `0` when absent or not a number.
    pub fn int_arg(&self, key: &str) -> i64 {
        self.args
            .get(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
