//! Tests for the back stack and route resolution.

use peripheral_store::{BackStackUnderflow, Destination, NavError, Navigator, Route, RouteArgs};

fn started_at_home() -> Navigator {
    let mut navigator = Navigator::new();
    navigator.start("home", &RouteArgs::new()).unwrap();
    navigator
}

#[test]
fn profile_round_trip_scenario() {
    let mut navigator = started_at_home();
    assert_eq!(navigator.depth(), 1);

    navigator
        .navigate_to("profile", &RouteArgs::new().with("userName", "Ana"))
        .unwrap();
    assert_eq!(navigator.depth(), 2);
    let current = navigator.current().unwrap();
    assert_eq!(current.route(), Route::Profile);
    assert_eq!(current.args(), &RouteArgs::new().with("userName", "Ana"));
    assert_eq!(current.path(), "profile/Ana");

    navigator.go_back().unwrap();
    assert_eq!(navigator.depth(), 1);
    let current = navigator.current().unwrap();
    assert_eq!(current.route(), Route::Home);
    assert!(current.args().is_empty());
}

#[test]
fn pushes_and_pops_are_symmetric() {
    let mut navigator = started_at_home();
    let origin = navigator.current().cloned();

    let trips: Vec<(&str, RouteArgs)> = vec![
        ("catalog", RouteArgs::new()),
        ("product", RouteArgs::new().with("productId", 3)),
        ("counter", RouteArgs::new()),
        ("profile", RouteArgs::new().with("userName", "Juan")),
        ("home", RouteArgs::new()),
        ("product", RouteArgs::new().with("productId", 8)),
    ];
    for (name, args) in &trips {
        navigator.navigate_to(name, args).unwrap();
    }
    assert_eq!(navigator.depth(), trips.len() + 1);

    for _ in &trips {
        navigator.go_back().unwrap();
    }
    assert_eq!(navigator.current().cloned(), origin);
}

#[test]
fn going_back_from_root_signals_underflow() {
    let mut navigator = started_at_home();
    let before = navigator.current().cloned();

    assert_eq!(navigator.go_back(), Err(BackStackUnderflow));
    assert_eq!(navigator.depth(), 1);
    assert_eq!(navigator.current().cloned(), before);
}

#[test]
fn unknown_route_is_rejected() {
    let mut navigator = started_at_home();

    let err = navigator
        .navigate_to("does-not-exist", &RouteArgs::new())
        .unwrap_err();
    assert_eq!(err, NavError::UnknownRoute("does-not-exist".to_string()));
    assert_eq!(navigator.depth(), 1);
    assert_eq!(navigator.current().unwrap().route(), Route::Home);
}

#[test]
fn missing_argument_is_rejected() {
    let mut navigator = started_at_home();

    let err = navigator
        .navigate_to("product", &RouteArgs::new())
        .unwrap_err();
    assert!(matches!(err, NavError::MissingArgument { ref argument, .. } if argument == "productId"));
    assert_eq!(navigator.depth(), 1);
}

#[test]
fn lifecycle_misuse_is_reported() {
    let mut navigator = Navigator::new();
    assert!(navigator.current().is_none());
    assert_eq!(
        navigator.navigate_to("home", &RouteArgs::new()),
        Err(NavError::NotStarted)
    );
    assert_eq!(
        navigator.navigate(Destination::catalog()),
        Err(NavError::NotStarted)
    );
    assert_eq!(navigator.go_back(), Err(BackStackUnderflow));

    navigator.start("welcome", &RouteArgs::new()).unwrap();
    assert_eq!(
        navigator.start("home", &RouteArgs::new()),
        Err(NavError::AlreadyStarted)
    );
    assert_eq!(navigator.current().unwrap().route(), Route::Welcome);
}

#[test]
fn start_validates_its_route() {
    let mut navigator = Navigator::new();
    assert!(navigator.start("profile", &RouteArgs::new()).is_err());
    assert!(navigator.current().is_none());
}

#[test]
fn observers_see_every_transition() {
    let mut navigator = Navigator::new();
    let mut current = navigator.subscribe();
    assert!(current.borrow().is_none());

    navigator.start("home", &RouteArgs::new()).unwrap();
    assert!(current.has_changed().unwrap());
    assert_eq!(
        current.borrow_and_update().as_ref().map(Destination::route),
        Some(Route::Home)
    );

    navigator.navigate(Destination::product(2)).unwrap();
    assert_eq!(
        current.borrow_and_update().as_ref().map(Destination::path),
        Some("product/2")
    );

    navigator.go_back().unwrap();
    assert!(current.has_changed().unwrap());
    assert_eq!(
        current.borrow_and_update().as_ref().map(Destination::route),
        Some(Route::Home)
    );

    // Failed transitions publish nothing.
    let _ = navigator.go_back();
    let _ = navigator.navigate_to("nowhere", &RouteArgs::new());
    assert!(!current.has_changed().unwrap());
}
