//! Tests for the TUI host: key handling, screen-local state and the
//! background catalog refresh.

use std::thread;
use std::time::Duration;

use crossterm::event::KeyCode;
use peripheral_store::db::create_schema;
use peripheral_store::{
    ensure_schema, ensure_seeded, fetch_products, App, Destination, Navigator, Route, RouteArgs,
    SeedTask,
};
use rusqlite::Connection;
use tokio::runtime::Runtime;

fn make_app(runtime: &Runtime, start: &str) -> App {
    let mut conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();
    ensure_seeded(&mut conn).unwrap();
    let products = fetch_products(&conn).unwrap();

    let mut navigator = Navigator::new();
    navigator.start(start, &RouteArgs::new()).unwrap();
    App::new(conn, products, navigator, runtime.handle().clone(), None).unwrap()
}

fn press(app: &mut App, codes: &[KeyCode]) -> bool {
    let mut exit = false;
    for code in codes {
        exit = app.handle_key(*code).unwrap();
    }
    exit
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch)).unwrap();
    }
}

fn route(app: &App) -> Route {
    app.current().unwrap().route()
}

#[test]
fn app_requires_started_navigator() {
    let runtime = Runtime::new().unwrap();
    let conn = Connection::open_in_memory().unwrap();
    let result = App::new(conn, Vec::new(), Navigator::new(), runtime.handle().clone(), None);
    assert!(result.is_err());
}

#[test]
fn welcome_leads_home_and_escape_returns() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "welcome");

    assert!(!press(&mut app, &[KeyCode::Enter]));
    assert_eq!(route(&app), Route::Home);
    assert_eq!(app.depth(), 2);

    assert!(!press(&mut app, &[KeyCode::Esc]));
    assert_eq!(route(&app), Route::Welcome);
}

#[test]
fn escape_on_first_screen_ends_session() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "home");

    assert!(press(&mut app, &[KeyCode::Esc]));
    assert_eq!(app.depth(), 1);
}

#[test]
fn catalog_opens_selected_product() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "home");

    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(route(&app), Route::Catalog);

    press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
    let expected = app.products()[2].id;
    let current = app.current().unwrap();
    assert_eq!(current.route(), Route::ProductDetail);
    assert_eq!(current.int_arg("productId"), expected);
}

#[test]
fn counter_state_is_lost_on_reentry() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "home");

    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert_eq!(route(&app), Route::Counter);
    assert_eq!(app.counter(), Some(0));

    press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('+'), KeyCode::Up]);
    assert_eq!(app.counter(), Some(3));
    press(&mut app, &[KeyCode::Char('-')]);
    assert_eq!(app.counter(), Some(2));

    press(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.counter(), None);

    // The home menu is rebuilt too, so its selection starts over.
    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert_eq!(route(&app), Route::Counter);
    assert_eq!(app.counter(), Some(0));
}

#[test]
fn greeting_form_navigates_to_profile() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "greeting");

    // Blank names stay on the form.
    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(route(&app), Route::Greeting);

    // 'q' is text here, not the quit key.
    type_text(&mut app, "Juaq");
    press(&mut app, &[KeyCode::Backspace]);
    type_text(&mut app, "n");
    assert!(!press(&mut app, &[KeyCode::Enter]));

    let current = app.current().unwrap();
    assert_eq!(current.route(), Route::Profile);
    assert_eq!(current.text_arg("userName"), "Juan");
    assert_eq!(current.path(), "profile/Juan");
}

#[test]
fn greeting_name_with_slash_stays_one_argument() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "greeting");

    type_text(&mut app, "AC/DC");
    press(&mut app, &[KeyCode::Enter]);

    let current = app.current().unwrap().clone();
    assert_eq!(current.text_arg("userName"), "AC/DC");
    assert_eq!(current.path(), "profile/AC%2FDC");
    assert_eq!(Destination::from_path(current.path()), Some(current));
}

#[test]
fn quit_key_ends_session() {
    let runtime = Runtime::new().unwrap();
    let mut app = make_app(&runtime, "catalog");
    assert!(press(&mut app, &[KeyCode::Char('q')]));
}

#[test]
fn catalog_refreshes_when_seeding_finishes() {
    let runtime = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite");
    let conn = ensure_schema(&path).unwrap();
    let products = fetch_products(&conn).unwrap();
    assert!(products.is_empty());

    let seeding = SeedTask::spawn(runtime.handle(), path);
    let mut navigator = Navigator::new();
    navigator.start("catalog", &RouteArgs::new()).unwrap();
    let mut app = App::new(
        conn,
        products,
        navigator,
        runtime.handle().clone(),
        Some(seeding),
    )
    .unwrap();

    for _ in 0..500 {
        app.on_tick().unwrap();
        if !app.is_seeding() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    assert!(!app.is_seeding());
    assert_eq!(app.products().len(), 8);
}
