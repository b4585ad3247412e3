use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::db::fetch_products;
use crate::models::Product;
use crate::nav::{Destination, NavError, Navigator, Route, RouteArgs};
use crate::seed::{self, SeedTask};

use super::helpers::{centered_rect, stock_label, surface_error};
use super::screens::{
    CatalogScreen, CounterScreen, GreetingForm, MenuScreen, ProductScreen, ProfileScreen, Screen,
    HOME_MENU,
};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// What a key press asks the app to do once the screen has handled it.
enum Action {
    None,
    Open(Destination),
    OpenByName(&'static str, RouteArgs),
    Back,
    Quit,
    ReloadCatalog,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    products: Vec<Product>,
    navigator: Navigator,
    current: watch::Receiver<Option<Destination>>,
    screen: Screen,
    status: Option<StatusMessage>,
    runtime: Handle,
    seeding: Option<SeedTask>,
}

impl App {
    /// Wrap an already started navigator. `seeding` is polled on every tick
    /// and the catalog reloads once it completes.
    pub fn new(
        conn: Connection,
        products: Vec<Product>,
        navigator: Navigator,
        runtime: Handle,
        seeding: Option<SeedTask>,
    ) -> Result<Self> {
        let mut current = navigator.subscribe();
        let destination = current
            .borrow_and_update()
            .clone()
            .ok_or_else(|| anyhow!("navigator must be started before the UI"))?;
        let screen = Screen::for_destination(&destination, &conn);

        Ok(Self {
            conn,
            products,
            navigator,
            current,
            screen,
            status: None,
            runtime,
            seeding,
        })
    }

    pub fn current(&self) -> Option<&Destination> {
        self.navigator.current()
    }

    pub fn depth(&self) -> usize {
        self.navigator.depth()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Count shown by the counter screen, when it is the visible one.
    pub fn counter(&self) -> Option<i64> {
        match &self.screen {
            Screen::Counter(counter) => Some(counter.count),
            _ => None,
        }
    }

    pub fn is_seeding(&self) -> bool {
        self.seeding.is_some()
    }

    /// Process one key press. Returns `true` when the session should end.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let action = self.screen_action(code);
        let exit = self.apply(action)?;
        self.sync_screen();
        Ok(exit)
    }

    /// Poll background work.
    pub fn on_tick(&mut self) -> Result<()> {
        if !self.seeding.as_ref().is_some_and(SeedTask::is_finished) {
            return Ok(());
        }
        if let Some(task) = self.seeding.take() {
            let result = self.runtime.block_on(task.wait());
            seed::report(&result);
            if result.is_ok() {
                self.reload_products();
            }
        }
        Ok(())
    }

    fn screen_action(&mut self, code: KeyCode) -> Action {
        if code == KeyCode::Esc {
            return Action::Back;
        }

        match &mut self.screen {
            Screen::Greeting(form) => match code {
                KeyCode::Char(ch) => {
                    form.push_char(ch);
                    Action::None
                }
                KeyCode::Backspace => {
                    form.backspace();
                    Action::None
                }
                KeyCode::Enter => match form.submit() {
                    Some(name) => Action::OpenByName(
                        Route::Profile.name(),
                        RouteArgs::new().with("userName", name),
                    ),
                    None => Action::None,
                },
                _ => Action::None,
            },
            _ if code == KeyCode::Char('q') => Action::Quit,
            Screen::Welcome => match code {
                KeyCode::Enter => Action::Open(Destination::home()),
                _ => Action::None,
            },
            Screen::Home(menu) => match code {
                KeyCode::Up => {
                    menu.move_selection(-1);
                    Action::None
                }
                KeyCode::Down => {
                    menu.move_selection(1);
                    Action::None
                }
                KeyCode::Enter => menu.destination().map_or(Action::None, Action::Open),
                _ => Action::None,
            },
            Screen::Catalog(catalog) => {
                let len = self.products.len();
                match code {
                    KeyCode::Up => catalog.move_selection(-1, len),
                    KeyCode::Down => catalog.move_selection(1, len),
                    KeyCode::PageUp => catalog.move_selection(-5, len),
                    KeyCode::PageDown => catalog.move_selection(5, len),
                    KeyCode::Home => catalog.selected = 0,
                    KeyCode::End => catalog.select_last(len),
                    KeyCode::Enter => {
                        return self
                            .products
                            .get(catalog.selected)
                            .map_or(Action::None, |product| {
                                Action::Open(Destination::product(product.id))
                            });
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => return Action::ReloadCatalog,
                    _ => {}
                }
                Action::None
            }
            Screen::Counter(counter) => {
                match code {
                    KeyCode::Char('+') | KeyCode::Up => counter.increment(),
                    KeyCode::Char('-') | KeyCode::Down => counter.decrement(),
                    KeyCode::Char('r') | KeyCode::Char('R') => counter.reset(),
                    _ => {}
                }
                Action::None
            }
            Screen::Product(_) | Screen::Profile(_) => Action::None,
        }
    }

    fn apply(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::None => {}
            Action::Quit => return Ok(true),
            Action::Back => {
                self.clear_status();
                if self.navigator.go_back().is_err() {
                    info!("back stack exhausted, leaving");
                    return Ok(true);
                }
            }
            Action::Open(destination) => {
                self.clear_status();
                if let Err(err) = self.navigator.navigate(destination) {
                    self.contract_violation(err)?;
                }
            }
            Action::OpenByName(name, args) => {
                self.clear_status();
                if let Err(err) = self.navigator.navigate_to(name, &args) {
                    self.contract_violation(err)?;
                }
            }
            Action::ReloadCatalog => {
                self.reload_products();
                self.set_status(
                    format!("Catalog reloaded ({} products).", self.products.len()),
                    StatusKind::Info,
                );
            }
        }
        Ok(false)
    }

    /// Navigation misuse is a bug in this crate. Debug builds end the session
    /// with the error; release builds log it and keep the current screen.
    fn contract_violation(&mut self, err: NavError) -> Result<()> {
        error!(error = %err, "navigation contract violated");
        if cfg!(debug_assertions) {
            return Err(err.into());
        }
        self.set_status(format!("Navigation failed: {err}"), StatusKind::Error);
        Ok(())
    }

    /// Rebuild the screen when the navigator published a new destination.
    fn sync_screen(&mut self) {
        if !self.current.has_changed().unwrap_or(false) {
            return;
        }
        let destination = self.current.borrow_and_update().clone();
        if let Some(destination) = destination {
            self.screen = Screen::for_destination(&destination, &self.conn);
        }
    }

    fn reload_products(&mut self) {
        match fetch_products(&self.conn) {
            Ok(products) => self.products = products,
            Err(err) => {
                warn!(error = %err, "failed to reload catalog");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
        if let Screen::Catalog(catalog) = &mut self.screen {
            catalog.ensure_in_bounds(self.products.len());
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let title = self
            .navigator
            .current()
            .map(|destination| {
                format!(" {} - {} ", destination.route().title(), destination.path())
            })
            .unwrap_or_default();
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(content_area);
        frame.render_widget(block, content_area);

        match &self.screen {
            Screen::Welcome => self.draw_welcome(frame, inner),
            Screen::Home(menu) => self.draw_home(frame, inner, menu),
            Screen::Catalog(catalog) => self.draw_catalog(frame, inner, catalog),
            Screen::Product(product) => self.draw_product(frame, inner, product),
            Screen::Profile(profile) => self.draw_profile(frame, inner, profile),
            Screen::Counter(counter) => self.draw_counter(frame, inner, counter),
            Screen::Greeting(form) => self.draw_greeting(frame, inner, form),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let banner = centered_rect(70, 50, area);
        let lines = vec![
            Line::from(Span::styled(
                "Peripheral Store",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Keyboards, mice, headsets and everything else on your desk."),
            Line::from(""),
            Line::from("Press Enter to start."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, banner);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, menu: &MenuScreen) {
        let items: Vec<ListItem> = HOME_MENU
            .iter()
            .map(|(label, _)| ListItem::new(*label))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(menu.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect, catalog: &CatalogScreen) {
        if self.products.is_empty() {
            let text = if self.is_seeding() {
                "Loading the sample catalog..."
            } else {
                "The catalog is empty. Press 'r' to reload."
            };
            let message = Paragraph::new(text).alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .products
            .iter()
            .map(|product| {
                let stock_style = if product.in_stock() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Red)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<34}", product.name)),
                    Span::styled(
                        format!("{:<14}", product.category),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!("{:>10}  ", product.display_price())),
                    Span::styled(stock_label(product.stock), stock_style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(catalog.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_product(&self, frame: &mut Frame, area: Rect, screen: &ProductScreen) {
        let lines = match (&screen.product, &screen.error) {
            (_, Some(error)) => vec![Line::from(Span::styled(
                format!("Could not load product #{}: {error}", screen.product_id),
                StatusKind::Error.style(),
            ))],
            (None, None) => vec![Line::from(format!(
                "Product #{} was not found.",
                screen.product_id
            ))],
            (Some(product), None) => vec![
                Line::from(Span::styled(
                    product.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    product.category.clone(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
                Line::from(product.description.clone()),
                Line::from(""),
                Line::from(format!("Price: {}", product.display_price())),
                Line::from(format!("Availability: {}", stock_label(product.stock))),
                Line::from(Span::styled(
                    format!("Image: {}", product.image_ref),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        };
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_profile(&self, frame: &mut Frame, area: Rect, profile: &ProfileScreen) {
        let lines = vec![
            Line::from(Span::styled(
                format!("Hello, {}!", profile.display_name()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Use the greeting form on the home screen to set your name."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_rect(80, 40, area));
    }

    fn draw_counter(&self, frame: &mut Frame, area: Rect, counter: &CounterScreen) {
        let lines = vec![
            Line::from(Span::styled(
                format!("Count: {}", counter.count),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("The count resets whenever you leave this screen."),
        ];
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered_rect(60, 30, area));
    }

    fn draw_greeting(&self, frame: &mut Frame, area: Rect, form: &GreetingForm) {
        let popup = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().borders(Borders::ALL).title("Who is shopping?");
        let inner = block.inner(popup);

        let mut lines = vec![Line::from(format!("Name: {}", form.name))];
        if let Some(error) = &form.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                StatusKind::Error.style(),
            )));
        }
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);

        let cursor_x = inner.x + "Name: ".len() as u16 + form.name.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        let mut key = |label: &'static str, text: &'static str| {
            spans.push(Span::styled(label, key_style));
            spans.push(Span::raw(text));
        };

        match &self.screen {
            Screen::Welcome => key("[Enter]", " Start   "),
            Screen::Home(_) => {
                key("[↑↓]", " Navigate   ");
                key("[Enter]", " Open   ");
            }
            Screen::Catalog(_) => {
                key("[↑↓]", " Navigate   ");
                key("[Enter]", " Details   ");
                key("[R]", " Reload   ");
            }
            Screen::Counter(_) => {
                key("[+/-]", " Count   ");
                key("[R]", " Reset   ");
            }
            Screen::Greeting(_) => key("[Enter]", " Continue   "),
            Screen::Product(_) | Screen::Profile(_) => {}
        }

        key("[Esc]", " Back");
        if !matches!(self.screen, Screen::Greeting(_)) {
            key("   [Q]", " Quit");
        }
        Line::from(spans)
    }
}
