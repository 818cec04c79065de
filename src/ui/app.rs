use std::cmp::min;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{ArtistProgress, Collection};
use crate::progress::{calc_done_total, filter_artists, is_completed, sort_artists, SortMode};
use crate::reorder::Reorderer;
use crate::store::{create_artist, delete_artist, reset_all, set_all_steps, set_step, Store, UiPrefs};

use super::forms::{ArtistForm, ConfirmArtistDelete, ConfirmReset};
use super::helpers::{centered_rect, gauge_line, percent, surface_error};
use super::screens::DetailScreen;
use super::session::{SessionToggles, ToggleKey};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per artist card in the list view.
const ARTIST_CARD_HEIGHT: u16 = 4;
/// Character width of the text progress gauges.
const GAUGE_WIDTH: usize = 30;

/// High-level navigation states. Keeping this explicit makes it easy to reason
/// about which rendering path runs and what keyboard shortcuts should do.
enum Screen {
    List,
    Detail(DetailScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    AddingArtist(ArtistForm),
    ConfirmDelete(ConfirmArtistDelete),
    ConfirmReset(ConfirmReset),
    Searching(SearchState),
    Grabbing(GrabState),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// A grab in progress: `from` is where the artist was picked up in the
/// visible list, `to` is where it currently hovers.
struct GrabState {
    from: usize,
    to: usize,
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
    store: Store,
    data: Collection,
    prefs: UiPrefs,
    reorderer: &'static dyn Reorderer,
    visible: Vec<String>,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    session: SessionToggles,
}

impl App {
    pub fn new(
        store: Store,
        data: Collection,
        prefs: UiPrefs,
        reorderer: &'static dyn Reorderer,
    ) -> Self {
        let mut app = Self {
            store,
            data,
            prefs,
            reorderer,
            visible: Vec::new(),
            selected: 0,
            screen: Screen::List,
            mode: Mode::Normal,
            status: None,
            session: SessionToggles::default(),
        };
        app.refresh_visible();
        app
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingArtist(form) => self.handle_add_artist(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::ConfirmReset(confirm) => self.handle_confirm_reset(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::Grabbing(state) => self.handle_grab(code, state)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::List => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => self.move_selection(-1),
                    KeyCode::Down => self.move_selection(1),
                    KeyCode::PageUp => self.move_selection(-5),
                    KeyCode::PageDown => self.move_selection(5),
                    KeyCode::Home => self.select_first(),
                    KeyCode::End => self.select_last(),
                    KeyCode::Enter => {
                        if let Some(artist) = self.current_artist() {
                            let id = artist.id.clone();
                            self.clear_status();
                            self.screen = Screen::Detail(DetailScreen::new(id));
                        } else {
                            self.set_status("No artist selected.", StatusKind::Error);
                        }
                    }
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingArtist(ArtistForm::default()));
                    }
                    KeyCode::Char('-') => {
                        if let Some(artist) = self.current_artist() {
                            let confirm = ConfirmArtistDelete {
                                id: artist.id.clone(),
                                label: artist.label.clone(),
                            };
                            self.clear_status();
                            return Ok(Mode::ConfirmDelete(confirm));
                        } else {
                            self.set_status("No artist selected to remove.", StatusKind::Error);
                        }
                    }
                    KeyCode::Char('f') => {
                        return Ok(Mode::Searching(SearchState {
                            query: self.prefs.query.clone(),
                        }));
                    }
                    KeyCode::Char('c') => {
                        self.prefs.filter = self.prefs.filter.next();
                        self.refresh_visible();
                        self.persist_prefs();
                        self.set_status(
                            format!("Filter: {}.", self.prefs.filter.label()),
                            StatusKind::Info,
                        );
                    }
                    KeyCode::Char('o') => {
                        self.prefs.sort = self.prefs.sort.next();
                        self.refresh_visible();
                        self.persist_prefs();
                        self.set_status(
                            format!("Sort: {}.", self.prefs.sort.label()),
                            StatusKind::Info,
                        );
                    }
                    KeyCode::Char('g') => {
                        if !self.reorderer.supports_grab() {
                            self.set_status(
                                "Grab mode is disabled. Use K/J to move one step.",
                                StatusKind::Error,
                            );
                        } else if self.prefs.sort != SortMode::ListOrder {
                            self.set_status(
                                "Switch sorting to list order before reordering.",
                                StatusKind::Error,
                            );
                        } else if self.visible.is_empty() {
                            self.set_status("Nothing to move.", StatusKind::Error);
                        } else {
                            self.clear_status();
                            return Ok(Mode::Grabbing(GrabState {
                                from: self.selected,
                                to: self.selected,
                            }));
                        }
                    }
                    KeyCode::Char('K') => self.swap_selected(-1)?,
                    KeyCode::Char('J') => self.swap_selected(1)?,
                    KeyCode::Char('a') => {
                        if let Some(artist) = self.current_artist() {
                            let id = artist.id.clone();
                            self.bulk_set_artist(&id, true)?;
                        } else {
                            self.set_status("No artist selected.", StatusKind::Error);
                        }
                    }
                    KeyCode::Char('n') => {
                        if let Some(artist) = self.current_artist() {
                            let id = artist.id.clone();
                            self.bulk_set_artist(&id, false)?;
                        } else {
                            self.set_status("No artist selected.", StatusKind::Error);
                        }
                    }
                    KeyCode::Char('x') => {
                        self.clear_status();
                        return Ok(Mode::ConfirmReset(ConfirmReset));
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Detail(ref mut detail) => {
                let mut back_to_list = false;
                let mut toggle = false;
                let mut bulk: Option<(String, bool)> = None;
                let mut hop: Option<isize> = None;

                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => back_to_list = true,
                    KeyCode::Up => detail.move_selection(-1),
                    KeyCode::Down => detail.move_selection(1),
                    KeyCode::PageUp => detail.move_selection(-5),
                    KeyCode::PageDown => detail.move_selection(5),
                    KeyCode::Home => detail.select_first(),
                    KeyCode::End => detail.select_last(),
                    KeyCode::Char(' ') | KeyCode::Enter => toggle = true,
                    KeyCode::Char('a') => bulk = Some((detail.artist_id.clone(), true)),
                    KeyCode::Char('n') => bulk = Some((detail.artist_id.clone(), false)),
                    KeyCode::Tab => hop = Some(1),
                    KeyCode::BackTab => hop = Some(-1),
                    _ => {}
                }

                if back_to_list {
                    self.clear_status();
                    self.screen = Screen::List;
                    self.refresh_visible();
                } else if toggle {
                    self.toggle_current_step()?;
                } else if let Some((id, value)) = bulk {
                    self.bulk_set_artist(&id, value)?;
                } else if let Some(offset) = hop {
                    self.open_relative_artist(offset);
                }

                Ok(Mode::Normal)
            }
        }
    }

    fn handle_add_artist(&mut self, code: KeyCode, mut form: ArtistForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add artist cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_artist(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingArtist(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmArtistDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_confirm_reset(&mut self, code: KeyCode, confirm: ConfirmReset) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Reset cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_reset() {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmReset(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmReset(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.prefs.query.clear();
                self.refresh_visible();
                self.persist_prefs();
                self.set_status("Search cleared.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                self.persist_prefs();
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                self.move_selection(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.move_selection(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    state.query.push(ch);
                }
            }
            _ => {}
        }

        self.prefs.query = state.query.clone();
        self.refresh_visible();
        Ok(Mode::Searching(state))
    }

    fn handle_grab(&mut self, code: KeyCode, mut state: GrabState) -> Result<Mode> {
        let len = self.visible.len();
        match code {
            KeyCode::Esc => {
                self.selected = state.from;
                self.set_status("Move cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                state.to = state.to.saturating_sub(1);
                self.selected = state.to;
                Ok(Mode::Grabbing(state))
            }
            KeyCode::Down => {
                if state.to + 1 < len {
                    state.to += 1;
                }
                self.selected = state.to;
                Ok(Mode::Grabbing(state))
            }
            KeyCode::Home => {
                state.to = 0;
                self.selected = 0;
                Ok(Mode::Grabbing(state))
            }
            KeyCode::End => {
                state.to = len.saturating_sub(1);
                self.selected = state.to;
                Ok(Mode::Grabbing(state))
            }
            KeyCode::Enter | KeyCode::Char('g') => {
                self.commit_grab(&state)?;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::Grabbing(state)),
        }
    }

    fn commit_grab(&mut self, state: &GrabState) -> Result<()> {
        let Some(id) = self.visible.get(state.from).cloned() else {
            self.selected = 0;
            return Ok(());
        };
        let visible = self.visible.clone();
        if self.reorderer.reorder(&mut self.data, &visible, state.from, state.to) {
            self.store.save(&self.data)?;
            self.refresh_visible();
            self.focus_artist(&id);
            self.set_status("Order saved.", StatusKind::Info);
        } else {
            self.selected = state.from;
            self.set_status("Order unchanged.", StatusKind::Info);
        }
        Ok(())
    }

    /// Move the selected artist one slot up or down through the active
    /// reorder strategy.
    fn swap_selected(&mut self, offset: isize) -> Result<()> {
        if self.prefs.sort != SortMode::ListOrder {
            self.set_status(
                "Switch sorting to list order before reordering.",
                StatusKind::Error,
            );
            return Ok(());
        }
        let len = self.visible.len();
        if len < 2 {
            return Ok(());
        }
        let from = self.selected;
        let target = from as isize + offset;
        if target < 0 || target >= len as isize {
            return Ok(());
        }
        let to = target as usize;

        let id = self.visible[from].clone();
        let visible = self.visible.clone();
        if self.reorderer.reorder(&mut self.data, &visible, from, to) {
            self.store.save(&self.data)?;
            self.refresh_visible();
            self.focus_artist(&id);
            self.set_status("Order saved.", StatusKind::Info);
        }
        Ok(())
    }

    fn save_new_artist(&mut self, form: &ArtistForm) -> Result<()> {
        let label = form.parse_inputs()?;
        let artist = create_artist(&self.store, &mut self.data, &label)?;
        self.refresh_visible();
        self.focus_artist(&artist.id);
        self.set_status(format!("Added {}.", artist.label), StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmArtistDelete) -> Result<()> {
        delete_artist(&self.store, &mut self.data, &confirm.id)?;
        self.session.purge_artist(&confirm.id);
        self.refresh_visible();
        self.set_status(format!("Removed {}.", confirm.label), StatusKind::Info);
        Ok(())
    }

    fn perform_reset(&mut self) -> Result<()> {
        reset_all(&self.store, &mut self.data)?;
        self.session.clear();
        self.screen = Screen::List;
        self.refresh_visible();
        self.set_status("All progress wiped.", StatusKind::Info);
        Ok(())
    }

    /// Flip the checkbox under the detail cursor and persist immediately.
    fn toggle_current_step(&mut self) -> Result<()> {
        let (artist_id, variant, step_key) = {
            let Screen::Detail(detail) = &self.screen else {
                return Ok(());
            };
            let Some((variant, step_key)) = detail.current_step() else {
                return Ok(());
            };
            (
                detail.artist_id.clone(),
                variant.map(str::to_string),
                step_key.to_string(),
            )
        };

        let Some(artist) = self.data.get(&artist_id) else {
            self.set_status("Artist not found.", StatusKind::Error);
            return Ok(());
        };
        let key = ToggleKey::new(&artist_id, variant.as_deref(), &step_key);
        let current = self
            .session
            .get(&key)
            .unwrap_or_else(|| artist.step(variant.as_deref(), &step_key));
        let next = !current;

        set_step(
            &self.store,
            &mut self.data,
            &artist_id,
            variant.as_deref(),
            &step_key,
            next,
        )?;
        self.session.set(key, next);
        self.refresh_visible();
        Ok(())
    }

    /// Set or clear all steps of one artist, mirroring the change into the
    /// session cache so open checkboxes repaint.
    fn bulk_set_artist(&mut self, id: &str, value: bool) -> Result<()> {
        let Some(artist) = self.data.get(id) else {
            self.set_status("Artist not found.", StatusKind::Error);
            return Ok(());
        };
        let label = artist.label.clone();
        set_all_steps(&self.store, &mut self.data, id, value)?;
        self.session.set_artist_all(id, value);
        self.refresh_visible();
        self.focus_artist(id);
        let verb = if value { "Checked" } else { "Cleared" };
        self.set_status(format!("{verb} every step for {label}."), StatusKind::Info);
        Ok(())
    }

    /// Jump from the open detail view to the previous/next visible artist,
    /// wrapping at the ends.
    fn open_relative_artist(&mut self, offset: isize) {
        let Screen::Detail(detail) = &self.screen else {
            return;
        };
        if self.visible.is_empty() {
            return;
        }
        let current = self
            .visible
            .iter()
            .position(|id| *id == detail.artist_id)
            .unwrap_or(0);
        let len = self.visible.len() as isize;
        let next = (current as isize + offset).rem_euclid(len) as usize;
        let id = self.visible[next].clone();
        self.selected = next;
        self.screen = Screen::Detail(DetailScreen::new(id));
    }

    /// Recompute the visible id list from the full collection plus the active
    /// search, filter, and sort preferences.
    fn refresh_visible(&mut self) {
        let all: Vec<&ArtistProgress> = self.data.values().collect();
        let mut filtered = filter_artists(&all, &self.prefs.query, self.prefs.filter);
        sort_artists(&mut filtered, self.prefs.sort);
        self.visible = filtered.into_iter().map(|artist| artist.id.clone()).collect();
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    fn persist_prefs(&mut self) {
        if let Err(err) = self.store.save_prefs(&self.prefs) {
            let message = surface_error(&err);
            self.set_status(message, StatusKind::Error);
        }
    }

    fn current_artist(&self) -> Option<&ArtistProgress> {
        self.visible
            .get(self.selected)
            .and_then(|id| self.data.get(id))
    }

    fn focus_artist(&mut self, id: &str) {
        if let Some(position) = self.visible.iter().position(|v| v == id) {
            self.selected = position;
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let mut next = self.selected as isize + offset;
        if next < 0 {
            next = 0;
        }
        if next >= len {
            next = len - 1;
        }
        self.selected = next as usize;
    }

    fn select_first(&mut self) {
        self.selected = 0;
    }

    fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
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

    /// Summed done/total across the artists currently shown.
    fn visible_progress(&self) -> (usize, usize) {
        self.visible
            .iter()
            .filter_map(|id| self.data.get(id))
            .map(calc_done_total)
            .fold((0, 0), |acc, (done, total)| (acc.0 + done, acc.1 + total))
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

        match &self.screen {
            Screen::List => self.draw_artist_list(frame, content_area),
            Screen::Detail(detail) => self.draw_detail(frame, content_area, detail),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingArtist(form) => self.draw_artist_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::ConfirmReset(_) => self.draw_confirm_reset(frame, area),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Grabbing(_) | Mode::Normal => {}
        }
    }

    fn draw_artist_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let (done, total) = self.visible_progress();
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    "Artist Progress",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "  {} artists, {} shown",
                    self.data.len(),
                    self.visible.len()
                )),
            ]),
            Line::from(Span::raw(format!(
                "{done}/{total} steps done  [{}] {}%",
                gauge_line(done, total, GAUGE_WIDTH),
                percent(done, total)
            ))),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Artists"));
        frame.render_widget(header, chunks[0]);

        if self.data.is_empty() {
            let message = Paragraph::new("No artists yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        if self.visible.is_empty() {
            let message = Paragraph::new("No artists match the current search and filter.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        // While a grab is held, preview the list with the artist moved to its
        // hover position.
        let mut order: Vec<&str> = self.visible.iter().map(String::as_str).collect();
        let mut grabbed = None;
        if let Mode::Grabbing(state) = &self.mode {
            if state.from < order.len() {
                let held = order.remove(state.from);
                let slot = min(state.to, order.len());
                order.insert(slot, held);
                grabbed = Some(slot);
            }
        }
        let selected = grabbed.unwrap_or(self.selected);

        self.render_artist_cards(frame, chunks[1], &order, selected, grabbed);
    }

    fn render_artist_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        ids: &[&str],
        selected: usize,
        grabbed: Option<usize>,
    ) {
        if ids.is_empty() || area.height == 0 {
            return;
        }

        let card_height = ARTIST_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = ids.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(ARTIST_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let card_index = start + idx;
            if card_index >= len {
                break;
            }

            let Some(artist) = self.data.get(ids[card_index]) else {
                continue;
            };
            let (done, total) = calc_done_total(artist);

            let mut block = Block::default().borders(Borders::ALL);
            if card_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let title = if grabbed == Some(card_index) {
                format!("▶ {} (moving)", artist.label)
            } else if card_index == selected {
                format!("▶ {}", artist.label)
            } else {
                artist.label.clone()
            };

            let mut summary = vec![Span::raw(format!(
                "{done}/{total} ({}%)  [{}]",
                percent(done, total),
                gauge_line(done, total, GAUGE_WIDTH)
            ))];
            if is_completed(artist) {
                summary.push(Span::styled(
                    "  complete",
                    Style::default().fg(Color::Green),
                ));
            }

            let lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(summary),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen) {
        let Some(artist) = self.data.get(&detail.artist_id) else {
            let message = Paragraph::new("Artist not found.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let (done, total) = calc_done_total(artist);
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                artist.label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::raw(format!(
                "{done}/{total} steps ({}%)  [{}]",
                percent(done, total),
                gauge_line(done, total, GAUGE_WIDTH)
            ))),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Checklist"));
        frame.render_widget(header, chunks[0]);

        let body = Paragraph::new(detail.display_lines(artist, &self.session))
            .block(Block::default().borders(Borders::ALL))
            .scroll((detail.scroll, 0));
        frame.render_widget(body, chunks[1]);
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

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingArtist(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) | (_, Mode::ConfirmReset(_)) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[n]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Searching(_)) => Line::from(vec![
                Span::raw("Type to filter   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear"),
            ]),
            (_, Mode::Grabbing(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Drop   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::List, Mode::Normal) => {
                let mut spans = vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Open   "),
                    Span::styled("[+]", key_style),
                    Span::raw(" Add   "),
                    Span::styled("[-]", key_style),
                    Span::raw(" Delete   "),
                    Span::styled("[f]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[c]", key_style),
                    Span::raw(format!(" Filter: {}   ", self.prefs.filter.label())),
                    Span::styled("[o]", key_style),
                    Span::raw(format!(" Sort: {}   ", self.prefs.sort.label())),
                ];
                if self.reorderer.supports_grab() {
                    spans.push(Span::styled("[g]", key_style));
                    spans.push(Span::raw(" Grab   "));
                } else {
                    spans.push(Span::styled("[K/J]", key_style));
                    spans.push(Span::raw(" Swap   "));
                }
                spans.extend([
                    Span::styled("[x]", key_style),
                    Span::raw(" Reset   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]);
                Line::from(spans)
            }
            (Screen::Detail(_), Mode::Normal) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle   "),
                Span::styled("[a]", key_style),
                Span::raw(" All   "),
                Span::styled("[n]", key_style),
                Span::raw(" None   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Artist   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_artist_form(&self, frame: &mut Frame, area: Rect, form: &ArtistForm) {
        let popup = centered_rect(60, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().title("Add Artist").borders(Borders::ALL);
        let mut lines = vec![form.build_line()];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);

        let inner = block.inner(popup);
        let cursor_x = inner.x + "Name: ".len() as u16 + form.value_len() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmArtistDelete) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().title("Confirm Delete").borders(Borders::ALL);
        let lines = vec![
            Line::from(Span::raw(format!("Delete {}?", confirm.label))),
            Line::from(Span::styled(
                "All of its progress will be lost.",
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(Color::Cyan)),
                Span::raw(" Delete   "),
                Span::styled("[n]", Style::default().fg(Color::Cyan)),
                Span::raw(" Cancel"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn draw_confirm_reset(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().title("Confirm Reset").borders(Borders::ALL);
        let lines = vec![
            Line::from(Span::raw("Wipe progress for every artist?")),
            Line::from(Span::styled(
                "The saved file is deleted. This cannot be undone.",
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(Color::Cyan)),
                Span::raw(" Reset   "),
                Span::styled("[n]", Style::default().fg(Color::Cyan)),
                Span::raw(" Cancel"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        let cursor_y = inner.y;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::select_reorderer;
    use tempfile::tempdir;

    fn app_with(labels: &[&str], dir: &std::path::Path) -> App {
        let store = Store::at(dir);
        let mut data = Collection::new();
        for label in labels {
            create_artist(&store, &mut data, label).unwrap();
        }
        App::new(store, data, UiPrefs::default(), select_reorderer(false))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn add_flow_creates_and_focuses_the_artist() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Degas"], dir.path());

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Monet");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.data.len(), 2);
        assert_eq!(app.current_artist().unwrap().label, "Monet");
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn duplicate_label_keeps_the_form_open_with_an_error() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Monet"], dir.path());

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "  MONET ");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.data.len(), 1);
        match &app.mode {
            Mode::AddingArtist(form) => assert!(form.error.is_some()),
            _ => panic!("expected the add form to stay open"),
        }
    }

    #[test]
    fn delete_flow_purges_the_session_cache() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Monet"], dir.path());
        let id = app.visible[0].clone();
        app.session
            .set(ToggleKey::new(&id, None, "research_tamamlandi"), true);

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert!(app.data.is_empty());
        assert!(app
            .session
            .get(&ToggleKey::new(&id, None, "research_tamamlandi"))
            .is_none());
    }

    #[test]
    fn grab_moves_an_artist_and_persists_the_order() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["A", "B", "C"], dir.path());
        let a = app.visible[0].clone();

        app.handle_key(KeyCode::Char('g')).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.visible[2], a);
        assert_eq!(app.data[&a].order, 3);
        let reloaded = app.store.load().unwrap();
        assert_eq!(reloaded[&a].order, 3);
    }

    #[test]
    fn reorder_keys_require_list_order_sorting() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["A", "B"], dir.path());
        app.prefs.sort = SortMode::Label;
        app.refresh_visible();

        app.handle_key(KeyCode::Char('g')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));

        let orders: Vec<i64> = app.data.values().map(|a| a.order).collect();
        app.handle_key(KeyCode::Char('J')).unwrap();
        let after: Vec<i64> = app.data.values().map(|a| a.order).collect();
        assert_eq!(orders, after);
    }

    #[test]
    fn search_narrows_the_visible_list() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Claude Monet", "Edgar Degas"], dir.path());

        app.handle_key(KeyCode::Char('f')).unwrap();
        type_text(&mut app, "monet");
        assert_eq!(app.visible.len(), 1);

        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.visible.len(), 2);
        assert!(app.prefs.query.is_empty());
    }

    #[test]
    fn detail_toggle_updates_record_and_session() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Monet"], dir.path());
        let id = app.visible[0].clone();

        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();

        assert!(app.data[&id].step(None, "research_tamamlandi"));
        assert_eq!(
            app.session
                .get(&ToggleKey::new(&id, None, "research_tamamlandi")),
            Some(true)
        );

        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert!(!app.data[&id].step(None, "research_tamamlandi"));
    }

    #[test]
    fn reset_flow_clears_everything() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&["Monet", "Degas"], dir.path());

        app.handle_key(KeyCode::Char('x')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert!(app.data.is_empty());
        assert!(app.visible.is_empty());
        assert!(app.store.load().unwrap().is_empty());
    }
}
