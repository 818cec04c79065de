use std::cmp::min;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::catalog::{COLUMN_STEPS, GLOBAL_STEPS, VARIANTS};
use crate::models::ArtistProgress;

use super::session::{SessionToggles, ToggleKey};

/// Row kinds in the detail checklist: section headers are skipped by the
/// selection, step rows carry the toggle target.
#[derive(PartialEq, Eq)]
pub(crate) enum DetailRowKind {
    Header,
    Step,
}

pub(crate) struct DetailRow {
    pub(crate) kind: DetailRowKind,
    pub(crate) label: String,
    pub(crate) variant: Option<String>,
    pub(crate) step_key: Option<String>,
}

/// Backing state for the per-artist checklist view. The row structure is
/// fixed by the catalogs; only the checkbox states come from the record and
/// the session cache at draw time.
pub(crate) struct DetailScreen {
    pub(crate) artist_id: String,
    pub(crate) rows: Vec<DetailRow>,
    pub(crate) selected: usize,
    pub(crate) scroll: u16,
}

impl DetailScreen {
    pub(crate) fn new(artist_id: String) -> Self {
        let mut rows = Vec::new();
        rows.push(DetailRow {
            kind: DetailRowKind::Header,
            label: "General (one-time per artist)".to_string(),
            variant: None,
            step_key: None,
        });
        for gs in &GLOBAL_STEPS {
            rows.push(DetailRow {
                kind: DetailRowKind::Step,
                label: gs.label.to_string(),
                variant: None,
                step_key: Some(gs.key.to_string()),
            });
        }
        for variant in &VARIANTS {
            rows.push(DetailRow {
                kind: DetailRowKind::Header,
                label: variant.label.to_string(),
                variant: Some(variant.key.to_string()),
                step_key: None,
            });
            for cs in &COLUMN_STEPS {
                rows.push(DetailRow {
                    kind: DetailRowKind::Step,
                    label: cs.label.to_string(),
                    variant: Some(variant.key.to_string()),
                    step_key: Some(cs.key.to_string()),
                });
            }
        }

        let mut screen = Self {
            artist_id,
            rows,
            selected: 0,
            scroll: 0,
        };
        screen.select_first();
        screen
    }

    /// The toggle target under the cursor: `(variant, step_key)`.
    pub(crate) fn current_step(&self) -> Option<(Option<&str>, &str)> {
        let row = self.rows.get(self.selected)?;
        let step_key = row.step_key.as_deref()?;
        Some((row.variant.as_deref(), step_key))
    }

    fn step_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.kind == DetailRowKind::Step)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Move the cursor by `offset` step rows, hopping over headers.
    pub(crate) fn move_selection(&mut self, offset: isize) {
        let steps = self.step_indices();
        if steps.is_empty() {
            return;
        }
        let current = steps
            .iter()
            .position(|idx| *idx == self.selected)
            .unwrap_or(0);
        let mut new = current as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= steps.len() as isize {
            new = steps.len() as isize - 1;
        }
        self.selected = steps[new as usize];
        self.update_scroll();
    }

    pub(crate) fn select_first(&mut self) {
        if let Some(first) = self.step_indices().first() {
            self.selected = *first;
        }
        self.update_scroll();
    }

    pub(crate) fn select_last(&mut self) {
        if let Some(last) = self.step_indices().last() {
            self.selected = *last;
        }
        self.update_scroll();
    }

    fn update_scroll(&mut self) {
        let desired = self.selected.saturating_sub(3) as u16;
        let max_scroll = self.rows.len().saturating_sub(1) as u16;
        self.scroll = min(desired, max_scroll);
    }

    /// Render every row, reading checkbox state through the session cache
    /// with the durable record as the fallback.
    pub(crate) fn display_lines(
        &self,
        artist: &ArtistProgress,
        session: &SessionToggles,
    ) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| match row.kind {
                DetailRowKind::Header => Line::from(Span::styled(
                    format!("── {} ──", row.label),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
                DetailRowKind::Step => {
                    let step_key = row.step_key.as_deref().unwrap_or_default();
                    let variant = row.variant.as_deref();
                    let key = ToggleKey::new(&artist.id, variant, step_key);
                    let checked = session
                        .get(&key)
                        .unwrap_or_else(|| artist.step(variant, step_key));
                    let checkbox = if checked { "[x]" } else { "[ ]" };
                    let pointer = if idx == self.selected { "▶ " } else { "  " };
                    let style = if idx == self.selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(
                        format!("{pointer}{checkbox} {}", row.label),
                        style,
                    ))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TOTAL_STEPS;

    #[test]
    fn detail_rows_cover_every_step_with_headers() {
        let screen = DetailScreen::new("a1".to_string());
        let steps = screen
            .rows
            .iter()
            .filter(|r| r.kind == DetailRowKind::Step)
            .count();
        let headers = screen
            .rows
            .iter()
            .filter(|r| r.kind == DetailRowKind::Header)
            .count();
        assert_eq!(steps, TOTAL_STEPS);
        // One general header plus one per variant.
        assert_eq!(headers, 11);
    }

    #[test]
    fn selection_skips_headers() {
        let mut screen = DetailScreen::new("a1".to_string());
        // Starts on the first global step, not the header above it.
        assert_eq!(screen.current_step(), Some((None, "research_tamamlandi")));

        // Moving past the last global step lands on the first variant step.
        screen.move_selection(3);
        assert_eq!(
            screen.current_step(),
            Some((Some("dikey"), "eserlerin_editlendi"))
        );

        screen.select_last();
        assert_eq!(
            screen.current_step(),
            Some((Some("eksik_ince_yatay"), "etsy_yuklendi"))
        );

        // Clamped at both ends.
        screen.move_selection(100);
        assert_eq!(
            screen.current_step(),
            Some((Some("eksik_ince_yatay"), "etsy_yuklendi"))
        );
        screen.select_first();
        screen.move_selection(-5);
        assert_eq!(screen.current_step(), Some((None, "research_tamamlandi")));
    }
}
