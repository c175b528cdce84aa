//! Change pump: keeps the live tree in step with the buffer
//!
//! ```text
//! WidgetEvent::Changes  → translate → LiveTree::apply_edits → parse → replace
//!                       → trigger highlight (short delay) + persist (long delay)
//! WidgetEvent::Viewport → trigger highlight
//! tick(now)             → run whichever debounced task is due
//! ```
//!
//! Everything runs on the caller's thread. Time is passed in, so the owner's
//! event loop decides when `tick` happens (see [`ChangePump::next_deadline`]).

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::PlaygroundConfig;
use crate::debounce::Debouncer;
use crate::editor::{ChangeRecord, RowRange, TextWidget, WidgetEvent};
use crate::store::{StateStore, SOURCE_CODE_KEY};
use crate::syntax::{
    reconcile, translate_batch, HighlightQuery, LiveTree, Palette, ReplayText, SyntaxEngine,
};

/// What a call to [`ChangePump::tick`] ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Number of marks installed, when a highlight run fired
    pub highlighted: Option<usize>,
    /// Whether the buffer was written to the store
    pub persisted: bool,
}

/// Orchestrates parsing, highlighting and persistence for one widget
#[derive(Debug)]
pub struct ChangePump {
    engine: SyntaxEngine,
    tree: LiveTree,
    query: Option<HighlightQuery>,
    palette: Palette,
    /// Buffer as of the last handled batch, without the trailing newline
    source: ReplayText,
    /// Text the live tree was parsed from, trailing newline included
    parsed_text: String,
    highlight: Debouncer,
    persist: Debouncer,
    parse_count: u64,
}

impl ChangePump {
    pub fn new(
        engine: SyntaxEngine,
        query: HighlightQuery,
        palette: Palette,
        highlight_delay: Duration,
        persist_delay: Duration,
    ) -> Self {
        Self {
            engine,
            tree: LiveTree::new(),
            query: Some(query),
            palette,
            source: ReplayText::default(),
            parsed_text: String::new(),
            highlight: Debouncer::new(highlight_delay),
            persist: Debouncer::new(persist_delay),
            parse_count: 0,
        }
    }

    /// Build a pump for the bundled grammar from `config`
    pub fn from_config(config: &PlaygroundConfig) -> Result<Self> {
        let engine = SyntaxEngine::rust()?;
        let query = config
            .compile_query(&engine)
            .context("Highlight query is unusable")?;
        Ok(Self::new(
            engine,
            query,
            config.palette(),
            config.highlight_delay(),
            config.persist_delay(),
        ))
    }

    /// Parse the widget's current buffer from scratch (the initial, empty
    /// change batch) and schedule the downstream work.
    ///
    /// Calling it again resynchronizes the pump with the widget.
    pub fn start<W: TextWidget>(&mut self, widget: &mut W, now: Instant) -> Result<()> {
        self.reparse(ReplayText::new(&widget.value()), &[], false)?;
        self.schedule(widget, now);
        Ok(())
    }

    /// Bring the tree up to date with one change batch and schedule the
    /// downstream work.
    ///
    /// Batches must be handed over in the order the widget emitted them,
    /// each with its records in the order they were applied. The batch is
    /// replayed onto the text of the previous batch, so the widget may
    /// already hold later edits.
    pub fn handle_changes<W: TextWidget>(
        &mut self,
        widget: &mut W,
        changes: &[ChangeRecord],
        now: Instant,
    ) -> Result<()> {
        self.reparse(self.source.clone(), changes, true)?;
        self.schedule(widget, now);
        Ok(())
    }

    /// The visible rows changed: only highlighting needs to follow
    pub fn handle_viewport_change(&mut self, now: Instant) {
        self.highlight.trigger(now);
    }

    /// Drain and handle every event the widget emitted
    pub fn pump_events<W: TextWidget>(&mut self, widget: &mut W, now: Instant) -> Result<()> {
        let mut changed = false;
        for event in widget.drain_events() {
            match event {
                WidgetEvent::Changes(batch) => {
                    self.handle_changes(widget, &batch, now)?;
                    changed = true;
                }
                WidgetEvent::ViewportChange(rows) => {
                    tracing::trace!("Viewport moved to {}..={}", rows.start, rows.end);
                    self.handle_viewport_change(now);
                }
            }
        }

        // Every event is drained, so the replayed text must match the widget
        if changed && !self.source.matches(&widget.value()) {
            tracing::warn!(
                "Replayed text ({} bytes) diverged from the widget, reparsing from scratch",
                self.source.len_bytes()
            );
            self.start(widget, now)?;
        }
        Ok(())
    }

    /// Run the debounced tasks whose delay has elapsed
    pub fn tick<W: TextWidget, S: StateStore>(
        &mut self,
        widget: &mut W,
        store: &mut S,
        now: Instant,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.highlight.poll(now) {
            outcome.highlighted = Some(self.run_highlight(widget, None));
        }
        if self.persist.poll(now) {
            outcome.persisted = match self.persist_now(widget, store) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to persist source: {:#}", e);
                    false
                }
            };
        }
        outcome
    }

    /// Highlight `rows` (or the viewport) right away, bypassing the timer
    pub fn highlight_now<W: TextWidget>(&mut self, widget: &mut W, rows: Option<RowRange>) -> usize {
        self.run_highlight(widget, rows)
    }

    /// Write the current buffer to the store right away
    pub fn persist_now<W: TextWidget, S: StateStore>(&self, widget: &W, store: &mut S) -> Result<()> {
        store.set(SOURCE_CODE_KEY, &widget.value())
    }

    /// Earliest instant at which `tick` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.highlight.deadline(), self.persist.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether any debounced task is waiting
    pub fn has_pending(&self) -> bool {
        self.highlight.is_pending() || self.persist.is_pending()
    }

    /// Drop pending runs without executing them
    pub fn cancel_pending(&mut self) {
        self.highlight.cancel();
        self.persist.cancel();
    }

    pub fn tree(&self) -> Option<&tree_sitter::Tree> {
        self.tree.get()
    }

    pub fn query(&self) -> Option<&HighlightQuery> {
        self.query.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Text the live tree was parsed from
    pub fn parsed_text(&self) -> &str {
        &self.parsed_text
    }

    /// Number of parses performed so far
    pub fn parse_count(&self) -> u64 {
        self.parse_count
    }

    /// Translate `changes` onto `source`, parse the result and install the
    /// new tree. Nothing is committed when parsing fails.
    fn reparse(
        &mut self,
        mut source: ReplayText,
        changes: &[ChangeRecord],
        incremental: bool,
    ) -> Result<()> {
        let started = Instant::now();
        let edits = translate_batch(changes, &mut source);
        let base = if incremental {
            self.tree.apply_edits(&edits)
        } else {
            None
        };
        let mut text = source.to_string();
        text.push('\n');

        let tree = self.engine.parse(&text, base.as_ref())?;
        self.tree.replace(tree);
        self.source = source;
        self.parsed_text = text;
        self.parse_count += 1;

        tracing::debug!(
            "Parse #{} ({}, {} changes, {} bytes) in {:.1?}, tree generation {}",
            self.parse_count,
            if base.is_some() { "incremental" } else { "full" },
            changes.len(),
            self.parsed_text.len(),
            started.elapsed(),
            self.tree.generation()
        );
        Ok(())
    }

    fn schedule<W: TextWidget>(&mut self, widget: &mut W, now: Instant) {
        if self.highlight.trigger(now) {
            self.run_highlight(widget, None);
        }
        self.persist.trigger(now);
    }

    fn run_highlight<W: TextWidget>(&mut self, widget: &mut W, rows: Option<RowRange>) -> usize {
        reconcile(
            widget,
            self.tree.get(),
            &self.parsed_text,
            self.query.as_ref(),
            &self.palette,
            rows,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, Pos};
    use crate::store::MemoryStore;

    const HIGHLIGHT: Duration = Duration::from_millis(50);
    const PERSIST: Duration = Duration::from_millis(2000);

    fn pump() -> ChangePump {
        ChangePump::new(
            SyntaxEngine::rust().unwrap(),
            HighlightQuery::rust().unwrap(),
            Palette::default(),
            HIGHLIGHT,
            PERSIST,
        )
    }

    #[test]
    fn test_start_parses_and_schedules() {
        let mut editor = Editor::new("fn main() {}");
        let mut pump = pump();
        let now = Instant::now();

        pump.start(&mut editor, now).unwrap();
        assert_eq!(pump.parse_count(), 1);
        assert_eq!(pump.parsed_text(), "fn main() {}\n");
        assert!(pump.tree().is_some());
        assert_eq!(pump.next_deadline(), Some(now + HIGHLIGHT));
        // Nothing is highlighted before the debounce fires
        assert!(editor.all_marks().is_empty());
    }

    #[test]
    fn test_tick_runs_highlight_then_persist() {
        let mut editor = Editor::new("fn main() {}");
        let mut store = MemoryStore::new();
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();

        let early = pump.tick(&mut editor, &mut store, now + Duration::from_millis(10));
        assert_eq!(early, TickOutcome::default());

        let outcome = pump.tick(&mut editor, &mut store, now + HIGHLIGHT);
        assert!(outcome.highlighted.unwrap() > 0);
        assert!(!outcome.persisted);
        assert!(!editor.all_marks().is_empty());

        let outcome = pump.tick(&mut editor, &mut store, now + PERSIST);
        assert_eq!(outcome.highlighted, None);
        assert!(outcome.persisted);
        assert_eq!(store.get(SOURCE_CODE_KEY).as_deref(), Some("fn main() {}"));
        assert!(!pump.has_pending());
    }

    #[test]
    fn test_edits_flow_through_pump_events() {
        let mut editor = Editor::new("fn main() {}");
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();

        editor.insert(Pos::new(0, 11), " let x = 1; ");
        pump.pump_events(&mut editor, now).unwrap();

        assert_eq!(pump.parse_count(), 2);
        assert_eq!(pump.parsed_text(), "fn main() { let x = 1; }\n");
        assert!(!pump.tree().unwrap().root_node().has_error());
    }

    #[test]
    fn test_batches_drained_together_are_replayed_in_order() {
        let mut editor = Editor::new("fn main() {\n    let x = 1;\n}");
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();

        // Two operations, the later one above the earlier one
        editor.insert(Pos::new(1, 14), " let y = 5;");
        editor.insert(Pos::new(0, 0), "use std::io;\n");
        pump.pump_events(&mut editor, now).unwrap();

        assert_eq!(pump.parse_count(), 3);
        assert_eq!(pump.parsed_text(), format!("{}\n", editor.value()));
        let fresh = SyntaxEngine::rust()
            .unwrap()
            .parse(pump.parsed_text(), None)
            .unwrap();
        assert_eq!(
            pump.tree().unwrap().root_node().to_sexp(),
            fresh.root_node().to_sexp()
        );
    }

    #[test]
    fn test_missed_batch_falls_back_to_full_reparse() {
        let mut editor = Editor::new("fn main() {}");
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();

        editor.insert(Pos::new(0, 0), "// missed\n");
        editor.drain_events();
        editor.insert(Pos::new(0, 0), "// seen\n");
        pump.pump_events(&mut editor, now).unwrap();

        // One replayed parse, then the resync
        assert_eq!(pump.parse_count(), 3);
        assert_eq!(pump.parsed_text(), "// seen\n// missed\nfn main() {}\n");
        assert!(!pump.tree().unwrap().root_node().has_error());
    }

    #[test]
    fn test_viewport_change_only_schedules_highlight() {
        let mut editor = Editor::with_viewport("fn a() {}\nfn b() {}\n", 1);
        let mut store = MemoryStore::new();
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();
        pump.tick(&mut editor, &mut store, now + PERSIST);
        assert_eq!(store.writes(), 1);

        editor.scroll_to(1);
        let later = now + PERSIST * 2;
        pump.pump_events(&mut editor, later).unwrap();
        assert_eq!(pump.parse_count(), 1);

        let outcome = pump.tick(&mut editor, &mut store, later + PERSIST);
        assert!(outcome.highlighted.is_some());
        assert!(!outcome.persisted);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_cancel_pending_skips_runs() {
        let mut editor = Editor::new("fn main() {}");
        let mut store = MemoryStore::new();
        let mut pump = pump();
        let now = Instant::now();
        pump.start(&mut editor, now).unwrap();

        pump.cancel_pending();
        assert_eq!(pump.next_deadline(), None);
        assert_eq!(pump.tick(&mut editor, &mut store, now + PERSIST), TickOutcome::default());
    }
}
