//! Line highlighters: tree-driven and plain-text.
//!
//! A [`LineHighlighter`] annotates a mutable [`StyledText`] holding one
//! line's bytes with theme styles, either synchronously or on a background
//! thread with cancellation. [`TreeSitterHighlighter`] queries the current
//! syntax tree for captures intersecting the line's byte range;
//! [`PlainTextHighlighter`] is the no-grammar fallback whose calls are
//! no-ops that still honor the completion contract.
//!
//! ## Cancellation
//!
//! Every async request carries its own lock. The worker delivers the
//! completion while holding it; `cancel()` takes the same lock to mark the
//! request cancelled. Once `cancel()` returns, no further completion can
//! fire: any delivery either finished before the lock was granted or is
//! suppressed by the cancelled flag. Completions run on the worker thread
//! and must not call back into the highlighter.

use crate::registry::LanguageConfig;
use crate::theme::SyntaxTheme;
use lodestone_text::{ByteRange, FontSettings, StyledText};
use std::sync::{Arc, Mutex};
use std::thread;
use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tree_sitter::{Query, QueryCursor, QueryError, Tree};

/// A call-scoped highlight request.
///
/// `text` holds exactly the bytes covered by `byte_range` (the line's
/// slice of the buffer); capture offsets are absolute and get mapped onto
/// the text by subtracting `byte_range.start`.
pub struct HighlightInput<'a> {
    pub text: &'a mut StyledText,
    pub byte_range: ByteRange,
}

/// Outcome flags for one highlight pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightResult {
    /// True when an applied run uses bold or italic, meaning the line's
    /// rendered size may have changed and cached layout metrics are stale.
    pub sizing_invalidated: bool,
}

/// Successful async highlight: the styled text handed back to the caller.
#[derive(Debug)]
pub struct AsyncHighlight {
    pub text: StyledText,
    pub result: HighlightResult,
}

/// Completion for the async highlight path. Invoked exactly once, never
/// after `cancel()` has taken effect for the request.
pub type HighlightCompletion = Box<dyn FnOnce(Result<AsyncHighlight, HighlightError>) + Send>;

/// Per-request failures delivered through the async completion.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("no syntax tree installed; parse before highlighting")]
    MissingTree,
}

/// Construction-time configuration failures.
#[derive(Debug, Error)]
pub enum HighlighterError {
    #[error("invalid highlight query: {0}")]
    Query(#[from] QueryError),
}

/// A per-line syntax highlighter.
///
/// `can_highlight` is purely an optimization hint: callers may always call
/// the highlight methods unconditionally, and variants without a grammar
/// behave as no-ops that still complete successfully.
pub trait LineHighlighter {
    fn can_highlight(&self) -> bool;

    /// Synchronously annotates `input.text` over `input.byte_range`.
    ///
    /// Every byte of the range ends up styled: gaps between captures get
    /// the theme's default style. Bytes past the range are left untouched.
    fn highlight(&self, input: HighlightInput<'_>) -> HighlightResult;

    /// Asynchronous variant: schedules the work off the calling thread and
    /// hands the styled text back through `completion`.
    fn highlight_async(
        &self,
        text: StyledText,
        byte_range: ByteRange,
        completion: HighlightCompletion,
    );

    /// Best-effort cancellation of all in-flight async requests for this
    /// instance. Idempotent; safe with no outstanding work.
    fn cancel(&self);

    /// Replaces the theme. Previously applied runs are not recomputed;
    /// that is the caller's job for lines not yet redrawn.
    fn set_theme(&mut self, theme: SyntaxTheme);

    /// Replaces the font configuration. Same invalidation contract as
    /// [`set_theme`](Self::set_theme).
    fn set_font(&mut self, font: FontSettings);

    /// The active theme.
    fn theme(&self) -> &SyntaxTheme;

    /// The active font configuration. Stored and handed back, never
    /// interpreted here.
    fn font(&self) -> &FontSettings;
}

/// Delivery state of one async request.
#[derive(Default)]
struct RequestPhase {
    cancelled: bool,
    done: bool,
}

type RequestState = Mutex<RequestPhase>;

/// Tree-driven highlighter backed by a compiled highlight query.
///
/// Holds a read-only clone of the parser's current tree plus the source
/// snapshot it was parsed from; both are installed together via
/// [`update`](Self::update) after each parse. The tree is never mutated
/// here; edit-aging stays with the parser.
pub struct TreeSitterHighlighter {
    query: Arc<Query>,
    theme: SyntaxTheme,
    font: FontSettings,
    tree: Option<Tree>,
    source: Option<Arc<str>>,
    requests: Mutex<Vec<Arc<RequestState>>>,
}

impl TreeSitterHighlighter {
    /// Compiles the language's highlight query. Compilation is a one-time
    /// cost per language.
    pub fn new(config: &LanguageConfig, theme: SyntaxTheme) -> Result<Self, HighlighterError> {
        let query = Query::new(&config.language, config.highlights_query)?;
        Ok(Self {
            query: Arc::new(query),
            theme,
            font: FontSettings::default(),
            tree: None,
            source: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Installs the tree and source snapshot from the latest parse.
    ///
    /// The tree handle is a cheap refcounted clone shared read-only with
    /// the parser; the source must be the exact content the tree was
    /// parsed from.
    pub fn update(&mut self, tree: Tree, source: impl Into<Arc<str>>) {
        self.tree = Some(tree);
        self.source = Some(source.into());
    }

    fn track(&self, state: Arc<RequestState>) {
        let mut requests = self.requests.lock().unwrap();
        requests.retain(|request| {
            let phase = request.lock().unwrap();
            !phase.done && !phase.cancelled
        });
        requests.push(state);
    }
}

impl LineHighlighter for TreeSitterHighlighter {
    fn can_highlight(&self) -> bool {
        true
    }

    fn highlight(&self, input: HighlightInput<'_>) -> HighlightResult {
        match (&self.tree, &self.source) {
            (Some(tree), Some(source)) => apply_captures(
                &self.query,
                &self.theme,
                tree,
                source,
                input.text,
                input.byte_range,
            ),
            // No tree yet: fill the range with the default style so the
            // totality contract still holds, and report nothing sizing-
            // relevant.
            _ => {
                fill_default(&self.theme, input.text, input.byte_range);
                HighlightResult::default()
            }
        }
    }

    fn highlight_async(
        &self,
        mut text: StyledText,
        byte_range: ByteRange,
        completion: HighlightCompletion,
    ) {
        let (Some(tree), Some(source)) = (self.tree.clone(), self.source.clone()) else {
            completion(Err(HighlightError::MissingTree));
            return;
        };

        let state: Arc<RequestState> = Arc::new(Mutex::new(RequestPhase::default()));
        self.track(Arc::clone(&state));

        let query = Arc::clone(&self.query);
        let theme = self.theme.clone();
        thread::spawn(move || {
            let result = apply_captures(&query, &theme, &tree, &source, &mut text, byte_range);
            let mut phase = state.lock().unwrap();
            if phase.cancelled {
                tracing::debug!(?byte_range, "highlight request cancelled before delivery");
                return;
            }
            phase.done = true;
            // Delivered under the request lock so a concurrent cancel()
            // blocks until this completion has returned.
            completion(Ok(AsyncHighlight { text, result }));
        });
    }

    fn cancel(&self) {
        let mut requests = self.requests.lock().unwrap();
        for request in requests.drain(..) {
            request.lock().unwrap().cancelled = true;
        }
    }

    fn set_theme(&mut self, theme: SyntaxTheme) {
        self.theme = theme;
    }

    fn set_font(&mut self, font: FontSettings) {
        self.font = font;
    }

    fn theme(&self) -> &SyntaxTheme {
        &self.theme
    }

    fn font(&self) -> &FontSettings {
        &self.font
    }
}

/// The no-grammar fallback.
///
/// Reports `can_highlight == false`; both highlight paths are pure no-ops,
/// and the async path still invokes its completion with success so callers
/// never have to branch on capability.
pub struct PlainTextHighlighter {
    theme: SyntaxTheme,
    font: FontSettings,
}

impl PlainTextHighlighter {
    pub fn new() -> Self {
        Self {
            theme: SyntaxTheme::default(),
            font: FontSettings::default(),
        }
    }
}

impl Default for PlainTextHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineHighlighter for PlainTextHighlighter {
    fn can_highlight(&self) -> bool {
        false
    }

    fn highlight(&self, _input: HighlightInput<'_>) -> HighlightResult {
        HighlightResult::default()
    }

    fn highlight_async(
        &self,
        text: StyledText,
        _byte_range: ByteRange,
        completion: HighlightCompletion,
    ) {
        completion(Ok(AsyncHighlight {
            text,
            result: HighlightResult::default(),
        }));
    }

    fn cancel(&self) {}

    fn set_theme(&mut self, theme: SyntaxTheme) {
        self.theme = theme;
    }

    fn set_font(&mut self, font: FontSettings) {
        self.font = font;
    }

    fn theme(&self) -> &SyntaxTheme {
        &self.theme
    }

    fn font(&self) -> &FontSettings {
        &self.font
    }
}

/// Fills the request's local byte range with the theme's default style.
fn fill_default(theme: &SyntaxTheme, text: &mut StyledText, byte_range: ByteRange) {
    let len = byte_range.len().min(text.len());
    text.set_attributes(ByteRange::new(0, len), theme.default_style());
}

/// Queries captures intersecting `byte_range` and writes attribute runs.
///
/// The range is pre-filled with the default style, then capture styles are
/// spliced over it in capture order. Later captures override earlier ones
/// on overlapping bytes, which matches the grammar engine's tie-break: the
/// innermost / last-matched capture wins.
fn apply_captures(
    query: &Query,
    theme: &SyntaxTheme,
    tree: &Tree,
    source: &str,
    text: &mut StyledText,
    byte_range: ByteRange,
) -> HighlightResult {
    fill_default(theme, text, byte_range);

    let mut cursor = QueryCursor::new();
    cursor.set_byte_range(byte_range.into());

    let mut sizing_invalidated = false;
    let capture_names = query.capture_names();
    let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
    while let Some((mat, capture_idx)) = captures.next() {
        let capture = &mat.captures[*capture_idx];
        let node_range = ByteRange::new(capture.node.start_byte(), capture.node.end_byte());
        let Some(clamped) = node_range.intersection(byte_range) else {
            continue;
        };
        if clamped.is_empty() {
            continue;
        }
        let Some(name) = capture_names.get(capture.index as usize) else {
            continue;
        };
        let Some(style) = theme.style_for_capture(name) else {
            continue;
        };
        let local = ByteRange::new(
            clamped.start - byte_range.start,
            clamped.end - byte_range.start,
        );
        text.set_attributes(local, style);
        sizing_invalidated |= style.affects_sizing();
    }

    HighlightResult { sizing_invalidated }
}
