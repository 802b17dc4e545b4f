//! Parsed template elements and their enumeration state.
//!
//! An [`Element`] is one unit of a template. It owns its parsed definition
//! (which data key it reads, which part of the value it emits) and the
//! mutable state needed to walk through its alternatives one by one.

use rand::Rng;

/// Which part of a data value a slice element emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The whole value.
    Whole,
    /// The first `n` characters.
    Head(usize),
    /// The last `n` characters.
    Tail(usize),
    /// Characters from position `a` to position `b`, 1-based and inclusive.
    Range(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A literal string, emitted as is.
    Fixed { text: String },
    /// One character drawn at random from the data value, without
    /// replacement: every character is offered at most once until the
    /// element is rewound. Characters differing only in case count once.
    RandomPick {
        key: String,
        pool: Option<Vec<char>>,
        untried: Vec<char>,
        current: Option<char>,
    },
    /// A window over the data value that slides by one character per
    /// alternative until it hits the edge of the value. `windows` holds the
    /// distinct texts in sliding order, so a repeated substring is offered
    /// once.
    Slice {
        key: String,
        window: Window,
        windows: Option<Vec<String>>,
        step: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    source: String,
    kind: ElementKind,
    resolver: bool,
    /// The raw value last handed over through `set_data`.
    data: Option<String>,
}

impl Element {
    pub fn fixed(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_kind(source, ElementKind::Fixed { text: text.into() })
    }

    pub fn random_pick(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_kind(
            source,
            ElementKind::RandomPick {
                key: key.into(),
                pool: None,
                untried: Vec::new(),
                current: None,
            },
        )
    }

    pub fn slice(source: impl Into<String>, key: impl Into<String>, window: Window) -> Self {
        Self::with_kind(
            source,
            ElementKind::Slice {
                key: key.into(),
                window,
                windows: None,
                step: 0,
            },
        )
    }

    fn with_kind(source: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            source: source.into(),
            kind,
            resolver: false,
            data: None,
        }
    }

    /// The template text this element was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Short name of the element variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Fixed { .. } => "fixed",
            ElementKind::RandomPick { .. } => "random",
            ElementKind::Slice { .. } => "slice",
        }
    }

    pub fn is_resolver(&self) -> bool {
        self.resolver
    }

    pub fn set_resolver(&mut self, resolver: bool) {
        self.resolver = resolver;
    }

    pub fn needs_external_data(&self) -> bool {
        self.key().is_some()
    }

    /// The unprefixed data key this element reads, if any.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Fixed { .. } => None,
            ElementKind::RandomPick { key, .. } | ElementKind::Slice { key, .. } => Some(key),
        }
    }

    /// Hands the element its data value. A changed value resets the
    /// enumeration state; the same value again keeps it.
    ///
    /// `None` leaves the element incomplete.
    pub fn set_data(&mut self, data: Option<&str>) {
        if self.data.as_deref() == data {
            return;
        }
        self.data = data.map(str::to_string);

        match &mut self.kind {
            ElementKind::Fixed { .. } => {}
            ElementKind::RandomPick { pool, .. } => {
                *pool = data.map(|value| {
                    let mut distinct: Vec<char> = Vec::new();
                    for c in value.chars() {
                        if !distinct.iter().any(|d| same_folded(*d, c)) {
                            distinct.push(c);
                        }
                    }
                    distinct
                });
            }
            ElementKind::Slice {
                window, windows, ..
            } => {
                *windows = data.map(|value| distinct_windows(*window, value));
            }
        }
        self.rewind();
    }

    /// Whether the element has everything it needs to render.
    pub fn is_complete(&self) -> bool {
        match &self.kind {
            ElementKind::Fixed { .. } => true,
            ElementKind::RandomPick { pool, .. } => pool.is_some(),
            ElementKind::Slice { windows, .. } => windows.is_some(),
        }
    }

    /// Whether another distinct value remains after the current one.
    pub fn has_alternatives(&self) -> bool {
        match &self.kind {
            ElementKind::Fixed { .. } => false,
            ElementKind::RandomPick {
                untried, current, ..
            } => match current {
                Some(_) => !untried.is_empty(),
                None => untried.len() > 1,
            },
            ElementKind::Slice { windows, step, .. } => {
                step + 1 < windows.as_ref().map_or(0, Vec::len)
            }
        }
    }

    /// Renders the current alternative, drawing the first one if the
    /// element has not started yet.
    pub fn render<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        match &mut self.kind {
            ElementKind::Fixed { text } => text.clone(),
            ElementKind::RandomPick {
                untried, current, ..
            } => {
                if current.is_none() && !untried.is_empty() {
                    *current = Some(draw(untried, rng));
                }
                current.map(String::from).unwrap_or_default()
            }
            ElementKind::Slice { windows, step, .. } => windows
                .as_ref()
                .and_then(|windows| windows.get(*step))
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Moves to the next alternative. A no-op once the element is exhausted.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.has_alternatives() {
            return;
        }
        match &mut self.kind {
            ElementKind::Fixed { .. } => {}
            ElementKind::RandomPick {
                untried, current, ..
            } => *current = Some(draw(untried, rng)),
            ElementKind::Slice { step, .. } => *step += 1,
        }
    }

    /// Returns the element to its first alternative.
    pub fn rewind(&mut self) {
        match &mut self.kind {
            ElementKind::Fixed { .. } => {}
            ElementKind::RandomPick {
                pool,
                untried,
                current,
                ..
            } => {
                *untried = pool.clone().unwrap_or_default();
                *current = None;
            }
            ElementKind::Slice { step, .. } => *step = 0,
        }
    }
}

fn same_folded(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

/// Texts of every window position over `value`, in sliding order, keeping
/// only the first occurrence of texts that are equal after case folding.
fn distinct_windows(window: Window, value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    let span = window_span(window, chars.len());

    let mut windows: Vec<String> = Vec::new();
    for step in 0..span.count {
        let start = span.start_at(step);
        let text: String = chars[start..start + span.width].iter().collect();
        if !windows
            .iter()
            .any(|seen| seen.to_lowercase() == text.to_lowercase())
        {
            windows.push(text);
        }
    }
    windows
}

fn draw<R: Rng + ?Sized>(untried: &mut Vec<char>, rng: &mut R) -> char {
    let index = rng.gen_range(0..untried.len());
    untried.swap_remove(index)
}

/// Placement of a window over a value of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    first: usize,
    width: usize,
    count: usize,
    backwards: bool,
}

impl Span {
    fn start_at(&self, step: usize) -> usize {
        let step = step.min(self.count - 1);
        if self.backwards {
            self.first - step
        } else {
            self.first + step
        }
    }
}

fn window_span(window: Window, len: usize) -> Span {
    let forward = |first: usize, width: usize| Span {
        first,
        width,
        count: len - first - width + 1,
        backwards: false,
    };

    match window {
        Window::Whole => forward(0, len),
        Window::Head(n) => forward(0, n.min(len)),
        Window::Range(a, b) => {
            let first = a.saturating_sub(1);
            if first >= len {
                Span {
                    first: 0,
                    width: 0,
                    count: 1,
                    backwards: false,
                }
            } else {
                let width = (b + 1).saturating_sub(a).min(len - first);
                forward(first, width)
            }
        }
        Window::Tail(n) => {
            let width = n.min(len);
            let first = len - width;
            Span {
                first,
                width,
                count: first + 1,
                backwards: true,
            }
        }
    }
}
