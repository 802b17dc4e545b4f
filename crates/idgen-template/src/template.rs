use crate::element::Element;
use crate::error::{Result, TemplateError};
use crate::parser;
use crate::registry::{predefined_data, DataMap};
use crate::settings::TemplateSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

/// Builds identifier candidates out of a template string and named data.
///
/// Every call to [`generate`](Template::generate) renders one candidate and
/// then moves exactly one element on to its next alternative, like the
/// digits of an odometer. Elements marked as resolvers stay out of the
/// output until every other element has run out of alternatives; the first
/// of them is then promoted to an ordinary element and the odometer starts
/// over with it as the most significant digit. Together this enumerates the
/// full product of all alternatives without repeating a candidate.
///
/// Template and data changes are cheap: they only flag the parsed elements
/// or their data as stale, and the work is done once at the start of the
/// next `generate` call.
///
/// A session is plain owned state. Share it between threads behind a lock,
/// or use one session per worker.
#[derive(Debug)]
pub struct Template {
    prefix: String,
    template: Option<String>,
    elements: Vec<Element>,
    data: DataMap,
    rng: StdRng,
    /// The template changed since the last parse.
    elements_stale: bool,
    /// The data changed since it was last handed to the elements.
    data_stale: bool,
    /// At least one element claimed another alternative after the last pass.
    has_alternatives: bool,
    /// Index of the next resolver element to promote.
    next_resolver: Option<usize>,
}

impl Template {
    /// Creates a session with no template and only the predefined data.
    pub fn new(settings: TemplateSettings) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self {
            data: predefined_data(&settings.prefix),
            prefix: settings.prefix,
            template: None,
            elements: Vec::new(),
            rng,
            elements_stale: true,
            data_stale: true,
            has_alternatives: true,
            next_resolver: None,
        }
    }

    /// Creates a session for the given template string.
    pub fn with_template(settings: TemplateSettings, template: impl Into<String>) -> Self {
        let mut session = Self::new(settings);
        session.set_template(template);
        session
    }

    /// Creates a session from a data map.
    ///
    /// If the data holds the bare prefix as a key, its value is adopted as
    /// the template string.
    pub fn with_data(settings: TemplateSettings, data: DataMap) -> Self {
        let mut session = Self::new(settings);
        session.merge_data(data);

        if let Some(template) = session.data.get(&session.prefix).cloned() {
            session.set_template(template);
        }
        session
    }

    /// Replaces the template string. Parsing is deferred to the next
    /// [`generate`](Template::generate) call.
    pub fn set_template(&mut self, template: impl Into<String>) {
        let template = template.into();
        info!(template = %template, "got template string");

        self.template = Some(template);
        self.elements_stale = true;
        self.has_alternatives = true;
        self.next_resolver = None;
    }

    /// Returns the template string.
    pub fn template(&self) -> Result<&str> {
        self.template.as_deref().ok_or(TemplateError::TemplateUnset)
    }

    /// Overlays `data` onto the stored data; new values win on key collision.
    pub fn merge_data(&mut self, data: impl IntoIterator<Item = (String, String)>) {
        self.data.extend(data);
        self.data_stale = true;
    }

    pub fn data(&self) -> &DataMap {
        &self.data
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Elements of the last parsed template.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Whether another call to [`generate`](Template::generate) yields a
    /// new candidate. Reflects the state after the last call.
    pub fn has_more_alternatives(&self) -> bool {
        self.has_alternatives
    }

    /// Renders the next candidate.
    ///
    /// Returns an empty string once the alternatives are exhausted. Fails if
    /// no template was ever set, if the template is malformed, or if an
    /// element did not receive the data it requires; nothing is emitted in
    /// that case.
    pub fn generate(&mut self) -> Result<String> {
        debug!("attempting to generate a candidate");

        if !self.has_alternatives {
            warn!("no alternatives left");
            return Ok(String::new());
        }

        if self.elements_stale {
            let elements = parser::parse(self.template()?)?;
            debug!(elements = elements.len(), "parsed template");

            self.elements = elements;
            self.elements_stale = false;
            // fresh elements have not seen any data yet
            self.data_stale = true;
            self.next_resolver = None;
        }

        let mut result = String::new();
        let mut has_alternatives = false;
        let mut next_resolver = self.next_resolver;

        for (index, element) in self.elements.iter_mut().enumerate() {
            if self.data_stale && element.needs_external_data() {
                let value = element
                    .key()
                    .and_then(|key| self.data.get(&format!("{}{}", self.prefix, key)));
                trace!(
                    element = element.source(),
                    found = value.is_some(),
                    "feeding element data"
                );
                element.set_data(value.map(String::as_str));
            }

            if element.is_resolver() {
                if next_resolver.is_none() {
                    next_resolver = Some(index);
                }
                continue;
            }

            if !element.is_complete() {
                return Err(TemplateError::IncompleteElement {
                    kind: element.kind_name(),
                    element: element.source().to_string(),
                });
            }

            result.push_str(&element.render(&mut self.rng).to_lowercase());

            if element.has_alternatives() {
                has_alternatives = true;
            } else {
                debug!(
                    kind = element.kind_name(),
                    element = element.source(),
                    "element has no alternatives left"
                );
            }
        }

        self.data_stale = false;

        if has_alternatives {
            self.step();
        } else if let Some(index) = next_resolver.take() {
            trace!(
                element = self.elements[index].source(),
                "promoting resolver element"
            );
            self.rewind_contributing(self.elements.len());
            self.elements[index].set_resolver(false);
            has_alternatives = true;
        }

        self.has_alternatives = has_alternatives;
        self.next_resolver = next_resolver;

        debug!(candidate = %result, has_alternatives, "generated candidate");
        Ok(result)
    }

    /// Iterates over the remaining candidates, stopping after exhaustion or
    /// the first error.
    pub fn candidates(&mut self) -> Candidates<'_> {
        Candidates {
            template: self,
            failed: false,
        }
    }

    /// Advances the first contributing element that has alternatives left
    /// and rewinds every contributing element before it.
    fn step(&mut self) {
        let Some(position) = self
            .elements
            .iter()
            .position(|element| !element.is_resolver() && element.has_alternatives())
        else {
            return;
        };

        self.rewind_contributing(position);
        self.elements[position].advance(&mut self.rng);
    }

    fn rewind_contributing(&mut self, end: usize) {
        self.elements[..end]
            .iter_mut()
            .filter(|element| !element.is_resolver())
            .for_each(Element::rewind);
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(TemplateSettings::default())
    }
}

/// Iterator returned by [`Template::candidates`].
pub struct Candidates<'a> {
    template: &'a mut Template,
    failed: bool,
}

impl Iterator for Candidates<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.template.has_more_alternatives() {
            return None;
        }

        let candidate = self.template.generate();
        self.failed = candidate.is_err();
        Some(candidate)
    }
}
