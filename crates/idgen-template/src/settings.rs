use typed_builder::TypedBuilder;

/// Default prefix for data keys. The bare prefix is also the data key that
/// carries the template string itself.
pub const DEFAULT_PREFIX: &str = "T";

/// Configures a [`Template`](crate::Template) session.
///
/// ```rust
/// use idgen_template::TemplateSettings;
///
/// // defaults: prefix "T", entropy-seeded randomness
/// let settings = TemplateSettings::builder().build();
///
/// // reproducible runs
/// let settings = TemplateSettings::builder().prefix("X").seed(42).build();
/// assert_eq!(settings.prefix, "X");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct TemplateSettings {
    /// Marker prepended to every element key before it is looked up in the
    /// data map.
    #[builder(default = DEFAULT_PREFIX.to_string(), setter(into))]
    pub prefix: String,
    /// Seed for random-pick elements. `None` seeds from system entropy.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
