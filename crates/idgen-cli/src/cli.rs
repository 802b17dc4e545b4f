use clap::Parser;
use idgen_template::DEFAULT_PREFIX;
use std::path::PathBuf;

pub const TEMPLATE_ENV: &str = "IDGEN_TEMPLATE";
pub const PREFIX_ENV: &str = "IDGEN_PREFIX";
pub const COUNT_ENV: &str = "IDGEN_COUNT";
pub const SEED_ENV: &str = "IDGEN_SEED";

pub const DEFAULT_COUNT: usize = 1;

/// Generate identifier candidates from a template and named fields.
///
/// Example: `idgen -T '1f:l:@N+' -f f=Grace -f l=Hopper -n 3`
#[derive(Debug, Parser)]
#[command(name = "idgen")]
pub struct CLI {
    /// Template string, e.g. `2f:l5:@N+`.
    #[arg(short = 'T', long, env = TEMPLATE_ENV)]
    pub template: Option<String>,

    /// Field used by the template, as `key=value`. Repeatable.
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// JSON object of additional fields (`{"f": "Grace"}`).
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Number of candidates to print.
    #[arg(short = 'n', long, env = COUNT_ENV, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// File of identifiers that are already taken, one per line.
    #[arg(long)]
    pub blacklist: Option<PathBuf>,

    /// Seed for random picks, for reproducible output.
    #[arg(long, env = SEED_ENV)]
    pub seed: Option<u64>,

    /// Prefix for field keys.
    #[arg(long, env = PREFIX_ENV, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Print the predefined character classes and exit.
    #[arg(long)]
    pub list_classes: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got \"{raw}\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_fields() {
        let cli = CLI::try_parse_from([
            "idgen", "-T", "1f:l", "-f", "f=Grace", "--field", "l=Hopper", "-n", "3",
        ])
        .unwrap();

        assert_eq!(cli.template.as_deref(), Some("1f:l"));
        assert_eq!(
            cli.fields,
            vec![
                ("f".to_string(), "Grace".to_string()),
                ("l".to_string(), "Hopper".to_string()),
            ]
        );
        assert_eq!(cli.count, 3);
    }

    #[test]
    fn field_values_may_contain_equals() {
        assert_eq!(
            parse_field("f=a=b"),
            Ok(("f".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn rejects_fields_without_key() {
        assert!(parse_field("nokey").is_err());
        assert!(parse_field("=value").is_err());
    }
}
