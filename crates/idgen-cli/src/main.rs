mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use idgen_template::{predefined_data, DataMap, Template, TemplateSettings};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // stdout only carries candidates
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    if config.list_classes {
        let mut classes: Vec<_> = predefined_data(&config.prefix).into_iter().collect();
        classes.sort();
        for (key, pool) in classes {
            println!("{key}\t{pool}");
        }
        return Ok(());
    }

    let data = collect_data(&config)?;
    let taken = load_blacklist(config.blacklist.as_deref())?;

    info!(
        prefix = %config.prefix,
        count = config.count,
        taken = taken.len(),
        "generating candidates"
    );

    let settings = match config.seed {
        Some(seed) => TemplateSettings::builder()
            .prefix(config.prefix.clone())
            .seed(seed)
            .build(),
        None => TemplateSettings::builder()
            .prefix(config.prefix.clone())
            .build(),
    };

    let mut template = Template::with_data(settings, data);
    let emitted = emit(&mut template, config.count, &taken, |candidate| {
        println!("{candidate}")
    })?;

    if emitted < config.count {
        warn!(
            requested = config.count,
            emitted, "template ran out of alternatives"
        );
    }

    Ok(())
}

/// Builds the engine's data map: fields from the data file, overridden by
/// fields from the command line, all keyed under the prefix. The template
/// itself goes under the bare prefix.
fn collect_data(config: &CLI) -> anyhow::Result<DataMap> {
    let mut fields = DataMap::new();

    if let Some(path) = &config.data_file {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?;
        let parsed: DataMap = serde_json::from_str(&raw).with_context(|| {
            format!(
                "data file {} is not a JSON object of strings",
                path.display()
            )
        })?;
        fields.extend(parsed);
    }
    fields.extend(config.fields.iter().cloned());

    let mut data: DataMap = fields
        .into_iter()
        .map(|(key, value)| (format!("{}{}", config.prefix, key), value))
        .collect();

    if let Some(template) = &config.template {
        data.insert(config.prefix.clone(), template.clone());
    }

    Ok(data)
}

fn load_blacklist(path: Option<&Path>) -> anyhow::Result<HashSet<String>> {
    let Some(path) = path else {
        return Ok(HashSet::new());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read blacklist {}", path.display()))?;

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect())
}

/// Hands up to `count` usable candidates to `sink`, skipping taken and empty
/// ones. Returns how many were emitted.
fn emit(
    template: &mut Template,
    count: usize,
    taken: &HashSet<String>,
    mut sink: impl FnMut(&str),
) -> anyhow::Result<usize> {
    let mut emitted = 0;
    if count == 0 {
        return Ok(emitted);
    }

    for candidate in template.candidates() {
        let candidate = candidate?;
        if candidate.is_empty() || taken.contains(&candidate) {
            debug!(candidate = %candidate, "skipping candidate");
            continue;
        }

        sink(&candidate);
        emitted += 1;
        if emitted == count {
            break;
        }
    }

    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CLI {
        CLI::try_parse_from(std::iter::once("idgen").chain(args.iter().copied())).unwrap()
    }

    fn run(config: &CLI, taken: &HashSet<String>) -> Vec<String> {
        let settings = TemplateSettings::builder()
            .prefix(config.prefix.clone())
            .seed(1)
            .build();
        let mut template = Template::with_data(settings, collect_data(config).unwrap());

        let mut out = Vec::new();
        emit(&mut template, config.count, taken, |c| out.push(c.to_string())).unwrap();
        out
    }

    #[test]
    fn fields_are_prefixed_and_template_is_keyed_by_prefix() {
        let config = parse(&["--prefix", "X", "-T", "1f:l", "-f", "f=Grace"]);
        let data = collect_data(&config).unwrap();

        assert_eq!(data["X"], "1f:l");
        assert_eq!(data["Xf"], "Grace");
        assert!(!data.contains_key("f"));
    }

    #[test]
    fn prints_requested_number_of_candidates() {
        let config = parse(&["-T", "1f:l", "-f", "f=Ada", "-f", "l=Byron", "-n", "2"]);
        assert_eq!(run(&config, &HashSet::new()), vec!["abyron", "dbyron"]);
    }

    #[test]
    fn skips_taken_candidates() {
        let config = parse(&["-T", "1f:l", "-f", "f=Grace", "-f", "l=Hopper", "-n", "2"]);
        let taken = HashSet::from(["ghopper".to_string()]);

        assert_eq!(run(&config, &taken), vec!["rhopper", "ahopper"]);
    }

    #[test]
    fn stops_when_alternatives_run_out() {
        let config = parse(&["-T", "=root=", "-n", "5"]);
        assert_eq!(run(&config, &HashSet::new()), vec!["root"]);
    }

    #[test]
    fn skips_the_empty_first_pass_of_a_resolver_only_template() {
        let config = parse(&["-T", "@1f", "-f", "f=xy", "-n", "5"]);
        assert_eq!(run(&config, &HashSet::new()), vec!["x", "y"]);
    }

    #[test]
    fn missing_template_is_an_error() {
        let config = parse(&["-f", "f=Ada"]);
        let mut template = Template::with_data(
            TemplateSettings::default(),
            collect_data(&config).unwrap(),
        );

        let err = emit(&mut template, 1, &HashSet::new(), |_| {}).unwrap_err();
        assert!(err.to_string().contains("template string is not initialized"));
    }

    #[test]
    fn no_blacklist_means_nothing_is_taken() {
        assert!(load_blacklist(None).unwrap().is_empty());
    }
}
