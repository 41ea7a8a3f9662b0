//! `randevu classify`: diagnose a single title.

use randevu_core::Verdict;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Runs the configured classifier over one title.
pub fn explain(
    config: &ClientConfig,
    title: &str,
    color: Option<&str>,
    minutes: Option<i64>,
) -> ClientResult<Verdict> {
    let pipeline = config.pipeline()?;
    Ok(pipeline.classifier().explain(title, color, minutes))
}

/// Prints the category, its public label and the rule that fired.
pub fn run(
    config: &ClientConfig,
    title: &str,
    color: Option<&str>,
    minutes: Option<i64>,
) -> ClientResult<()> {
    let verdict = explain(config, title, color, minutes)?;
    println!("category: {}", verdict.category);
    println!("label:    {}", config.language.label(verdict.category));
    println!("rule:     {}", verdict.rule);
    Ok(())
}
