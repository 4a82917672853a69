//! `chatwidget ask`: one-shot answer lookup.

use cw_domain::config::Config;
use cw_intake::TopicTable;

/// Resolve `question` against the configured topic table and print the
/// answer (the default answer on a miss).
pub fn ask(config: &Config, question: &str) -> anyhow::Result<()> {
    let topics = TopicTable::load(config.widget.topics_path.as_deref())?;
    if topics.lookup(question).is_none() {
        tracing::debug!("no topic matched, using default answer");
    }
    println!("{}", topics.resolve(question));
    Ok(())
}
