use cw_domain::config::Config;
use cw_intake::TopicTable;

/// Parse and validate the config and the topic table it points at,
/// printing any issues. Returns `true` when both are usable.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let mut issues = config.validate();

    match TopicTable::load(config.widget.topics_path.as_deref()) {
        Ok(table) => {
            if table.is_empty() {
                println!("warning: topic table has no topics; every question gets the default answer");
            }
        }
        Err(e) => issues.push(e.to_string()),
    }

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    for issue in &issues {
        println!("error: {issue}");
    }
    println!("\n{} error(s) in {config_path}", issues.len());
    false
}

/// Dump the resolved config (with all defaults filled in) as TOML.
/// The delivery API key is masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

fn render(config: &Config) -> anyhow::Result<String> {
    let mut masked = config.clone();
    if masked.delivery.api_key.is_some() {
        masked.delivery.api_key = Some("********".into());
    }
    toml::to_string_pretty(&masked).map_err(|e| anyhow::anyhow!("serializing config: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_masked() {
        let mut cfg = Config::default();
        cfg.delivery.api_key = Some("super-secret".into());
        let out = render(&cfg).unwrap();
        assert!(!out.contains("super-secret"));
        assert!(out.contains("********"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let out = render(&Config::default()).unwrap();
        let back: Config = toml::from_str(&out).unwrap();
        assert_eq!(back.server.port, Config::default().server.port);
    }

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default(), "config.toml"));
    }
}
