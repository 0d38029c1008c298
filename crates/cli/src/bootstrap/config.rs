use splitdns_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Summary of a loaded configuration; call once logging is up.
pub fn log_loaded(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        custom_dns = config.custom_dns.is_enabled(),
        client_groups = config.custom_dns.client_groups.len(),
        legacy_fields = config.custom_dns.has_legacy_fields(),
        "Configuration loaded"
    );
}
