//! Configuration commands.

use anyhow::{Result, bail};
use stookwijzer_config::{Paths, StookwijzerConfig};

use crate::style::{print_labeled, print_section, print_spacer};

/// Show the effective configuration.
pub fn show(config: &StookwijzerConfig, format: &str) -> Result<()> {
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
        }
        "toml" => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{toml_str}");
        }
        "text" => print_text(config),
        other => bail!("Unknown format {other:?} (expected text, json or toml)"),
    }

    Ok(())
}

fn print_text(config: &StookwijzerConfig) {
    print_section("Service:");
    print_labeled("Endpoint", &config.service.endpoint);
    print_labeled("Type name", &config.service.type_name);
    print_labeled("SRS", &config.service.srs_name);
    print_labeled(
        "Bbox half width",
        &config.service.bbox_half_width.to_string(),
    );
    print_labeled(
        "Location count",
        &config.service.location_count.to_string(),
    );
    print_labeled(
        "Request timeout",
        &format!("{}s", config.service.request_timeout_secs),
    );
    print_spacer();

    print_section("Lookup:");
    print_labeled("Debounce", &format!("{}ms", config.lookup.debounce_ms));
    print_spacer();

    print_section("Location:");
    print_labeled("Timeout", &format!("{}s", config.location.timeout_secs));
    print_labeled(
        "Maximum age",
        &format!("{}s", config.location.maximum_age_secs),
    );
    print_labeled(
        "High accuracy",
        &config.location.high_accuracy.to_string(),
    );
    print_labeled(
        "Fixed point",
        &config
            .location
            .fixed_point()
            .map_or("None".to_string(), |p| format!("{}, {}", p.lat(), p.lon())),
    );
    print_spacer();

    print_section("Demo:");
    print_labeled(
        "Point",
        &format!("{}, {}", config.demo.latitude, config.demo.longitude),
    );
    print_spacer();

    print_section("Storage:");
    let preferences = config.preferences_path(&Paths::new()).map_or_else(
        |err| format!("unavailable ({err})"),
        |path| path.display().to_string(),
    );
    print_labeled("Preferences", &preferences);
}
