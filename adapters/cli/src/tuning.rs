use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use funnel_system_turn_controller::Tuning;

/// Reads controller tuning from a TOML file. Keys left out keep their
/// default values.
pub fn load_tuning(path: impl AsRef<Path>) -> Result<Tuning> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    parse_tuning(&contents).with_context(|| format!("invalid tuning file {}", path.display()))
}

fn parse_tuning(contents: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(contents).context("failed to parse tuning toml")?;
    for (name, value) in [
        ("attack_threshold", tuning.attack_threshold),
        ("extra_shield_threshold", tuning.extra_shield_threshold),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{name} must be a non-negative number, got {value}");
        }
    }
    Ok(tuning)
}
