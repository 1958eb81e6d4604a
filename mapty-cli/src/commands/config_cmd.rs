use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::workout::OutputFormat;
use crate::config::Config;

const DEFAULT_CONFIG: &str = r#"# mapty configuration

# Directory holding workouts.json (default: platform data dir + /mapty)
# data_dir: ~/.local/share/mapty

# Position used when no --at is given, as [lat, lng]
# home: [40.7128, -74.006]

# Map zoom level when centring on a workout
zoom: 15
"#;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print!("{}", describe(config)),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'mapty config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn describe(config: &Config) -> String {
    let mut text = String::from("Configuration\n=============\n\n");

    match &config.config_file {
        Some(path) => text.push_str(&format!("Config file: {}\n\n", path.display())),
        None => text.push_str(&format!(
            "Config file: {} (not found)\n\n",
            Config::default_config_path().display()
        )),
    }

    text.push_str(&format!(
        "data_dir: {}\n  source: {}\n\n",
        config.data_dir.value.display(),
        config.data_dir.source
    ));

    let home = config
        .home
        .value
        .map_or_else(|| "(not set)".to_string(), |coords| coords.to_string());
    text.push_str(&format!("home: {}\n  source: {}\n\n", home, config.home.source));

    text.push_str(&format!(
        "zoom: {}\n  source: {}\n",
        config.zoom.value, config.zoom.source
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, DEFAULT_ZOOM};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_template_parses() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, DEFAULT_CONFIG).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.zoom.value, DEFAULT_ZOOM);
        assert_eq!(config.zoom.source, ConfigSource::File);
        assert_eq!(config.data_dir.source, ConfigSource::Default);
    }

    #[test]
    fn test_init_writes_to_given_path() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");
        let config = Config::load(Some(config_path.clone())).unwrap();
        let cmd = ConfigCommand {
            command: ConfigSubcommand::Init,
        };

        cmd.run(&config, Some(config_path.clone())).unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn test_describe_lists_sources() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "home: [1.5, 2.5]\n").unwrap();

        let text = describe(&Config::load(Some(config_path)).unwrap());
        assert!(text.contains("home: 1.5,2.5\n  source: file"));
        assert!(text.contains("zoom: 15\n  source: default"));
    }
}
