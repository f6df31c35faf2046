//! `remind config` — Configuration management commands.

use remind_config::AppConfig;

pub async fn default_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            if !config.has_api_key() {
                println!("   ⚠️  No API key set (set REMIND_API_KEY or OPENAI_API_KEY)");
            }
            println!();
            println!("   Endpoint:   {}", config.base_url);
            println!("   Model:      {}", config.model);
            println!("   Max cycles: {}", config.agent.max_cycles);
            match config.agent.tool_timeout_secs {
                Some(secs) => println!("   Tool limit: {secs}s"),
                None => println!("   Tool limit: none"),
            }
            println!("   File root:  {}", config.tools.file_root.display());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
