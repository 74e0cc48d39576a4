//! Configuration display

use colored::Colorize;

use wikimovies::config::Config;
use wikimovies::error::Result;

pub fn cmd_config(init: bool) -> Result<()> {
    let path = Config::config_path()?;

    if init {
        Config::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    println!("\n{} {}\n", "Config:".bold(), source);
    println!("  start_url:        {}", config.start_url);
    println!("  allowed_domains:  {}", config.allowed_domains.join(", "));
    println!("  user_agent:       {}", config.user_agent);
    println!("  delay:            {}ms", config.download_delay_ms);
    println!("  per-domain limit: {}", config.concurrent_requests_per_domain);
    println!("  timeout:          {}s", config.timeout_secs);
    println!("  output:           {}", config.output.display());

    Ok(())
}
