//! Suggestion command: ask the configured provider, fall back locally.

use habitloom_core::services::suggestion::generate_with_fallback;
use habitloom_core::Config;

pub fn run(prompt: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let text = generate_with_fallback(&config.suggestion, prompt);
    println!("{text}");
    Ok(())
}
