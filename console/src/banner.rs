//! Startup banner utilities.

use std::fmt;
use tiered_cache::CacheLevel;

/// Configuration for the startup banner.
pub struct BannerConfig<'a> {
    /// Version string
    pub version: &'a str,
    /// Levels configured at startup
    pub levels: &'a [CacheLevel],
}

impl fmt::Display for BannerConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = "tiered-cache";
        writeln!(f, "{} v{}", name, self.version)?;
        writeln!(f, "{}", "=".repeat(name.len() + self.version.len() + 2))?;
        writeln!(f)?;

        if self.levels.is_empty() {
            writeln!(f, "Levels:      none (use `add <capacity> <policy>`)")?;
        } else {
            writeln!(f, "Levels:")?;
            for (i, level) in self.levels.iter().enumerate() {
                writeln!(
                    f,
                    "  L{}: {} capacity {}",
                    i + 1,
                    level.policy(),
                    level.capacity()
                )?;
            }
        }

        writeln!(f)?;
        write!(f, "Type `help` for a list of commands.")
    }
}

/// Print a startup banner to stdout.
pub fn print_banner(config: &BannerConfig) {
    println!("{}", config);
    println!();
}
