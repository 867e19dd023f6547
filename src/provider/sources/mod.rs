//! Concrete release providers, one per remote source

mod bukkit;
mod github;
mod polymart;
mod spiget;
mod spigot;

pub use bukkit::BukkitProvider;
pub use github::GitHubProvider;
pub use polymart::PolymartProvider;
pub use spiget::SpigetProvider;
pub use spigot::SpigotProvider;
