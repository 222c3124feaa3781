mod doctor;
mod init;
mod propagate;
mod variants;

use clap::ValueEnum;

pub use doctor::doctor;
pub use init::init;
pub use propagate::propagate;
pub use variants::variants;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
