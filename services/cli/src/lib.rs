mod cli;
mod commands;
mod infra;

use ai_governance::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
