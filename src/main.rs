//! Release Rollback - undo a published release.

use release_rollback::cli;
use release_rollback::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.hint("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.hint(&format!("  • {}", suggestion));
                }
            }

            process::exit(1);
        }
    }
}
