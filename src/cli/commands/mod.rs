//! Command execution.

mod rollback;

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;

use rollback::execute_rollback;

/// Execute the rollback described by parsed arguments and return the exit code
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        // Never quiet for validation errors
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    match execute_rollback(&args, &config).await {
        Ok(()) => {
            if !config.is_quiet() {
                config.success_println("Rollback completed");
            }
            Ok(0)
        }
        Err(e) => {
            config.error_println(&format!("Rollback failed: {}", e));

            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                config.hint_println(&format!("  caused by: {}", cause));
                source = cause.source();
            }

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.hint_println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.hint_println(&format!("  • {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}
